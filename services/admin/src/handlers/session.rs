use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde_json::json;

use backoffice_auth_types::cookie::{clear_session_cookie, session_token};

use crate::error::AdminServiceError;
use crate::state::AppState;
use crate::usecase::session::{CurrentAdminUseCase, DestroySessionUseCase};

/// `GET /api/auth/session`: 401 `{authenticated:false}` is a normal answer, not an error.
pub async fn get_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, AdminServiceError> {
    let usecase = CurrentAdminUseCase {
        admins: state.admin_repo(),
        sessions: state.session_repo(),
    };
    let token = session_token(&jar);

    let response = match usecase.execute(token.as_deref()).await? {
        Some(admin) => Json(json!({
            "authenticated": true,
            "user": {
                "email": admin.email,
                "name": admin.display_name,
                "role": admin.role.as_str(),
            },
        }))
        .into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "authenticated": false })),
        )
            .into_response(),
    };
    Ok(response)
}

/// `DELETE /api/auth/session`
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AdminServiceError> {
    let usecase = DestroySessionUseCase {
        sessions: state.session_repo(),
    };
    usecase.execute(session_token(&jar).as_deref()).await?;

    let jar = clear_session_cookie(jar, &state.cookies);
    Ok((jar, Json(json!({ "success": true }))))
}
