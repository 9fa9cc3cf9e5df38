use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;

use backoffice_auth_types::cookie::{session_token, set_session_cookie};

use crate::error::AdminServiceError;
use crate::handlers::extract::JsonBody;
use crate::state::AppState;
use crate::usecase::otp::{
    RequestCodeInput, RequestCodeOutcome, RequestCodeUseCase, VerifyCodeInput, VerifyCodeUseCase,
};
use crate::usecase::session::{CreateSessionInput, CreateSessionUseCase};

// ── POST /api/auth/send-otp ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub email: String,
}

pub async fn send_otp(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(body): JsonBody<SendOtpRequest>,
) -> Result<impl IntoResponse, AdminServiceError> {
    let usecase = RequestCodeUseCase {
        admins: state.admin_repo(),
        codes: state.code_repo(),
        sessions: state.session_repo(),
        mailer: state.mailer.clone(),
        allow_list: state.allow_list.clone(),
    };

    let outcome = usecase
        .execute(RequestCodeInput {
            email: body.email,
            session_token: session_token(&jar),
        })
        .await?;

    let body = match outcome {
        RequestCodeOutcome::Issued => json!({ "success": true }),
        RequestCodeOutcome::SkipOtp => json!({ "skipOtp": true }),
    };
    Ok(Json(body))
}

// ── POST /api/auth/verify-otp ────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub otp: String,
    #[serde(default)]
    pub remember_me: bool,
    #[serde(default)]
    pub email: String,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(body): JsonBody<VerifyOtpRequest>,
) -> Result<impl IntoResponse, AdminServiceError> {
    let verify = VerifyCodeUseCase {
        codes: state.code_repo(),
        allow_list: state.allow_list.clone(),
    };
    let email = verify
        .execute(VerifyCodeInput {
            email: body.email,
            code: body.otp,
        })
        .await?
        .ok_or(AdminServiceError::InvalidOrExpiredCode)?;

    let create = CreateSessionUseCase {
        sessions: state.session_repo(),
    };
    let issued = create
        .execute(CreateSessionInput {
            email,
            remember_me: body.remember_me,
        })
        .await?;

    let max_age = issued.max_age_secs();
    let jar = set_session_cookie(jar, issued.token, max_age, &state.cookies);
    Ok((jar, Json(json!({ "success": true }))))
}
