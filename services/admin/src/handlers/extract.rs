use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use backoffice_auth_types::cookie::session_token;

use crate::error::AdminServiceError;
use crate::state::AppState;
use crate::usecase::session::ResolveSessionUseCase;

/// Authenticated administrator, resolved from the session cookie.
///
/// Rejects with [`AdminServiceError::InvalidSession`] (401) when the cookie is
/// missing, unknown or expired.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub email: String,
    pub remember_me: bool,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AdminServiceError;

    // Read everything needed from `parts` up front so the returned future is 'static.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = session_token(&CookieJar::from_headers(&parts.headers));
        let usecase = ResolveSessionUseCase {
            sessions: state.session_repo(),
        };

        async move {
            let session = usecase
                .execute(token.as_deref())
                .await?
                .ok_or(AdminServiceError::InvalidSession)?;
            Ok(Self {
                email: session.email,
                remember_me: session.remember_me,
            })
        }
    }
}

/// `Json` body whose rejection renders as the service's error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AdminServiceError))]
pub struct JsonBody<T>(pub T);
