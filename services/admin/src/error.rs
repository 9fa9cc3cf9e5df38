use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Admin service error variants.
#[derive(Debug, thiserror::Error)]
pub enum AdminServiceError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("not authorized")]
    Unauthorized,
    #[error("not authenticated")]
    InvalidSession,
    #[error("invalid or expired code")]
    InvalidOrExpiredCode,
    #[error("failed to deliver email")]
    Delivery(#[source] anyhow::Error),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("malformed payload")]
    MalformedPayload,
    #[error("not found")]
    NotFound,
    #[error("payment provider request failed")]
    PaymentProvider(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AdminServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidSession => "INVALID_SESSION",
            Self::InvalidOrExpiredCode => "INVALID_OR_EXPIRED_CODE",
            Self::Delivery(_) => "DELIVERY",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::MalformedPayload => "MALFORMED_PAYLOAD",
            Self::NotFound => "NOT_FOUND",
            Self::PaymentProvider(_) => "PAYMENT_PROVIDER",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidSignature | Self::MalformedPayload => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::InvalidSession | Self::InvalidOrExpiredCode => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Delivery(_) | Self::PaymentProvider(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AdminServiceError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "rejected request body");
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                Self::Validation("expected an application/json body")
            }
            JsonRejection::JsonSyntaxError(_) => Self::Validation("malformed JSON body"),
            JsonRejection::JsonDataError(_) => Self::Validation("invalid request body"),
            _ => Self::Validation("unreadable request body"),
        }
    }
}

impl IntoResponse for AdminServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        // TraceLayer already records every request; only downstream failures
        // need their cause chain logged here.
        match &self {
            Self::Internal(e) => tracing::error!(error = ?e, kind = self.kind(), "internal error"),
            Self::Delivery(e) | Self::PaymentProvider(e) => {
                tracing::error!(error = ?e, kind = self.kind(), "downstream failure")
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "error": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
