use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use chrono::Utc;
use serde_json::{Value, json};

use crate::error::AdminServiceError;
use crate::state::AppState;
use crate::usecase::reconcile::{ReconcileInput, ReconcileWebhookUseCase};
use crate::webhook::signature::SIGNATURE_HEADER;

/// `POST /api/webhooks/stripe`. The body must stay raw for signature checks.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AdminServiceError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let usecase = ReconcileWebhookUseCase {
        customers: state.hosting_repo(),
        events: state.webhook_event_repo(),
        provider: state.stripe.clone(),
        mailer: state.mailer.clone(),
        signing_secret: state.webhook_secret.clone(),
    };
    let outcome = usecase
        .execute(ReconcileInput {
            payload: &body,
            signature,
            received_at: Utc::now(),
        })
        .await?;
    tracing::debug!(?outcome, "webhook handled");

    Ok(Json(json!({ "received": true })))
}
