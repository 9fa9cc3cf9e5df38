use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use backoffice_core::serde::nullable;
use backoffice_domain::email::EmailAddress;
use backoffice_domain::hosting::{BillingCycle, HostingPlan, HostingStatus};

use crate::domain::types::HostingDraft;
use crate::error::AdminServiceError;
use crate::handlers::extract::{AdminSession, JsonBody};
use crate::state::AppState;
use crate::usecase::hosting::{
    CreateHostingCustomerUseCase, DeleteHostingCustomerUseCase, ListHostingCustomersUseCase,
    SendRenewalReminderUseCase, UpdateHostingCustomerUseCase,
};

/// Create/edit body, in the same shape the list endpoint returns.
///
/// Enum fields arrive as strings and are checked here. An omitted provider id
/// keeps the stored link; `null` or a blank string clears it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostingRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub domain: String,
    pub plan: Option<String>,
    pub billing_cycle: Option<String>,
    pub amount_cents: i64,
    pub status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub renewal_date: Option<NaiveDate>,
    #[serde(deserialize_with = "nullable")]
    pub stripe_customer_id: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub stripe_subscription_id: Option<Option<String>>,
    pub notes: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl HostingRequest {
    pub fn into_draft(self) -> Result<HostingDraft, AdminServiceError> {
        let customer_name = self.customer_name.trim().to_owned();
        if customer_name.is_empty() {
            return Err(AdminServiceError::Validation("customer name is required"));
        }
        let customer_email = EmailAddress::parse(&self.customer_email)
            .map_err(|_| AdminServiceError::Validation("invalid customer email"))?;
        let domain = self.domain.trim().to_lowercase();
        if domain.is_empty() {
            return Err(AdminServiceError::Validation("domain is required"));
        }
        let plan = self
            .plan
            .as_deref()
            .ok_or(AdminServiceError::Validation("plan is required"))?
            .parse::<HostingPlan>()
            .map_err(|_| AdminServiceError::Validation("unknown plan"))?;
        let billing_cycle = match self.billing_cycle.as_deref() {
            Some(v) => v
                .parse::<BillingCycle>()
                .map_err(|_| AdminServiceError::Validation("unknown billing cycle"))?,
            None => BillingCycle::default(),
        };
        let status = match self.status.as_deref() {
            Some(v) => v
                .parse::<HostingStatus>()
                .map_err(|_| AdminServiceError::Validation("unknown status"))?,
            None => HostingStatus::default(),
        };
        if self.amount_cents < 0 {
            return Err(AdminServiceError::Validation("amount must not be negative"));
        }

        Ok(HostingDraft {
            customer_name,
            customer_email,
            domain,
            plan,
            billing_cycle,
            amount_cents: self.amount_cents,
            status,
            start_date: self.start_date,
            renewal_date: self.renewal_date,
            external_customer_ref: self.stripe_customer_id.map(non_empty),
            external_subscription_ref: self.stripe_subscription_id.map(non_empty),
            notes: non_empty(self.notes),
        })
    }
}

// ── GET /api/hosting ─────────────────────────────────────────────────────────

pub async fn list_hosting(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<impl IntoResponse, AdminServiceError> {
    let usecase = ListHostingCustomersUseCase {
        customers: state.hosting_repo(),
    };
    Ok(Json(usecase.execute().await?))
}

// ── POST /api/hosting ────────────────────────────────────────────────────────

pub async fn create_hosting(
    State(state): State<AppState>,
    _admin: AdminSession,
    JsonBody(body): JsonBody<HostingRequest>,
) -> Result<impl IntoResponse, AdminServiceError> {
    let usecase = CreateHostingCustomerUseCase {
        customers: state.hosting_repo(),
    };
    let customer = usecase.execute(body.into_draft()?).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

// ── PUT /api/hosting/{id} ────────────────────────────────────────────────────

pub async fn update_hosting(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<HostingRequest>,
) -> Result<impl IntoResponse, AdminServiceError> {
    let usecase = UpdateHostingCustomerUseCase {
        customers: state.hosting_repo(),
    };
    let customer = usecase.execute(id, body.into_draft()?).await?;
    tracing::info!(hosting_customer_id = %id, admin = %admin.email, "hosting customer edited");
    Ok(Json(customer))
}

// ── DELETE /api/hosting/{id} ─────────────────────────────────────────────────

pub async fn delete_hosting(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AdminServiceError> {
    let usecase = DeleteHostingCustomerUseCase {
        customers: state.hosting_repo(),
    };
    usecase.execute(id).await?;
    tracing::info!(hosting_customer_id = %id, admin = %admin.email, "hosting customer deleted");
    Ok(Json(json!({ "success": true })))
}

// ── POST /api/hosting/notify ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct NotifyRequest {
    pub id: Uuid,
}

pub async fn notify_hosting(
    State(state): State<AppState>,
    _admin: AdminSession,
    JsonBody(body): JsonBody<NotifyRequest>,
) -> Result<impl IntoResponse, AdminServiceError> {
    let usecase = SendRenewalReminderUseCase {
        customers: state.hosting_repo(),
        mailer: state.mailer.clone(),
    };
    usecase.execute(body.id).await?;
    Ok(Json(json!({ "success": true })))
}
