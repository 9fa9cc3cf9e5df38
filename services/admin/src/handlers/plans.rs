use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use backoffice_core::serde::nullable;
use backoffice_domain::email::EmailAddress;
use backoffice_domain::hosting::BillingCycle;

use crate::domain::types::PlanDraft;
use crate::error::AdminServiceError;
use crate::handlers::extract::{AdminSession, JsonBody};
use crate::state::AppState;
use crate::usecase::billing::{CreateCheckoutInput, CreateCheckoutUseCase, CreatePortalUseCase};
use crate::usecase::plans::{
    CreatePlanUseCase, DeletePlanUseCase, ListPlansUseCase, UpdatePlanUseCase,
};

/// Catalogue plan body. Omitted provider ids are kept on edit; `null` or a
/// blank string clears them.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanRequest {
    pub name: String,
    pub description: String,
    pub monthly_price_cents: i64,
    pub yearly_price_cents: i64,
    pub features: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub stripe_product_id: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub stripe_price_id_monthly: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub stripe_price_id_yearly: Option<Option<String>>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl PlanRequest {
    pub fn into_draft(self) -> Result<PlanDraft, AdminServiceError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(AdminServiceError::Validation("plan name is required"));
        }
        let description = self.description.trim().to_owned();
        if description.is_empty() {
            return Err(AdminServiceError::Validation("plan description is required"));
        }
        if self.monthly_price_cents < 0 || self.yearly_price_cents < 0 {
            return Err(AdminServiceError::Validation("price must not be negative"));
        }
        let features = self
            .features
            .into_iter()
            .map(|f| f.trim().to_owned())
            .filter(|f| !f.is_empty())
            .collect();

        Ok(PlanDraft {
            name,
            description,
            monthly_price_cents: self.monthly_price_cents,
            yearly_price_cents: self.yearly_price_cents,
            features,
            stripe_product_id: self.stripe_product_id.map(non_empty),
            stripe_price_id_monthly: self.stripe_price_id_monthly.map(non_empty),
            stripe_price_id_yearly: self.stripe_price_id_yearly.map(non_empty),
        })
    }
}

// ── GET /api/plans ───────────────────────────────────────────────────────────

pub async fn list_plans(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<impl IntoResponse, AdminServiceError> {
    let usecase = ListPlansUseCase {
        plans: state.plan_repo(),
    };
    Ok(Json(usecase.execute().await?))
}

// ── POST /api/plans ──────────────────────────────────────────────────────────

pub async fn create_plan(
    State(state): State<AppState>,
    admin: AdminSession,
    JsonBody(body): JsonBody<PlanRequest>,
) -> Result<impl IntoResponse, AdminServiceError> {
    let usecase = CreatePlanUseCase {
        plans: state.plan_repo(),
        provider: state.stripe.clone(),
        currency: state.currency.clone(),
    };
    let plan = usecase.execute(body.into_draft()?).await?;
    tracing::info!(plan_id = %plan.id, admin = %admin.email, "catalogue plan added");
    Ok((StatusCode::CREATED, Json(plan)))
}

// ── PUT /api/plans/{id} ──────────────────────────────────────────────────────

pub async fn update_plan(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<PlanRequest>,
) -> Result<impl IntoResponse, AdminServiceError> {
    let usecase = UpdatePlanUseCase {
        plans: state.plan_repo(),
    };
    let plan = usecase.execute(id, body.into_draft()?).await?;
    tracing::info!(plan_id = %id, admin = %admin.email, "catalogue plan edited");
    Ok(Json(plan))
}

// ── DELETE /api/plans/{id} ───────────────────────────────────────────────────

pub async fn delete_plan(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AdminServiceError> {
    let usecase = DeletePlanUseCase {
        plans: state.plan_repo(),
    };
    usecase.execute(id).await?;
    tracing::info!(plan_id = %id, admin = %admin.email, "catalogue plan deleted");
    Ok(Json(json!({ "success": true })))
}

// ── POST /api/plans/checkout ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBody {
    pub price_id: Option<String>,
    pub plan_id: Option<Uuid>,
    pub billing_cycle: Option<String>,
    #[serde(default)]
    pub customer_email: String,
    pub hosting_customer_id: Option<Uuid>,
}

pub async fn create_checkout(
    State(state): State<AppState>,
    admin: AdminSession,
    JsonBody(body): JsonBody<CheckoutBody>,
) -> Result<impl IntoResponse, AdminServiceError> {
    let customer_email = EmailAddress::parse(&body.customer_email)
        .map_err(|_| AdminServiceError::Validation("invalid customer email"))?;
    let billing_cycle = match body.billing_cycle.as_deref() {
        Some(v) => v
            .parse::<BillingCycle>()
            .map_err(|_| AdminServiceError::Validation("unknown billing cycle"))?,
        None => BillingCycle::default(),
    };

    let usecase = CreateCheckoutUseCase {
        customers: state.hosting_repo(),
        plans: state.plan_repo(),
        provider: state.stripe.clone(),
        base_url: state.app_base_url.clone(),
    };
    let session = usecase
        .execute(CreateCheckoutInput {
            price_id: body.price_id,
            plan_id: body.plan_id,
            billing_cycle,
            customer_email,
            hosting_customer_id: body.hosting_customer_id,
        })
        .await?;
    tracing::info!(admin = %admin.email, hosting_customer_id = ?body.hosting_customer_id, "checkout session created");
    Ok(Json(session))
}

// ── POST /api/plans/portal ───────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalBody {
    #[serde(default)]
    pub stripe_customer_id: String,
}

pub async fn create_portal(
    State(state): State<AppState>,
    _admin: AdminSession,
    JsonBody(body): JsonBody<PortalBody>,
) -> Result<impl IntoResponse, AdminServiceError> {
    let usecase = CreatePortalUseCase {
        provider: state.stripe.clone(),
        base_url: state.app_base_url.clone(),
    };
    Ok(Json(usecase.execute(&body.stripe_customer_id).await?))
}
