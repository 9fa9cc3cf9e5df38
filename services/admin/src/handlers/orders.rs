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

use backoffice_domain::email::EmailAddress;
use backoffice_domain::order::{FulfillmentStatus, OrderService};

use crate::domain::types::OrderDraft;
use crate::error::AdminServiceError;
use crate::handlers::extract::{AdminSession, JsonBody};
use crate::state::AppState;
use crate::usecase::orders::{
    CreateOrderUseCase, DeleteOrderUseCase, ListOrdersUseCase, SendOrderUpdateUseCase,
    UpdateOrderUseCase,
};

const MIN_DESCRIPTION_CHARS: usize = 10;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub service: Option<String>,
    pub description: String,
    pub amount_cents: i64,
    pub fulfillment_status: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl OrderRequest {
    pub fn into_draft(self) -> Result<OrderDraft, AdminServiceError> {
        let customer_name = self.customer_name.trim().to_owned();
        if customer_name.is_empty() {
            return Err(AdminServiceError::Validation("customer name is required"));
        }
        let customer_email = EmailAddress::parse(&self.customer_email)
            .map_err(|_| AdminServiceError::Validation("invalid customer email"))?;
        let service = self
            .service
            .as_deref()
            .ok_or(AdminServiceError::Validation("service is required"))?
            .parse::<OrderService>()
            .map_err(|_| AdminServiceError::Validation("unknown service"))?;
        let description = self.description.trim().to_owned();
        if description.chars().count() < MIN_DESCRIPTION_CHARS {
            return Err(AdminServiceError::Validation(
                "description must be at least 10 characters",
            ));
        }
        if self.amount_cents < 0 {
            return Err(AdminServiceError::Validation("amount must not be negative"));
        }
        let fulfillment_status = match self.fulfillment_status.as_deref() {
            Some(v) => v
                .parse::<FulfillmentStatus>()
                .map_err(|_| AdminServiceError::Validation("unknown order status"))?,
            None => FulfillmentStatus::default(),
        };
        let notes = self
            .notes
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty());

        Ok(OrderDraft {
            customer_name,
            customer_email,
            service,
            description,
            amount_cents: self.amount_cents,
            fulfillment_status,
            due_date: self.due_date,
            notes,
        })
    }
}

// ── GET /api/orders ──────────────────────────────────────────────────────────

pub async fn list_orders(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<impl IntoResponse, AdminServiceError> {
    let usecase = ListOrdersUseCase {
        orders: state.order_repo(),
    };
    Ok(Json(usecase.execute().await?))
}

// ── POST /api/orders ─────────────────────────────────────────────────────────

pub async fn create_order(
    State(state): State<AppState>,
    _admin: AdminSession,
    JsonBody(body): JsonBody<OrderRequest>,
) -> Result<impl IntoResponse, AdminServiceError> {
    let usecase = CreateOrderUseCase {
        orders: state.order_repo(),
    };
    let order = usecase.execute(body.into_draft()?).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

// ── PUT /api/orders/{id} ─────────────────────────────────────────────────────

pub async fn update_order(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<OrderRequest>,
) -> Result<impl IntoResponse, AdminServiceError> {
    let usecase = UpdateOrderUseCase {
        orders: state.order_repo(),
    };
    let order = usecase.execute(id, body.into_draft()?).await?;
    tracing::info!(order_id = %id, admin = %admin.email, "order edited");
    Ok(Json(order))
}

// ── DELETE /api/orders/{id} ──────────────────────────────────────────────────

pub async fn delete_order(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AdminServiceError> {
    let usecase = DeleteOrderUseCase {
        orders: state.order_repo(),
    };
    usecase.execute(id).await?;
    tracing::info!(order_id = %id, admin = %admin.email, "order deleted");
    Ok(Json(json!({ "success": true })))
}

// ── POST /api/orders/notify ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct OrderNotifyRequest {
    pub id: Uuid,
    pub message: Option<String>,
}

pub async fn notify_order(
    State(state): State<AppState>,
    _admin: AdminSession,
    JsonBody(body): JsonBody<OrderNotifyRequest>,
) -> Result<impl IntoResponse, AdminServiceError> {
    let usecase = SendOrderUpdateUseCase {
        orders: state.order_repo(),
        mailer: state.mailer.clone(),
    };
    usecase.execute(body.id, body.message.as_deref()).await?;
    Ok(Json(json!({ "success": true })))
}
