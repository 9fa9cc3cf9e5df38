use axum::{Json, extract::State, response::IntoResponse};

use crate::error::AdminServiceError;
use crate::handlers::extract::AdminSession;
use crate::state::AppState;
use crate::usecase::dashboard::DashboardUseCase;

// ── GET /api/dashboard ───────────────────────────────────────────────────────

pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<impl IntoResponse, AdminServiceError> {
    let usecase = DashboardUseCase {
        orders: state.order_repo(),
        customers: state.hosting_repo(),
    };
    Ok(Json(usecase.execute().await?))
}
