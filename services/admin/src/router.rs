use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use backoffice_core::health::healthz;
use backoffice_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    auth::{send_otp, verify_otp},
    dashboard::dashboard,
    health::readyz,
    hosting::{create_hosting, delete_hosting, list_hosting, notify_hosting, update_hosting},
    orders::{create_order, delete_order, list_orders, notify_order, update_order},
    plans::{create_checkout, create_plan, create_portal, delete_plan, list_plans, update_plan},
    session::{get_session, logout},
    webhook::stripe_webhook,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // OTP login
        .route("/api/auth/send-otp", post(send_otp))
        .route("/api/auth/verify-otp", post(verify_otp))
        // Session
        .route("/api/auth/session", get(get_session).delete(logout))
        // Billing provider callbacks
        .route("/api/webhooks/stripe", post(stripe_webhook))
        // Hosting customers
        .route("/api/hosting", get(list_hosting).post(create_hosting))
        .route("/api/hosting/notify", post(notify_hosting))
        .route("/api/hosting/{id}", put(update_hosting).delete(delete_hosting))
        // Plan catalogue and billing links
        .route("/api/plans", get(list_plans).post(create_plan))
        .route("/api/plans/checkout", post(create_checkout))
        .route("/api/plans/portal", post(create_portal))
        .route("/api/plans/{id}", put(update_plan).delete(delete_plan))
        // Orders
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/notify", post(notify_order))
        .route("/api/orders/{id}", put(update_order).delete(delete_order))
        // Dashboard
        .route("/api/dashboard", get(dashboard))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
