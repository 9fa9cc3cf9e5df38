use sea_orm::Database;
use tracing::{info, warn};

use backoffice_admin::config::AdminConfig;
use backoffice_admin::router::build_router;
use backoffice_admin::state::AppState;
use backoffice_core::config::Config;
use backoffice_core::tracing::init_tracing;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() {
    init_tracing("backoffice_admin=info,tower_http=info");

    let config = AdminConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState::new(db.clone(), &config).expect("failed to build application state");
    if state.allow_list.is_empty() {
        warn!("ADMIN_EMAILS is empty; nobody can sign in");
    } else {
        info!(admins = state.allow_list.len(), "admin allow-list loaded");
    }

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.admin_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("admin service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    if let Err(e) = db.close().await {
        warn!(error = %e, "failed to close database pool");
    }
}
