use crate::constants::http::{HEALTH_PATH, METRICS_PATH};
use crate::web::{handlers, AppState};
use anyhow::{anyhow, Result};
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Bind eagerly so a taken port fails startup instead of a background task.
pub async fn bind_metrics_listener(addr: &str) -> Result<TcpListener> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow!("Failed to bind metrics server on {}: {}", addr, e))?;
    info!(
        "Prometheus metrics available at: http://{}{}",
        listener.local_addr()?,
        METRICS_PATH
    );
    Ok(listener)
}

pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let app = create_router(state);
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(METRICS_PATH, get(handlers::get_metrics))
        .route(HEALTH_PATH, get(handlers::get_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
