pub mod handlers;
pub mod server;

use std::sync::Arc;

use crate::metrics::WatchdogMetrics;

pub use server::{bind_metrics_listener, create_router, serve};

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<WatchdogMetrics>,
}

impl AppState {
    pub fn new(metrics: Arc<WatchdogMetrics>) -> Self {
        Self { metrics }
    }
}
