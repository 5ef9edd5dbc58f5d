use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use watchdog::health::{HealthMonitor, MonitorSettings};
use watchdog::remediation::{self, Remediator};
use watchdog::rpc::JsonRpcClient;
use watchdog::web::{self, AppState};
use watchdog::{WatchdogConfig, WatchdogMetrics};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("watchdog=info".parse()?)
        .add_directive("nimiq_watchdog=info".parse()?)
        .add_directive("tower_http=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    info!("Starting Nimiq watchdog...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = WatchdogConfig::load()?;

    let metrics = Arc::new(WatchdogMetrics::new()?);

    let remediator = remediation::for_backend(config.restart_backend);
    remediator.verify().await?;
    info!("Restart backend '{}' is reachable", config.restart_backend);

    let listener = web::bind_metrics_listener(&config.metrics_address()).await?;
    let server_state = AppState::new(metrics.clone());
    tokio::spawn(async move {
        if let Err(e) = web::serve(listener, server_state).await {
            error!("Metrics server stopped: {}", e);
        }
    });

    let node_url = config.node_url();
    info!("Connecting to Nimiq node at: {}", node_url);
    let rpc = JsonRpcClient::new(node_url, config.rpc_timeout())?;

    let mut monitor = HealthMonitor::new(
        MonitorSettings::from(&config),
        rpc,
        remediator,
        metrics,
    );

    tokio::select! {
        _ = monitor.run() => {}
        _ = shutdown_signal() => {
            warn!("Shutdown signal received, stopping watchdog");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
