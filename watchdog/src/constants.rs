//! Central repository for default configuration values, timeouts and metric names
//!
//! Organized by category so the config layer, the monitor and the metrics
//! server all read from a single source of truth.

use std::time::Duration;

/// Default configuration values (mirroring the environment defaults)
pub mod defaults {
    /// Default node host when `NIMIQ_HOST` is unset
    pub const NODE_HOST: &str = "node";

    /// Default node JSON-RPC port
    pub const NODE_PORT: u16 = 8648;

    /// Default port for the Prometheus metrics server
    pub const METRICS_PORT: u16 = 12345;

    /// Default bind host for the metrics server
    pub const METRICS_BIND_ADDRESS: &str = "0.0.0.0";

    /// Consecutive stuck observations before a restart
    pub const RETRY_LIMIT: u32 = 1;

    /// Seconds between polls
    pub const RETRY_DELAY_SECONDS: u64 = 2;

    /// Seconds to wait after a restart before polling again
    pub const RESTART_DELAY_SECONDS: u64 = 300; // 5 minutes

    /// Default container (or systemd unit) to restart
    pub const CONTAINER_NAME: &str = "node";

    /// Default per-request RPC timeout in seconds
    pub const RPC_TIMEOUT_SECONDS: u64 = 5;
}

/// Monitor loop timing
pub mod monitor {
    use super::Duration;

    /// Back-off after a cycle blows up before the loop resumes
    pub const LOOP_ERROR_BACKOFF: Duration = Duration::from_secs(1);

    /// Emit a status summary every N monitoring cycles
    pub const STATUS_LOG_EVERY_CYCLES: u64 = 10;
}

/// Restart command limits
pub mod remediation {
    use super::Duration;

    /// Upper bound on a single `docker restart` / `systemctl restart` call.
    /// Docker's own stop grace period is 10s, so this leaves ample room.
    pub const RESTART_TIMEOUT: Duration = Duration::from_secs(120);
}

/// JSON-RPC method names exposed by the node
pub mod rpc_methods {
    pub const IS_CONSENSUS_ESTABLISHED: &str = "isConsensusEstablished";
    pub const GET_BLOCK_NUMBER: &str = "getBlockNumber";
    pub const GET_EPOCH_NUMBER: &str = "getEpochNumber";
    pub const GET_BATCH_NUMBER: &str = "getBatchNumber";
}

/// Prometheus metric names
pub mod metric_names {
    pub const INITIAL_SYNC: &str = "nimiq_watchdog_initial_sync";
    pub const CURRENT_HEALTH: &str = "nimiq_watchdog_current_health";
    pub const CURRENT_EPOCH: &str = "nimiq_watchdog_current_epoch";
    pub const CURRENT_BATCH: &str = "nimiq_watchdog_current_batch";
    pub const BLOCK_HEIGHT: &str = "nimiq_watchdog_block_height";
    pub const CONSECUTIVE_STUCK: &str = "nimiq_watchdog_consecutive_stuck";
    pub const CONTAINER_RESTARTS: &str = "nimiq_watchdog_container_restarts_total";
    pub const RESTART_FAILURES: &str = "nimiq_watchdog_restart_failures_total";
}

/// Metrics HTTP server paths
pub mod http {
    pub const METRICS_PATH: &str = "/metrics";
    pub const HEALTH_PATH: &str = "/health";
}
