pub mod config;
pub mod constants;
pub mod errors;
pub mod health;
pub mod metrics;
pub mod remediation;
pub mod rpc;
pub mod web;

// Re-export commonly used types
pub use config::{LivenessPolicy, RestartBackend, WatchdogConfig};
pub use errors::{ConfigError, RemediationError, WatchdogError};
pub use health::{HealthMonitor, MonitorSettings, MonitorState};
pub use metrics::WatchdogMetrics;
pub use remediation::{Remediator, RestartOutcome};
pub use rpc::{JsonRpcClient, NodeRpc};
