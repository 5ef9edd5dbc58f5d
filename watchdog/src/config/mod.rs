pub mod loader;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::defaults;
use crate::errors::ConfigError;

pub use loader::CONFIG_PATH_ENV;

/// Which observation decides whether the node is making progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LivenessPolicy {
    /// Block height must change between polls
    #[default]
    BlockHeight,
    /// Node must report consensus established
    Consensus,
}

impl FromStr for LivenessPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block-height" | "block_height" | "blockheight" => Ok(LivenessPolicy::BlockHeight),
            "consensus" => Ok(LivenessPolicy::Consensus),
            other => Err(format!(
                "unknown policy '{}', expected 'block-height' or 'consensus'",
                other
            )),
        }
    }
}

impl fmt::Display for LivenessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LivenessPolicy::BlockHeight => write!(f, "block-height"),
            LivenessPolicy::Consensus => write!(f, "consensus"),
        }
    }
}

/// How the node gets restarted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestartBackend {
    #[default]
    Docker,
    Systemctl,
}

impl FromStr for RestartBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docker" => Ok(RestartBackend::Docker),
            "systemctl" | "systemd" => Ok(RestartBackend::Systemctl),
            other => Err(format!(
                "unknown restart backend '{}', expected 'docker' or 'systemctl'",
                other
            )),
        }
    }
}

impl fmt::Display for RestartBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestartBackend::Docker => write!(f, "docker"),
            RestartBackend::Systemctl => write!(f, "systemctl"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchdogConfig {
    pub node_host: String,
    pub node_port: u16,
    pub metrics_port: u16,
    pub metrics_bind_address: String,
    pub retry_limit: u32,
    pub retry_delay_seconds: u64,
    pub restart_delay_seconds: u64,
    pub container_name: String,
    pub rpc_timeout_seconds: u64,
    pub policy: LivenessPolicy,
    pub restart_backend: RestartBackend,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            node_host: defaults::NODE_HOST.to_string(),
            node_port: defaults::NODE_PORT,
            metrics_port: defaults::METRICS_PORT,
            metrics_bind_address: defaults::METRICS_BIND_ADDRESS.to_string(),
            retry_limit: defaults::RETRY_LIMIT,
            retry_delay_seconds: defaults::RETRY_DELAY_SECONDS,
            restart_delay_seconds: defaults::RESTART_DELAY_SECONDS,
            container_name: defaults::CONTAINER_NAME.to_string(),
            rpc_timeout_seconds: defaults::RPC_TIMEOUT_SECONDS,
            policy: LivenessPolicy::default(),
            restart_backend: RestartBackend::default(),
        }
    }
}

impl WatchdogConfig {
    /// Node JSON-RPC endpoint. Hosts given without a scheme get `http://`.
    pub fn node_url(&self) -> String {
        let host = self.node_host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{}:{}", host, self.node_port)
        } else {
            format!("http://{}:{}", host, self.node_port)
        }
    }

    pub fn metrics_address(&self) -> String {
        format!("{}:{}", self.metrics_bind_address, self.metrics_port)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_seconds)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_secs(self.restart_delay_seconds)
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_seconds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry_limit".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.rpc_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "rpc_timeout_seconds".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.container_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "container_name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.node_host.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "node_host".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
