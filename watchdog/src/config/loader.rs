use super::WatchdogConfig;
use crate::errors::ConfigError;
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, info};

/// Environment variable pointing at an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "WATCHDOG_CONFIG";

impl WatchdogConfig {
    /// Defaults, then the optional TOML file, then process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Same layering as [`WatchdogConfig::load`] with an arbitrary variable source.
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match non_empty(&lookup, CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env_overrides(&lookup)?;
        config.validate()?;

        info!(
            "Configuration loaded: node {}, policy {}, retry limit {}, retry delay {}s, restart delay {}s, target '{}' via {}",
            config.node_url(),
            config.policy,
            config.retry_limit,
            config.retry_delay_seconds,
            config.restart_delay_seconds,
            config.container_name,
            config.restart_backend
        );

        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        debug!("Loading watchdog config: {}", path);
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            reason: e.to_string(),
        })
    }

    fn apply_env_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = non_empty(lookup, "NIMIQ_HOST") {
            self.node_host = host;
        }
        if let Some(port) = parse_var(lookup, "NIMIQ_PORT")? {
            self.node_port = port;
        }
        if let Some(port) = parse_var(lookup, "PROMETHEUS_PORT")? {
            self.metrics_port = port;
        }
        if let Some(address) = non_empty(lookup, "METRICS_BIND_ADDRESS") {
            self.metrics_bind_address = address;
        }
        if let Some(limit) = parse_var(lookup, "RETRY_LIMIT")? {
            self.retry_limit = limit;
        }
        if let Some(delay) = parse_var(lookup, "RETRY_DELAY")? {
            self.retry_delay_seconds = delay;
        }
        if let Some(delay) = parse_var(lookup, "RESTART_DELAY")? {
            self.restart_delay_seconds = delay;
        }
        if let Some(name) = non_empty(lookup, "DOCKER_CONTAINER_NAME") {
            self.container_name = name;
        }
        if let Some(timeout) = parse_var(lookup, "RPC_TIMEOUT")? {
            self.rpc_timeout_seconds = timeout;
        }
        if let Some(policy) = parse_var(lookup, "MONITOR_POLICY")? {
            self.policy = policy;
        }
        if let Some(backend) = parse_var(lookup, "RESTART_BACKEND")? {
            self.restart_backend = backend;
        }
        Ok(())
    }
}

// Blank values count as unset; compose files often declare `KEY=` with nothing.
fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match non_empty(lookup, key) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                field: key.to_string(),
                reason: format!("'{}': {}", raw, e),
            }),
        None => Ok(None),
    }
}
