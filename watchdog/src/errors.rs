//! Custom error types for the watchdog
//!
//! Only startup and remediation paths produce these. Transient RPC failures
//! never surface as errors past the monitor; they become unknown observations.

use std::fmt;

/// Main error type for the watchdog
#[derive(Debug)]
pub enum WatchdogError {
    /// Configuration-related errors
    Config(ConfigError),

    /// Container runtime / service manager errors
    Remediation(RemediationError),

    /// Metrics registry errors
    Metrics(String),
}

/// Configuration error variants
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to load configuration file
    LoadFailed { path: String, reason: String },

    /// Invalid configuration value
    InvalidValue { field: String, reason: String },

    /// Configuration parsing error
    ParseError { reason: String },
}

/// Remediation backend error variants
#[derive(Debug)]
pub enum RemediationError {
    /// The runtime binary could not be spawned
    SpawnFailed { program: String, reason: String },

    /// The runtime answered but reported itself unusable
    Unavailable { program: String, reason: String },
}

impl fmt::Display for WatchdogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchdogError::Config(e) => write!(f, "Configuration error: {}", e),
            WatchdogError::Remediation(e) => write!(f, "Remediation error: {}", e),
            WatchdogError::Metrics(msg) => write!(f, "Metrics error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
            ConfigError::ParseError { reason } => {
                write!(f, "Failed to parse config: {}", reason)
            }
        }
    }
}

impl fmt::Display for RemediationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemediationError::SpawnFailed { program, reason } => {
                write!(f, "Failed to run '{}': {}", program, reason)
            }
            RemediationError::Unavailable { program, reason } => {
                write!(f, "'{}' is not usable: {}", program, reason)
            }
        }
    }
}

impl std::error::Error for WatchdogError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for RemediationError {}

impl From<ConfigError> for WatchdogError {
    fn from(err: ConfigError) -> Self {
        WatchdogError::Config(err)
    }
}

impl From<RemediationError> for WatchdogError {
    fn from(err: RemediationError) -> Self {
        WatchdogError::Remediation(err)
    }
}

impl From<prometheus::Error> for WatchdogError {
    fn from(err: prometheus::Error) -> Self {
        WatchdogError::Metrics(err.to_string())
    }
}
