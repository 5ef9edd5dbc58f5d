//! Restarting the monitored node
//!
//! Restarts are fire-and-forget from the monitor's point of view: every
//! outcome is reported, none is retried.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use tokio::process::Command as AsyncCommand;
use tokio::time::timeout;
use tracing::{debug, error, info};

use crate::config::RestartBackend;
use crate::constants::remediation::RESTART_TIMEOUT;
use crate::errors::RemediationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestartOutcome {
    Restarted,
    NotFound,
    ApiError(String),
}

impl RestartOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RestartOutcome::Restarted)
    }
}

impl fmt::Display for RestartOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestartOutcome::Restarted => write!(f, "restarted"),
            RestartOutcome::NotFound => write!(f, "not found"),
            RestartOutcome::ApiError(reason) => write!(f, "runtime error: {}", reason),
        }
    }
}

#[async_trait]
pub trait Remediator: Send + Sync {
    /// Restart the named container or unit.
    async fn restart(&self, name: &str) -> RestartOutcome;

    /// Check that the runtime is reachable at all. Called once at startup.
    async fn verify(&self) -> Result<(), RemediationError>;
}

/// Build the remediator for the configured backend.
pub fn for_backend(backend: RestartBackend) -> Box<dyn Remediator> {
    match backend {
        RestartBackend::Docker => Box::new(DockerRemediator::new()),
        RestartBackend::Systemctl => Box::new(SystemctlRemediator::new()),
    }
}

#[async_trait]
impl<T: Remediator + ?Sized> Remediator for Box<T> {
    async fn restart(&self, name: &str) -> RestartOutcome {
        (**self).restart(name).await
    }

    async fn verify(&self) -> Result<(), RemediationError> {
        (**self).verify().await
    }
}

pub struct DockerRemediator {
    program: String,
    timeout: Duration,
}

impl DockerRemediator {
    pub fn new() -> Self {
        Self::with_program("docker")
    }

    /// Use a different CLI binary (e.g. `podman`).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: RESTART_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for DockerRemediator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Remediator for DockerRemediator {
    async fn restart(&self, name: &str) -> RestartOutcome {
        info!("Restarting container: {}", name);

        let mut command = AsyncCommand::new(&self.program);
        command.arg("restart").arg(name);

        let outcome =
            run_restart(command, &self.program, self.timeout, classify_docker_failure).await;

        log_outcome(name, &outcome);
        outcome
    }

    async fn verify(&self) -> Result<(), RemediationError> {
        let output = AsyncCommand::new(&self.program)
            .arg("version")
            .arg("--format")
            .arg("{{.Server.Version}}")
            .output()
            .await
            .map_err(|e| RemediationError::SpawnFailed {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(RemediationError::Unavailable {
                program: self.program.clone(),
                reason: stderr,
            });
        }

        debug!(
            "Container runtime reachable, server version {}",
            String::from_utf8_lossy(&output.stdout).trim()
        );
        Ok(())
    }
}

pub fn classify_docker_failure(stderr: &str) -> RestartOutcome {
    let stderr = stderr.trim();
    if stderr.contains("No such container") {
        RestartOutcome::NotFound
    } else {
        RestartOutcome::ApiError(stderr.to_string())
    }
}

/// Restarts nodes that run as systemd units instead of containers.
pub struct SystemctlRemediator {
    timeout: Duration,
}

impl SystemctlRemediator {
    pub fn new() -> Self {
        Self {
            timeout: RESTART_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SystemctlRemediator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Remediator for SystemctlRemediator {
    async fn restart(&self, name: &str) -> RestartOutcome {
        info!("Restarting service: {}", name);

        let mut command = AsyncCommand::new("sudo");
        command.arg("systemctl").arg("restart").arg(name);

        let outcome =
            run_restart(command, "systemctl", self.timeout, classify_systemctl_failure).await;

        log_outcome(name, &outcome);
        outcome
    }

    async fn verify(&self) -> Result<(), RemediationError> {
        let output = AsyncCommand::new("systemctl")
            .arg("--version")
            .output()
            .await
            .map_err(|e| RemediationError::SpawnFailed {
                program: "systemctl".to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(RemediationError::Unavailable {
                program: "systemctl".to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

// The child is killed once `limit` passes; the attempt then counts as failed.
async fn run_restart(
    mut command: AsyncCommand,
    program: &str,
    limit: Duration,
    classify: fn(&str) -> RestartOutcome,
) -> RestartOutcome {
    command.kill_on_drop(true);

    match timeout(limit, command.output()).await {
        Ok(Ok(result)) if result.status.success() => RestartOutcome::Restarted,
        Ok(Ok(result)) => classify(&String::from_utf8_lossy(&result.stderr)),
        Ok(Err(e)) => RestartOutcome::ApiError(format!("failed to run {}: {}", program, e)),
        Err(_) => RestartOutcome::ApiError(format!(
            "{} restart timed out after {:?}",
            program, limit
        )),
    }
}

/// Only a missing unit is `NotFound`; a missing `systemctl` binary is not.
pub fn classify_systemctl_failure(stderr: &str) -> RestartOutcome {
    let stderr = stderr.trim();
    let unit_missing = stderr.lines().any(|line| {
        line.contains("Unit ") && (line.contains(" not found") || line.contains(" not loaded"))
    });
    if unit_missing {
        RestartOutcome::NotFound
    } else {
        RestartOutcome::ApiError(stderr.to_string())
    }
}

fn log_outcome(name: &str, outcome: &RestartOutcome) {
    match outcome {
        RestartOutcome::Restarted => info!("Restarted: {}", name),
        RestartOutcome::NotFound => error!("No such container: {}", name),
        RestartOutcome::ApiError(reason) => {
            error!("Failed to restart {}: {}", name, reason)
        }
    }
}
