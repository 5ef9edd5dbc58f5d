//! Remediator that records restarts instead of touching a container runtime

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;
use watchdog::errors::RemediationError;
use watchdog::remediation::{Remediator, RestartOutcome};

#[derive(Clone)]
pub struct RecordingRemediator {
    outcome: RestartOutcome,
    panics: bool,
    restarts: Arc<Mutex<Vec<(String, Instant)>>>,
}

impl RecordingRemediator {
    pub fn new() -> Self {
        Self::with_outcome(RestartOutcome::Restarted)
    }

    pub fn with_outcome(outcome: RestartOutcome) -> Self {
        Self {
            outcome,
            panics: false,
            restarts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Record the attempt, then blow up inside the restart call.
    pub fn panicking() -> Self {
        Self {
            panics: true,
            ..Self::new()
        }
    }

    pub fn restart_count(&self) -> usize {
        self.restarts.lock().unwrap().len()
    }

    pub fn restarted_names(&self) -> Vec<String> {
        self.restarts
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn restart_times(&self) -> Vec<Instant> {
        self.restarts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, at)| *at)
            .collect()
    }
}

impl Default for RecordingRemediator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Remediator for RecordingRemediator {
    async fn restart(&self, name: &str) -> RestartOutcome {
        self.restarts
            .lock()
            .unwrap()
            .push((name.to_string(), Instant::now()));
        if self.panics {
            panic!("remediator exploded restarting {}", name);
        }
        self.outcome.clone()
    }

    async fn verify(&self) -> Result<(), RemediationError> {
        Ok(())
    }
}
