use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use super::state::MonitorState;
use super::types::{MonitorPhase, NodeObservation, Progress};
use crate::config::{LivenessPolicy, WatchdogConfig};
use crate::constants::monitor::{LOOP_ERROR_BACKOFF, STATUS_LOG_EVERY_CYCLES};
use crate::metrics::WatchdogMetrics;
use crate::remediation::{Remediator, RestartOutcome};
use crate::rpc::NodeRpc;

/// The subset of configuration the loop itself needs
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub policy: LivenessPolicy,
    pub retry_limit: u32,
    pub retry_delay: Duration,
    pub restart_delay: Duration,
    pub target: String,
}

impl From<&WatchdogConfig> for MonitorSettings {
    fn from(config: &WatchdogConfig) -> Self {
        Self {
            policy: config.policy,
            retry_limit: config.retry_limit.max(1),
            retry_delay: config.retry_delay(),
            restart_delay: config.restart_delay(),
            target: config.container_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Healthy,
    Stuck { consecutive: u32 },
    Remediated(RestartOutcome),
}

pub struct HealthMonitor<R, D> {
    settings: MonitorSettings,
    rpc: R,
    remediator: D,
    metrics: Arc<WatchdogMetrics>,
    state: MonitorState,
    cycles: u64,
}

impl<R: NodeRpc, D: Remediator> HealthMonitor<R, D> {
    pub fn new(
        settings: MonitorSettings,
        rpc: R,
        remediator: D,
        metrics: Arc<WatchdogMetrics>,
    ) -> Self {
        metrics.set_initial_sync(false);

        Self {
            settings,
            rpc,
            remediator,
            metrics,
            state: MonitorState::new(),
            cycles: 0,
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Run forever. Only an external signal (dropping this future) stops it.
    pub async fn run(&mut self) {
        loop {
            let step = AssertUnwindSafe(self.step()).catch_unwind().await;
            if let Err(panic) = step {
                error!("Monitor cycle failed: {}", panic_message(panic.as_ref()));
                sleep(LOOP_ERROR_BACKOFF).await;
            }
        }
    }

    async fn step(&mut self) {
        match self.state.phase {
            MonitorPhase::AwaitingInitialSync => {
                self.wait_for_initial_sync().await;
                info!(
                    "Starting continuous monitoring ({} policy)...",
                    self.settings.policy
                );
            }
            MonitorPhase::Monitoring => {
                self.run_cycle().await;
            }
            MonitorPhase::RemediationCooldown => {
                // Previous step died mid-remediation.
                warn!(
                    "Resuming interrupted cooldown, sleeping for {}s...",
                    self.settings.restart_delay.as_secs()
                );
                sleep(self.settings.restart_delay).await;
                self.state.end_cooldown();
            }
        }
    }

    /// Block until the node first reports consensus. Never remediates.
    pub async fn wait_for_initial_sync(&mut self) {
        if self.state.phase != MonitorPhase::AwaitingInitialSync {
            return;
        }

        info!("Waiting for initial sync...");
        while !self.poll_initial_sync().await {
            sleep(self.settings.retry_delay).await;
        }
    }

    /// One initial-sync poll; true once the node has reached consensus.
    pub async fn poll_initial_sync(&mut self) -> bool {
        if self.state.phase != MonitorPhase::AwaitingInitialSync {
            return true;
        }

        match self.rpc.consensus_established().await {
            Ok(true) => {
                self.state.complete_initial_sync();
                self.metrics.set_initial_sync(true);
                info!("Initial sync completed.");
                true
            }
            Ok(false) => {
                info!("Initial sync not yet completed, waiting...");
                false
            }
            Err(e) => {
                warn!("Failed to fetch consensus status: {}", e);
                false
            }
        }
    }

    /// Poll whatever the active policy classifies on.
    pub async fn observe(&self) -> NodeObservation {
        match self.settings.policy {
            LivenessPolicy::BlockHeight => {
                let height = match self.rpc.block_number().await {
                    Ok(height) => Some(height),
                    Err(e) => {
                        warn!("Failed to fetch block number: {}", e);
                        None
                    }
                };
                NodeObservation::with_block_height(height)
            }
            LivenessPolicy::Consensus => {
                let consensus = match self.rpc.consensus_established().await {
                    Ok(consensus) => Some(consensus),
                    Err(e) => {
                        warn!("Failed to fetch consensus status: {}", e);
                        None
                    }
                };
                NodeObservation::with_consensus(consensus)
            }
        }
    }

    /// One monitoring cycle: observe, classify, export, then either restart
    /// and cool down or wait the retry delay.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.state.end_cooldown();
        self.cycles += 1;

        let mut observation = self.observe().await;
        let progress = self.state.record(self.settings.policy, &observation);
        self.metrics
            .set_consecutive_stuck(self.state.consecutive_stuck_count);

        let outcome = match progress {
            Progress::Progressing => {
                self.metrics.set_health(true);
                if let Some(height) = observation.block_height {
                    self.metrics.set_block_height(height);
                }
                self.fetch_telemetry(&mut observation).await;
                debug!("Node healthy: {:?}", observation);
                CycleOutcome::Healthy
            }
            Progress::Stuck => {
                self.metrics.set_health(false);
                warn!(
                    "Node not progressing ({}): attempt {}/{}",
                    self.describe_stuck(&observation),
                    self.state.consecutive_stuck_count,
                    self.settings.retry_limit
                );
                CycleOutcome::Stuck {
                    consecutive: self.state.consecutive_stuck_count,
                }
            }
        };

        if self.cycles.is_multiple_of(STATUS_LOG_EVERY_CYCLES) {
            info!(
                "Monitoring cycle #{} - last height {:?}, stuck {}/{}, restarts {}",
                self.cycles,
                self.state.last_block_height,
                self.state.consecutive_stuck_count,
                self.settings.retry_limit,
                self.state.restart_count
            );
        }

        if self.state.threshold_reached(self.settings.retry_limit) {
            return CycleOutcome::Remediated(self.remediate().await);
        }

        sleep(self.settings.retry_delay).await;
        outcome
    }

    // Epoch and batch are telemetry only; failures never touch the verdict.
    async fn fetch_telemetry(&self, observation: &mut NodeObservation) {
        match self.rpc.epoch_number().await {
            Ok(epoch) => {
                self.metrics.set_epoch(epoch);
                observation.epoch = Some(epoch);
            }
            Err(e) => debug!("Failed to fetch epoch number: {}", e),
        }

        match self.rpc.batch_number().await {
            Ok(batch) => {
                self.metrics.set_batch(batch);
                observation.batch = Some(batch);
            }
            Err(e) => debug!("Failed to fetch batch number: {}", e),
        }
    }

    async fn remediate(&mut self) -> RestartOutcome {
        error!(
            "No progress after {} consecutive polls, restarting {}...",
            self.settings.retry_limit, self.settings.target
        );

        // Stuck count is cleared before the call, whatever the call does.
        self.state.begin_cooldown();
        self.metrics.set_consecutive_stuck(0);

        let outcome = self.remediator.restart(&self.settings.target).await;
        self.metrics.record_restart(outcome.is_success());

        info!(
            "Restart outcome: {}. Sleeping for {}s before resuming...",
            outcome,
            self.settings.restart_delay.as_secs()
        );
        sleep(self.settings.restart_delay).await;
        self.state.end_cooldown();

        outcome
    }

    fn describe_stuck(&self, observation: &NodeObservation) -> String {
        match self.settings.policy {
            LivenessPolicy::BlockHeight => match observation.block_height {
                Some(height) => format!("block height stuck at {}", height),
                None => "block height unknown".to_string(),
            },
            LivenessPolicy::Consensus => match observation.consensus_established {
                Some(_) => "consensus not established".to_string(),
                None => "consensus status unknown".to_string(),
            },
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
