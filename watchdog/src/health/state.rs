//! Rolling state owned by the monitor loop

use serde::{Deserialize, Serialize};

use super::types::{MonitorPhase, NodeObservation, Progress};
use crate::config::LivenessPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorState {
    pub phase: MonitorPhase,
    pub last_block_height: Option<u64>,
    pub consecutive_stuck_count: u32,
    pub restart_count: u64,
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorState {
    pub fn new() -> Self {
        Self {
            phase: MonitorPhase::AwaitingInitialSync,
            last_block_height: None,
            consecutive_stuck_count: 0,
            restart_count: 0,
        }
    }

    /// Returns true only on the transition itself; later calls are no-ops.
    pub fn complete_initial_sync(&mut self) -> bool {
        if self.phase == MonitorPhase::AwaitingInitialSync {
            self.phase = MonitorPhase::Monitoring;
            true
        } else {
            false
        }
    }

    pub fn classify(&self, policy: LivenessPolicy, observation: &NodeObservation) -> Progress {
        match policy {
            LivenessPolicy::BlockHeight => match observation.block_height {
                Some(height) if self.last_block_height != Some(height) => Progress::Progressing,
                _ => Progress::Stuck,
            },
            LivenessPolicy::Consensus => {
                if observation.consensus_established == Some(true) {
                    Progress::Progressing
                } else {
                    Progress::Stuck
                }
            }
        }
    }

    /// Classify and fold the observation into the rolling counters.
    pub fn record(&mut self, policy: LivenessPolicy, observation: &NodeObservation) -> Progress {
        let progress = self.classify(policy, observation);
        match progress {
            Progress::Progressing => {
                if let Some(height) = observation.block_height {
                    self.last_block_height = Some(height);
                }
                self.consecutive_stuck_count = 0;
            }
            Progress::Stuck => {
                self.consecutive_stuck_count = self.consecutive_stuck_count.saturating_add(1);
            }
        }
        progress
    }

    pub fn threshold_reached(&self, retry_limit: u32) -> bool {
        self.consecutive_stuck_count >= retry_limit
    }

    pub fn begin_cooldown(&mut self) {
        self.phase = MonitorPhase::RemediationCooldown;
        self.consecutive_stuck_count = 0;
        self.restart_count += 1;
    }

    pub fn end_cooldown(&mut self) {
        if self.phase == MonitorPhase::RemediationCooldown {
            self.phase = MonitorPhase::Monitoring;
        }
    }
}
