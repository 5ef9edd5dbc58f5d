//! Health monitoring types

use serde::{Deserialize, Serialize};

/// What a single poll saw. `None` means the call failed or returned nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeObservation {
    pub consensus_established: Option<bool>,
    pub block_height: Option<u64>,
    pub epoch: Option<u64>,
    pub batch: Option<u64>,
}

impl NodeObservation {
    pub fn with_block_height(block_height: Option<u64>) -> Self {
        Self {
            block_height,
            ..Self::default()
        }
    }

    pub fn with_consensus(consensus_established: Option<bool>) -> Self {
        Self {
            consensus_established,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonitorPhase {
    AwaitingInitialSync,
    Monitoring,
    /// Transient: a restart was issued and the cooldown is running.
    RemediationCooldown,
}

/// Classification of one monitoring observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Progressing,
    Stuck,
}
