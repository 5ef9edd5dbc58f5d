//! In-memory node that replays scripted answers
//!
//! Each method pops its next scripted value; `None` entries and an exhausted
//! script both answer with an error, which the monitor reads as unknown.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;
use watchdog::rpc::NodeRpc;

#[derive(Default)]
struct Script {
    consensus: VecDeque<Option<bool>>,
    heights: VecDeque<Option<u64>>,
    epoch: Option<u64>,
    batch: Option<u64>,
    panic_on_height_call: Option<usize>,
    consensus_calls: Vec<Instant>,
    height_calls: Vec<Instant>,
    telemetry_calls: usize,
}

#[derive(Clone, Default)]
pub struct ScriptedRpc {
    script: Arc<Mutex<Script>>,
}

impl ScriptedRpc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_consensus(self, answers: impl IntoIterator<Item = Option<bool>>) -> Self {
        self.script.lock().unwrap().consensus.extend(answers);
        self
    }

    pub fn with_heights(self, answers: impl IntoIterator<Item = Option<u64>>) -> Self {
        self.script.lock().unwrap().heights.extend(answers);
        self
    }

    pub fn with_telemetry(self, epoch: Option<u64>, batch: Option<u64>) -> Self {
        {
            let mut script = self.script.lock().unwrap();
            script.epoch = epoch;
            script.batch = batch;
        }
        self
    }

    /// Panic on the n-th (1-based) block number call
    pub fn panic_on_height_call(self, call: usize) -> Self {
        self.script.lock().unwrap().panic_on_height_call = Some(call);
        self
    }

    pub fn consensus_calls(&self) -> Vec<Instant> {
        self.script.lock().unwrap().consensus_calls.clone()
    }

    pub fn height_calls(&self) -> Vec<Instant> {
        self.script.lock().unwrap().height_calls.clone()
    }

    pub fn telemetry_calls(&self) -> usize {
        self.script.lock().unwrap().telemetry_calls
    }
}

#[async_trait]
impl NodeRpc for ScriptedRpc {
    async fn consensus_established(&self) -> Result<bool> {
        let mut script = self.script.lock().unwrap();
        script.consensus_calls.push(Instant::now());
        script
            .consensus
            .pop_front()
            .flatten()
            .ok_or_else(|| anyhow!("consensus unavailable"))
    }

    async fn block_number(&self) -> Result<u64> {
        let should_panic = {
            let mut script = self.script.lock().unwrap();
            script.height_calls.push(Instant::now());
            script.panic_on_height_call == Some(script.height_calls.len())
        };
        // Guard dropped first so the mutex is not poisoned
        if should_panic {
            panic!("scripted block number failure");
        }

        self.script
            .lock()
            .unwrap()
            .heights
            .pop_front()
            .flatten()
            .ok_or_else(|| anyhow!("block number unavailable"))
    }

    async fn epoch_number(&self) -> Result<u64> {
        let mut script = self.script.lock().unwrap();
        script.telemetry_calls += 1;
        script.epoch.ok_or_else(|| anyhow!("epoch unavailable"))
    }

    async fn batch_number(&self) -> Result<u64> {
        let mut script = self.script.lock().unwrap();
        script.telemetry_calls += 1;
        script.batch.ok_or_else(|| anyhow!("batch unavailable"))
    }
}
