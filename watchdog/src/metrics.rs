//! Prometheus metrics exported by the watchdog
//!
//! Gauges and counters are atomics, so the scrape handler can encode while
//! the monitor loop writes without any locking on the monitor side.

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

use crate::constants::metric_names;
use crate::errors::WatchdogError;

pub struct WatchdogMetrics {
    registry: Registry,
    initial_sync: IntGauge,
    current_health: IntGauge,
    current_epoch: IntGauge,
    current_batch: IntGauge,
    block_height: IntGauge,
    consecutive_stuck: IntGauge,
    container_restarts: IntCounter,
    restart_failures: IntCounter,
}

impl WatchdogMetrics {
    pub fn new() -> Result<Self, WatchdogError> {
        let registry = Registry::new();

        let initial_sync = IntGauge::new(
            metric_names::INITIAL_SYNC,
            "consensus status 1=established, 0=not established",
        )?;
        let current_health = IntGauge::new(
            metric_names::CURRENT_HEALTH,
            "node health 1=progressing, 0=stuck or unreachable",
        )?;
        let current_epoch = IntGauge::new(metric_names::CURRENT_EPOCH, "current epoch number")?;
        let current_batch = IntGauge::new(metric_names::CURRENT_BATCH, "current batch number")?;
        let block_height =
            IntGauge::new(metric_names::BLOCK_HEIGHT, "last block height seen on the node")?;
        let consecutive_stuck = IntGauge::new(
            metric_names::CONSECUTIVE_STUCK,
            "consecutive polls without block progress",
        )?;
        let container_restarts = IntCounter::new(
            metric_names::CONTAINER_RESTARTS,
            "Number of container restarts triggered",
        )?;
        let restart_failures = IntCounter::new(
            metric_names::RESTART_FAILURES,
            "Number of restarts that reported not-found or a runtime error",
        )?;

        registry.register(Box::new(initial_sync.clone()))?;
        registry.register(Box::new(current_health.clone()))?;
        registry.register(Box::new(current_epoch.clone()))?;
        registry.register(Box::new(current_batch.clone()))?;
        registry.register(Box::new(block_height.clone()))?;
        registry.register(Box::new(consecutive_stuck.clone()))?;
        registry.register(Box::new(container_restarts.clone()))?;
        registry.register(Box::new(restart_failures.clone()))?;

        Ok(Self {
            registry,
            initial_sync,
            current_health,
            current_epoch,
            current_batch,
            block_height,
            consecutive_stuck,
            container_restarts,
            restart_failures,
        })
    }

    pub fn set_initial_sync(&self, synced: bool) {
        self.initial_sync.set(i64::from(synced));
    }

    pub fn set_health(&self, healthy: bool) {
        self.current_health.set(i64::from(healthy));
    }

    pub fn set_epoch(&self, epoch: u64) {
        self.current_epoch.set(saturating_i64(epoch));
    }

    pub fn set_batch(&self, batch: u64) {
        self.current_batch.set(saturating_i64(batch));
    }

    pub fn set_block_height(&self, height: u64) {
        self.block_height.set(saturating_i64(height));
    }

    pub fn set_consecutive_stuck(&self, count: u32) {
        self.consecutive_stuck.set(i64::from(count));
    }

    pub fn record_restart(&self, succeeded: bool) {
        self.container_restarts.inc();
        if !succeeded {
            self.restart_failures.inc();
        }
    }

    pub fn initial_sync(&self) -> i64 {
        self.initial_sync.get()
    }

    pub fn health(&self) -> i64 {
        self.current_health.get()
    }

    pub fn epoch(&self) -> i64 {
        self.current_epoch.get()
    }

    pub fn batch(&self) -> i64 {
        self.current_batch.get()
    }

    pub fn block_height(&self) -> i64 {
        self.block_height.get()
    }

    pub fn restarts(&self) -> u64 {
        self.container_restarts.get()
    }

    pub fn restart_failures(&self) -> u64 {
        self.restart_failures.get()
    }

    /// Encode every registered metric in the Prometheus text format.
    pub fn render(&self) -> Result<String, WatchdogError> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| WatchdogError::Metrics(e.to_string()))
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
