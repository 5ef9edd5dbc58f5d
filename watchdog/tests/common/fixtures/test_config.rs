//! Builder for monitor settings used across tests

use std::time::Duration;
use watchdog::config::LivenessPolicy;
use watchdog::health::MonitorSettings;

pub struct TestSettingsBuilder {
    settings: MonitorSettings,
}

impl TestSettingsBuilder {
    /// Zero delays so loops run without waiting
    pub fn new() -> Self {
        Self {
            settings: MonitorSettings {
                policy: LivenessPolicy::BlockHeight,
                retry_limit: 3,
                retry_delay: Duration::ZERO,
                restart_delay: Duration::ZERO,
                target: "node".to_string(),
            },
        }
    }

    pub fn policy(mut self, policy: LivenessPolicy) -> Self {
        self.settings.policy = policy;
        self
    }

    pub fn retry_limit(mut self, retry_limit: u32) -> Self {
        self.settings.retry_limit = retry_limit;
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.settings.retry_delay = delay;
        self
    }

    pub fn restart_delay(mut self, delay: Duration) -> Self {
        self.settings.restart_delay = delay;
        self
    }

    pub fn target(mut self, target: &str) -> Self {
        self.settings.target = target.to_string();
        self
    }

    pub fn build(self) -> MonitorSettings {
        self.settings
    }
}

impl Default for TestSettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
