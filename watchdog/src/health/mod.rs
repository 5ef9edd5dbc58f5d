//! Health monitoring module
//!
//! Turns a stream of node observations into a health verdict and decides
//! when the node gets restarted.

pub mod monitor;
pub mod state;
pub mod types;

pub use monitor::{CycleOutcome, HealthMonitor, MonitorSettings};
pub use state::MonitorState;
pub use types::{MonitorPhase, NodeObservation, Progress};
