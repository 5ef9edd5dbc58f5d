//! This module provides reusable test utilities:
//! - Mock Nimiq JSON-RPC server
//! - Scripted in-memory node and recording remediator
//! - Test settings builder

// Not every test binary uses every fixture
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_rpc;
pub mod recording_remediator;
pub mod scripted_rpc;
pub mod test_config;

pub use mock_rpc::MockRpcServer;
pub use recording_remediator::RecordingRemediator;
pub use scripted_rpc::ScriptedRpc;
pub use test_config::TestSettingsBuilder;
