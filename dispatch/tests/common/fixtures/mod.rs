//! This module provides reusable test utilities:
//! - Mock management endpoint (wiremock)
//! - Manually driven in-memory transport
//! - Recording diagnostics sink and navigator
//! - Test configuration builder

// Allow unused code in test fixtures - not every test binary uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod manual_transport;
pub mod mock_management;
pub mod recorders;
pub mod test_config;

// Re-export commonly used items
pub use manual_transport::ManualTransport;
pub use mock_management::MockManagementServer;
pub use recorders::{RecordedEvent, RecordingNavigator, RecordingSink};
pub use test_config::TestConfigBuilder;
