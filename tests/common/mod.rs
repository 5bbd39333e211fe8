//! Common test utilities
//!
//! This module is shared across all integration tests

pub mod helpers;
pub mod recorder;

#[allow(unused_imports)]
pub use helpers::{test_config, write_valid_cookies, TestDirs};
#[allow(unused_imports)]
pub use recorder::{RecordingSender, SendBehavior, Sent};
