//! Configuration Management
//!
//! Loads relay settings from environment variables.

pub mod relay;

// Re-export
pub use relay::RelayConfig;
