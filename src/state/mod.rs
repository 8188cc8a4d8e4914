//! Shared relay state
//!
//! One [`AppState`] is built at startup and cloned into every handler and
//! background task.

pub mod prices;
pub mod registry;

use std::path::PathBuf;

pub use prices::PriceCache;
pub use registry::{ConnectionHandle, ConnectionRegistry, Session};

use crate::config::RelayConfig;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Live WebSocket sessions
    pub registry: ConnectionRegistry,

    /// Latest quote per symbol
    pub prices: PriceCache,

    /// Page served at `/`
    pub index_html: PathBuf,
}

impl AppState {
    pub fn new(index_html: PathBuf) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            prices: PriceCache::new(),
            index_html,
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(config.index_html.clone())
    }
}
