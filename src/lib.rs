// Library exports for price-relay

pub mod error;
pub mod scheduler;
pub mod state;

pub mod transport; // HTTP + WebSocket transport

// Price API integration modules
pub mod config; // Configuration management
pub mod cryptocompare; // CryptoCompare API client
