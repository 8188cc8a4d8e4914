//! CryptoCompare API Client
//!
//! HTTP client and response types for the `/data/price` endpoint.

pub mod client;
pub mod types;

// Re-export commonly used types
pub use client::PriceClient;
pub use types::{PriceQuote, PriceUpdate, QUOTE_CURRENCIES, TRACKED_SYMBOL};
