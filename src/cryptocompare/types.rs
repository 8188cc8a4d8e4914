//! CryptoCompare API Type Definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The single asset the relay tracks
pub const TRACKED_SYMBOL: &str = "BTC";

/// Quote currencies requested for [`TRACKED_SYMBOL`]
pub const QUOTE_CURRENCIES: [&str; 3] = ["USD", "JPY", "EUR"];

/// Response from the `/data/price` endpoint
///
/// Prices of one base asset keyed by quote currency, stored exactly as
/// returned by the API.
///
/// # Example Response
/// ```json
/// {"USD": 61851.46, "JPY": 7036851.15, "EUR": 53109.28}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PriceQuote(BTreeMap<String, f64>);

impl PriceQuote {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for PriceQuote {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Message pushed to a client: `{"BTC": <quote or null>}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdate {
    #[serde(rename = "BTC")]
    pub btc: Option<PriceQuote>,
}
