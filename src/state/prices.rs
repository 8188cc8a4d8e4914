//! Latest quote per tracked symbol

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::cryptocompare::types::{PriceQuote, PriceUpdate, TRACKED_SYMBOL};

#[derive(Debug, Default)]
struct PriceCacheInner {
    quotes: BTreeMap<String, PriceQuote>,
    updated_at: Option<DateTime<Utc>>,
}

/// Thread-safe price cache
///
/// Starts empty. A successful fetch replaces the whole quote for a symbol;
/// nothing is merged.
#[derive(Debug, Clone, Default)]
pub struct PriceCache {
    inner: Arc<RwLock<PriceCacheInner>>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached quote for `symbol`
    pub fn set(&self, symbol: &str, quote: PriceQuote) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.quotes.insert(symbol.to_string(), quote);
        inner.updated_at = Some(Utc::now());
    }

    pub fn get(&self, symbol: &str) -> Option<PriceQuote> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.quotes.get(symbol).cloned()
    }

    /// Copy of every cached quote, keyed by symbol
    pub fn snapshot(&self) -> BTreeMap<String, PriceQuote> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.quotes.clone()
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Time of the last successful update
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.updated_at
    }

    /// Message carrying the current tracked quote (`null` before the first fetch)
    pub fn price_update(&self) -> PriceUpdate {
        PriceUpdate {
            btc: self.get(TRACKED_SYMBOL),
        }
    }
}
