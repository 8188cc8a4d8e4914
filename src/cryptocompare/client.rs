//! CryptoCompare HTTP Client
//!
//! HTTP client wrapper for the public `/data/price` endpoint.
//! Provides timeout configuration and user-agent headers.

use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::cryptocompare::types::{PriceQuote, QUOTE_CURRENCIES, TRACKED_SYMBOL};
use crate::error::{RelayError, Result};
use crate::state::PriceCache;

const USER_AGENT: &str = concat!("price-relay/", env!("CARGO_PKG_VERSION"));

/// CryptoCompare REST API client
#[derive(Debug, Clone)]
pub struct PriceClient {
    client: Client,
    /// Base URL (default: https://min-api.cryptocompare.com)
    base_url: String,
}

impl PriceClient {
    /// Creates a client for `base_url` with the given request timeout
    ///
    /// # Errors
    /// Returns `RelayError::Config` if the underlying HTTP client cannot be built
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RelayError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the current quote for the tracked symbol
    ///
    /// GET /data/price?fsym=BTC&tsyms=USD,JPY,EUR
    pub async fn fetch_quote(&self) -> Result<PriceQuote> {
        let url = format!("{}/data/price", self.base_url);
        let tsyms = QUOTE_CURRENCIES.join(",");

        let response = self
            .client
            .get(&url)
            .query(&[("fsym", TRACKED_SYMBOL), ("tsyms", tsyms.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RelayError::UpstreamStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        let quote: PriceQuote = serde_json::from_slice(&body)?;
        if quote.is_empty() {
            return Err(RelayError::EmptyQuote(TRACKED_SYMBOL.to_string()));
        }

        Ok(quote)
    }

    /// Fetch and store the tracked quote
    ///
    /// Failures are logged and swallowed; the previously cached value stays.
    ///
    /// # Returns
    /// `true` if the cache was updated
    pub async fn refresh(&self, prices: &PriceCache) -> bool {
        match self.fetch_quote().await {
            Ok(quote) => {
                tracing::debug!(symbol = TRACKED_SYMBOL, ?quote, "Price updated");
                prices.set(TRACKED_SYMBOL, quote);
                true
            }
            Err(e) => {
                tracing::error!(
                    symbol = TRACKED_SYMBOL,
                    error_type = e.error_type(),
                    transient = e.is_transient(),
                    "Failed to fetch price: {}",
                    e
                );
                false
            }
        }
    }
}
