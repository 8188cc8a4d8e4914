//! Relay Server Configuration
//!
//! Settings for the HTTP/WebSocket listener and the upstream price poller.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{RelayError, Result};

pub const DEFAULT_PRICE_API_BASE_URL: &str = "https://min-api.cryptocompare.com";

/// Relay configuration
///
/// ## Environment Variables
///
/// - `RELAY_HOST`: Server bind IP, v4 or v6 (default: 0.0.0.0)
/// - `RELAY_PORT`: Server port (default: 3000)
/// - `PRICE_API_BASE_URL`: Price API base URL (default: https://min-api.cryptocompare.com)
/// - `PRICE_FETCH_INTERVAL_SECS`: Seconds between price fetches (default: 60)
/// - `PRICE_FETCH_TIMEOUT_SECS`: Price API request timeout (default: 10)
/// - `RELAY_INDEX_HTML`: Path of the page served at `/` (default: index.html)
/// - `RELAY_BROADCAST_ON_UPDATE`: Push every fresh quote to all clients (default: false)
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Server bind address
    pub addr: SocketAddr,

    /// Price API base URL, without the `/data/price` path
    pub price_api_base_url: String,

    pub fetch_interval: Duration,

    pub fetch_timeout: Duration,

    pub index_html: PathBuf,

    /// When false, prices only reach clients through `/pushPrices/{user_id}`
    pub broadcast_on_update: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            price_api_base_url: DEFAULT_PRICE_API_BASE_URL.to_string(),
            fetch_interval: Duration::from_secs(60),
            fetch_timeout: Duration::from_secs(10),
            index_html: PathBuf::from("index.html"),
            broadcast_on_update: false,
        }
    }
}

impl RelayConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Config` if a variable is set to an unparsable value
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("RELAY_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = parse_var(&lookup, "RELAY_PORT", 3000)?;
        let ip: IpAddr = host
            .trim()
            .parse()
            .map_err(|e| RelayError::Config(format!("RELAY_HOST={:?}: {}", host, e)))?;
        let addr = SocketAddr::new(ip, port);

        let interval_secs: u64 = parse_var(&lookup, "PRICE_FETCH_INTERVAL_SECS", 60)?;
        if interval_secs == 0 {
            return Err(RelayError::Config(
                "PRICE_FETCH_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }
        let timeout_secs: u64 = parse_var(&lookup, "PRICE_FETCH_TIMEOUT_SECS", 10)?;
        if timeout_secs == 0 {
            return Err(RelayError::Config(
                "PRICE_FETCH_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        let price_api_base_url = lookup("PRICE_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.price_api_base_url);

        let index_html = lookup("RELAY_INDEX_HTML")
            .map(PathBuf::from)
            .unwrap_or(defaults.index_html);

        let broadcast_on_update = parse_var(&lookup, "RELAY_BROADCAST_ON_UPDATE", false)?;

        Ok(Self {
            addr,
            price_api_base_url,
            fetch_interval: Duration::from_secs(interval_secs),
            fetch_timeout: Duration::from_secs(timeout_secs),
            index_html,
            broadcast_on_update,
        })
    }

    /// Override the listen port (used by `--port`)
    pub fn with_port(mut self, port: u16) -> Self {
        self.addr.set_port(port);
        self
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| RelayError::Config(format!("{}={:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}
