use thiserror::Error;

/// Main error type for the price relay
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Price API request failed: {0}")]
    Http(String),

    #[error("Price API returned HTTP {0}")]
    UpstreamStatus(u16),

    #[error("Price API response could not be decoded: {0}")]
    Decode(String),

    #[error("Price API returned an empty quote for {0}")]
    EmptyQuote(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelayError {
    /// Whether the next scheduled fetch may reasonably succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RelayError::Connection(_) | RelayError::Http(_) | RelayError::UpstreamStatus(500..=599)
        )
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            RelayError::Connection(_) => "connection_error",
            RelayError::Http(_) => "http_error",
            RelayError::UpstreamStatus(_) => "upstream_status",
            RelayError::Decode(_) => "decode_error",
            RelayError::EmptyQuote(_) => "empty_quote",
            RelayError::Config(_) => "config_error",
            RelayError::Io(_) => "io_error",
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::Connection("Request to price API timed out".to_string())
        } else if err.is_connect() {
            RelayError::Connection("Failed to connect to price API".to_string())
        } else if let Some(status) = err.status() {
            RelayError::UpstreamStatus(status.as_u16())
        } else if err.is_decode() {
            RelayError::Decode(err.to_string())
        } else {
            RelayError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::Decode(format!("JSON parsing failed: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
