use thiserror::Error;

/// Errors returned by the exchange-rate feed client.
///
/// None of these reach callers of [`crate::RateCache`]: the cache logs them
/// and serves the fallback table instead.
#[derive(Debug, Error)]
pub enum RatesError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed answered with a non-2xx status.
    #[error("rate feed returned HTTP {status}")]
    UnexpectedStatus { status: u16 },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured feed URL does not parse.
    #[error("invalid rate feed URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
