use thiserror::Error;

#[derive(Debug, Error)]
pub enum OtapiError {
    /// The request never produced a response (connect failure, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {operation}: {description}")]
    UnexpectedStatus {
        operation: String,
        status: u16,
        description: String,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl OtapiError {
    /// HTTP status returned by the upstream, when it responded at all.
    #[must_use]
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            OtapiError::UnexpectedStatus { status, .. } => Some(*status),
            OtapiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// `true` when no HTTP response was received.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, OtapiError::Http(e) if e.status().is_none())
    }
}
