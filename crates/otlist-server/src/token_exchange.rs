//! Proxy for the commerce backend's admin token endpoint.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;

const TOKEN_PATH: &str = "/rest/V1/integration/admin/token";

#[derive(Debug, Error)]
pub enum TokenExchangeError {
    #[error("baseUrl '{0}' is not an allowed environment")]
    DisallowedBaseUrl(String),

    /// The backend answered with a non-2xx status.
    #[error("Authentication failed: {} - {}", .status.as_u16(), .status.canonical_reason().unwrap_or("Unknown"))]
    Rejected { status: StatusCode },

    /// No response arrived at all.
    #[error("No response from server. Please check your network connection.")]
    NoResponse(#[source] reqwest::Error),

    #[error("unreadable token response: {0}")]
    InvalidResponse(#[source] reqwest::Error),
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

pub struct TokenExchange {
    client: Client,
    allowed_base_urls: Vec<String>,
}

impl TokenExchange {
    /// # Errors
    ///
    /// Returns the `reqwest` error if the HTTP client cannot be built.
    pub fn new(allowed_base_urls: Vec<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            allowed_base_urls,
        })
    }

    /// Allow-list entries are stored without a trailing slash.
    #[must_use]
    pub fn is_allowed(&self, base_url: &str) -> bool {
        let wanted = base_url.trim().trim_end_matches('/');
        self.allowed_base_urls.iter().any(|allowed| allowed == wanted)
    }

    /// Trades admin credentials for a bearer token at `base_url`.
    ///
    /// # Errors
    ///
    /// - [`TokenExchangeError::DisallowedBaseUrl`] before any request is sent.
    /// - [`TokenExchangeError::Rejected`] when the backend refuses.
    /// - [`TokenExchangeError::NoResponse`] when it cannot be reached.
    pub async fn exchange(
        &self,
        base_url: &str,
        username: &str,
        password: &str,
    ) -> Result<String, TokenExchangeError> {
        if !self.is_allowed(base_url) {
            return Err(TokenExchangeError::DisallowedBaseUrl(base_url.to_owned()));
        }
        let url = format!("{}{TOKEN_PATH}", base_url.trim().trim_end_matches('/'));

        let response = self
            .client
            .post(url)
            .json(&Credentials { username, password })
            .send()
            .await
            .map_err(TokenExchangeError::NoResponse)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "token exchange rejected");
            return Err(TokenExchangeError::Rejected { status });
        }

        let body = response
            .text()
            .await
            .map_err(TokenExchangeError::InvalidResponse)?;
        // The token arrives as a JSON string literal.
        Ok(serde_json::from_str::<String>(&body).unwrap_or_else(|_| body.trim().to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_ignores_trailing_slash() {
        let exchange = TokenExchange::new(
            vec!["https://shop.example.com".to_owned()],
            Duration::from_secs(5),
        )
        .expect("client");
        assert!(exchange.is_allowed("https://shop.example.com/"));
        assert!(!exchange.is_allowed("https://evil.example.com"));
    }

    #[test]
    fn rejection_message_names_status_and_reason() {
        let err = TokenExchangeError::Rejected {
            status: StatusCode::UNAUTHORIZED,
        };
        assert_eq!(err.to_string(), "Authentication failed: 401 - Unauthorized");
    }
}
