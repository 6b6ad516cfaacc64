//! HTTP client for the OTAPI `service-json` endpoints.
//!
//! [`OtapiClient`] owns the connection pool, base URL, timeouts, and retry
//! policy. Every call is made through an [`OtapiSession`], which binds the
//! caller's instance key and language so they never have to be threaded
//! through individual methods.

mod catalog;
mod navigation;

use std::time::Duration;

use otlist_core::AppConfig;
use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::OtapiError;
use crate::retry::retry_with_backoff;

const DEFAULT_BASE_URL: &str = "http://otapi.net/service-json/";

/// Per-call-kind request deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtapiTimeouts {
    /// Category search and category list calls.
    pub search: Duration,
    /// Per-item detail calls made during enrichment.
    pub detail: Duration,
    /// Breadcrumb path calls.
    pub path: Duration,
}

impl Default for OtapiTimeouts {
    fn default() -> Self {
        Self {
            search: Duration::from_secs(30),
            detail: Duration::from_secs(5),
            path: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure. `0` disables retries.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff_base_ms: 500,
        }
    }
}

pub struct OtapiClient {
    client: Client,
    base_url: Url,
    timeouts: OtapiTimeouts,
    retry: RetryPolicy,
}

impl OtapiClient {
    /// Creates a client pointed at the production OTAPI endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`OtapiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        user_agent: &str,
        timeouts: OtapiTimeouts,
        retry: RetryPolicy,
    ) -> Result<Self, OtapiError> {
        Self::with_base_url(DEFAULT_BASE_URL, user_agent, timeouts, retry)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`OtapiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`OtapiError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        user_agent: &str,
        timeouts: OtapiTimeouts,
        retry: RetryPolicy,
    ) -> Result<Self, OtapiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends the method name
        // instead of replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| OtapiError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            timeouts,
            retry,
        })
    }

    /// Builds a client from the application configuration.
    ///
    /// # Errors
    ///
    /// See [`OtapiClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, OtapiError> {
        let timeouts = OtapiTimeouts {
            search: Duration::from_secs(config.otapi_search_timeout_secs),
            detail: Duration::from_secs(config.otapi_detail_timeout_secs),
            path: Duration::from_secs(config.otapi_path_timeout_secs),
        };
        let retry = RetryPolicy {
            max_retries: config.otapi_max_retries,
            backoff_base_ms: config.otapi_retry_backoff_base_ms,
        };
        Self::with_base_url(
            &config.otapi_base_url,
            &config.otapi_user_agent,
            timeouts,
            retry,
        )
    }

    #[must_use]
    pub fn timeouts(&self) -> OtapiTimeouts {
        self.timeouts
    }

    /// Binds an instance key and language for a series of calls.
    #[must_use]
    pub fn session(&self, instance_key: &str, language: &str) -> OtapiSession<'_> {
        OtapiSession {
            client: self,
            instance_key: instance_key.to_owned(),
            language: language.to_owned(),
        }
    }

    fn build_url(
        &self,
        method: &str,
        session: &OtapiSession<'_>,
        params: &[(&str, &str)],
    ) -> Result<Url, OtapiError> {
        let mut url = self
            .base_url
            .join(method)
            .map_err(|e| OtapiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("instanceKey", &session.instance_key)
                .append_pair("language", &session.language);
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Issues one GET and returns the parsed JSON body.
    ///
    /// Transport errors have their URL stripped before they surface, since
    /// the query string carries the instance key.
    async fn request_json(
        &self,
        operation: &str,
        url: &Url,
        timeout: Duration,
    ) -> Result<Value, OtapiError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)?;

        if !status.is_success() {
            let description = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("ErrorDescription")?.as_str().map(str::to_owned))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_owned());
            return Err(OtapiError::UnexpectedStatus {
                operation: operation.to_owned(),
                status: status.as_u16(),
                description,
            });
        }

        serde_json::from_str(&body).map_err(|e| OtapiError::Deserialize {
            context: operation.to_owned(),
            source: e,
        })
    }

    async fn request_json_with_retry(
        &self,
        operation: &str,
        url: &Url,
        timeout: Duration,
    ) -> Result<Value, OtapiError> {
        retry_with_backoff(self.retry.max_retries, self.retry.backoff_base_ms, || {
            self.request_json(operation, url, timeout)
        })
        .await
    }
}

/// An [`OtapiClient`] bound to one instance key and language.
pub struct OtapiSession<'a> {
    client: &'a OtapiClient,
    instance_key: String,
    language: String,
}

fn decode<T: serde::de::DeserializeOwned>(operation: &str, body: Value) -> Result<T, OtapiError> {
    serde_json::from_value(body).map_err(|e| OtapiError::Deserialize {
        context: operation.to_owned(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> OtapiClient {
        OtapiClient::with_base_url(
            base_url,
            "otlist-test/0.1",
            OtapiTimeouts::default(),
            RetryPolicy::default(),
        )
        .expect("test client")
    }

    #[test]
    fn build_url_appends_method_and_session_params() {
        let client = client("http://otapi.net/service-json");
        let session = client.session("key-123", "es");
        let url = client
            .build_url("GetItemFullInfo", &session, &[("itemId", "abb-1")])
            .unwrap();
        assert_eq!(url.path(), "/service-json/GetItemFullInfo");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("instanceKey".to_owned(), "key-123".to_owned()),
                ("language".to_owned(), "es".to_owned()),
                ("itemId".to_owned(), "abb-1".to_owned()),
            ]
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = OtapiClient::with_base_url(
            "not a url",
            "otlist-test/0.1",
            OtapiTimeouts::default(),
            RetryPolicy::default(),
        );
        assert!(matches!(result, Err(OtapiError::InvalidBaseUrl { .. })));
    }
}
