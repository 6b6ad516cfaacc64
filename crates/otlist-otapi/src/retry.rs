//! Retry with exponential back-off and jitter for OTAPI navigation and
//! search calls.
//!
//! Item-detail calls never go through here: they run under a tight
//! per-item deadline where a retry would only delay the fallback.

use std::future::Future;
use std::time::Duration;

use crate::error::OtapiError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** timeouts, connection failures, and HTTP 5xx.
///
/// **Not retriable:** 4xx responses and malformed bodies.
pub(crate) fn is_retriable(err: &OtapiError) -> bool {
    match err {
        OtapiError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        OtapiError::UnexpectedStatus { status, .. } => *status >= 500,
        OtapiError::Deserialize { .. } | OtapiError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on
/// transient errors.
///
/// The n-th retry sleeps `backoff_base_ms × 2ⁿ⁻¹ ± 25 %`, capped at 30 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, OtapiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, OtapiError>>,
{
    const MAX_DELAY_MS: u64 = 30_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "OTAPI transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn server_error() -> OtapiError {
        OtapiError::UnexpectedStatus {
            operation: "SearchItemsFrame".to_owned(),
            status: 503,
            description: "Service Unavailable".to_owned(),
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, OtapiError>(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_server_errors_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(server_error())
                } else {
                    Ok::<u32, OtapiError>(1)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(1, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, OtapiError>(server_error())
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(matches!(result, Err(OtapiError::UnexpectedStatus { status: 503, .. })));
    }

    #[tokio::test]
    async fn does_not_retry_client_errors_or_bad_bodies() {
        for err in [
            OtapiError::UnexpectedStatus {
                operation: "GetItemFullInfo".to_owned(),
                status: 404,
                description: "Not Found".to_owned(),
            },
            OtapiError::Deserialize {
                context: "SearchItemsFrame".to_owned(),
                source: serde_json::from_str::<u32>("nope").expect_err("not a number"),
            },
        ] {
            let calls = Arc::new(AtomicU32::new(0));
            let c = Arc::clone(&calls);
            let mut slot = Some(err);
            let result = retry_with_backoff(3, 0, || {
                c.fetch_add(1, Ordering::SeqCst);
                let err = slot.take();
                async move { Err::<u32, OtapiError>(err.expect("called once")) }
            })
            .await;
            assert!(result.is_err());
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }
}
