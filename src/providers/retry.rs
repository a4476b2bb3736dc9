// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Rate-limit retry with exponential backoff, shared by all adapters

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::ProviderError;

/// Additional attempts after the first failure
const MAX_RETRIES: u32 = 3;

/// First backoff delay; doubles each retry (15s, 30s, 60s)
const BASE_DELAY: Duration = Duration::from_secs(15);

/// Run `op`, retrying only on `ProviderError::RateLimited`. Any other error
/// aborts immediately. Exhausted retries surface the last rate-limit error.
pub async fn with_rate_limit_retry<T, F, Fut>(mut op: F) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Err(err @ ProviderError::RateLimited { .. }) => {
                if attempt >= MAX_RETRIES {
                    return Err(err);
                }
                let delay = BASE_DELAY * 2u32.pow(attempt);
                warn!(
                    attempt = attempt + 1,
                    delay_secs = delay.as_secs(),
                    "vision backend rate limited, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn rate_limited() -> ProviderError {
        ProviderError::RateLimited {
            provider: "anthropic",
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt_after_45s() {
        let calls = AtomicU32::new(0);
        let start = tokio::time::Instant::now();

        let result = with_rate_limit_retry(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(rate_limited())
                } else {
                    Ok("a red car".to_string())
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "a red car");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // two backoffs: 15s + 30s
        assert_eq!(start.elapsed(), Duration::from_secs(45));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_surface_rate_limit() {
        let calls = AtomicU32::new(0);
        let start = tokio::time::Instant::now();

        let result: Result<(), _> = with_rate_limit_retry(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(rate_limited()) }
        })
        .await;

        assert!(matches!(result, Err(ProviderError::RateLimited { .. })));
        // 1 initial + 3 retries, 15+30+60 seconds of backoff
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(start.elapsed(), Duration::from_secs(105));
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_errors_abort_immediately() {
        let calls = AtomicU32::new(0);
        let start = tokio::time::Instant::now();

        let result: Result<(), _> = with_rate_limit_retry(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ProviderError::Api {
                    provider: "openai",
                    status: 500,
                    message: "boom".to_string(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(ProviderError::Api { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
