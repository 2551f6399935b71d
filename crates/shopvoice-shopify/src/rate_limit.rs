//! Exponential backoff for transient Admin API failures.
//!
//! Only throttling (429) and network-level errors are retried. Auth failures,
//! missing endpoints, and unparseable bodies return immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ShopifyError;

fn is_retriable(err: &ShopifyError) -> bool {
    matches!(err, ShopifyError::RateLimited { .. } | ShopifyError::Http(_))
}

/// Runs `operation`, retrying retriable errors up to `max_retries` more times.
///
/// The wait before retry `n` (1-based) is `backoff_base_secs * 2^(n-1)`
/// seconds, except that a 429 asking for a longer `Retry-After` is honored.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ShopifyError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ShopifyError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !is_retriable(&err) || attempt >= max_retries => return Err(err),
            Err(err) => err,
        };

        let mut delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        if let ShopifyError::RateLimited {
            retry_after_secs, ..
        } = &err
        {
            if backoff_base_secs > 0 {
                delay_secs = delay_secs.max(*retry_after_secs);
            }
        }

        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient admin API error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
