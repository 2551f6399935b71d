//! Fixed-size concurrent batches with a fixed pause between them.
//!
//! The knowledge base accepts one URL document per call and throttles bursts.
//! Calls inside a batch run concurrently; the next batch starts only after
//! every call of the current one has settled, then waits [`INTER_BATCH_DELAY`].
//! The pause is a flat guard, not adaptive backoff.

use std::future::Future;
use std::time::Duration;

use futures::future::join_all;

use crate::error::VoiceflowError;

pub const URL_BATCH_SIZE: usize = 5;
pub const INTER_BATCH_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUpload {
    pub url: String,
    /// Rendered error, including the response body for rejections.
    pub error: String,
}

/// Aggregate of one batched upload run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchUploadSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: Vec<FailedUpload>,
    pub batches: usize,
}

impl BatchUploadSummary {
    #[must_use]
    pub fn failed_urls(&self) -> Vec<String> {
        self.failed.iter().map(|f| f.url.clone()).collect()
    }
}

/// Runs `upload` once per URL in batches of `batch_size`.
///
/// Every outcome is recorded independently: a failed call never stops the
/// remaining URLs. No pause follows the last batch.
pub async fn upload_in_batches<F, Fut>(
    urls: &[String],
    batch_size: usize,
    pause: Duration,
    upload: F,
) -> BatchUploadSummary
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<(), VoiceflowError>>,
{
    let mut summary = BatchUploadSummary::default();
    let batch_size = batch_size.max(1);

    for (index, batch) in urls.chunks(batch_size).enumerate() {
        if index > 0 && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }

        let outcomes = join_all(batch.iter().map(|url| {
            let call = upload(url.clone());
            async move { (url, call.await) }
        }))
        .await;

        summary.batches += 1;
        for (url, outcome) in outcomes {
            summary.attempted += 1;
            match outcome {
                Ok(()) => summary.succeeded += 1,
                Err(e) => {
                    tracing::warn!(url = %url, batch = index + 1, error = %e, "url upload failed");
                    summary.failed.push(FailedUpload {
                        url: url.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            batch = index + 1,
            size = batch.len(),
            succeeded = summary.succeeded,
            failed = summary.failed.len(),
            "url batch settled"
        );
    }

    summary
}
