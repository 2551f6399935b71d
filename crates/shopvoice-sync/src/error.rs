use shopvoice_shopify::ShopifyError;
use shopvoice_voiceflow::VoiceflowError;
use thiserror::Error;

/// Failure of a whole sync run.
///
/// Per-URL upload failures are not errors; they are counted in the
/// `SyncResult` of a run that still completes.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("authentication failed: {reason}")]
    Authentication { reason: String },

    #[error("missing knowledge base credentials: {field} is not configured")]
    MissingCredentials { field: &'static str },

    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(#[source] ShopifyError),

    #[error("could not parse upstream data: {0}")]
    Parse(#[source] ShopifyError),

    #[error("knowledge base upload failed: {0}")]
    Upload(#[from] VoiceflowError),
}

impl SyncError {
    /// Stable machine-readable code for API and CLI output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "unauthorized",
            Self::MissingCredentials { .. } => "missing_credentials",
            Self::UpstreamFetch(_) => "upstream_error",
            Self::Parse(_) => "parse_error",
            Self::Upload(_) => "upload_failed",
        }
    }
}

impl From<ShopifyError> for SyncError {
    fn from(err: ShopifyError) -> Self {
        match err {
            ShopifyError::Unauthorized { shop, status } => Self::Authentication {
                reason: format!("admin API rejected credentials for {shop} (HTTP {status})"),
            },
            ShopifyError::Deserialize { .. }
            | ShopifyError::Xml { .. }
            | ShopifyError::InvalidSitemap { .. }
            | ShopifyError::DuplicateProductId { .. } => Self::Parse(err),
            other => Self::UpstreamFetch(other),
        }
    }
}
