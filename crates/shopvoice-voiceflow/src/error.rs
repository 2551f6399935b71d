use thiserror::Error;

/// Errors returned by the Voiceflow knowledge-base client.
#[derive(Debug, Error)]
pub enum VoiceflowError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The knowledge base answered with a non-2xx status.
    #[error("knowledge base rejected upload (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("invalid knowledge base URL '{0}'")]
    InvalidBaseUrl(String),
}
