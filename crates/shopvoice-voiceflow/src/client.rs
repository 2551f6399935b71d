//! HTTP client for the Voiceflow knowledge-base document API.
//!
//! Two upload modes are used: table mode takes every product row in one
//! request; URL mode takes exactly one document per request.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;

use crate::batch::{upload_in_batches, BatchUploadSummary, INTER_BATCH_DELAY, URL_BATCH_SIZE};
use crate::error::VoiceflowError;
use crate::types::{TableData, TableSchema, TableUploadRequest, UrlData, UrlUploadRequest};

const DEFAULT_BASE_URL: &str = "https://api.voiceflow.com/";
const TABLE_UPLOAD_PATH: &str = "v1/knowledge-base/docs/upload/table";
const DOC_UPLOAD_PATH: &str = "v1/knowledge-base/docs/upload";

/// Client for one Voiceflow project's knowledge base.
///
/// The API key is sent verbatim in the `Authorization` header. Use
/// [`KnowledgeBaseClient::with_base_url`] to point at a mock server.
pub struct KnowledgeBaseClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl KnowledgeBaseClient {
    /// # Errors
    ///
    /// Returns [`VoiceflowError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, VoiceflowError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`VoiceflowError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`VoiceflowError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, VoiceflowError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|_| VoiceflowError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Uploads every row in one table-mode request.
    ///
    /// Success is decided solely by the HTTP status of this call.
    ///
    /// # Errors
    ///
    /// - [`VoiceflowError::Rejected`] on any non-2xx status.
    /// - [`VoiceflowError::Http`] on network failure.
    pub async fn upload_table<T: Serialize>(
        &self,
        name: &str,
        schema: &TableSchema,
        items: &[T],
        overwrite: bool,
    ) -> Result<(), VoiceflowError> {
        let url = self.endpoint(TABLE_UPLOAD_PATH, overwrite)?;
        let body = TableUploadRequest {
            data: TableData {
                schema,
                name,
                items,
            },
        };
        tracing::info!(table = name, rows = items.len(), overwrite, "uploading table");
        self.post(url, &body).await
    }

    /// Uploads one URL document.
    ///
    /// # Errors
    ///
    /// - [`VoiceflowError::Rejected`] on any non-2xx status, with the body.
    /// - [`VoiceflowError::Http`] on network failure.
    pub async fn upload_url(&self, page_url: &str, overwrite: bool) -> Result<(), VoiceflowError> {
        let url = self.endpoint(DOC_UPLOAD_PATH, overwrite)?;
        let body = UrlUploadRequest {
            data: UrlData {
                kind: "url",
                url: page_url,
            },
        };
        self.post(url, &body).await
    }

    /// Uploads each URL as its own document, [`URL_BATCH_SIZE`] at a time
    /// with [`INTER_BATCH_DELAY`] between batches.
    pub async fn upload_urls(&self, urls: &[String], overwrite: bool) -> BatchUploadSummary {
        upload_in_batches(urls, URL_BATCH_SIZE, INTER_BATCH_DELAY, move |page_url| async move {
            self.upload_url(&page_url, overwrite).await
        })
        .await
    }

    fn endpoint(&self, path: &str, overwrite: bool) -> Result<Url, VoiceflowError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|_| VoiceflowError::InvalidBaseUrl(self.base_url.to_string()))?;
        if overwrite {
            url.query_pairs_mut().append_pair("overwrite", "true");
        }
        Ok(url)
    }

    async fn post<B: Serialize>(&self, url: Url, body: &B) -> Result<(), VoiceflowError> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(VoiceflowError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
