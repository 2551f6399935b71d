//! The two sync runs and the page preview they share.

use shopvoice_core::{AppConfig, SiteUrlRecord, SyncResult};
use shopvoice_shopify::{normalize_catalog, normalize_page_url, AdminClient, SitemapClient};
use shopvoice_voiceflow::{product_table_schema, KnowledgeBaseClient};

use crate::error::SyncError;
use crate::session::SyncContext;

/// Table name products are uploaded under.
pub const PRODUCT_TABLE_NAME: &str = "Shopify Products";

/// Transport settings shared by every client a run builds.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub shopify_api_version: String,
    pub voiceflow_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}

impl ClientSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            shopify_api_version: config.shopify_api_version.clone(),
            voiceflow_base_url: config.voiceflow_base_url.clone(),
            request_timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            retry_backoff_base_secs: config.retry_backoff_base_secs,
        }
    }
}

/// Runs product and URL syncs. Holds no per-run state; concurrent runs are
/// independent.
#[derive(Debug, Clone)]
pub struct SyncPipeline {
    settings: ClientSettings,
}

impl SyncPipeline {
    #[must_use]
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    /// Fetches every active product, normalizes it, and uploads the whole
    /// catalog as one table.
    ///
    /// # Errors
    ///
    /// - [`SyncError::MissingCredentials`] before any fetch when no API key is set.
    /// - [`SyncError::Authentication`] when the Admin API rejects the token.
    /// - [`SyncError::UpstreamFetch`] / [`SyncError::Parse`] when any page fails.
    /// - [`SyncError::Upload`] when the table upload is rejected.
    pub async fn sync_products(
        &self,
        ctx: &SyncContext,
        overwrite: bool,
    ) -> Result<SyncResult, SyncError> {
        let knowledge_base = self.knowledge_base(ctx)?;
        let admin = AdminClient::new(
            ctx.admin.clone(),
            &self.settings.shopify_api_version,
            self.settings.request_timeout_secs,
            &self.settings.user_agent,
            self.settings.max_retries,
            self.settings.retry_backoff_base_secs,
        )?;

        let products = admin.fetch_all_products().await?;
        let records = normalize_catalog(products, admin.shop_url())?;

        knowledge_base
            .upload_table(PRODUCT_TABLE_NAME, &product_table_schema(), &records, overwrite)
            .await?;

        tracing::info!(
            shop = %ctx.shop_host(),
            products = records.len(),
            overwrite,
            "product sync complete"
        );
        Ok(SyncResult::products(records.len()))
    }

    /// Discovers storefront pages and uploads each as a URL document.
    ///
    /// Individual upload failures are counted, not returned.
    ///
    /// # Errors
    ///
    /// - [`SyncError::MissingCredentials`] before discovery when no API key is set.
    /// - [`SyncError::UpstreamFetch`] / [`SyncError::Parse`] when the root sitemap fails.
    pub async fn sync_urls(
        &self,
        ctx: &SyncContext,
        overwrite: bool,
    ) -> Result<SyncResult, SyncError> {
        let knowledge_base = self.knowledge_base(ctx)?;
        let pages = self.discover_pages(ctx).await?;
        let urls: Vec<String> = pages.into_iter().map(|p| p.page_url).collect();

        let summary = knowledge_base.upload_urls(&urls, overwrite).await;

        tracing::info!(
            shop = %ctx.shop_host(),
            total = summary.attempted,
            succeeded = summary.succeeded,
            failed = summary.failed.len(),
            batches = summary.batches,
            overwrite,
            "url sync complete"
        );
        Ok(SyncResult::urls(
            summary.succeeded,
            summary.attempted,
            summary.failed_urls(),
        ))
    }

    /// The pages a URL sync would upload, classified and titled.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UpstreamFetch`] or [`SyncError::Parse`] when the
    /// root sitemap cannot be fetched or parsed.
    pub async fn discover_pages(&self, ctx: &SyncContext) -> Result<Vec<SiteUrlRecord>, SyncError> {
        let sitemap =
            SitemapClient::new(self.settings.request_timeout_secs, &self.settings.user_agent)?;
        let entries = sitemap.discover_page_urls(&ctx.admin.shop_url).await?;
        Ok(entries
            .into_iter()
            .map(|entry| normalize_page_url(entry, &ctx.admin.shop_url))
            .collect())
    }

    fn knowledge_base(&self, ctx: &SyncContext) -> Result<KnowledgeBaseClient, SyncError> {
        let api_key = ctx
            .voiceflow
            .api_key
            .as_deref()
            .ok_or(SyncError::MissingCredentials {
                field: "VOICEFLOW_API_KEY",
            })?;
        Ok(KnowledgeBaseClient::with_base_url(
            api_key,
            self.settings.request_timeout_secs,
            &self.settings.user_agent,
            &self.settings.voiceflow_base_url,
        )?)
    }
}
