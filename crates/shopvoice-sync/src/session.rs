//! Resolving who a sync run is for and where it uploads.
//!
//! A request is authenticated and its knowledge-base settings are looked up
//! in one step; the run then carries the result as a [`SyncContext`].

use reqwest::header::HeaderMap;
use shopvoice_core::AppConfig;
use shopvoice_shopify::client::shop_host;
use shopvoice_shopify::AdminCredentials;

use crate::error::SyncError;

/// Header carrying the shop domain on requests from the embedded app.
pub const SHOP_DOMAIN_HEADER: &str = "x-shopify-shop-domain";

/// Knowledge-base destination for one shop. Any field may be unset; the
/// pipeline reports what is missing before doing any work.
#[derive(Clone, Default)]
pub struct VoiceflowSettings {
    pub api_key: Option<String>,
    pub project_id: Option<String>,
    pub version_id: Option<String>,
}

impl std::fmt::Debug for VoiceflowSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceflowSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("project_id", &self.project_id)
            .field("version_id", &self.version_id)
            .finish()
    }
}

/// Everything a run needs to know about the requesting shop.
#[derive(Debug, Clone)]
pub struct SyncContext {
    pub admin: AdminCredentials,
    pub voiceflow: VoiceflowSettings,
}

impl SyncContext {
    /// Bare host of the shop, used to key caches and label uploads.
    #[must_use]
    pub fn shop_host(&self) -> String {
        shop_host(&self.admin.shop_url)
    }
}

/// Authentication and settings lookup for an incoming request.
pub trait SessionResolver: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SyncError::Authentication`] when the request cannot be tied
    /// to a shop this process serves.
    fn resolve(&self, headers: &HeaderMap) -> Result<SyncContext, SyncError>;
}

/// Single-shop resolver backed by process configuration.
#[derive(Debug, Clone)]
pub struct ConfiguredSession {
    context: SyncContext,
}

impl ConfiguredSession {
    #[must_use]
    pub fn new(context: SyncContext) -> Self {
        Self { context }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(SyncContext {
            admin: AdminCredentials {
                shop_url: config.shop_url.clone(),
                access_token: config.shopify_access_token.clone(),
            },
            voiceflow: VoiceflowSettings {
                api_key: config.voiceflow_api_key.clone(),
                project_id: config.voiceflow_project_id.clone(),
                version_id: config.voiceflow_version_id.clone(),
            },
        })
    }

    /// Context for callers with no request, such as the CLI.
    #[must_use]
    pub fn context(&self) -> &SyncContext {
        &self.context
    }
}

impl SessionResolver for ConfiguredSession {
    /// Accepts requests without a shop header; a header naming a different
    /// shop is rejected.
    fn resolve(&self, headers: &HeaderMap) -> Result<SyncContext, SyncError> {
        let Some(value) = headers.get(SHOP_DOMAIN_HEADER) else {
            return Ok(self.context.clone());
        };
        let requested = value.to_str().map_err(|_| SyncError::Authentication {
            reason: format!("{SHOP_DOMAIN_HEADER} is not valid text"),
        })?;

        let served = self.context.shop_host();
        if requested.trim().eq_ignore_ascii_case(&served) {
            Ok(self.context.clone())
        } else {
            tracing::warn!(requested, served = %served, "request for a shop this process does not serve");
            Err(SyncError::Authentication {
                reason: format!("shop {requested} is not served here"),
            })
        }
    }
}
