//! HTTP client for the Shopify Admin REST API `products.json` resource.

mod fetch_all;
mod origin;

use std::time::Duration;

use reqwest::Client;

use crate::error::ShopifyError;
use crate::rate_limit::retry_with_backoff;
use crate::types::AdminProductsResponse;

pub use origin::{extract_store_origin, shop_host};

/// Page size requested from the Admin API; Shopify's maximum.
pub const PAGE_LIMIT: u32 = 250;

/// Maximum number of pages to fetch before returning an error.
/// Prevents infinite loops on cycling cursors.
pub(super) const MAX_PAGES: usize = 200;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Shop origin plus the Admin API token that authenticates against it.
#[derive(Clone)]
pub struct AdminCredentials {
    /// Shop origin, e.g. `https://demo.myshopify.com`.
    pub shop_url: String,
    pub access_token: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("shop_url", &self.shop_url)
            .field("access_token", &"[redacted]")
            .finish()
    }
}

/// Authenticated client for one shop's Admin API.
///
/// Non-2xx responses become typed errors; 429 and network failures are
/// retried with exponential backoff up to `max_retries` additional attempts.
pub struct AdminClient {
    pub(super) client: Client,
    pub(super) shop_url: String,
    access_token: String,
    api_version: String,
    pub(super) max_retries: u32,
    pub(super) backoff_base_secs: u64,
}

impl AdminClient {
    /// Builds a client for the shop in `credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        credentials: AdminCredentials,
        api_version: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ShopifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            shop_url: extract_store_origin(&credentials.shop_url),
            access_token: credentials.access_token,
            api_version: api_version.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    #[must_use]
    pub fn shop_url(&self) -> &str {
        &self.shop_url
    }

    /// Fetches one page of active products.
    ///
    /// Returns the parsed page and the raw `Link` header for cursor extraction.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::Unauthorized`] on 401/403 (not retried).
    /// - [`ShopifyError::RateLimited`] on 429 after all retries.
    /// - [`ShopifyError::NotFound`] on 404.
    /// - [`ShopifyError::UnexpectedStatus`] on any other non-2xx.
    /// - [`ShopifyError::Http`] on network failure after all retries.
    /// - [`ShopifyError::Deserialize`] when the body is not a products page.
    pub async fn fetch_products_page(
        &self,
        limit: u32,
        page_info: Option<&str>,
    ) -> Result<(AdminProductsResponse, Option<String>), ShopifyError> {
        let url = self.products_url(limit, page_info)?;

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .header(ACCESS_TOKEN_HEADER, &self.access_token)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        // Shopify sends fractional seconds, e.g. "2.0".
                        .and_then(|s| s.trim().split('.').next()?.parse::<u64>().ok())
                        .unwrap_or(2);
                    return Err(ShopifyError::RateLimited {
                        domain: shop_host(&self.shop_url),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::UNAUTHORIZED
                    || status == reqwest::StatusCode::FORBIDDEN
                {
                    return Err(ShopifyError::Unauthorized {
                        shop: shop_host(&self.shop_url),
                        status: status.as_u16(),
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ShopifyError::NotFound { url });
                }

                if !status.is_success() {
                    return Err(ShopifyError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let link_header = response
                    .headers()
                    .get(reqwest::header::LINK)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned);

                let body = response.text().await?;
                let parsed =
                    serde_json::from_str::<AdminProductsResponse>(&body).map_err(|e| {
                        ShopifyError::Deserialize {
                            context: format!("products page from {}", self.shop_url),
                            source: e,
                        }
                    })?;

                Ok((parsed, link_header))
            }
        })
        .await
    }

    /// Builds the `products.json` URL for one page.
    ///
    /// The first page filters on `status=active`. Follow-up pages carry only
    /// `limit` and `page_info`: Shopify rejects other filters next to a
    /// cursor, which already encodes them.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::InvalidShopUrl`] if the shop origin does not
    /// form a valid URL.
    fn products_url(&self, limit: u32, page_info: Option<&str>) -> Result<String, ShopifyError> {
        let base = format!(
            "{}/admin/api/{}/products.json",
            self.shop_url, self.api_version
        );
        let mut url = reqwest::Url::parse(&base).map_err(|e| ShopifyError::InvalidShopUrl {
            shop_url: self.shop_url.clone(),
            reason: format!("\"{base}\" is not a valid URL: {e}"),
        })?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &limit.to_string());
            match page_info {
                Some(cursor) => query.append_pair("page_info", cursor),
                None => query.append_pair("status", "active"),
            };
        }

        Ok(url.to_string())
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
