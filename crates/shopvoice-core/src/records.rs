//! Records exchanged between the Shopify side and the Voiceflow knowledge base.
//!
//! Field names are serialized exactly as the knowledge-base table schema
//! declares them (`ProductID`, `PageURL`, ...), so these types double as the
//! upload payload.

use serde::{Deserialize, Serialize};

/// `Availability` value when at least one variant has stock.
pub const AVAILABLE: &str = "Available";
/// `Availability` value when no variant has positive inventory.
pub const SOLD_OUT: &str = "Sold Out";
/// Constant label attached to every product record.
pub const CUSTOM_TAG: &str = "shopify-product";

/// A catalog product flattened into one knowledge-base table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Shopify numeric product ID, stringified.
    #[serde(rename = "ProductID")]
    pub product_id: String,
    #[serde(rename = "ProductName")]
    pub product_name: String,
    /// Price of the first variant, exactly as Shopify returns it.
    #[serde(rename = "ProductPrice")]
    pub product_price: Option<String>,
    /// Plain-text description with markup removed and whitespace collapsed.
    #[serde(rename = "ProductDescription")]
    pub product_description: String,
    #[serde(rename = "ProductURL")]
    pub product_url: String,
    /// `"{title}: {price}"` per variant, joined with `", "`.
    #[serde(rename = "ProductVariants")]
    pub product_variants: String,
    #[serde(rename = "ProductTags")]
    pub product_tags: Vec<String>,
    #[serde(rename = "ProductTagsStr")]
    pub product_tags_str: String,
    #[serde(rename = "ProductImages")]
    pub product_images: Vec<String>,
    #[serde(rename = "CustomTag")]
    pub custom_tag: String,
    /// Either [`AVAILABLE`] or [`SOLD_OUT`].
    #[serde(rename = "Availability")]
    pub availability: String,
}

/// Storefront page classification derived from the URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageType {
    Homepage,
    Collection,
    Information,
    Blog,
    Page,
}

impl std::fmt::Display for PageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PageType::Homepage => "Homepage",
            PageType::Collection => "Collection",
            PageType::Information => "Information",
            PageType::Blog => "Blog",
            PageType::Page => "Page",
        };
        f.write_str(label)
    }
}

/// A storefront page discovered through the sitemap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteUrlRecord {
    #[serde(rename = "PageURL")]
    pub page_url: String,
    #[serde(rename = "PageTitle")]
    pub page_title: String,
    #[serde(rename = "PageType")]
    pub page_type: PageType,
    /// Raw `<lastmod>` text from the sitemap, when present.
    #[serde(rename = "LastModified")]
    pub last_modified: Option<String>,
}

/// Outcome of one sync invocation. Returned to the caller, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_urls: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncResult {
    /// Result of a URL sync. `success` is true whenever the run completed,
    /// even if some uploads failed; the counts carry the partial outcome.
    #[must_use]
    pub fn urls(url_count: usize, total_urls: usize, failed_urls: Vec<String>) -> Self {
        Self {
            success: true,
            url_count: Some(url_count),
            total_urls: Some(total_urls),
            failed_count: Some(failed_urls.len()),
            failed_urls: Some(failed_urls),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn products(product_count: usize) -> Self {
        Self {
            success: true,
            product_count: Some(product_count),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }
}
