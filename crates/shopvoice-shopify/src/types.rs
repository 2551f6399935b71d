//! Shopify Admin REST API response types for `GET /admin/api/{version}/products.json`.
//!
//! ### Tags
//! The Admin REST API returns tags as a single comma-separated string
//! (`"summer, linen , sale"`), unlike the storefront `products.json` which
//! returns an array. Splitting and trimming happens in `normalize.rs`.
//!
//! ### `inventory_quantity`
//! Present on every variant for shops that track inventory; absent or `null`
//! for untracked variants, which we treat as zero stock.

use serde::Deserialize;

/// Top-level response from `GET /admin/api/{version}/products.json`.
#[derive(Debug, Deserialize)]
pub struct AdminProductsResponse {
    pub products: Vec<AdminProduct>,
}

/// A single catalog product as returned by the Admin API.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminProduct {
    /// Shopify numeric product ID.
    pub id: i64,

    pub title: String,

    /// Raw HTML description. May be `null`.
    #[serde(default)]
    pub body_html: Option<String>,

    /// URL slug for the storefront product page.
    pub handle: String,

    /// Comma-separated tag string; `""` or absent when untagged.
    #[serde(default)]
    pub tags: Option<String>,

    #[serde(default)]
    pub variants: Vec<AdminVariant>,

    #[serde(default)]
    pub images: Vec<AdminImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminVariant {
    #[serde(default)]
    pub id: Option<i64>,

    pub title: String,

    /// Decimal string, e.g. `"49.00"`.
    #[serde(default)]
    pub price: Option<String>,

    #[serde(default)]
    pub inventory_quantity: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminImage {
    /// CDN URL of the image.
    pub src: String,
}
