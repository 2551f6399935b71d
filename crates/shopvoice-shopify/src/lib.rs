pub mod client;
pub mod error;
pub mod normalize;
pub mod pagination;
mod rate_limit;
pub mod sitemap;
pub mod types;

pub use client::{AdminClient, AdminCredentials};
pub use error::ShopifyError;
pub use normalize::{normalize_catalog, normalize_page_url, normalize_product};
pub use sitemap::{select_sync_candidates, SitemapClient, SitemapDocument, SitemapEntry};
pub use types::{AdminImage, AdminProduct, AdminProductsResponse, AdminVariant};
