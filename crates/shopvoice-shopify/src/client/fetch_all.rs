//! Full-catalog fetch for `AdminClient`.

use crate::error::ShopifyError;
use crate::pagination::extract_next_cursor;
use crate::types::AdminProduct;

use super::{AdminClient, MAX_PAGES, PAGE_LIMIT};

impl AdminClient {
    /// Fetches every active product by following `Link` cursors until no
    /// `rel="next"` remains.
    ///
    /// Pages are requested strictly one after another; the next cursor is
    /// only known once the previous page has returned. Products keep the
    /// order the API returned them in.
    ///
    /// Any page failure discards earlier pages and returns the error: a
    /// partial catalog must never be uploaded as if it were complete.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_products_page`], and returns
    /// [`ShopifyError::PaginationLimit`] past [`MAX_PAGES`] pages.
    pub async fn fetch_all_products(&self) -> Result<Vec<AdminProduct>, ShopifyError> {
        let mut all_products: Vec<AdminProduct> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(ShopifyError::PaginationLimit {
                    shop_url: self.shop_url.clone(),
                    max_pages: MAX_PAGES,
                });
            }

            let (page, link_header) = self
                .fetch_products_page(PAGE_LIMIT, cursor.as_deref())
                .await?;

            tracing::debug!(
                shop = %self.shop_url,
                page = page_count,
                products = page.products.len(),
                "fetched products page"
            );
            all_products.extend(page.products);

            cursor = extract_next_cursor(link_header.as_deref());
            if cursor.is_none() {
                break;
            }
        }

        tracing::info!(
            shop = %self.shop_url,
            pages = page_count,
            products = all_products.len(),
            "fetched active catalog"
        );
        Ok(all_products)
    }
}
