//! Conversion from Shopify shapes to knowledge-base records.
//!
//! Products become [`NormalizedRecord`] table rows; sitemap entries become
//! [`SiteUrlRecord`]s. Both conversions are pure.

use std::collections::HashSet;

use shopvoice_core::{NormalizedRecord, PageType, SiteUrlRecord, AVAILABLE, CUSTOM_TAG, SOLD_OUT};

use crate::client::extract_store_origin;
use crate::error::ShopifyError;
use crate::sitemap::SitemapEntry;
use crate::types::AdminProduct;

/// Normalizes a whole catalog, preserving order.
///
/// # Errors
///
/// Returns [`ShopifyError::DuplicateProductId`] if two products share an ID.
/// Duplicates point at a broken pagination cursor upstream and are never
/// dropped silently.
pub fn normalize_catalog(
    products: Vec<AdminProduct>,
    shop_url: &str,
) -> Result<Vec<NormalizedRecord>, ShopifyError> {
    let mut seen: HashSet<i64> = HashSet::with_capacity(products.len());
    let mut records = Vec::with_capacity(products.len());
    for product in products {
        if !seen.insert(product.id) {
            return Err(ShopifyError::DuplicateProductId {
                product_id: product.id.to_string(),
            });
        }
        records.push(normalize_product(product, shop_url));
    }
    Ok(records)
}

/// Flattens one [`AdminProduct`] into a [`NormalizedRecord`].
#[must_use]
pub fn normalize_product(product: AdminProduct, shop_url: &str) -> NormalizedRecord {
    let product_price = product.variants.first().and_then(|v| v.price.clone());

    let in_stock = product
        .variants
        .iter()
        .any(|v| v.inventory_quantity.is_some_and(|qty| qty > 0));

    let product_variants = product
        .variants
        .iter()
        .map(|v| match v.price.as_deref() {
            Some(price) => format!("{}: {price}", v.title),
            None => v.title.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ");

    let product_tags = split_tags(product.tags.as_deref().unwrap_or_default());
    let product_tags_str = product_tags.join(", ");

    NormalizedRecord {
        product_id: product.id.to_string(),
        product_name: product.title,
        product_price,
        product_description: strip_html(product.body_html.as_deref().unwrap_or_default()),
        product_url: format!(
            "{}/products/{}",
            extract_store_origin(shop_url),
            product.handle
        ),
        product_variants,
        product_tags,
        product_tags_str,
        product_images: product.images.into_iter().map(|image| image.src).collect(),
        custom_tag: CUSTOM_TAG.to_owned(),
        availability: if in_stock { AVAILABLE } else { SOLD_OUT }.to_owned(),
    }
}

/// Classifies and titles one sitemap entry.
#[must_use]
pub fn normalize_page_url(entry: SitemapEntry, shop_url: &str) -> SiteUrlRecord {
    // Entries may use the shop's primary domain; the root is matched by path.
    let (path, is_root) = match reqwest::Url::parse(&entry.loc) {
        Ok(url) => {
            let is_root = matches!(url.path(), "" | "/") && url.query().is_none();
            (url.path().to_owned(), is_root)
        }
        Err(_) => {
            let origin = extract_store_origin(shop_url);
            let is_root = entry.loc.trim_end_matches('/') == origin.trim_end_matches('/');
            (entry.loc.clone(), is_root)
        }
    };
    let (page_type, page_title) = if is_root {
        (PageType::Homepage, "Homepage".to_owned())
    } else {
        let title = title_from_path(&path).unwrap_or_else(|| entry.loc.clone());
        (classify_path(&path), title)
    };

    SiteUrlRecord {
        page_url: entry.loc,
        page_title,
        page_type,
        last_modified: entry.lastmod,
    }
}

fn classify_path(path: &str) -> PageType {
    if path.contains("/collections/") {
        PageType::Collection
    } else if path.contains("/pages/") {
        PageType::Information
    } else if path.contains("/blogs/") {
        PageType::Blog
    } else {
        PageType::Page
    }
}

/// `"/pages/shipping-and-returns"` → `"Shipping And Returns"`.
fn title_from_path(path: &str) -> Option<String> {
    let segment = path.split('/').rev().find(|s| !s.is_empty())?;
    let title = segment
        .split('-')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");
    (!title.is_empty()).then_some(title)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Strips markup and collapses every whitespace run (newlines included) to a
/// single space.
pub(crate) fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut tag: Option<String> = None;
    for ch in html.chars() {
        if let Some(name) = tag.as_mut() {
            if ch == '>' {
                if is_block_tag(name) {
                    out.push(' ');
                }
                tag = None;
            } else {
                name.push(ch);
            }
        } else if ch == '<' {
            tag = Some(String::new());
        } else {
            out.push(ch);
        }
    }
    let decoded = out
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Block-level tags separate words; inline ones (`<b>`, `<span>`) do not.
fn is_block_tag(raw: &str) -> bool {
    let name: String = raw
        .trim_start_matches('/')
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    matches!(
        name.as_str(),
        "p" | "br" | "div" | "li" | "ul" | "ol" | "tr" | "td" | "th" | "table" | "h1" | "h2"
            | "h3" | "h4" | "h5" | "h6" | "section" | "article" | "blockquote"
    )
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
