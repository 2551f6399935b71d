//! Storefront page discovery through `/sitemap.xml`.
//!
//! Shopify serves a sitemap index at the shop root whose children are split
//! by resource (`sitemap_products_1.xml`, `sitemap_pages_1.xml`,
//! `sitemap_collections_1.xml`, `sitemap_blogs_1.xml`). Product pages are
//! synced through the catalog instead, so product children are never fetched
//! and stray `/products/` URLs are filtered out before truncation.

use std::sync::LazyLock;
use std::time::Duration;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use reqwest::Client;

use crate::client::extract_store_origin;
use crate::error::ShopifyError;

/// Upper bound on URLs handed to the knowledge base per sync (upload quota).
pub const MAX_SYNC_URLS: usize = 190;

/// Path segment marking a product page.
pub const PRODUCT_PATH_SEGMENT: &str = "/products/";

static PRODUCT_SITEMAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)sitemap_products_\d*\.xml").expect("valid product sitemap regex")
});

/// One `<url>` entry of a urlset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: Option<String>,
}

/// A parsed sitemap document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<sitemapindex>`: locations of child sitemaps, in document order.
    Index(Vec<String>),
    /// `<urlset>`: page entries, in document order.
    UrlSet(Vec<SitemapEntry>),
}

/// Returns `true` for child sitemaps that only list product pages.
#[must_use]
pub fn is_product_sitemap(url: &str) -> bool {
    let path = reqwest::Url::parse(url).map_or_else(|_| url.to_owned(), |u| u.path().to_owned());
    PRODUCT_SITEMAP.is_match(&path)
}

/// Drops product URLs, then keeps the first [`MAX_SYNC_URLS`] entries in
/// discovery order.
#[must_use]
pub fn select_sync_candidates(entries: Vec<SitemapEntry>) -> Vec<SitemapEntry> {
    entries
        .into_iter()
        .filter(|entry| !entry.loc.contains(PRODUCT_PATH_SEGMENT))
        .take(MAX_SYNC_URLS)
        .collect()
}

/// Parses a sitemap or sitemap index.
///
/// Element names are matched on their qualified name, so extension elements
/// such as `<image:loc>` never feed the page location.
///
/// # Errors
///
/// - [`ShopifyError::Xml`] when the body is not well-formed XML.
/// - [`ShopifyError::InvalidSitemap`] when the root element is neither
///   `<sitemapindex>` nor `<urlset>`.
pub fn parse_sitemap(xml: &str, url: &str) -> Result<SitemapDocument, ShopifyError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root: Option<String> = None;
    let mut current_tag = String::new();
    let mut loc = String::new();
    let mut lastmod: Option<String> = None;
    let mut children: Vec<String> = Vec::new();
    let mut entries: Vec<SitemapEntry> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|source| ShopifyError::Xml {
            url: url.to_owned(),
            source,
        })?;
        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if root.is_none() {
                    root = Some(name.clone());
                }
                if name == "url" || name == "sitemap" {
                    loc.clear();
                    lastmod = None;
                }
                current_tag = name;
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(|source| ShopifyError::Xml {
                    url: url.to_owned(),
                    source,
                })?;
                append_field(&current_tag, &text, &mut loc, &mut lastmod);
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                append_field(&current_tag, &text, &mut loc, &mut lastmod);
            }
            Event::End(e) => {
                let name = e.name();
                let name = name.as_ref();
                if (name == b"url" || name == b"sitemap") && !loc.trim().is_empty() {
                    let location = loc.trim().to_owned();
                    if name == b"url" {
                        entries.push(SitemapEntry {
                            loc: location,
                            lastmod: lastmod.take(),
                        });
                    } else {
                        children.push(location);
                    }
                    loc.clear();
                }
                current_tag.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match root.as_deref() {
        Some("sitemapindex") => Ok(SitemapDocument::Index(children)),
        Some("urlset") => Ok(SitemapDocument::UrlSet(entries)),
        Some(other) => Err(ShopifyError::InvalidSitemap {
            url: url.to_owned(),
            reason: format!("unexpected root element <{other}>"),
        }),
        None => Err(ShopifyError::InvalidSitemap {
            url: url.to_owned(),
            reason: "document has no root element".to_owned(),
        }),
    }
}

fn append_field(tag: &str, text: &str, loc: &mut String, lastmod: &mut Option<String>) {
    match tag {
        "loc" => loc.push_str(text),
        "lastmod" => lastmod.get_or_insert_with(String::new).push_str(text.trim()),
        _ => {}
    }
}

/// Fetches storefront sitemaps. No credentials: sitemaps are public.
pub struct SitemapClient {
    client: Client,
}

impl SitemapClient {
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ShopifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches and parses one sitemap document.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::NotFound`] / [`ShopifyError::UnexpectedStatus`]
    /// for non-2xx responses, [`ShopifyError::Http`] on network failure, and
    /// any parse error from [`parse_sitemap`].
    pub async fn fetch_document(&self, url: &str) -> Result<SitemapDocument, ShopifyError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/xml,text/xml;q=0.9")
            .send()
            .await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ShopifyError::NotFound {
                url: url.to_owned(),
            });
        }
        if !status.is_success() {
            return Err(ShopifyError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        let body = response.text().await?;
        parse_sitemap(&body, url)
    }

    /// Collects every non-product page URL of the shop, capped at
    /// [`MAX_SYNC_URLS`].
    ///
    /// The root sitemap must fetch and parse; child sitemaps that fail are
    /// logged and skipped so one broken child does not sink the run.
    ///
    /// # Errors
    ///
    /// Returns any error from fetching or parsing the root `/sitemap.xml`.
    pub async fn discover_page_urls(
        &self,
        shop_url: &str,
    ) -> Result<Vec<SitemapEntry>, ShopifyError> {
        let root_url = format!("{}/sitemap.xml", extract_store_origin(shop_url));
        let entries = match self.fetch_document(&root_url).await? {
            SitemapDocument::UrlSet(entries) => entries,
            SitemapDocument::Index(children) => self.collect_children(&children).await,
        };

        let discovered = entries.len();
        let candidates = select_sync_candidates(entries);
        tracing::info!(
            shop = shop_url,
            discovered,
            selected = candidates.len(),
            "discovered storefront pages"
        );
        Ok(candidates)
    }

    async fn collect_children(&self, children: &[String]) -> Vec<SitemapEntry> {
        let mut entries = Vec::new();
        for child in children {
            if is_product_sitemap(child) {
                tracing::debug!(url = %child, "skipping product sitemap");
                continue;
            }
            match self.fetch_document(child).await {
                Ok(SitemapDocument::UrlSet(child_entries)) => entries.extend(child_entries),
                Ok(SitemapDocument::Index(_)) => {
                    tracing::warn!(url = %child, "nested sitemap index ignored");
                }
                Err(e) => {
                    tracing::warn!(url = %child, error = %e, "failed fetching child sitemap");
                }
            }
        }
        entries
    }
}
