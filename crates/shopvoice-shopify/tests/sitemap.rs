//! Integration tests for `SitemapClient::discover_page_urls`.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopvoice_shopify::{ShopifyError, SitemapClient};

fn test_client() -> SitemapClient {
    SitemapClient::new(5, "shopvoice-test/0.1").expect("failed to build test SitemapClient")
}

fn index_xml(children: &[String]) -> String {
    let entries: String = children
        .iter()
        .map(|loc| format!("<sitemap><loc>{loc}</loc></sitemap>"))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{entries}</sitemapindex>"#
    )
}

fn urlset_xml(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<url><loc>{loc}</loc><lastmod>2024-01-01</lastmod></url>"))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{entries}</urlset>"#
    )
}

async fn mount_xml(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn failed_child_sitemap_is_skipped() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        index_xml(&[
            format!("{base}/sitemap_pages_1.xml"),
            format!("{base}/sitemap_collections_1.xml"),
            format!("{base}/sitemap_blogs_1.xml"),
        ]),
    )
    .await;
    mount_xml(
        &server,
        "/sitemap_pages_1.xml",
        urlset_xml(&[format!("{base}/pages/about"), format!("{base}/pages/faq")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/sitemap_collections_1.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_xml(
        &server,
        "/sitemap_blogs_1.xml",
        urlset_xml(&[format!("{base}/blogs/news")]),
    )
    .await;

    let entries = test_client()
        .discover_page_urls(&base)
        .await
        .expect("child failure must not abort discovery");

    let locs: Vec<_> = entries.iter().map(|e| e.loc.clone()).collect();
    assert_eq!(
        locs,
        vec![
            format!("{base}/pages/about"),
            format!("{base}/pages/faq"),
            format!("{base}/blogs/news"),
        ]
    );
    assert_eq!(entries[0].lastmod.as_deref(), Some("2024-01-01"));
}

#[tokio::test]
async fn unparseable_child_sitemap_is_skipped() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        index_xml(&[
            format!("{base}/sitemap_pages_1.xml"),
            format!("{base}/sitemap_blogs_1.xml"),
        ]),
    )
    .await;
    mount_xml(&server, "/sitemap_pages_1.xml", "<urlset><url>".to_owned()).await;
    mount_xml(
        &server,
        "/sitemap_blogs_1.xml",
        urlset_xml(&[format!("{base}/blogs/news")]),
    )
    .await;

    let entries = test_client().discover_page_urls(&base).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].loc, format!("{base}/blogs/news"));
}

#[tokio::test]
async fn product_sitemaps_are_never_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        index_xml(&[
            format!("{base}/sitemap_products_1.xml?from=1&amp;to=99"),
            format!("{base}/sitemap_pages_1.xml"),
        ]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/sitemap_products_1.xml"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount_xml(
        &server,
        "/sitemap_pages_1.xml",
        urlset_xml(&[
            format!("{base}/pages/about"),
            format!("{base}/collections/all/products/stray"),
        ]),
    )
    .await;

    let entries = test_client().discover_page_urls(&base).await.unwrap();
    assert_eq!(entries.len(), 1, "stray product URL must be filtered");
    assert_eq!(entries[0].loc, format!("{base}/pages/about"));
}

#[tokio::test]
async fn root_urlset_is_used_directly_and_truncated() {
    let server = MockServer::start().await;
    let base = server.uri();

    let locs: Vec<String> = (0..250).map(|i| format!("{base}/pages/p-{i}")).collect();
    mount_xml(&server, "/sitemap.xml", urlset_xml(&locs)).await;

    let entries = test_client().discover_page_urls(&base).await.unwrap();
    assert_eq!(entries.len(), 190);
    assert_eq!(entries[0].loc, format!("{base}/pages/p-0"));
    assert_eq!(entries[189].loc, format!("{base}/pages/p-189"));
}

#[tokio::test]
async fn missing_root_sitemap_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_client()
        .discover_page_urls(&server.uri())
        .await
        .unwrap_err();
    assert!(matches!(err, ShopifyError::NotFound { .. }));
}

#[tokio::test]
async fn unparseable_root_sitemap_is_fatal() {
    let server = MockServer::start().await;
    mount_xml(&server, "/sitemap.xml", "<html><body>shop</body></html>".to_owned()).await;

    let err = test_client()
        .discover_page_urls(&server.uri())
        .await
        .unwrap_err();
    assert!(matches!(err, ShopifyError::InvalidSitemap { .. }));
}
