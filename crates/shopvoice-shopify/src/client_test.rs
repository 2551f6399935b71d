use super::*;

fn client_for(shop_url: &str) -> AdminClient {
    AdminClient::new(
        AdminCredentials {
            shop_url: shop_url.to_owned(),
            access_token: "shpat_test".to_owned(),
        },
        "2024-10",
        5,
        "shopvoice-test/0.1",
        0,
        0,
    )
    .unwrap()
}

#[test]
fn first_page_url_filters_active_products() {
    let client = client_for("https://demo.myshopify.com");
    let url = client.products_url(250, None).unwrap();
    assert_eq!(
        url,
        "https://demo.myshopify.com/admin/api/2024-10/products.json?limit=250&status=active"
    );
}

#[test]
fn cursor_page_url_carries_only_limit_and_page_info() {
    let client = client_for("https://demo.myshopify.com");
    let url = client.products_url(250, Some("eyJsYXN0X2lkIjo2fQ")).unwrap();
    assert_eq!(
        url,
        "https://demo.myshopify.com/admin/api/2024-10/products.json?limit=250&page_info=eyJsYXN0X2lkIjo2fQ"
    );
}

#[test]
fn client_normalizes_shop_url_to_origin() {
    let client = client_for("https://demo.myshopify.com/admin/products/");
    assert_eq!(client.shop_url(), "https://demo.myshopify.com");
}

#[test]
fn extract_store_origin_keeps_port() {
    assert_eq!(
        extract_store_origin("http://127.0.0.1:8080/sitemap.xml"),
        "http://127.0.0.1:8080"
    );
}

#[test]
fn shop_host_strips_scheme_and_path() {
    assert_eq!(
        shop_host("https://demo.myshopify.com/admin"),
        "demo.myshopify.com"
    );
    assert_eq!(shop_host("http://127.0.0.1:8080/"), "127.0.0.1:8080");
    assert_eq!(shop_host("demo.myshopify.com/"), "demo.myshopify.com");
}

#[test]
fn unparseable_shop_url_is_trimmed_to_host() {
    assert_eq!(
        extract_store_origin("demo.myshopify.com/admin/products"),
        "demo.myshopify.com"
    );
}

#[test]
fn credentials_debug_redacts_token() {
    let creds = AdminCredentials {
        shop_url: "https://demo.myshopify.com".to_owned(),
        access_token: "shpat_secret".to_owned(),
    };
    let rendered = format!("{creds:?}");
    assert!(!rendered.contains("shpat_secret"));
}
