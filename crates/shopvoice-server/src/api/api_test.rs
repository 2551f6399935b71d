use super::*;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use serde_json::json;
use shopvoice_shopify::AdminCredentials;
use shopvoice_sync::{ClientSettings, ConfiguredSession, SyncContext, SyncError, VoiceflowSettings};
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn state_for(server_uri: &str, api_key: Option<&str>) -> AppState {
    let session = ConfiguredSession::new(SyncContext {
        admin: AdminCredentials {
            shop_url: server_uri.to_owned(),
            access_token: "shpat_test".to_owned(),
        },
        voiceflow: VoiceflowSettings {
            api_key: api_key.map(ToOwned::to_owned),
            project_id: Some("proj".to_owned()),
            version_id: Some("ver".to_owned()),
        },
    });
    AppState {
        session: Arc::new(session),
        pipeline: SyncPipeline::new(ClientSettings {
            shopify_api_version: "2024-10".to_owned(),
            voiceflow_base_url: server_uri.to_owned(),
            request_timeout_secs: 5,
            user_agent: "shopvoice-test/0.1".to_owned(),
            max_retries: 0,
            retry_backoff_base_secs: 0,
        }),
        page_cache: Arc::new(TtlCache::new(Duration::from_secs(300))),
    }
}

fn open_app(state: AppState) -> Router {
    let auth = AuthState::from_keys("", true).expect("auth");
    build_app(state, auth)
}

fn sync_request(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

fn urlset(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<url><loc>{loc}</loc></url>"))
        .collect();
    format!(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{entries}</urlset>"#)
}

#[test]
fn sync_errors_map_to_statuses() {
    let auth = SyncError::Authentication {
        reason: "bad token".to_owned(),
    };
    let missing = SyncError::MissingCredentials {
        field: "VOICEFLOW_API_KEY",
    };
    let upstream = SyncError::UpstreamFetch(shopvoice_shopify::ShopifyError::NotFound {
        url: "https://demo.myshopify.com/sitemap.xml".to_owned(),
    });
    let upload = SyncError::Upload(shopvoice_voiceflow::VoiceflowError::Rejected {
        status: 500,
        body: "boom".to_owned(),
    });

    assert_eq!(sync::status_for(&auth), StatusCode::UNAUTHORIZED);
    assert_eq!(sync::status_for(&missing), StatusCode::BAD_REQUEST);
    assert_eq!(sync::status_for(&upstream), StatusCode::BAD_GATEWAY);
    assert_eq!(sync::status_for(&upload), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn health_echoes_request_id() {
    let app = open_app(state_for("https://demo.myshopify.com", None));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("req-42")
    );
    let json = json_body(response).await;
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["meta"]["request_id"], "req-42");
}

#[tokio::test]
async fn synchronize_urls_uploads_all_pages() {
    let server = MockServer::start().await;
    let base = server.uri();
    let pages: Vec<String> = (0..6).map(|i| format!("{base}/pages/info-{i}")).collect();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&pages)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/knowledge-base/docs/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(6)
        .mount(&server)
        .await;

    let app = open_app(state_for(&base, Some("VF.DM.test")));
    let response = app
        .oneshot(sync_request(
            "/api.synchronize-urls",
            &json!({"overwrite": false}),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["urlCount"], 6);
    assert_eq!(json["totalUrls"], 6);
    assert_eq!(json["failedCount"], 0);
}

#[tokio::test]
async fn sync_without_json_body_returns_failure_envelope() {
    let app = open_app(state_for("https://demo.myshopify.com", Some("VF.DM.test")));
    let empty = Request::builder()
        .method("POST")
        .uri("/api.synchronize-urls")
        .body(Body::empty())
        .expect("request");

    let response = app.clone().oneshot(empty).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"]
        .as_str()
        .is_some_and(|e| e.starts_with("invalid request body")));

    let malformed = Request::builder()
        .method("POST")
        .uri("/api.synchronize-products")
        .header("content-type", "application/json")
        .body(Body::from("{\"overwrite\": "))
        .expect("request");
    let response = app.oneshot(malformed).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["success"], false);
}

#[tokio::test]
async fn missing_api_key_is_a_bad_request() {
    let app = open_app(state_for("https://demo.myshopify.com", None));
    let response = app
        .oneshot(sync_request(
            "/api.synchronize-products",
            &json!({"overwrite": true}),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"]
        .as_str()
        .is_some_and(|e| e.contains("VOICEFLOW_API_KEY")));
}

#[tokio::test]
async fn admin_auth_failure_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/api/2024-10/products.json"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let app = open_app(state_for(&server.uri(), Some("VF.DM.test")));
    let response = app
        .oneshot(sync_request(
            "/api.synchronize-products",
            &json!({"overwrite": false}),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["success"], false);
}

#[tokio::test]
async fn broken_sitemap_is_a_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let app = open_app(state_for(&server.uri(), Some("VF.DM.test")));
    let response = app
        .oneshot(sync_request("/api.synchronize-urls", &json!({})))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn foreign_shop_header_is_unauthorized() {
    let app = open_app(state_for("https://demo.myshopify.com", Some("VF.DM.test")));
    let mut request = sync_request("/api.synchronize-urls", &json!({"overwrite": false}));
    request.headers_mut().insert(
        "x-shopify-shop-domain",
        axum::http::HeaderValue::from_static("elsewhere.myshopify.com"),
    );

    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn site_urls_preview_is_cached() {
    let server = MockServer::start().await;
    let base = server.uri();
    let pages = vec![format!("{base}/pages/about-us"), format!("{base}/blogs/news")];

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&pages)))
        .expect(1)
        .mount(&server)
        .await;

    let app = open_app(state_for(&base, None));
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api.site-urls")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["pages"][0]["PageTitle"], "About Us");
        assert_eq!(json["pages"][0]["PageType"], "Information");
        assert_eq!(json["pages"][1]["PageType"], "Blog");
    }
}

#[tokio::test]
async fn bearer_auth_guards_sync_routes_but_not_health() {
    let state = state_for("https://demo.myshopify.com", None);
    let auth = AuthState::from_keys("secret-key", false).expect("auth");
    let app = build_app(state, auth);

    let response = app
        .clone()
        .oneshot(sync_request("/api.synchronize-urls", &json!({})))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let mut request = sync_request("/api.synchronize-urls", &json!({}));
    request.headers_mut().insert(
        "authorization",
        axum::http::HeaderValue::from_static("Bearer secret-key"),
    );
    let response = app.clone().oneshot(request).await.expect("response");
    // Past auth; the run itself fails on the missing knowledge-base key.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}
