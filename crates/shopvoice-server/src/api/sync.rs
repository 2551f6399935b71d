//! Sync trigger routes. Every response uses the `SyncResult` envelope.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shopvoice_core::{SiteUrlRecord, SyncResult};
use shopvoice_sync::SyncError;

use super::AppState;

#[derive(Debug, Default, Deserialize)]
pub(super) struct SyncRequest {
    #[serde(default)]
    pub overwrite: bool,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct SiteUrlsQuery {
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct SiteUrlsResponse {
    success: bool,
    pages: Vec<SiteUrlRecord>,
}

pub(super) async fn synchronize_urls(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<SyncRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return rejected_body("urls", &rejection),
    };
    let outcome = match state.session.resolve(&headers) {
        Ok(ctx) => state.pipeline.sync_urls(&ctx, request.overwrite).await,
        Err(e) => Err(e),
    };
    sync_response("urls", outcome)
}

pub(super) async fn synchronize_products(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<SyncRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return rejected_body("products", &rejection),
    };
    let outcome = match state.session.resolve(&headers) {
        Ok(ctx) => state.pipeline.sync_products(&ctx, request.overwrite).await,
        Err(e) => Err(e),
    };
    sync_response("products", outcome)
}

/// Preview of the pages a URL sync would upload. Cached per shop.
pub(super) async fn site_urls(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SiteUrlsQuery>,
) -> Response {
    let ctx = match state.session.resolve(&headers) {
        Ok(ctx) => ctx,
        Err(e) => return error_response("site-urls", &e),
    };
    let key = ctx.shop_host();

    if query.refresh {
        state.page_cache.invalidate(&key);
    } else if let Some(pages) = state.page_cache.get(&key) {
        tracing::debug!(shop = %key, pages = pages.len(), "serving cached page preview");
        return Json(SiteUrlsResponse {
            success: true,
            pages,
        })
        .into_response();
    }

    match state.pipeline.discover_pages(&ctx).await {
        Ok(pages) => {
            state.page_cache.set(key, pages.clone());
            Json(SiteUrlsResponse {
                success: true,
                pages,
            })
            .into_response()
        }
        Err(e) => error_response("site-urls", &e),
    }
}

/// Malformed, missing, or non-JSON bodies still get the result envelope.
fn rejected_body(kind: &'static str, rejection: &JsonRejection) -> Response {
    tracing::warn!(kind, error = %rejection.body_text(), "sync request body rejected");
    (
        StatusCode::BAD_REQUEST,
        Json(SyncResult::failure(format!(
            "invalid request body: {}",
            rejection.body_text()
        ))),
    )
        .into_response()
}

fn sync_response(kind: &'static str, outcome: Result<SyncResult, SyncError>) -> Response {
    match outcome {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => error_response(kind, &e),
    }
}

fn error_response(kind: &'static str, error: &SyncError) -> Response {
    let status = status_for(error);
    if status.is_server_error() {
        tracing::error!(kind, code = error.code(), error = %error, "sync request failed");
    } else {
        tracing::warn!(kind, code = error.code(), error = %error, "sync request rejected");
    }
    (status, Json(SyncResult::failure(error.to_string()))).into_response()
}

pub(super) fn status_for(error: &SyncError) -> StatusCode {
    match error {
        SyncError::Authentication { .. } => StatusCode::UNAUTHORIZED,
        SyncError::MissingCredentials { .. } => StatusCode::BAD_REQUEST,
        SyncError::UpstreamFetch(_) | SyncError::Parse(_) => StatusCode::BAD_GATEWAY,
        SyncError::Upload(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
