//! Shop URL handling.
//!
//! Configured shop URLs are expected to be bare origins, but operators paste
//! admin or storefront links too. Everything is reduced to the origin before
//! Admin API or sitemap paths are appended.

/// `"https://demo.myshopify.com/admin"` → `"https://demo.myshopify.com"`.
#[must_use]
pub fn extract_store_origin(shop_url: &str) -> String {
    match reqwest::Url::parse(shop_url) {
        Ok(url) => url.origin().ascii_serialization(),
        Err(e) => {
            tracing::warn!(shop_url, error = %e, "unparseable shop URL, trimming to scheme and host");
            origin_by_split(shop_url)
        }
    }
}

/// Host plus any explicit port, e.g. `demo.myshopify.com` or `127.0.0.1:8080`.
///
/// Keys caches and labels errors; falls back to the trimmed input.
#[must_use]
pub fn shop_host(shop_url: &str) -> String {
    reqwest::Url::parse(shop_url)
        .ok()
        .and_then(|url| {
            let host = url.host_str()?;
            Some(match url.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_owned(),
            })
        })
        .unwrap_or_else(|| shop_url.trim_end_matches('/').to_owned())
}

fn origin_by_split(shop_url: &str) -> String {
    let trimmed = shop_url.trim().trim_end_matches('/');
    match trimmed.split_once("://") {
        Some((scheme, rest)) => {
            let host = rest.split('/').next().unwrap_or(rest);
            format!("{scheme}://{host}")
        }
        None => trimmed.split('/').next().unwrap_or(trimmed).to_owned(),
    }
}
