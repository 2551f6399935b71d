//! Admin API cursor pagination via the `Link` response header.
//!
//! Each page of `products.json` answers with a `Link` header listing the
//! adjacent pages. The cursor for the next page lives in the `page_info`
//! query parameter of the `rel="next"` URL:
//!
//! ```text
//! <https://demo.myshopify.com/admin/api/2024-10/products.json?limit=250&page_info=PREV>; rel="previous",
//! <https://demo.myshopify.com/admin/api/2024-10/products.json?limit=250&page_info=NEXT>; rel="next"
//! ```

use reqwest::Url;

/// Returns the `page_info` cursor of the `rel="next"` link, or `None` on the
/// last page (no header, no next link, or a next link without a cursor).
#[must_use]
pub fn extract_next_cursor(link_header: Option<&str>) -> Option<String> {
    link_header?
        .split(',')
        .map(str::trim)
        .find(|directive| is_next_relation(directive))
        .and_then(link_target)
        .and_then(page_info_of)
}

fn is_next_relation(directive: &str) -> bool {
    directive
        .split(';')
        .skip(1)
        .map(str::trim)
        .any(|param| param == r#"rel="next""# || param == "rel=next")
}

/// The URL between `<` and `>` of one link directive.
fn link_target(directive: &str) -> Option<&str> {
    let (_, rest) = directive.split_once('<')?;
    let (target, _) = rest.split_once('>')?;
    (!target.is_empty()).then_some(target)
}

fn page_info_of(target: &str) -> Option<String> {
    let url = Url::parse(target).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "page_info")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
