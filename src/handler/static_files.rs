//! Embedded asset serving

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::sync::OnceLock;

use crate::http::{self, cache};
use crate::render::STYLESHEET;

static STYLESHEET_ETAG: OnceLock<String> = OnceLock::new();

/// Serve the page stylesheet, honoring `If-None-Match`
pub fn serve_stylesheet(if_none_match: Option<&str>, is_head: bool) -> Response<Full<Bytes>> {
    let etag = STYLESHEET_ETAG.get_or_init(|| cache::generate_etag(STYLESHEET.as_bytes()));

    if cache::check_etag_match(if_none_match, etag) {
        return http::build_304_response(etag);
    }

    http::build_cached_response(
        Bytes::from_static(STYLESHEET.as_bytes()),
        "text/css; charset=utf-8",
        etag,
        is_head,
    )
}
