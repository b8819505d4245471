//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route matching, method
//! validation, dispatch to the post handlers, and access logging.

use crate::config::AppState;
use crate::handler::{form, posts, static_files};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{self, Route};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let access_log = state.config.logging.access_log;
    let entry = access_log.then(|| access_entry(&req, peer_addr));

    let mut response = route_request(req, &state).await;

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on path and method
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let Some(route) = routing::match_route(req.uri().path(), &state.config.health) else {
        return http::build_404_response();
    };

    let method = req.method().clone();
    if !route.accepts(&method) {
        logger::log_warning(&format!(
            "Method not allowed: {method} {}",
            req.uri().path()
        ));
        return http::build_405_response(route.allowed_methods());
    }
    let is_head = method == Method::HEAD;
    let is_post = method == Method::POST;
    let max_body_size = state.config.http.max_body_size;

    match route {
        Route::Index => posts::list_posts(state, is_head).await,
        Route::Add if is_post => match form::read_post_form(req, max_body_size).await {
            Ok(form) => posts::create_post(state, form).await,
            Err(resp) => resp,
        },
        Route::Add => posts::show_add_form(is_head),
        Route::Delete(id) => posts::delete_post(state, id).await,
        Route::Update(id) if is_post => match form::read_post_form(req, max_body_size).await {
            Ok(form) => posts::apply_update(state, id, form).await,
            Err(resp) => resp,
        },
        Route::Update(id) => posts::show_update_form(state, id, is_head).await,
        Route::Stylesheet => {
            let if_none_match = req
                .headers()
                .get("if-none-match")
                .and_then(|v| v.to_str().ok());
            static_files::serve_stylesheet(if_none_match, is_head)
        }
        Route::Liveness => http::build_text_response(StatusCode::OK, "ok"),
        Route::Readiness => posts::readiness(state).await,
    }
}

fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry
}
