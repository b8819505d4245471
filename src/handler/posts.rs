//! Blog post page handlers
//!
//! Each handler performs one store operation and turns the outcome into a
//! rendered page, a redirect to the listing, or an error response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::render;
use crate::store::{PostForm, StoreError};

/// `GET /`
pub async fn list_posts(state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    match state.store.posts().await {
        Ok(posts) => http::build_html_response(render::index_page(&posts), is_head),
        Err(e) => store_failure(&e),
    }
}

/// `GET /add`
pub fn show_add_form(is_head: bool) -> Response<Full<Bytes>> {
    http::build_html_response(render::add_page(), is_head)
}

/// `POST /add`
pub async fn create_post(state: &AppState, form: PostForm) -> Response<Full<Bytes>> {
    match state.store.create(form).await {
        Ok(post) => {
            logger::log_info(&format!("[Posts] Created post {} \"{}\"", post.id, post.title));
            http::build_redirect_response("/")
        }
        Err(e) => store_failure(&e),
    }
}

/// `GET /delete/{id}`; an unknown id still redirects
pub async fn delete_post(state: &AppState, id: i64) -> Response<Full<Bytes>> {
    match state.store.delete(id).await {
        Ok(true) => {
            logger::log_info(&format!("[Posts] Deleted post {id}"));
            http::build_redirect_response("/")
        }
        Ok(false) => {
            logger::log_debug(&format!("[Posts] Delete of unknown post {id} ignored"));
            http::build_redirect_response("/")
        }
        Err(e) => store_failure(&e),
    }
}

/// `GET /update/{id}`
pub async fn show_update_form(state: &AppState, id: i64, is_head: bool) -> Response<Full<Bytes>> {
    match state.store.fetch_by_id(id).await {
        Ok(Some(post)) => http::build_html_response(render::update_page(&post), is_head),
        Ok(None) => http::build_post_not_found_response(),
        Err(e) => store_failure(&e),
    }
}

/// `POST /update/{id}`
pub async fn apply_update(state: &AppState, id: i64, form: PostForm) -> Response<Full<Bytes>> {
    match state.store.update(id, form).await {
        Ok(Some(post)) => {
            logger::log_info(&format!("[Posts] Updated post {}", post.id));
            http::build_redirect_response("/")
        }
        Ok(None) => http::build_post_not_found_response(),
        Err(e) => store_failure(&e),
    }
}

/// `GET /readyz`: ready when the post file can be loaded
pub async fn readiness(state: &AppState) -> Response<Full<Bytes>> {
    match state.store.load().await {
        Ok(_) => http::build_text_response(StatusCode::OK, "ok"),
        Err(e) => {
            logger::log_warning(&format!("Readiness check failed: {e}"));
            http::build_text_response(StatusCode::SERVICE_UNAVAILABLE, "store unavailable")
        }
    }
}

fn store_failure(error: &StoreError) -> Response<Full<Bytes>> {
    logger::log_error(&error.to_string());
    http::build_500_response()
}
