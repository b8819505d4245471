//! Route matching module
//!
//! Maps a request path to a typed [`Route`], parsing the post id out of
//! `/delete/{id}` and `/update/{id}`.

use hyper::Method;

use crate::config::HealthConfig;

/// Path of the shared page stylesheet
pub const STYLESHEET_PATH: &str = "/static/style.css";

/// Every path the server answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Index,
    Add,
    Delete(i64),
    Update(i64),
    Stylesheet,
    Liveness,
    Readiness,
}

impl Route {
    /// Value of the `Allow` header for this route
    pub const fn allowed_methods(self) -> &'static str {
        match self {
            Self::Add | Self::Update(_) => "GET, HEAD, POST",
            _ => "GET, HEAD",
        }
    }

    pub fn accepts(self, method: &Method) -> bool {
        match method {
            &Method::GET | &Method::HEAD => true,
            &Method::POST => matches!(self, Self::Add | Self::Update(_)),
            _ => false,
        }
    }
}

/// Find the route for `path`, or `None` when nothing matches
pub fn match_route(path: &str, health: &HealthConfig) -> Option<Route> {
    // Health check endpoints take priority over page routes
    if health.enabled {
        if path == health.liveness_path {
            return Some(Route::Liveness);
        }
        if path == health.readiness_path {
            return Some(Route::Readiness);
        }
    }

    match path {
        "/" => Some(Route::Index),
        "/add" => Some(Route::Add),
        STYLESHEET_PATH => Some(Route::Stylesheet),
        _ => {
            if let Some(id) = path.strip_prefix("/delete/") {
                return parse_id(id).map(Route::Delete);
            }
            if let Some(id) = path.strip_prefix("/update/") {
                return parse_id(id).map(Route::Update);
            }
            None
        }
    }
}

/// Unsigned decimal only: signs, whitespace and trailing segments are rejected,
/// as are values beyond the largest storable id
fn parse_id(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}
