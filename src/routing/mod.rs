//! Routing module
//!
//! Resolves request paths to the blog's fixed set of routes.

mod matcher;

pub use matcher::{match_route, Route, STYLESHEET_PATH};
