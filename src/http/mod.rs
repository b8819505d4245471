//! HTTP protocol layer module
//!
//! Response builders and conditional-request helpers, independent of the
//! blog pages that use them.

pub mod cache;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_500_response, build_cached_response, build_html_response, build_post_not_found_response,
    build_redirect_response, build_text_response,
};
