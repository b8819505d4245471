//! Request handler module
//!
//! Request routing dispatch and the blog's page handlers.

mod form;
mod posts;
pub mod router;
mod static_files;

// Re-export main entry point
pub use router::handle_request;
