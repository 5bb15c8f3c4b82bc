//! Request handler module
//!
//! Routes requests to the brand handlers, health probes, and the static
//! asset directory.

pub mod brands;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
