//! HTTP protocol layer module
//!
//! Response builders, caching helpers, MIME detection and form decoding,
//! kept apart from the brand handlers.

pub mod cache;
pub mod form;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_304_response, build_400_response, build_404_response, build_405_response,
    build_413_response, build_500_response, build_cached_response, build_html_response,
    build_json_response, build_redirect_response, HttpResponse,
};
