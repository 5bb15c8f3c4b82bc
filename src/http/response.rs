//! HTTP response building module
//!
//! Provides builders for the status codes the brand server returns. A builder
//! failure is logged and degrades to an empty response instead of panicking.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::cache::CachePolicy;

pub type HttpResponse = Response<Full<Bytes>>;

/// Build a plain-text response with the given status
pub fn build_text_response(status: StatusCode, message: &str) -> HttpResponse {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(message.to_string())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from(message.to_string())))
        })
}

/// Build 400 Bad Request response
pub fn build_400_response(message: &str) -> HttpResponse {
    build_text_response(StatusCode::BAD_REQUEST, message)
}

/// Build 404 Not Found response
pub fn build_404_response(message: &str) -> HttpResponse {
    build_text_response(StatusCode::NOT_FOUND, message)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(allow: &str) -> HttpResponse {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Allow", allow)
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> HttpResponse {
    build_text_response(StatusCode::PAYLOAD_TOO_LARGE, "413 Payload Too Large")
}

/// Build 500 Internal Server Error response
///
/// The message is generic; store details go to the error log only.
pub fn build_500_response(message: &str) -> HttpResponse {
    build_text_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> HttpResponse {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("ETag", etag)
        .header("Cache-Control", CachePolicy::STATIC_ASSET.to_header_value())
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 302 redirect response
pub fn build_redirect_response(target: &str) -> HttpResponse {
    let body = format!("Found. Redirecting to {target}");
    Response::builder()
        .status(StatusCode::FOUND)
        .header("Location", target)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error("302", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build rendered HTML page response
pub fn build_html_response(content: String, is_head: bool) -> HttpResponse {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .header("Cache-Control", CachePolicy::NoStore.to_header_value())
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build static asset response with cache control
pub fn build_cached_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> HttpResponse {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("ETag", etag)
        .header("Cache-Control", CachePolicy::STATIC_ASSET.to_header_value())
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build JSON response (health probes)
pub fn build_json_response(status: StatusCode, value: &serde_json::Value) -> HttpResponse {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Cache-Control", CachePolicy::NoStore.to_header_value())
        .body(Full::new(Bytes::from(value.to_string())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
