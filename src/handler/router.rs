//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: size checks, route resolution,
//! body collection and dispatch to the brand, health and static handlers.

use crate::config::{AppState, HealthConfig};
use crate::handler::{brands, static_files};
use crate::http::{self, HttpResponse};
use crate::logger;
use crate::model::{BrandForm, BrandId};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// A resolved application route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ListBrands,
    AddBrand,
    EditForm(BrandId),
    UpdateBrand(BrandId),
    DeleteBrand(BrandId),
    Liveness,
    Readiness,
    Static,
}

/// Outcome of matching method and path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch {
    Found(Route),
    /// Path exists but not for this method; carries the `Allow` value
    MethodNotAllowed(&'static str),
    NotFound,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<HttpResponse, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let max_body_size = state.config.http.max_body_size;

    // 1. Check body size
    if let Some(resp) = check_body_size(&req, max_body_size) {
        return Ok(resp);
    }

    // 2. Resolve route
    let route = match resolve(req.method(), req.uri().path(), &state.config.health) {
        RouteMatch::Found(route) => route,
        RouteMatch::MethodNotAllowed(allow) => {
            logger::log_warning(&format!(
                "Method not allowed: {} {}",
                req.method(),
                req.uri().path()
            ));
            return Ok(http::build_405_response(allow));
        }
        RouteMatch::NotFound => return Ok(http::build_404_response("404 Not Found")),
    };
    logger::log_debug(&format!("{} {} -> {route:?}", req.method(), req.uri().path()));

    let is_head = *req.method() == Method::HEAD;

    // 3. Dispatch
    let response = match route {
        Route::ListBrands => brands::list(&state, is_head).await,
        Route::EditForm(id) => brands::edit_form(&state, &id, is_head).await,
        Route::DeleteBrand(id) => brands::delete(&state, &id).await,
        Route::AddBrand => match read_form(req, max_body_size).await {
            Ok(form) => brands::add(&state, form).await,
            Err(resp) => resp,
        },
        Route::UpdateBrand(id) => match read_form(req, max_body_size).await {
            Ok(form) => brands::update(&state, &id, form).await,
            Err(resp) => resp,
        },
        Route::Liveness => http::response::build_text_response(StatusCode::OK, "ok"),
        Route::Readiness => readiness(&state).await,
        Route::Static => {
            let ctx = RequestContext {
                path: req.uri().path(),
                is_head,
                if_none_match: req
                    .headers()
                    .get("if-none-match")
                    .and_then(|v| v.to_str().ok())
                    .map(ToString::to_string),
            };
            static_files::serve(&ctx, &state.config.static_files).await
        }
    };

    Ok(response)
}

/// Match method and path against the application routes
pub fn resolve(method: &Method, path: &str, health: &HealthConfig) -> RouteMatch {
    let is_read = *method == Method::GET || *method == Method::HEAD;
    let is_post = *method == Method::POST;

    if health.enabled && (path == health.liveness_path || path == health.readiness_path) {
        if !is_read {
            return RouteMatch::MethodNotAllowed("GET, HEAD");
        }
        return RouteMatch::Found(if path == health.liveness_path {
            Route::Liveness
        } else {
            Route::Readiness
        });
    }

    // Express-style: a single trailing slash is ignored
    let trimmed = if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    };
    let segments: Vec<&str> = trimmed.trim_start_matches('/').split('/').collect();

    match segments.as_slice() {
        [""] if is_read => RouteMatch::Found(Route::ListBrands),
        [""] => RouteMatch::MethodNotAllowed("GET, HEAD"),
        ["add"] if is_post => RouteMatch::Found(Route::AddBrand),
        ["edit", id] if !id.is_empty() => match decode_id(id) {
            Some(id) if is_read => RouteMatch::Found(Route::EditForm(id)),
            Some(id) if is_post => RouteMatch::Found(Route::UpdateBrand(id)),
            Some(_) => RouteMatch::MethodNotAllowed("GET, HEAD, POST"),
            None => RouteMatch::NotFound,
        },
        ["delete", id] if !id.is_empty() => match decode_id(id) {
            Some(id) if is_post => RouteMatch::Found(Route::DeleteBrand(id)),
            Some(_) => RouteMatch::MethodNotAllowed("POST"),
            None => RouteMatch::NotFound,
        },
        // Anything else may be a static asset; /add with GET falls through too
        _ if is_read => RouteMatch::Found(Route::Static),
        ["add"] => RouteMatch::MethodNotAllowed("POST"),
        _ => RouteMatch::NotFound,
    }
}

fn decode_id(segment: &str) -> Option<BrandId> {
    urlencoding::decode(segment)
        .ok()
        .map(|id| BrandId::new(id.into_owned()))
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<HttpResponse> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Collect the body (bounded) and decode the brand form
async fn read_form<B>(req: Request<B>, max_body_size: u64) -> Result<BrandForm, HttpResponse>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let body = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_error(&format!("Request body exceeded {max_body_size} bytes"));
            return Err(http::build_413_response());
        }
        Err(e) => {
            logger::log_error(&format!("Failed to read request body: {e}"));
            return Err(http::build_400_response("Invalid request body"));
        }
    };

    BrandForm::from_urlencoded(&body).map_err(|e| {
        logger::log_warning(&format!("Rejected brand form: {e}"));
        http::build_400_response(&e.to_string())
    })
}

/// Readiness probe: healthy only when the store answers a ping
async fn readiness(state: &AppState) -> HttpResponse {
    match state.brands.ping().await {
        Ok(()) => http::build_json_response(
            StatusCode::OK,
            &serde_json::json!({ "status": "ok" }),
        ),
        Err(e) => {
            logger::log_error(&format!("Readiness check failed: {e}"));
            http::build_json_response(
                StatusCode::SERVICE_UNAVAILABLE,
                &serde_json::json!({ "status": "unavailable" }),
            )
        }
    }
}
