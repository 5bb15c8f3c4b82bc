//! Brand handlers
//!
//! Each handler makes exactly one repository call, then renders a view or
//! redirects to the list.

use crate::config::AppState;
use crate::http::{self, HttpResponse};
use crate::logger;
use crate::model::{BrandForm, BrandId};
use crate::repository::RepositoryError;
use crate::view;

const LIST_ROUTE: &str = "/";

/// GET /
pub async fn list(state: &AppState, is_head: bool) -> HttpResponse {
    match state.brands.list_all().await {
        Ok(brands) => http::build_html_response(view::render_list(&brands), is_head),
        Err(e) => failure("list brands", &e, "Server error"),
    }
}

/// POST /add
pub async fn add(state: &AppState, form: BrandForm) -> HttpResponse {
    match state.brands.create(&form.name, &form.description).await {
        Ok(brand) => {
            logger::log_debug(&format!("Created brand {}", brand.id));
            http::build_redirect_response(LIST_ROUTE)
        }
        Err(e) => failure("add brand", &e, "Error adding brand"),
    }
}

/// GET /edit/:id
pub async fn edit_form(state: &AppState, id: &BrandId, is_head: bool) -> HttpResponse {
    match state.brands.get_by_id(id).await {
        Ok(brand) => http::build_html_response(view::render_edit(&brand), is_head),
        Err(e) => failure("load brand", &e, "Server error"),
    }
}

/// POST /edit/:id
pub async fn update(state: &AppState, id: &BrandId, form: BrandForm) -> HttpResponse {
    match state
        .brands
        .update_by_id(id, &form.name, &form.description)
        .await
    {
        Ok(()) => http::build_redirect_response(LIST_ROUTE),
        Err(e) => failure("update brand", &e, "Error updating brand"),
    }
}

/// POST /delete/:id
pub async fn delete(state: &AppState, id: &BrandId) -> HttpResponse {
    match state.brands.delete_by_id(id).await {
        Ok(()) => http::build_redirect_response(LIST_ROUTE),
        Err(e) => failure("delete brand", &e, "Error deleting brand"),
    }
}

/// Map a repository error to 404 or a generic 500
fn failure(operation: &str, err: &RepositoryError, server_message: &str) -> HttpResponse {
    match err {
        RepositoryError::NotFound(id) => {
            logger::log_debug(&format!("Failed to {operation}: no brand with id '{id}'"));
            http::build_404_response("Brand not found")
        }
        RepositoryError::Store(_) => {
            logger::log_error(&format!("Failed to {operation}: {err}"));
            http::build_500_response(server_message)
        }
    }
}
