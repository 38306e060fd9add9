//! Router assembly and HTTP error mapping.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API, the printable document endpoints and the
//! order feed websocket under a single Axum router. Handlers translate
//! between HTTP and the service layer; failures leave through [`ApiError`]
//! as `{ "code", "message" }` bodies.

pub mod cash_register;
pub mod customers;
pub mod dashboard;
pub mod employees;
pub mod extract;
pub mod menu;
pub mod orders;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post, put};
use serde::Serialize;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{ErrorClass, ErrorCode};
use crate::services::ticket::RenderedDocument;
use crate::state::AppState;

// =============================================================================
// ROUTER
// =============================================================================

/// All API and feed routes.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/orders", get(orders::list_orders).post(orders::create_order))
        .route("/api/orders/feed", get(ws::handle_ws))
        .route(
            "/api/orders/{id}",
            get(orders::get_order)
                .patch(orders::update_order)
                .delete(orders::delete_order),
        )
        .route("/api/orders/{id}/items", put(orders::replace_items))
        .route("/api/orders/{id}/status", post(orders::change_status))
        .route("/api/orders/{id}/advance", post(orders::advance))
        .route("/api/orders/{id}/ticket", get(orders::ticket))
        .route("/api/menu", get(menu::list_items).post(menu::create_item))
        .route("/api/menu/specials", get(menu::list_specials))
        .route("/api/menu/categories", get(menu::list_categories))
        .route(
            "/api/menu/{id}",
            get(menu::get_item).patch(menu::update_item).delete(menu::delete_item),
        )
        .route("/api/customers", get(customers::list_customers).post(customers::create_customer))
        .route(
            "/api/customers/{id}",
            get(customers::get_customer)
                .patch(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route("/api/customers/{id}/orders", get(customers::customer_orders))
        .route("/api/employees", get(employees::list_employees).post(employees::create_employee))
        .route(
            "/api/employees/{id}",
            get(employees::get_employee)
                .patch(employees::update_employee)
                .delete(employees::delete_employee),
        )
        .route("/api/cash-register", get(cash_register::list_closures))
        .route("/api/cash-register/open", post(cash_register::open_shift))
        .route("/api/cash-register/current", get(cash_register::current_shift))
        .route("/api/cash-register/{id}", get(cash_register::get_closure))
        .route("/api/cash-register/{id}/close", post(cash_register::close_shift))
        .route("/api/cash-register/{id}/report", get(cash_register::report))
        .route("/api/dashboard/summary", get(dashboard::summary))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// ERRORS
// =============================================================================

/// Error response body: `{ "code": "E_...", "message": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, body: ErrorBody { code: "E_VALIDATION", message: message.into() } }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[must_use]
pub fn status_for(class: ErrorClass) -> StatusCode {
    match class {
        ErrorClass::NotFound => StatusCode::NOT_FOUND,
        ErrorClass::Invalid => StatusCode::BAD_REQUEST,
        ErrorClass::Conflict => StatusCode::CONFLICT,
        ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map any service error to a response. Internal details are logged, not returned.
pub fn api_error<E: ErrorCode>(err: E) -> ApiError {
    let class = err.class();
    let code = err.error_code();
    let message = if class == ErrorClass::Internal {
        tracing::error!(code, error = %err, "request failed");
        "internal error".to_owned()
    } else {
        err.to_string()
    };
    ApiError { status: status_for(class), body: ErrorBody { code, message } }
}

/// Inline document response with a download file name.
pub fn document_response(doc: RenderedDocument) -> Response {
    (
        [
            (CONTENT_TYPE, doc.content_type.to_owned()),
            (CONTENT_DISPOSITION, format!("inline; filename=\"{}\"", doc.file_name)),
        ],
        doc.body,
    )
        .into_response()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
