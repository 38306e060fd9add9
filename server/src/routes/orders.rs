//! Order routes: CRUD, workflow moves, printable tickets.
//!
//! Every successful mutation is published on the order feed after the
//! database write commits.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use serde::Deserialize;
use time::{Date, OffsetDateTime, UtcOffset};
use tickets::{TicketFormat, TicketKind};
use uuid::Uuid;

use crate::routes::extract::{Json, Path, Query};
use crate::routes::{ApiError, api_error, document_response};
use crate::services::dashboard;
use crate::services::feed::{self, OrderEvent};
use crate::services::order::{self, NewOrder, NewOrderItem, Order, OrderFilter, OrderPatch, OrderSource};
use crate::services::ticket;
use crate::services::workflow::OrderStatus;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<String>,
    pub source: Option<String>,
    pub customer_id: Option<Uuid>,
    /// First local day, `YYYY-MM-DD`.
    pub from: Option<String>,
    /// Last local day (inclusive), `YYYY-MM-DD`.
    pub to: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceItemsBody {
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TicketQuery {
    pub kind: Option<String>,
    pub format: Option<String>,
}

pub(crate) fn parse_status(raw: &str) -> Result<OrderStatus, ApiError> {
    OrderStatus::from_str(raw.trim()).ok_or_else(|| ApiError::bad_request(format!("unknown order status: {raw}")))
}

fn parse_source(raw: &str) -> Result<OrderSource, ApiError> {
    OrderSource::from_str(raw.trim()).ok_or_else(|| ApiError::bad_request(format!("unknown order source: {raw}")))
}

fn parse_day(raw: Option<&str>) -> Result<Option<Date>, ApiError> {
    raw.map(|raw| dashboard::parse_date(raw).map_err(api_error)).transpose()
}

fn local_midnight(day: Date, offset: UtcOffset) -> OffsetDateTime {
    day.midnight().assume_offset(offset)
}

/// Translate query-string filters into a service filter.
///
/// # Errors
///
/// Returns a 400 for unknown enum values, malformed days or a reversed range.
pub(crate) fn order_filter(query: &ListOrdersQuery, offset: UtcOffset) -> Result<OrderFilter, ApiError> {
    let status = query.status.as_deref().map(parse_status).transpose()?;
    let source = query.source.as_deref().map(parse_source).transpose()?;
    let from = parse_day(query.from.as_deref())?;
    let to = parse_day(query.to.as_deref())?;

    let (created_from, created_to) = match (from, to) {
        (Some(from), Some(to)) => {
            let (start, end) = dashboard::local_day_bounds(from, to, offset).map_err(api_error)?;
            (Some(start), Some(end))
        }
        (Some(from), None) => (Some(local_midnight(from, offset)), None),
        (None, Some(to)) => {
            let end = to.next_day().ok_or_else(|| ApiError::bad_request(format!("date out of range: {to}")))?;
            (None, Some(local_midnight(end, offset)))
        }
        (None, None) => (None, None),
    };

    Ok(OrderFilter { status, source, customer_id: query.customer_id, created_from, created_to, limit: query.limit })
}

/// Parse `kind` and `format`, defaulting to a plain-text receipt.
///
/// # Errors
///
/// Returns a 400 for unknown values.
pub(crate) fn ticket_options(query: &TicketQuery) -> Result<(TicketKind, TicketFormat), ApiError> {
    let kind = match query.kind.as_deref() {
        Some(raw) => raw.parse().map_err(|e: tickets::TicketError| ApiError::bad_request(e.to_string()))?,
        None => TicketKind::default(),
    };
    let format = match query.format.as_deref() {
        Some(raw) => raw.parse().map_err(|e: tickets::TicketError| ApiError::bad_request(e.to_string()))?,
        None => TicketFormat::default(),
    };
    Ok((kind, format))
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/orders` — newest first.
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let filter = order_filter(&query, state.restaurant.utc_offset)?;
    let orders = order::list_orders(&state.pool, &filter).await.map_err(api_error)?;
    Ok(Json(orders))
}

/// `POST /api/orders`
pub async fn create_order(
    State(state): State<AppState>,
    Json(body): Json<NewOrder>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = order::create_order(&state.pool, body).await.map_err(api_error)?;
    feed::publish(&state.feed, OrderEvent::created(&order));
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /api/orders/{id}`
pub async fn get_order(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Order>, ApiError> {
    let order = order::get_order(&state.pool, id).await.map_err(api_error)?;
    Ok(Json(order))
}

/// `PATCH /api/orders/{id}` — customer, address, payment and notes.
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<OrderPatch>,
) -> Result<Json<Order>, ApiError> {
    let order = order::update_order_details(&state.pool, id, body).await.map_err(api_error)?;
    feed::publish(&state.feed, OrderEvent::updated(&order));
    Ok(Json(order))
}

/// `PUT /api/orders/{id}/items` — pending orders only.
pub async fn replace_items(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ReplaceItemsBody>,
) -> Result<Json<Order>, ApiError> {
    let order = order::replace_items(&state.pool, id, body.items).await.map_err(api_error)?;
    feed::publish(&state.feed, OrderEvent::updated(&order));
    Ok(Json(order))
}

/// `POST /api/orders/{id}/status` — body `{ "status": "ready" }`.
pub async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Order>, ApiError> {
    let to = parse_status(&body.status)?;
    let change = order::change_status(&state.pool, id, to).await.map_err(api_error)?;
    if change.changed {
        feed::publish(&state.feed, OrderEvent::status_changed(&change.order));
    }
    Ok(Json(change.order))
}

/// `POST /api/orders/{id}/advance` — one step forward.
pub async fn advance(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Order>, ApiError> {
    let change = order::advance(&state.pool, id).await.map_err(api_error)?;
    if change.changed {
        feed::publish(&state.feed, OrderEvent::status_changed(&change.order));
    }
    Ok(Json(change.order))
}

/// `DELETE /api/orders/{id}`
pub async fn delete_order(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    order::delete_order(&state.pool, id).await.map_err(api_error)?;
    feed::publish(&state.feed, OrderEvent::deleted(id));
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/orders/{id}/ticket?kind=receipt|kitchen&format=text|html|pdf`
pub async fn ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<TicketQuery>,
) -> Result<Response, ApiError> {
    let (kind, format) = ticket_options(&query)?;
    let order = order::get_order(&state.pool, id).await.map_err(api_error)?;
    let doc = ticket::render_order(&order, kind, format, &state.restaurant);
    tracing::info!(order_id = %id, ?kind, ?format, bytes = doc.body.len(), "ticket rendered");
    Ok(document_response(doc))
}

#[cfg(test)]
#[path = "orders_test.rs"]
mod tests;
