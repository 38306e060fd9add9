//! Customer routes.

use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use crate::routes::extract::{Json, Path, Query};
use crate::routes::{ApiError, api_error};
use crate::services::customer::{self, Customer, CustomerPatch, CustomerQuery, NewCustomer};
use crate::services::order::{self, Order, OrderFilter};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// `GET /api/customers?q=&limit=`
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<CustomerQuery>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    Ok(Json(customer::list_customers(&state.pool, &query).await.map_err(api_error)?))
}

/// `POST /api/customers`
pub async fn create_customer(
    State(state): State<AppState>,
    Json(body): Json<NewCustomer>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let created = customer::create_customer(&state.pool, body).await.map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_customer(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Customer>, ApiError> {
    Ok(Json(customer::get_customer(&state.pool, id).await.map_err(api_error)?))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<CustomerPatch>,
) -> Result<Json<Customer>, ApiError> {
    Ok(Json(customer::update_customer(&state.pool, id, body).await.map_err(api_error)?))
}

/// `DELETE /api/customers/{id}` — orders keep their name snapshot.
pub async fn delete_customer(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    customer::delete_customer(&state.pool, id).await.map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/customers/{id}/orders` — order history, newest first.
pub async fn customer_orders(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<Order>>, ApiError> {
    customer::get_customer(&state.pool, id).await.map_err(api_error)?;
    let filter = OrderFilter { customer_id: Some(id), limit: query.limit, ..OrderFilter::default() };
    Ok(Json(order::list_orders(&state.pool, &filter).await.map_err(api_error)?))
}
