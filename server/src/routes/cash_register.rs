//! Cash register shift routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use serde::Deserialize;
use tickets::TicketFormat;
use uuid::Uuid;

use crate::routes::extract::{Json, Path, Query};
use crate::routes::{ApiError, api_error, document_response};
use crate::services::cash_register::{self, CashRegisterClosure, CloseShift, OpenShift};
use crate::services::ticket;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub format: Option<String>,
}

/// `GET /api/cash-register` — shifts, newest first.
pub async fn list_closures(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CashRegisterClosure>>, ApiError> {
    Ok(Json(cash_register::list_closures(&state.pool, query.limit).await.map_err(api_error)?))
}

/// `POST /api/cash-register/open` — 409 while another shift is open.
pub async fn open_shift(
    State(state): State<AppState>,
    Json(body): Json<OpenShift>,
) -> Result<(StatusCode, Json<CashRegisterClosure>), ApiError> {
    let shift = cash_register::open_shift(&state.pool, body).await.map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(shift)))
}

/// `GET /api/cash-register/current` — 404 when no shift is open.
pub async fn current_shift(State(state): State<AppState>) -> Result<Json<CashRegisterClosure>, ApiError> {
    Ok(Json(cash_register::current_shift(&state.pool).await.map_err(api_error)?))
}

pub async fn get_closure(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CashRegisterClosure>, ApiError> {
    Ok(Json(cash_register::get_closure(&state.pool, id).await.map_err(api_error)?))
}

/// `POST /api/cash-register/{id}/close` — body `{ "counted_cash_cents": 12345 }`.
pub async fn close_shift(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<CloseShift>,
) -> Result<Json<CashRegisterClosure>, ApiError> {
    Ok(Json(cash_register::close_shift(&state.pool, id, body).await.map_err(api_error)?))
}

/// `GET /api/cash-register/{id}/report?format=text|html|pdf`
pub async fn report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let format = match query.format.as_deref() {
        Some(raw) => raw.parse::<TicketFormat>().map_err(|e| ApiError::bad_request(e.to_string()))?,
        None => TicketFormat::default(),
    };
    let closure = cash_register::get_closure(&state.pool, id).await.map_err(api_error)?;
    let doc = ticket::render_closure(&state.pool, &closure, format, &state.restaurant)
        .await
        .map_err(api_error)?;
    Ok(document_response(doc))
}
