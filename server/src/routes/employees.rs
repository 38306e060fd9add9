//! Employee routes.

use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use crate::routes::extract::{Json, Path, Query};
use crate::routes::{ApiError, api_error};
use crate::services::employee::{self, Employee, EmployeePatch, NewEmployee};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListEmployeesQuery {
    pub active: Option<bool>,
}

/// `GET /api/employees?active=true`
pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<ListEmployeesQuery>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    Ok(Json(employee::list_employees(&state.pool, query.active).await.map_err(api_error)?))
}

pub async fn create_employee(
    State(state): State<AppState>,
    Json(body): Json<NewEmployee>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    let created = employee::create_employee(&state.pool, body).await.map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_employee(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Employee>, ApiError> {
    Ok(Json(employee::get_employee(&state.pool, id).await.map_err(api_error)?))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<EmployeePatch>,
) -> Result<Json<Employee>, ApiError> {
    Ok(Json(employee::update_employee(&state.pool, id, body).await.map_err(api_error)?))
}

pub async fn delete_employee(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    employee::delete_employee(&state.pool, id).await.map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}
