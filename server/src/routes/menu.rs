//! Menu catalog routes.

use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use crate::routes::extract::{Json, Path, Query};
use crate::routes::{ApiError, api_error};
use crate::services::menu::{self, MenuFilter, MenuItem, MenuItemPatch, NewMenuItem};
use crate::state::AppState;

/// `GET /api/menu?category=&available=&daily_special=&limit=`
pub async fn list_items(
    State(state): State<AppState>,
    Query(filter): Query<MenuFilter>,
) -> Result<Json<Vec<MenuItem>>, ApiError> {
    Ok(Json(menu::list_menu_items(&state.pool, &filter).await.map_err(api_error)?))
}

/// `GET /api/menu/specials` — the reception view.
pub async fn list_specials(State(state): State<AppState>) -> Result<Json<Vec<MenuItem>>, ApiError> {
    Ok(Json(menu::list_daily_specials(&state.pool).await.map_err(api_error)?))
}

/// `GET /api/menu/categories`
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(menu::list_categories(&state.pool).await.map_err(api_error)?))
}

/// `POST /api/menu`
pub async fn create_item(
    State(state): State<AppState>,
    Json(body): Json<NewMenuItem>,
) -> Result<(StatusCode, Json<MenuItem>), ApiError> {
    let item = menu::create_menu_item(&state.pool, body).await.map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_item(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<MenuItem>, ApiError> {
    Ok(Json(menu::get_menu_item(&state.pool, id).await.map_err(api_error)?))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<MenuItemPatch>,
) -> Result<Json<MenuItem>, ApiError> {
    Ok(Json(menu::update_menu_item(&state.pool, id, body).await.map_err(api_error)?))
}

pub async fn delete_item(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    menu::delete_menu_item(&state.pool, id).await.map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}
