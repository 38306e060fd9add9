//! Back-office dashboard route.

use axum::extract::State;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::routes::extract::{Json, Query};
use crate::routes::{ApiError, api_error};
use crate::services::dashboard::{self, DashboardSummary};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// `GET /api/dashboard/summary?from=YYYY-MM-DD&to=YYYY-MM-DD`
///
/// Both bounds default to today in the restaurant's offset; `to` defaults
/// to `from` when only `from` is given.
pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let offset = state.restaurant.utc_offset;
    let today = OffsetDateTime::now_utc().to_offset(offset).date();
    let from = match query.from.as_deref() {
        Some(raw) => dashboard::parse_date(raw).map_err(api_error)?,
        None => today,
    };
    let to = match query.to.as_deref() {
        Some(raw) => dashboard::parse_date(raw).map_err(api_error)?,
        None if query.from.is_some() => from,
        None => today,
    };
    Ok(Json(dashboard::summary(&state.pool, from, to, offset).await.map_err(api_error)?))
}
