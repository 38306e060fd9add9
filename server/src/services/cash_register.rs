//! Cash register shifts and closures.
//!
//! DESIGN
//! ======
//! A shift opens with a counted float and closes with a counted drawer.
//! Expected cash is the float plus the totals of cash-paid, non-cancelled
//! orders created while the shift was open; the difference is what the
//! drawer is over (positive) or short (negative). Both figures are frozen
//! on the row when the shift closes.
//!
//! A partial unique index allows only one open shift. A second open and a
//! second close both report [`CashRegisterError::Conflict`].

use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{ErrorClass, ErrorCode};
use crate::services::fields;

const DEFAULT_LIST_LIMIT: i64 = 30;
const MAX_LIST_LIMIT: i64 = 365;

const CLOSURE_COLUMNS: &str = "id, employee_id, opened_at, closed_at, opening_cash_cents, counted_cash_cents, \
     expected_cash_cents, difference_cents, notes";

#[derive(Debug, thiserror::Error)]
pub enum CashRegisterError {
    #[error("cash register shift not found: {0}")]
    NotFound(Uuid),
    #[error("no cash register shift is open")]
    NoOpenShift,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ErrorCode for CashRegisterError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_SHIFT_NOT_FOUND",
            Self::NoOpenShift => "E_NO_OPEN_SHIFT",
            Self::Validation(_) => "E_VALIDATION",
            Self::Conflict(_) => "E_CONFLICT",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound(_) | Self::NoOpenShift => ErrorClass::NotFound,
            Self::Validation(_) => ErrorClass::Invalid,
            Self::Conflict(_) => ErrorClass::Conflict,
            Self::Database(_) => ErrorClass::Internal,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CashRegisterClosure {
    pub id: Uuid,
    pub employee_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub opened_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub closed_at: Option<OffsetDateTime>,
    pub opening_cash_cents: i64,
    pub counted_cash_cents: Option<i64>,
    pub expected_cash_cents: Option<i64>,
    pub difference_cents: Option<i64>,
    pub notes: Option<String>,
}

impl CashRegisterClosure {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenShift {
    pub employee_id: Option<Uuid>,
    pub opening_cash_cents: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloseShift {
    pub counted_cash_cents: i64,
    pub notes: Option<String>,
}

/// Expected drawer and over/short amount at close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftFigures {
    pub expected_cash_cents: i64,
    pub difference_cents: i64,
}

/// # Errors
///
/// Returns [`CashRegisterError::Validation`] on overflow.
pub fn shift_figures(
    opening_cash_cents: i64,
    cash_sales_cents: i64,
    counted_cash_cents: i64,
) -> Result<ShiftFigures, CashRegisterError> {
    let overflow = || CashRegisterError::Validation("cash amounts out of range".into());
    let expected_cash_cents = opening_cash_cents.checked_add(cash_sales_cents).ok_or_else(overflow)?;
    let difference_cents = counted_cash_cents.checked_sub(expected_cash_cents).ok_or_else(overflow)?;
    Ok(ShiftFigures { expected_cash_cents, difference_cents })
}

/// Sum of cash-paid, non-cancelled order totals created in `[from, to)`.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn cash_sales<'e>(
    executor: impl PgExecutor<'e>,
    from: OffsetDateTime,
    to: OffsetDateTime,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(total_cents), 0)::BIGINT FROM orders
         WHERE payment_method = 'cash' AND status <> 'cancelled'
           AND created_at >= $1 AND created_at < $2",
    )
    .bind(from)
    .bind(to)
    .fetch_one(executor)
    .await
}

/// Open a new shift.
///
/// # Errors
///
/// Returns [`CashRegisterError::Conflict`] when a shift is already open and
/// [`CashRegisterError::Validation`] for an unknown `employee_id`.
pub async fn open_shift(pool: &PgPool, input: OpenShift) -> Result<CashRegisterClosure, CashRegisterError> {
    let opening =
        fields::non_negative("opening_cash_cents", input.opening_cash_cents).map_err(CashRegisterError::Validation)?;

    let closure = sqlx::query_as::<_, CashRegisterClosure>(&format!(
        "INSERT INTO cash_register_closures (id, employee_id, opening_cash_cents, notes)
         VALUES ($1, $2, $3, $4)
         RETURNING {CLOSURE_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(input.employee_id)
    .bind(opening)
    .bind(fields::clean(input.notes))
    .fetch_one(pool)
    .await
    .map_err(|err| match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            CashRegisterError::Conflict("a cash register shift is already open".into())
        }
        other => match fields::unknown_reference(&other) {
            Some(message) => CashRegisterError::Validation(message),
            None => CashRegisterError::Database(other),
        },
    })?;

    tracing::info!(shift_id = %closure.id, opening_cash_cents = opening, "cash register shift opened");
    Ok(closure)
}

/// Close an open shift, freezing expected cash and the difference.
///
/// # Errors
///
/// Returns not-found, validation, conflict (already closed) or database errors.
pub async fn close_shift(
    pool: &PgPool,
    id: Uuid,
    input: CloseShift,
) -> Result<CashRegisterClosure, CashRegisterError> {
    let counted =
        fields::non_negative("counted_cash_cents", input.counted_cash_cents).map_err(CashRegisterError::Validation)?;

    let mut tx = pool.begin().await?;
    let shift = sqlx::query_as::<_, CashRegisterClosure>(&format!(
        "SELECT {CLOSURE_COLUMNS} FROM cash_register_closures WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(CashRegisterError::NotFound(id))?;
    if !shift.is_open() {
        return Err(CashRegisterError::Conflict(format!("cash register shift {id} is already closed")));
    }

    let closed_at = OffsetDateTime::now_utc();
    let sales = cash_sales(&mut *tx, shift.opened_at, closed_at).await?;
    let figures = shift_figures(shift.opening_cash_cents, sales, counted)?;
    let notes = fields::merge(shift.notes, input.notes);

    let closure = sqlx::query_as::<_, CashRegisterClosure>(&format!(
        "UPDATE cash_register_closures
         SET closed_at = $2, counted_cash_cents = $3, expected_cash_cents = $4,
             difference_cents = $5, notes = $6
         WHERE id = $1
         RETURNING {CLOSURE_COLUMNS}"
    ))
    .bind(id)
    .bind(closed_at)
    .bind(counted)
    .bind(figures.expected_cash_cents)
    .bind(figures.difference_cents)
    .bind(&notes)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    tracing::info!(
        shift_id = %id,
        expected_cash_cents = figures.expected_cash_cents,
        difference_cents = figures.difference_cents,
        "cash register shift closed"
    );
    Ok(closure)
}

/// The open shift, if any.
///
/// # Errors
///
/// Returns [`CashRegisterError::NoOpenShift`] when every shift is closed.
pub async fn current_shift(pool: &PgPool) -> Result<CashRegisterClosure, CashRegisterError> {
    sqlx::query_as::<_, CashRegisterClosure>(&format!(
        "SELECT {CLOSURE_COLUMNS} FROM cash_register_closures WHERE closed_at IS NULL"
    ))
    .fetch_optional(pool)
    .await?
    .ok_or(CashRegisterError::NoOpenShift)
}

/// Shifts newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_closures(pool: &PgPool, limit: Option<i64>) -> Result<Vec<CashRegisterClosure>, CashRegisterError> {
    Ok(sqlx::query_as::<_, CashRegisterClosure>(&format!(
        "SELECT {CLOSURE_COLUMNS} FROM cash_register_closures ORDER BY opened_at DESC LIMIT $1"
    ))
    .bind(fields::limit(limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT))
    .fetch_all(pool)
    .await?)
}

/// # Errors
///
/// Returns [`CashRegisterError::NotFound`] when the id is unknown.
pub async fn get_closure(pool: &PgPool, id: Uuid) -> Result<CashRegisterClosure, CashRegisterError> {
    sqlx::query_as::<_, CashRegisterClosure>(&format!(
        "SELECT {CLOSURE_COLUMNS} FROM cash_register_closures WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(CashRegisterError::NotFound(id))
}

#[cfg(test)]
#[path = "cash_register_test.rs"]
mod tests;
