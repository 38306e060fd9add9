//! Customer service — CRUD plus aggregate spend.
//!
//! `total_spent_cents`, `order_count` and `last_order_at` are derived from
//! the customer's non-cancelled orders. They are recomputed in one statement
//! whenever one of those orders is created, changes status or is deleted,
//! rather than incremented. The recompute runs under a lock on the customer
//! row, so concurrent order writes for one customer are serialized.

use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgExecutor, PgPool, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{ErrorClass, ErrorCode};
use crate::services::fields;

const DEFAULT_LIST_LIMIT: i64 = 100;
const MAX_LIST_LIMIT: i64 = 500;

const CUSTOMER_COLUMNS: &str =
    "id, name, phone, email, address, notes, total_spent_cents, order_count, last_order_at, created_at";

#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    #[error("customer not found: {0}")]
    NotFound(Uuid),
    #[error("{0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ErrorCode for CustomerError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_CUSTOMER_NOT_FOUND",
            Self::Validation(_) => "E_VALIDATION",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound(_) => ErrorClass::NotFound,
            Self::Validation(_) => ErrorClass::Invalid,
            Self::Database(_) => ErrorClass::Internal,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub total_spent_cents: i64,
    pub order_count: i64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_order_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerQuery {
    /// Case-insensitive substring of name or phone.
    pub q: Option<String>,
    pub limit: Option<i64>,
}

impl NewCustomer {
    /// # Errors
    ///
    /// Returns [`CustomerError::Validation`] for a blank name or malformed email.
    pub fn validate(self) -> Result<Self, CustomerError> {
        let email = fields::clean(self.email);
        fields::check_email(email.as_deref()).map_err(CustomerError::Validation)?;
        Ok(Self {
            name: fields::required("name", &self.name).map_err(CustomerError::Validation)?,
            phone: fields::clean(self.phone),
            email,
            address: fields::clean(self.address),
            notes: fields::clean(self.notes),
        })
    }
}

impl CustomerPatch {
    /// # Errors
    ///
    /// Returns [`CustomerError::Validation`] when the patched customer breaks an invariant.
    pub fn apply(self, customer: &mut Customer) -> Result<(), CustomerError> {
        if let Some(name) = self.name {
            customer.name = fields::required("name", &name).map_err(CustomerError::Validation)?;
        }
        let email = fields::merge(customer.email.take(), self.email);
        fields::check_email(email.as_deref()).map_err(CustomerError::Validation)?;
        customer.email = email;
        customer.phone = fields::merge(customer.phone.take(), self.phone);
        customer.address = fields::merge(customer.address.take(), self.address);
        customer.notes = fields::merge(customer.notes.take(), self.notes);
        Ok(())
    }
}

/// Escape `LIKE` wildcards so user input matches literally.
#[must_use]
pub fn like_pattern(query: &str) -> String {
    let mut out = String::with_capacity(query.len() + 2);
    out.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

// =============================================================================
// CRUD
// =============================================================================

/// # Errors
///
/// Returns a validation error for bad input or a database error if the insert fails.
pub async fn create_customer(pool: &PgPool, input: NewCustomer) -> Result<Customer, CustomerError> {
    let input = input.validate()?;
    let customer = sqlx::query_as::<_, Customer>(&format!(
        "INSERT INTO customers (id, name, phone, email, address, notes)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {CUSTOMER_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&input.name)
    .bind(&input.phone)
    .bind(&input.email)
    .bind(&input.address)
    .bind(&input.notes)
    .fetch_one(pool)
    .await?;

    tracing::info!(customer_id = %customer.id, "customer created");
    Ok(customer)
}

/// List customers by name, optionally filtered by a name/phone search.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_customers(pool: &PgPool, query: &CustomerQuery) -> Result<Vec<Customer>, CustomerError> {
    let mut builder = QueryBuilder::new(format!("SELECT {CUSTOMER_COLUMNS} FROM customers"));
    if let Some(q) = fields::clean(query.q.clone()) {
        let pattern = like_pattern(&q);
        builder.push(" WHERE name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR phone ILIKE ");
        builder.push_bind(pattern);
    }
    builder.push(" ORDER BY name ASC LIMIT ");
    builder.push_bind(fields::limit(query.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT));

    Ok(builder.build_query_as::<Customer>().fetch_all(pool).await?)
}

/// # Errors
///
/// Returns [`CustomerError::NotFound`] when the id is unknown.
pub async fn get_customer(pool: &PgPool, id: Uuid) -> Result<Customer, CustomerError> {
    sqlx::query_as::<_, Customer>(&format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(CustomerError::NotFound(id))
}

/// # Errors
///
/// Returns not-found, validation or database errors.
pub async fn update_customer(pool: &PgPool, id: Uuid, patch: CustomerPatch) -> Result<Customer, CustomerError> {
    let mut customer = get_customer(pool, id).await?;
    patch.apply(&mut customer)?;

    let customer = sqlx::query_as::<_, Customer>(&format!(
        "UPDATE customers
         SET name = $2, phone = $3, email = $4, address = $5, notes = $6
         WHERE id = $1
         RETURNING {CUSTOMER_COLUMNS}"
    ))
    .bind(id)
    .bind(&customer.name)
    .bind(&customer.phone)
    .bind(&customer.email)
    .bind(&customer.address)
    .bind(&customer.notes)
    .fetch_optional(pool)
    .await?
    .ok_or(CustomerError::NotFound(id))?;

    tracing::info!(customer_id = %id, "customer updated");
    Ok(customer)
}

/// Delete a customer. Their orders keep the name snapshot and lose the link.
///
/// # Errors
///
/// Returns [`CustomerError::NotFound`] when nothing was deleted.
pub async fn delete_customer(pool: &PgPool, id: Uuid) -> Result<(), CustomerError> {
    let result = sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(CustomerError::NotFound(id));
    }
    tracing::info!(customer_id = %id, "customer deleted");
    Ok(())
}

/// Recompute a customer's aggregates from their non-cancelled orders.
///
/// The customer row is locked by its own statement first. Under READ
/// COMMITTED the recompute then reads a snapshot taken after any concurrent
/// order transaction for the same customer has committed. `NO KEY UPDATE`
/// leaves the `KEY SHARE` locks held by order foreign keys compatible, so two
/// concurrent order inserts cannot deadlock here.
///
/// # Errors
///
/// Returns a database error if the update fails.
pub async fn refresh_stats(conn: &mut PgConnection, customer_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1 FROM customers WHERE id = $1 FOR NO KEY UPDATE")
        .bind(customer_id)
        .fetch_optional(&mut *conn)
        .await?;

    sqlx::query(
        "UPDATE customers c
         SET total_spent_cents = s.total, order_count = s.cnt, last_order_at = s.last_at
         FROM (
             SELECT COALESCE(SUM(total_cents), 0)::BIGINT AS total,
                    COUNT(*) AS cnt,
                    MAX(created_at) AS last_at
             FROM orders
             WHERE customer_id = $1 AND status <> 'cancelled'
         ) s
         WHERE c.id = $1",
    )
    .bind(customer_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Name, phone and address used to prefill an order for a known customer.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn contact_details<'e>(
    executor: impl PgExecutor<'e>,
    customer_id: Uuid,
) -> Result<Option<(String, Option<String>, Option<String>)>, sqlx::Error> {
    sqlx::query_as::<_, (String, Option<String>, Option<String>)>(
        "SELECT name, phone, address FROM customers WHERE id = $1",
    )
    .bind(customer_id)
    .fetch_optional(executor)
    .await
}

#[cfg(test)]
#[path = "customer_test.rs"]
mod tests;
