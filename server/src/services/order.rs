//! Order service — creation, item edits, detail edits, status changes.
//!
//! DESIGN
//! ======
//! An order row carries a snapshot of everything printed on its tickets:
//! the customer's name and phone, and each line's name and unit price. Edits
//! to menu items or customers afterwards never rewrite existing orders.
//!
//! Totals are always computed here from the priced lines. Creation and item
//! replacement run in one transaction so the order row, its lines and its
//! total change together.
//!
//! Status writes are guarded by the status observed when the request was
//! validated (`WHERE status = $from`). A concurrent change in between
//! surfaces as [`OrderError::Conflict`] instead of writing an illegal move.
//!
//! After every change that can affect a customer's aggregates (create, item
//! replacement, status change, delete) the linked customer is refreshed
//! inside the same transaction.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{ErrorClass, ErrorCode, UnknownVariant};
use crate::services::customer;
use crate::services::fields;
use crate::services::menu::{self, MenuSnapshot};
use crate::services::workflow::{IllegalTransition, OrderStatus, Transition};

const DEFAULT_LIST_LIMIT: i64 = 100;
const MAX_LIST_LIMIT: i64 = 1000;

const ORDER_COLUMNS: &str = "id, number, customer_id, customer_name, customer_phone, source, delivery_address, \
     status, payment_method, notes, total_cents, employee_id, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, order_id, position, menu_item_id, name, unit_price_cents, quantity, notes, subtotal_cents";

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("order not found: {0}")]
    NotFound(Uuid),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    InvalidTransition(#[from] IllegalTransition),
    #[error("order is {} and can no longer be changed", .0.as_str())]
    Locked(OrderStatus),
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ErrorCode for OrderError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_ORDER_NOT_FOUND",
            Self::Validation(_) => "E_VALIDATION",
            Self::InvalidTransition(_) => "E_INVALID_TRANSITION",
            Self::Locked(_) => "E_ORDER_LOCKED",
            Self::Conflict(_) => "E_CONFLICT",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound(_) => ErrorClass::NotFound,
            Self::Validation(_) => ErrorClass::Invalid,
            Self::InvalidTransition(_) | Self::Locked(_) | Self::Conflict(_) => ErrorClass::Conflict,
            Self::Database(_) => ErrorClass::Internal,
        }
    }
}

// =============================================================================
// ENUMS
// =============================================================================

/// How the order reached the restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSource {
    Phone,
    WalkIn,
    Delivery,
}

impl OrderSource {
    pub const ALL: [Self; 3] = [Self::Phone, Self::WalkIn, Self::Delivery];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::WalkIn => "walk_in",
            Self::Delivery => "delivery",
        }
    }

    #[must_use]
    pub fn from_str(raw: &str) -> Option<Self> {
        match raw {
            "phone" => Some(Self::Phone),
            "walk_in" | "walk-in" => Some(Self::WalkIn),
            "delivery" => Some(Self::Delivery),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Phone => "Phone",
            Self::WalkIn => "Walk-in",
            Self::Delivery => "Delivery",
        }
    }
}

impl TryFrom<String> for OrderSource {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value).ok_or(UnknownVariant { kind: "order source", value })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

impl PaymentMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Transfer => "transfer",
        }
    }

    #[must_use]
    pub fn from_str(raw: &str) -> Option<Self> {
        match raw {
            "cash" => Some(Self::Cash),
            "card" => Some(Self::Card),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Card => "Card",
            Self::Transfer => "Transfer",
        }
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value).ok_or(UnknownVariant { kind: "payment method", value })
    }
}

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    pub number: i64,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    #[sqlx(try_from = "String")]
    pub source: OrderSource,
    pub delivery_address: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    #[sqlx(try_from = "String")]
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub total_cents: i64,
    pub employee_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[sqlx(skip)]
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub position: i32,
    pub menu_item_id: Option<Uuid>,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub notes: Option<String>,
    pub subtotal_cents: i64,
}

/// A requested order line. With a `menu_item_id`, omitted name and price
/// are taken from the menu item.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderItem {
    pub menu_item_id: Option<Uuid>,
    pub name: Option<String>,
    pub unit_price_cents: Option<i64>,
    pub quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub source: OrderSource,
    pub delivery_address: Option<String>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub employee_id: Option<Uuid>,
    pub items: Vec<NewOrderItem>,
}

/// Editable details of a non-terminal order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPatch {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub source: Option<OrderSource>,
    pub delivery_address: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub source: Option<OrderSource>,
    pub customer_id: Option<Uuid>,
    /// Inclusive lower bound on `created_at`.
    pub created_from: Option<OffsetDateTime>,
    /// Exclusive upper bound on `created_at`.
    pub created_to: Option<OffsetDateTime>,
    pub limit: Option<i64>,
}

/// A line after name and price resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedItem {
    pub menu_item_id: Option<Uuid>,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub notes: Option<String>,
    pub subtotal_cents: i64,
}

/// Result of a status request.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub order: Order,
    pub changed: bool,
}

// =============================================================================
// PRICING
// =============================================================================

/// Resolve names and prices for the requested lines and compute subtotals.
///
/// # Errors
///
/// Returns [`OrderError::Validation`] for an empty order, a bad quantity or
/// price, an unknown or unavailable menu item, or a line with no name.
pub fn price_items(
    items: Vec<NewOrderItem>,
    menu: &HashMap<Uuid, MenuSnapshot>,
) -> Result<Vec<PricedItem>, OrderError> {
    if items.is_empty() {
        return Err(OrderError::Validation("an order needs at least one item".into()));
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let line = index + 1;
            if item.quantity < 1 {
                return Err(OrderError::Validation(format!("item {line}: quantity must be at least 1")));
            }

            let snapshot = match item.menu_item_id {
                Some(id) => {
                    let snapshot = menu
                        .get(&id)
                        .ok_or_else(|| OrderError::Validation(format!("item {line}: unknown menu item {id}")))?;
                    if !snapshot.available {
                        return Err(OrderError::Validation(format!(
                            "item {line}: {} is not available",
                            snapshot.name
                        )));
                    }
                    Some(snapshot)
                }
                None => None,
            };

            let name = fields::clean(item.name)
                .or_else(|| snapshot.map(|s| s.name.clone()))
                .ok_or_else(|| OrderError::Validation(format!("item {line}: name is required")))?;
            let unit_price_cents = item
                .unit_price_cents
                .or_else(|| snapshot.map(|s| s.price_cents))
                .ok_or_else(|| OrderError::Validation(format!("item {line}: unit_price_cents is required")))?;
            if unit_price_cents < 0 {
                return Err(OrderError::Validation(format!("item {line}: unit_price_cents must not be negative")));
            }
            let subtotal_cents = unit_price_cents
                .checked_mul(i64::from(item.quantity))
                .ok_or_else(|| OrderError::Validation(format!("item {line}: subtotal out of range")))?;

            Ok(PricedItem {
                menu_item_id: item.menu_item_id,
                name,
                unit_price_cents,
                quantity: item.quantity,
                notes: fields::clean(item.notes),
                subtotal_cents,
            })
        })
        .collect()
}

/// Sum of line subtotals.
///
/// # Errors
///
/// Returns [`OrderError::Validation`] if the sum overflows.
pub fn order_total(items: &[PricedItem]) -> Result<i64, OrderError> {
    items.iter().try_fold(0_i64, |total, item| {
        total
            .checked_add(item.subtotal_cents)
            .ok_or_else(|| OrderError::Validation("order total out of range".into()))
    })
}

fn check_delivery_address(source: OrderSource, address: Option<&str>) -> Result<(), OrderError> {
    if source == OrderSource::Delivery && address.is_none() {
        return Err(OrderError::Validation("delivery orders need a delivery_address".into()));
    }
    Ok(())
}

async fn price_request(pool: &PgPool, items: Vec<NewOrderItem>) -> Result<Vec<PricedItem>, OrderError> {
    let mut ids: Vec<Uuid> = items.iter().filter_map(|item| item.menu_item_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let menu = menu::load_snapshots(pool, &ids).await?;
    price_items(items, &menu)
}

impl OrderPatch {
    /// Apply this patch to a stored order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Locked`] for terminal orders and
    /// [`OrderError::Validation`] when the patched order breaks an invariant.
    pub fn apply(self, order: &mut Order) -> Result<(), OrderError> {
        if order.status.is_terminal() {
            return Err(OrderError::Locked(order.status));
        }
        if let Some(name) = self.customer_name {
            order.customer_name = fields::required("customer_name", &name).map_err(OrderError::Validation)?;
        }
        if let Some(source) = self.source {
            order.source = source;
        }
        if let Some(payment) = self.payment_method {
            order.payment_method = payment;
        }
        order.customer_phone = fields::merge(order.customer_phone.take(), self.customer_phone);
        order.delivery_address = fields::merge(order.delivery_address.take(), self.delivery_address);
        order.notes = fields::merge(order.notes.take(), self.notes);
        check_delivery_address(order.source, order.delivery_address.as_deref())
    }
}

// =============================================================================
// READS
// =============================================================================

async fn load_items(
    conn: &mut PgConnection,
    order_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<OrderItem>>, sqlx::Error> {
    if order_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = sqlx::query_as::<_, OrderItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY order_id, position"
    ))
    .bind(order_ids)
    .fetch_all(conn)
    .await?;

    let mut grouped: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    for row in rows {
        grouped.entry(row.order_id).or_default().push(row);
    }
    Ok(grouped)
}

async fn fetch_order(conn: &mut PgConnection, id: Uuid) -> Result<Order, OrderError> {
    let mut order = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(OrderError::NotFound(id))?;
    order.items = load_items(conn, &[id]).await?.remove(&id).unwrap_or_default();
    Ok(order)
}

/// List orders newest first, with their lines.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_orders(pool: &PgPool, filter: &OrderFilter) -> Result<Vec<Order>, OrderError> {
    let mut builder = QueryBuilder::new(format!("SELECT {ORDER_COLUMNS} FROM orders WHERE TRUE"));
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(source) = filter.source {
        builder.push(" AND source = ").push_bind(source.as_str());
    }
    if let Some(customer_id) = filter.customer_id {
        builder.push(" AND customer_id = ").push_bind(customer_id);
    }
    if let Some(from) = filter.created_from {
        builder.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = filter.created_to {
        builder.push(" AND created_at < ").push_bind(to);
    }
    builder.push(" ORDER BY created_at DESC, number DESC LIMIT ");
    builder.push_bind(fields::limit(filter.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT));

    let mut conn = pool.acquire().await?;
    let mut orders = builder.build_query_as::<Order>().fetch_all(&mut *conn).await?;
    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let mut items = load_items(&mut conn, &ids).await?;
    for order in &mut orders {
        order.items = items.remove(&order.id).unwrap_or_default();
    }
    Ok(orders)
}

/// Fetch one order with its lines.
///
/// # Errors
///
/// Returns [`OrderError::NotFound`] when the id is unknown.
pub async fn get_order(pool: &PgPool, id: Uuid) -> Result<Order, OrderError> {
    let mut conn = pool.acquire().await?;
    fetch_order(&mut conn, id).await
}

// =============================================================================
// WRITES
// =============================================================================

async fn insert_items(
    conn: &mut PgConnection,
    order_id: Uuid,
    items: &[PricedItem],
) -> Result<Vec<OrderItem>, sqlx::Error> {
    let mut stored = Vec::with_capacity(items.len());
    for (position, item) in (1_i32..).zip(items) {
        let row = sqlx::query_as::<_, OrderItem>(&format!(
            "INSERT INTO order_items
                 (id, order_id, position, menu_item_id, name, unit_price_cents, quantity, notes, subtotal_cents)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(order_id)
        .bind(position)
        .bind(item.menu_item_id)
        .bind(&item.name)
        .bind(item.unit_price_cents)
        .bind(item.quantity)
        .bind(&item.notes)
        .bind(item.subtotal_cents)
        .fetch_one(&mut *conn)
        .await?;
        stored.push(row);
    }
    Ok(stored)
}

/// Unknown employee, customer or menu item ids are the caller's mistake.
fn reference_error(err: sqlx::Error) -> OrderError {
    match fields::unknown_reference(&err) {
        Some(message) => OrderError::Validation(message),
        None => OrderError::Database(err),
    }
}

async fn refresh_customer(conn: &mut PgConnection, customer_id: Option<Uuid>) -> Result<(), sqlx::Error> {
    match customer_id {
        Some(id) => customer::refresh_stats(conn, id).await,
        None => Ok(()),
    }
}

/// Create a pending order.
///
/// # Errors
///
/// Returns a validation error for bad input or a database error.
pub async fn create_order(pool: &PgPool, input: NewOrder) -> Result<Order, OrderError> {
    let items = price_request(pool, input.items).await?;
    let total_cents = order_total(&items)?;

    let mut tx = pool.begin().await?;

    let contact = match input.customer_id {
        Some(id) => Some(
            customer::contact_details(&mut *tx, id)
                .await?
                .ok_or_else(|| OrderError::Validation(format!("unknown customer {id}")))?,
        ),
        None => None,
    };
    let (contact_name, contact_phone, contact_address) = match contact {
        Some((name, phone, address)) => (Some(name), phone, address),
        None => (None, None, None),
    };

    let customer_name = fields::clean(input.customer_name)
        .or(contact_name)
        .ok_or_else(|| OrderError::Validation("customer_name must not be blank".into()))?;
    let customer_phone = fields::clean(input.customer_phone).or(contact_phone);
    let delivery_address = match input.source {
        OrderSource::Delivery => fields::clean(input.delivery_address).or(contact_address),
        OrderSource::Phone | OrderSource::WalkIn => fields::clean(input.delivery_address),
    };
    check_delivery_address(input.source, delivery_address.as_deref())?;

    let mut order = sqlx::query_as::<_, Order>(&format!(
        "INSERT INTO orders
             (id, customer_id, customer_name, customer_phone, source, delivery_address,
              status, payment_method, notes, total_cents, employee_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(input.customer_id)
    .bind(&customer_name)
    .bind(&customer_phone)
    .bind(input.source.as_str())
    .bind(&delivery_address)
    .bind(OrderStatus::Pending.as_str())
    .bind(input.payment_method.as_str())
    .bind(fields::clean(input.notes))
    .bind(total_cents)
    .bind(input.employee_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(reference_error)?;

    order.items = insert_items(&mut tx, order.id, &items).await.map_err(reference_error)?;
    refresh_customer(&mut tx, order.customer_id).await?;
    tx.commit().await?;

    tracing::info!(
        order_id = %order.id,
        number = order.number,
        source = order.source.as_str(),
        total_cents = order.total_cents,
        "order created"
    );
    Ok(order)
}

/// Replace every line of a pending order and recompute its total.
///
/// # Errors
///
/// Returns [`OrderError::Locked`] once the kitchen has started the order.
pub async fn replace_items(pool: &PgPool, id: Uuid, items: Vec<NewOrderItem>) -> Result<Order, OrderError> {
    let items = price_request(pool, items).await?;
    let total_cents = order_total(&items)?;

    let mut tx = pool.begin().await?;
    let status = sqlx::query_scalar::<_, String>("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(OrderError::NotFound(id))?;
    let status = OrderStatus::try_from(status).map_err(|err| OrderError::Database(sqlx::Error::Decode(err.into())))?;
    if status != OrderStatus::Pending {
        return Err(OrderError::Locked(status));
    }

    sqlx::query("DELETE FROM order_items WHERE order_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let stored = insert_items(&mut tx, id, &items).await.map_err(reference_error)?;
    let mut order = sqlx::query_as::<_, Order>(&format!(
        "UPDATE orders SET total_cents = $2, updated_at = now() WHERE id = $1 RETURNING {ORDER_COLUMNS}"
    ))
    .bind(id)
    .bind(total_cents)
    .fetch_one(&mut *tx)
    .await?;
    refresh_customer(&mut tx, order.customer_id).await?;
    tx.commit().await?;

    order.items = stored;
    tracing::info!(order_id = %id, lines = order.items.len(), total_cents, "order items replaced");
    Ok(order)
}

/// Edit customer, address, payment and notes of a non-terminal order.
///
/// # Errors
///
/// Returns not-found, locked, validation, conflict or database errors.
pub async fn update_order_details(pool: &PgPool, id: Uuid, patch: OrderPatch) -> Result<Order, OrderError> {
    let mut order = get_order(pool, id).await?;
    let observed = order.status;
    patch.apply(&mut order)?;

    let updated = sqlx::query_as::<_, Order>(&format!(
        "UPDATE orders
         SET customer_name = $3, customer_phone = $4, source = $5, delivery_address = $6,
             payment_method = $7, notes = $8, updated_at = now()
         WHERE id = $1 AND status = $2
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(id)
    .bind(observed.as_str())
    .bind(&order.customer_name)
    .bind(&order.customer_phone)
    .bind(order.source.as_str())
    .bind(&order.delivery_address)
    .bind(order.payment_method.as_str())
    .bind(&order.notes)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| OrderError::Conflict(format!("order {id} changed while it was being edited")))?;

    tracing::info!(order_id = %id, "order details updated");
    Ok(Order { items: order.items, ..updated })
}

/// Move an order to `to` if the workflow allows it.
///
/// # Errors
///
/// Returns [`OrderError::InvalidTransition`] for a disallowed move and
/// [`OrderError::Conflict`] when the status changed concurrently.
pub async fn change_status(pool: &PgPool, id: Uuid, to: OrderStatus) -> Result<StatusChange, OrderError> {
    let order = get_order(pool, id).await?;
    let (from, to) = match order.status.transition(to)? {
        Transition::Unchanged => return Ok(StatusChange { order, changed: false }),
        Transition::Move { from, to } => (from, to),
    };

    let mut tx = pool.begin().await?;
    let updated = sqlx::query_as::<_, Order>(&format!(
        "UPDATE orders SET status = $3, updated_at = now()
         WHERE id = $1 AND status = $2
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(id)
    .bind(from.as_str())
    .bind(to.as_str())
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| OrderError::Conflict(format!("order {id} is no longer {}", from.as_str())))?;
    refresh_customer(&mut tx, updated.customer_id).await?;
    tx.commit().await?;

    tracing::info!(order_id = %id, from = from.as_str(), to = to.as_str(), "order status changed");
    Ok(StatusChange { order: Order { items: order.items, ..updated }, changed: true })
}

/// Move an order one step forward along the kitchen line.
///
/// # Errors
///
/// Returns [`OrderError::Locked`] for delivered or cancelled orders.
pub async fn advance(pool: &PgPool, id: Uuid) -> Result<StatusChange, OrderError> {
    let order = get_order(pool, id).await?;
    let next = order.status.next().ok_or(OrderError::Locked(order.status))?;
    change_status(pool, id, next).await
}

/// Delete an order and its lines.
///
/// # Errors
///
/// Returns [`OrderError::NotFound`] when nothing was deleted.
pub async fn delete_order(pool: &PgPool, id: Uuid) -> Result<(), OrderError> {
    let mut tx = pool.begin().await?;
    let customer_id = sqlx::query_scalar::<_, Option<Uuid>>("DELETE FROM orders WHERE id = $1 RETURNING customer_id")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(OrderError::NotFound(id))?;
    refresh_customer(&mut tx, customer_id).await?;
    tx.commit().await?;

    tracing::info!(order_id = %id, "order deleted");
    Ok(())
}

#[cfg(test)]
#[path = "order_test.rs"]
mod tests;
