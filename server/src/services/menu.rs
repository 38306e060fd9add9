//! Menu catalog service.
//!
//! Menu items are plain rows. Orders copy an item's name and price at order
//! time, so edits and deletes here never rewrite past orders. The reception
//! view shows only items that are both available and flagged as a daily
//! special.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{ErrorClass, ErrorCode};
use crate::services::fields;

const DEFAULT_LIST_LIMIT: i64 = 500;
const MAX_LIST_LIMIT: i64 = 1000;

const MENU_COLUMNS: &str =
    "id, name, description, category, price_cents, available, is_daily_special, created_at, updated_at";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    #[error("menu item not found: {0}")]
    NotFound(Uuid),
    #[error("{0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ErrorCode for MenuError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_MENU_ITEM_NOT_FOUND",
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
pub struct MenuItem {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price_cents: i64,
    pub available: bool,
    pub is_daily_special: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price_cents: i64,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub is_daily_special: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price_cents: Option<i64>,
    pub available: Option<bool>,
    pub is_daily_special: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuFilter {
    pub category: Option<String>,
    pub available: Option<bool>,
    pub daily_special: Option<bool>,
    pub limit: Option<i64>,
}

/// Name and price of a menu item as copied onto an order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuSnapshot {
    pub name: String,
    pub price_cents: i64,
    pub available: bool,
}

fn default_true() -> bool {
    true
}

// =============================================================================
// VALIDATION
// =============================================================================

impl NewMenuItem {
    /// Normalize text fields and check invariants.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Validation`] for blank name/category or a negative price.
    pub fn validate(self) -> Result<Self, MenuError> {
        Ok(Self {
            name: fields::required("name", &self.name).map_err(MenuError::Validation)?,
            description: fields::clean(self.description),
            category: fields::required("category", &self.category).map_err(MenuError::Validation)?,
            price_cents: fields::non_negative("price_cents", self.price_cents).map_err(MenuError::Validation)?,
            available: self.available,
            is_daily_special: self.is_daily_special,
        })
    }
}

impl MenuItemPatch {
    /// Apply this patch to a stored item.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Validation`] when the patched item breaks an invariant.
    pub fn apply(self, item: &mut MenuItem) -> Result<(), MenuError> {
        if let Some(name) = self.name {
            item.name = fields::required("name", &name).map_err(MenuError::Validation)?;
        }
        if let Some(category) = self.category {
            item.category = fields::required("category", &category).map_err(MenuError::Validation)?;
        }
        if let Some(price) = self.price_cents {
            item.price_cents = fields::non_negative("price_cents", price).map_err(MenuError::Validation)?;
        }
        item.description = fields::merge(item.description.take(), self.description);
        if let Some(available) = self.available {
            item.available = available;
        }
        if let Some(special) = self.is_daily_special {
            item.is_daily_special = special;
        }
        Ok(())
    }
}

// =============================================================================
// CRUD
// =============================================================================

/// Create a menu item.
///
/// # Errors
///
/// Returns a validation error for bad input or a database error if the insert fails.
pub async fn create_menu_item(pool: &PgPool, input: NewMenuItem) -> Result<MenuItem, MenuError> {
    let input = input.validate()?;
    let item = sqlx::query_as::<_, MenuItem>(&format!(
        "INSERT INTO menu_items (id, name, description, category, price_cents, available, is_daily_special)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {MENU_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&input.name)
    .bind(&input.description)
    .bind(&input.category)
    .bind(input.price_cents)
    .bind(input.available)
    .bind(input.is_daily_special)
    .fetch_one(pool)
    .await?;

    tracing::info!(menu_item_id = %item.id, name = %item.name, "menu item created");
    Ok(item)
}

/// List menu items ordered by category then name.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_menu_items(pool: &PgPool, filter: &MenuFilter) -> Result<Vec<MenuItem>, MenuError> {
    let mut builder = QueryBuilder::new(format!("SELECT {MENU_COLUMNS} FROM menu_items WHERE TRUE"));
    if let Some(category) = fields::clean(filter.category.clone()) {
        builder.push(" AND category = ").push_bind(category);
    }
    if let Some(available) = filter.available {
        builder.push(" AND available = ").push_bind(available);
    }
    if let Some(special) = filter.daily_special {
        builder.push(" AND is_daily_special = ").push_bind(special);
    }
    builder.push(" ORDER BY category ASC, name ASC LIMIT ");
    builder.push_bind(fields::limit(filter.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT));

    Ok(builder.build_query_as::<MenuItem>().fetch_all(pool).await?)
}

/// Items shown in the reception view: available daily specials.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_daily_specials(pool: &PgPool) -> Result<Vec<MenuItem>, MenuError> {
    let filter = MenuFilter { available: Some(true), daily_special: Some(true), ..MenuFilter::default() };
    list_menu_items(pool, &filter).await
}

/// Distinct categories in display order.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_categories(pool: &PgPool) -> Result<Vec<String>, MenuError> {
    Ok(
        sqlx::query_scalar::<_, String>("SELECT DISTINCT category FROM menu_items ORDER BY category ASC")
            .fetch_all(pool)
            .await?,
    )
}

/// Fetch one menu item.
///
/// # Errors
///
/// Returns [`MenuError::NotFound`] when the id is unknown.
pub async fn get_menu_item(pool: &PgPool, id: Uuid) -> Result<MenuItem, MenuError> {
    sqlx::query_as::<_, MenuItem>(&format!("SELECT {MENU_COLUMNS} FROM menu_items WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(MenuError::NotFound(id))
}

/// Patch a menu item.
///
/// # Errors
///
/// Returns not-found, validation or database errors.
pub async fn update_menu_item(pool: &PgPool, id: Uuid, patch: MenuItemPatch) -> Result<MenuItem, MenuError> {
    let mut item = get_menu_item(pool, id).await?;
    patch.apply(&mut item)?;

    let item = sqlx::query_as::<_, MenuItem>(&format!(
        "UPDATE menu_items
         SET name = $2, description = $3, category = $4, price_cents = $5,
             available = $6, is_daily_special = $7, updated_at = now()
         WHERE id = $1
         RETURNING {MENU_COLUMNS}"
    ))
    .bind(id)
    .bind(&item.name)
    .bind(&item.description)
    .bind(&item.category)
    .bind(item.price_cents)
    .bind(item.available)
    .bind(item.is_daily_special)
    .fetch_optional(pool)
    .await?
    .ok_or(MenuError::NotFound(id))?;

    tracing::info!(menu_item_id = %id, "menu item updated");
    Ok(item)
}

/// Delete a menu item. Past order lines keep their copied name and price.
///
/// # Errors
///
/// Returns [`MenuError::NotFound`] when nothing was deleted.
pub async fn delete_menu_item(pool: &PgPool, id: Uuid) -> Result<(), MenuError> {
    let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(MenuError::NotFound(id));
    }
    tracing::info!(menu_item_id = %id, "menu item deleted");
    Ok(())
}

/// Load name/price/availability for the given ids.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn load_snapshots(pool: &PgPool, ids: &[Uuid]) -> Result<HashMap<Uuid, MenuSnapshot>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = sqlx::query_as::<_, (Uuid, String, i64, bool)>(
        "SELECT id, name, price_cents, available FROM menu_items WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, price_cents, available)| (id, MenuSnapshot { name, price_cents, available }))
        .collect())
}

#[cfg(test)]
#[path = "menu_test.rs"]
mod tests;
