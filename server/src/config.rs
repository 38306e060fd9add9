//! Service configuration parsed from environment variables.
//!
//! SYSTEM CONTEXT
//! ==============
//! `main` loads `.env` (if present), then builds [`AppConfig`] once. Ticket
//! rendering and dashboard day boundaries read the restaurant section from
//! `AppState`; nothing else touches the environment after startup.

use time::UtcOffset;
use time::macros::format_description;

use tickets::{Letterhead, MAX_COLUMNS, MIN_COLUMNS, PrintSettings};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_RESTAURANT_NAME: &str = "Restaurant";
pub const DEFAULT_TICKET_FOOTER: &str = "Thank you for your order!";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";
pub const DEFAULT_ORDER_FEED_CAPACITY: usize = 256;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

/// Restaurant identity and print preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantConfig {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub footer: Option<String>,
    pub currency_symbol: String,
    pub ticket_columns: usize,
    /// Local offset for printed times and dashboard days.
    pub utc_offset: UtcOffset,
}

impl RestaurantConfig {
    #[must_use]
    pub fn print_settings(&self) -> PrintSettings {
        PrintSettings::new(
            self.ticket_columns,
            self.currency_symbol.clone(),
            Letterhead {
                name: self.name.clone(),
                address: self.address.clone(),
                phone: self.phone.clone(),
                footer: self.footer.clone(),
            },
        )
    }
}

impl Default for RestaurantConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_RESTAURANT_NAME.to_owned(),
            address: None,
            phone: None,
            footer: Some(DEFAULT_TICKET_FOOTER.to_owned()),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_owned(),
            ticket_columns: tickets::DEFAULT_COLUMNS,
            utc_offset: UtcOffset::UTC,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub order_feed_capacity: usize,
    pub restaurant: RestaurantConfig,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`
    ///
    /// Optional:
    /// - `PORT` (default 3000), `DB_MAX_CONNECTIONS` (default 5)
    /// - `RESTAURANT_NAME`, `RESTAURANT_ADDRESS`, `RESTAURANT_PHONE`
    /// - `TICKET_FOOTER` (empty string disables the footer)
    /// - `CURRENCY_SYMBOL` (default `$`)
    /// - `TICKET_COLUMNS` (default 42, 24..=64)
    /// - `UTC_OFFSET` as `+HH:MM` / `-HH:MM` (default `+00:00`)
    /// - `ORDER_FEED_CAPACITY` (default 256)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a value
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = non_empty_env("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let port = env_parse("PORT", DEFAULT_PORT)?;
        let db_max_connections = env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;
        let order_feed_capacity = env_parse("ORDER_FEED_CAPACITY", DEFAULT_ORDER_FEED_CAPACITY)?;
        if order_feed_capacity == 0 {
            return Err(ConfigError::Invalid { var: "ORDER_FEED_CAPACITY", message: "must be positive".into() });
        }

        let ticket_columns = env_parse("TICKET_COLUMNS", tickets::DEFAULT_COLUMNS)?;
        if !(MIN_COLUMNS..=MAX_COLUMNS).contains(&ticket_columns) {
            return Err(ConfigError::Invalid {
                var: "TICKET_COLUMNS",
                message: format!("{ticket_columns} is outside {MIN_COLUMNS}..={MAX_COLUMNS}"),
            });
        }

        let utc_offset = match non_empty_env("UTC_OFFSET") {
            Some(raw) => parse_utc_offset(&raw)?,
            None => UtcOffset::UTC,
        };

        let footer = match std::env::var("TICKET_FOOTER") {
            Ok(value) if value.trim().is_empty() => None,
            Ok(value) => Some(value),
            Err(_) => Some(DEFAULT_TICKET_FOOTER.to_owned()),
        };

        let restaurant = RestaurantConfig {
            name: non_empty_env("RESTAURANT_NAME").unwrap_or_else(|| DEFAULT_RESTAURANT_NAME.to_owned()),
            address: non_empty_env("RESTAURANT_ADDRESS"),
            phone: non_empty_env("RESTAURANT_PHONE"),
            footer,
            currency_symbol: std::env::var("CURRENCY_SYMBOL").unwrap_or_else(|_| DEFAULT_CURRENCY_SYMBOL.to_owned()),
            ticket_columns,
            utc_offset,
        };

        Ok(Self { database_url, port, db_max_connections, order_feed_capacity, restaurant })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::Invalid { var: key, message: format!("{raw:?}: {e}") }),
        None => Ok(default),
    }
}

/// Parse `+HH:MM`, `-HH:MM` or `Z`.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] for anything else.
pub fn parse_utc_offset(raw: &str) -> Result<UtcOffset, ConfigError> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Ok(UtcOffset::UTC);
    }
    UtcOffset::parse(raw, format_description!("[offset_hour sign:mandatory]:[offset_minute]"))
        .map_err(|e| ConfigError::Invalid { var: "UTC_OFFSET", message: format!("{raw:?}: {e}") })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
