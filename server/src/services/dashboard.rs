//! Back-office aggregates over a range of local days.
//!
//! Days are calendar days at the restaurant's configured UTC offset, so a
//! late dinner service counts toward the day it started on locally. Revenue,
//! the average ticket, the source mix and the top items ignore cancelled
//! orders; the per-status counts include them.

use serde::Serialize;
use sqlx::PgPool;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::error::{ErrorClass, ErrorCode};
use crate::services::order::OrderSource;
use crate::services::workflow::OrderStatus;

const TOP_ITEMS: i64 = 5;
const MAX_RANGE_DAYS: i64 = 366;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("{0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ErrorCode for DashboardError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_) => ErrorClass::Invalid,
            Self::Database(_) => ErrorClass::Internal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub source: OrderSource,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct TopItem {
    pub name: String,
    pub quantity: i64,
    pub revenue_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub from: String,
    pub to: String,
    pub order_count: i64,
    pub by_status: Vec<StatusCount>,
    pub revenue_cents: i64,
    pub average_ticket_cents: i64,
    pub by_source: Vec<SourceCount>,
    pub top_items: Vec<TopItem>,
}

/// Parse a `YYYY-MM-DD` query value.
///
/// # Errors
///
/// Returns [`DashboardError::Validation`] for anything else.
pub fn parse_date(raw: &str) -> Result<Date, DashboardError> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| DashboardError::Validation(format!("invalid date (expected YYYY-MM-DD): {raw}")))
}

/// UTC instants bounding the local days `from..=to`, as a half-open range.
///
/// # Errors
///
/// Returns [`DashboardError::Validation`] for a reversed or oversized range.
pub fn local_day_bounds(
    from: Date,
    to: Date,
    offset: UtcOffset,
) -> Result<(OffsetDateTime, OffsetDateTime), DashboardError> {
    if from > to {
        return Err(DashboardError::Validation(format!("from ({from}) is after to ({to})")));
    }
    if (to - from).whole_days() >= MAX_RANGE_DAYS {
        return Err(DashboardError::Validation(format!("range is limited to {MAX_RANGE_DAYS} days")));
    }
    let end = to
        .next_day()
        .ok_or_else(|| DashboardError::Validation(format!("date out of range: {to}")))?;
    Ok((from.midnight().assume_offset(offset), end.midnight().assume_offset(offset)))
}

/// Rounded integer mean; zero orders give zero.
#[must_use]
pub fn average_ticket(revenue_cents: i64, orders: i64) -> i64 {
    if orders <= 0 {
        return 0;
    }
    (revenue_cents + orders / 2) / orders
}

/// Fill a per-status count for every status, in workflow order.
#[must_use]
pub fn status_counts(rows: &[(String, i64)]) -> Vec<StatusCount> {
    OrderStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: rows
                .iter()
                .filter(|(raw, _)| OrderStatus::from_str(raw) == Some(status))
                .map(|(_, count)| count)
                .sum(),
        })
        .collect()
}

#[must_use]
pub fn source_counts(rows: &[(String, i64)]) -> Vec<SourceCount> {
    OrderSource::ALL
        .into_iter()
        .map(|source| SourceCount {
            source,
            count: rows
                .iter()
                .filter(|(raw, _)| OrderSource::from_str(raw) == Some(source))
                .map(|(_, count)| count)
                .sum(),
        })
        .collect()
}

/// Aggregate orders created on the local days `from..=to`.
///
/// # Errors
///
/// Returns validation errors for a bad range or a database error.
pub async fn summary(
    pool: &PgPool,
    from: Date,
    to: Date,
    offset: UtcOffset,
) -> Result<DashboardSummary, DashboardError> {
    let (start, end) = local_day_bounds(from, to, offset)?;

    let status_rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT status, COUNT(*) FROM orders
         WHERE created_at >= $1 AND created_at < $2
         GROUP BY status",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let source_rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT source, COUNT(*) FROM orders
         WHERE created_at >= $1 AND created_at < $2 AND status <> 'cancelled'
         GROUP BY source",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let (revenue_cents, billed_orders) = sqlx::query_as::<_, (i64, i64)>(
        "SELECT COALESCE(SUM(total_cents), 0)::BIGINT, COUNT(*) FROM orders
         WHERE created_at >= $1 AND created_at < $2 AND status <> 'cancelled'",
    )
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    let top_items = sqlx::query_as::<_, TopItem>(
        "SELECT oi.name AS name,
                SUM(oi.quantity)::BIGINT AS quantity,
                SUM(oi.subtotal_cents)::BIGINT AS revenue_cents
         FROM order_items oi
         JOIN orders o ON o.id = oi.order_id
         WHERE o.created_at >= $1 AND o.created_at < $2 AND o.status <> 'cancelled'
         GROUP BY oi.name
         ORDER BY quantity DESC, oi.name ASC
         LIMIT $3",
    )
    .bind(start)
    .bind(end)
    .bind(TOP_ITEMS)
    .fetch_all(pool)
    .await?;

    let by_status = status_counts(&status_rows);
    tracing::debug!(%from, %to, billed_orders, revenue_cents, "dashboard summary computed");

    Ok(DashboardSummary {
        from: from.to_string(),
        to: to.to_string(),
        order_count: by_status.iter().map(|s| s.count).sum(),
        by_status,
        revenue_cents,
        average_ticket_cents: average_ticket(revenue_cents, billed_orders),
        by_source: source_counts(&source_rows),
        top_items,
    })
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime, offset};

    use super::*;

    #[test]
    fn parse_date_accepts_iso_days_only() {
        assert_eq!(parse_date("2024-03-09").unwrap(), date!(2024 - 03 - 09));
        assert!(parse_date("09/03/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn day_bounds_use_the_local_offset() {
        let (start, end) = local_day_bounds(date!(2024 - 03 - 09), date!(2024 - 03 - 09), offset!(-3)).unwrap();
        assert_eq!(start, datetime!(2024-03-09 03:00 UTC));
        assert_eq!(end, datetime!(2024-03-10 03:00 UTC));
    }

    #[test]
    fn day_bounds_cover_the_whole_range() {
        let (start, end) = local_day_bounds(date!(2024 - 12 - 30), date!(2025 - 01 - 02), UtcOffset::UTC).unwrap();
        assert_eq!(end - start, time::Duration::days(4));
    }

    #[test]
    fn reversed_and_oversized_ranges_are_rejected() {
        assert!(local_day_bounds(date!(2024 - 03 - 10), date!(2024 - 03 - 09), UtcOffset::UTC).is_err());
        assert!(local_day_bounds(date!(2023 - 01 - 01), date!(2024 - 12 - 31), UtcOffset::UTC).is_err());
    }

    #[test]
    fn average_ticket_rounds_and_handles_zero() {
        assert_eq!(average_ticket(0, 0), 0);
        assert_eq!(average_ticket(1000, 3), 333);
        assert_eq!(average_ticket(1001, 2), 501);
    }

    #[test]
    fn status_counts_include_every_status() {
        let rows = vec![("ready".to_owned(), 2), ("cancelled".to_owned(), 1)];
        let counts = status_counts(&rows);
        assert_eq!(counts.len(), OrderStatus::ALL.len());
        assert_eq!(counts[0], StatusCount { status: OrderStatus::Pending, count: 0 });
        assert_eq!(counts[2], StatusCount { status: OrderStatus::Ready, count: 2 });
        assert_eq!(counts[4], StatusCount { status: OrderStatus::Cancelled, count: 1 });
    }

    #[test]
    fn source_counts_ignore_unknown_rows() {
        let rows = vec![("walk_in".to_owned(), 4), ("drone".to_owned(), 9)];
        let counts = source_counts(&rows);
        assert_eq!(counts.iter().map(|c| c.count).sum::<i64>(), 4);
        assert_eq!(counts[1], SourceCount { source: OrderSource::WalkIn, count: 4 });
    }

    #[cfg(feature = "live-db-tests")]
    #[tokio::test]
    async fn live_summary_aggregates_one_local_day() {
        use crate::services::order::{self, NewOrder, NewOrderItem, PaymentMethod};

        fn line(name: &str, price: i64, quantity: i32) -> NewOrderItem {
            NewOrderItem {
                menu_item_id: None,
                name: Some(name.into()),
                unit_price_cents: Some(price),
                quantity,
                notes: None,
            }
        }

        fn new_order(source: OrderSource, items: Vec<NewOrderItem>) -> NewOrder {
            NewOrder {
                customer_id: None,
                customer_name: Some("Dashboard Test".into()),
                customer_phone: None,
                source,
                delivery_address: (source == OrderSource::Delivery).then(|| "Rivadavia 1".to_owned()),
                payment_method: PaymentMethod::Card,
                notes: None,
                employee_id: None,
                items,
            }
        }

        let pool = crate::state::test_helpers::live_pool().await;
        let mut ids = Vec::new();
        for input in [
            new_order(OrderSource::WalkIn, vec![line("Pizza", 900, 2), line("Té", 200, 1)]),
            new_order(OrderSource::Phone, vec![line("Pizza", 900, 1)]),
            new_order(OrderSource::Delivery, vec![line("Flan", 350, 4)]),
        ] {
            ids.push(order::create_order(&pool, input).await.unwrap().id);
        }
        order::change_status(&pool, ids[2], OrderStatus::Cancelled).await.unwrap();
        sqlx::query("UPDATE orders SET created_at = $2 WHERE id = ANY($1)")
            .bind(ids.as_slice())
            .bind(datetime!(2001-03-04 15:00 UTC))
            .execute(&pool)
            .await
            .unwrap();

        let day = date!(2001 - 03 - 04);
        let utc = summary(&pool, day, day, UtcOffset::UTC).await;
        let east = summary(&pool, day, day, offset!(+10)).await;

        sqlx::query("DELETE FROM orders WHERE id = ANY($1)").bind(ids.as_slice()).execute(&pool).await.unwrap();

        let utc = utc.unwrap();
        assert_eq!(utc.order_count, 3);
        assert_eq!(utc.by_status[0], StatusCount { status: OrderStatus::Pending, count: 2 });
        assert_eq!(utc.by_status[4], StatusCount { status: OrderStatus::Cancelled, count: 1 });
        assert_eq!(utc.revenue_cents, 2900);
        assert_eq!(utc.average_ticket_cents, 1450);
        assert_eq!(
            utc.by_source,
            vec![
                SourceCount { source: OrderSource::Phone, count: 1 },
                SourceCount { source: OrderSource::WalkIn, count: 1 },
                SourceCount { source: OrderSource::Delivery, count: 0 },
            ]
        );
        assert_eq!(
            utc.top_items,
            vec![
                TopItem { name: "Pizza".into(), quantity: 3, revenue_cents: 2700 },
                TopItem { name: "Té".into(), quantity: 1, revenue_cents: 200 },
            ]
        );

        let east = east.unwrap();
        assert_eq!(east.order_count, 0);
        assert_eq!(east.revenue_cents, 0);
        assert!(east.top_items.is_empty());
    }
}
