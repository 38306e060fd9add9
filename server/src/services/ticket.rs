//! Bridge from stored rows to printable documents.
//!
//! The `tickets` crate knows nothing about the database; this module copies
//! the fields it prints and shifts timestamps into the restaurant's local
//! offset.

use sqlx::PgPool;
use time::{OffsetDateTime, UtcOffset};

use tickets::{ClosureReport, KitchenTicket, Printable, Receipt, TicketFormat, TicketItem, TicketKind, TicketOrder};

use crate::config::RestaurantConfig;
use crate::services::cash_register::{self, CashRegisterClosure, CashRegisterError};
use crate::services::employee;
use crate::services::order::Order;

/// A rendered document ready to send.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub content_type: &'static str,
    pub file_name: String,
    pub body: Vec<u8>,
}

#[must_use]
pub fn ticket_order(order: &Order, offset: UtcOffset) -> TicketOrder {
    TicketOrder {
        number: order.number,
        placed_at: order.created_at.to_offset(offset),
        source_label: order.source.label().to_owned(),
        payment_label: order.payment_method.label().to_owned(),
        status_label: order.status.label().to_owned(),
        customer_name: order.customer_name.clone(),
        customer_phone: order.customer_phone.clone(),
        delivery_address: order.delivery_address.clone(),
        notes: order.notes.clone(),
        items: order
            .items
            .iter()
            .map(|item| TicketItem {
                quantity: u32::try_from(item.quantity).unwrap_or_default(),
                name: item.name.clone(),
                unit_price_cents: item.unit_price_cents,
                notes: item.notes.clone(),
            })
            .collect(),
        total_cents: order.total_cents,
    }
}

/// Lay out a closure. `cash_sales_cents` is what the shift took in cash so far.
#[must_use]
pub fn closure_report(
    closure: &CashRegisterClosure,
    employee_name: Option<String>,
    cash_sales_cents: i64,
    offset: UtcOffset,
) -> ClosureReport {
    ClosureReport {
        opened_at: closure.opened_at.to_offset(offset),
        closed_at: closure.closed_at.map(|at| at.to_offset(offset)),
        employee_name,
        opening_cash_cents: closure.opening_cash_cents,
        cash_sales_cents,
        counted_cash_cents: closure.counted_cash_cents,
        notes: closure.notes.clone(),
    }
}

fn finish(doc: &dyn Printable, stem: String, format: TicketFormat, restaurant: &RestaurantConfig) -> RenderedDocument {
    RenderedDocument {
        content_type: format.content_type(),
        file_name: format!("{stem}.{}", format.extension()),
        body: tickets::render(doc, format, &restaurant.print_settings()),
    }
}

#[must_use]
pub fn render_order(
    order: &Order,
    kind: TicketKind,
    format: TicketFormat,
    restaurant: &RestaurantConfig,
) -> RenderedDocument {
    let data = ticket_order(order, restaurant.utc_offset);
    match kind {
        TicketKind::Receipt => finish(&Receipt(&data), format!("receipt-{}", order.number), format, restaurant),
        TicketKind::Kitchen => finish(&KitchenTicket(&data), format!("kitchen-{}", order.number), format, restaurant),
    }
}

/// Render a shift report. Closed shifts use their frozen figures; an open
/// shift reports cash sales up to now.
///
/// # Errors
///
/// Returns a database error if cash sales or the employee name cannot be read.
pub async fn render_closure(
    pool: &PgPool,
    closure: &CashRegisterClosure,
    format: TicketFormat,
    restaurant: &RestaurantConfig,
) -> Result<RenderedDocument, CashRegisterError> {
    let cash_sales_cents = match closure.expected_cash_cents {
        Some(expected) => expected.saturating_sub(closure.opening_cash_cents),
        None => cash_register::cash_sales(pool, closure.opened_at, OffsetDateTime::now_utc()).await?,
    };
    let employee_name = employee::employee_name(pool, closure.employee_id).await?;
    let report = closure_report(closure, employee_name, cash_sales_cents, restaurant.utc_offset);
    let stem = format!("closure-{}", closure.opened_at.to_offset(restaurant.utc_offset).date());
    Ok(finish(&report, stem, format, restaurant))
}

#[cfg(test)]
#[path = "ticket_test.rs"]
mod tests;
