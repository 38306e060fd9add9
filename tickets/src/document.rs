//! Order receipts, kitchen tickets and cash register reports.
//!
//! These types are a print-only view of the data. The server converts its
//! rows into them with labels already localized, so this module never needs
//! to know about order status enums or database ids.

use time::OffsetDateTime;
use time::macros::format_description;

use crate::layout::{Emphasis, Layout, Line};
use crate::{PrintSettings, Printable};

/// Restaurant identity printed at the top (and bottom) of every document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Letterhead {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub footer: Option<String>,
}

impl Letterhead {
    fn print(&self, layout: &mut Layout) {
        if !self.name.trim().is_empty() {
            layout.centered(&self.name, Emphasis::Strong);
        }
        if let Some(address) = non_blank(self.address.as_deref()) {
            layout.centered(address, Emphasis::Normal);
        }
        if let Some(phone) = non_blank(self.phone.as_deref()) {
            layout.centered(&format!("Tel: {phone}"), Emphasis::Normal);
        }
    }
}

/// One order line as printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketItem {
    pub quantity: u32,
    pub name: String,
    pub unit_price_cents: i64,
    pub notes: Option<String>,
}

impl TicketItem {
    #[must_use]
    pub fn subtotal_cents(&self) -> i64 {
        self.unit_price_cents.saturating_mul(i64::from(self.quantity))
    }
}

/// Printable snapshot of an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketOrder {
    pub number: i64,
    /// Already shifted to the restaurant's local offset.
    pub placed_at: OffsetDateTime,
    pub source_label: String,
    pub payment_label: String,
    pub status_label: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<TicketItem>,
    pub total_cents: i64,
}

/// Customer receipt: prices, total and payment method.
pub struct Receipt<'a>(pub &'a TicketOrder);

/// Kitchen copy: quantities and notes, no prices.
pub struct KitchenTicket<'a>(pub &'a TicketOrder);

impl Printable for Receipt<'_> {
    fn title(&self) -> String {
        format!("Order #{}", self.0.number)
    }

    fn lines(&self, settings: &PrintSettings) -> Vec<Line> {
        let order = self.0;
        let mut layout = Layout::new(settings.columns);

        settings.letterhead.print(&mut layout);
        layout.rule();
        layout.pair(&format!("Order #{}", order.number), &format_timestamp(order.placed_at), Emphasis::Strong);
        layout.pair(
            &format!("Type: {}", order.source_label),
            &format!("Payment: {}", order.payment_label),
            Emphasis::Normal,
        );
        print_customer(&mut layout, order);
        layout.rule();

        layout.pair("QTY ITEM", "AMOUNT", Emphasis::Normal);
        for item in &order.items {
            let amount = settings.money(item.subtotal_cents());
            layout.item(item.quantity, &item.name, Some(&amount), Emphasis::Normal);
            if item.quantity > 1 {
                layout.indented(4, &format!("@ {}", settings.money(item.unit_price_cents)));
            }
            if let Some(notes) = non_blank(item.notes.as_deref()) {
                layout.indented(4, &format!("> {notes}"));
            }
        }
        layout.rule();
        layout.pair("TOTAL", &settings.money(order.total_cents), Emphasis::Strong);
        layout.rule();

        if let Some(notes) = non_blank(order.notes.as_deref()) {
            layout.text(&format!("Notes: {notes}"));
        }
        if let Some(footer) = non_blank(settings.letterhead.footer.as_deref()) {
            layout.blank();
            layout.centered(footer, Emphasis::Normal);
        }
        layout.into_lines()
    }
}

impl Printable for KitchenTicket<'_> {
    fn title(&self) -> String {
        format!("Kitchen #{}", self.0.number)
    }

    fn lines(&self, settings: &PrintSettings) -> Vec<Line> {
        let order = self.0;
        let mut layout = Layout::new(settings.columns);

        layout.centered("KITCHEN", Emphasis::Strong);
        layout.pair(&format!("Order #{}", order.number), &format_timestamp(order.placed_at), Emphasis::Strong);
        layout.centered(&order.source_label.to_uppercase(), Emphasis::Strong);
        layout.text(&format!("Customer: {}", order.customer_name));
        layout.rule();

        for item in &order.items {
            layout.item(item.quantity, &item.name, None, Emphasis::Strong);
            if let Some(notes) = non_blank(item.notes.as_deref()) {
                layout.indented(4, &format!("> {notes}"));
            }
        }
        layout.rule();

        if let Some(notes) = non_blank(order.notes.as_deref()) {
            layout.strong(&format!("Notes: {notes}"));
        }
        layout.text(&format!("Status: {}", order.status_label.to_uppercase()));
        layout.into_lines()
    }
}

/// Cash register shift summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureReport {
    pub opened_at: OffsetDateTime,
    pub closed_at: Option<OffsetDateTime>,
    pub employee_name: Option<String>,
    pub opening_cash_cents: i64,
    pub cash_sales_cents: i64,
    pub counted_cash_cents: Option<i64>,
    pub notes: Option<String>,
}

impl ClosureReport {
    #[must_use]
    pub fn expected_cash_cents(&self) -> i64 {
        self.opening_cash_cents.saturating_add(self.cash_sales_cents)
    }

    #[must_use]
    pub fn difference_cents(&self) -> Option<i64> {
        self.counted_cash_cents
            .map(|counted| counted.saturating_sub(self.expected_cash_cents()))
    }
}

impl Printable for ClosureReport {
    fn title(&self) -> String {
        format!("Cash closure {}", format_timestamp(self.opened_at))
    }

    fn lines(&self, settings: &PrintSettings) -> Vec<Line> {
        let mut layout = Layout::new(settings.columns);

        settings.letterhead.print(&mut layout);
        layout.centered("CASH REGISTER CLOSURE", Emphasis::Strong);
        layout.rule();
        layout.pair("Opened", &format_timestamp(self.opened_at), Emphasis::Normal);
        let closed = self.closed_at.map_or_else(|| "still open".to_owned(), format_timestamp);
        layout.pair("Closed", &closed, Emphasis::Normal);
        if let Some(name) = non_blank(self.employee_name.as_deref()) {
            layout.text(&format!("Employee: {name}"));
        }
        layout.rule();

        layout.pair("Opening cash", &settings.money(self.opening_cash_cents), Emphasis::Normal);
        layout.pair("Cash sales", &settings.money(self.cash_sales_cents), Emphasis::Normal);
        layout.pair("Expected", &settings.money(self.expected_cash_cents()), Emphasis::Strong);
        if let Some(counted) = self.counted_cash_cents {
            layout.pair("Counted", &settings.money(counted), Emphasis::Normal);
        }
        if let Some(difference) = self.difference_cents() {
            layout.pair("Difference", &settings.money(difference), Emphasis::Strong);
        }

        if let Some(notes) = non_blank(self.notes.as_deref()) {
            layout.rule();
            layout.text(&format!("Notes: {notes}"));
        }
        layout.into_lines()
    }
}

fn print_customer(layout: &mut Layout, order: &TicketOrder) {
    layout.text(&format!("Customer: {}", order.customer_name));
    if let Some(phone) = non_blank(order.customer_phone.as_deref()) {
        layout.text(&format!("Phone: {phone}"));
    }
    if let Some(address) = non_blank(order.delivery_address.as_deref()) {
        layout.text(&format!("Address: {address}"));
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `YYYY-MM-DD HH:MM` in the timestamp's own offset.
#[must_use]
pub fn format_timestamp(ts: OffsetDateTime) -> String {
    ts.format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "document_test.rs"]
mod tests;
