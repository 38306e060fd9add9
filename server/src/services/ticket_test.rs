use time::macros::{datetime, offset};
use uuid::Uuid;

use super::*;
use crate::services::order::{OrderItem, OrderSource, PaymentMethod};
use crate::services::workflow::OrderStatus;

fn order() -> Order {
    let id = Uuid::new_v4();
    Order {
        id,
        number: 42,
        customer_id: None,
        customer_name: "Rosa".into(),
        customer_phone: Some("555-7788".into()),
        source: OrderSource::Delivery,
        delivery_address: Some("Rivadavia 900".into()),
        status: OrderStatus::Preparing,
        payment_method: PaymentMethod::Card,
        notes: Some("no onions".into()),
        total_cents: 2_700,
        employee_id: None,
        created_at: datetime!(2024-05-01 23:30 UTC),
        updated_at: datetime!(2024-05-01 23:30 UTC),
        items: vec![
            OrderItem {
                id: Uuid::new_v4(),
                order_id: id,
                position: 1,
                menu_item_id: None,
                name: "Pizza muzzarella".into(),
                unit_price_cents: 1_200,
                quantity: 2,
                notes: None,
                subtotal_cents: 2_400,
            },
            OrderItem {
                id: Uuid::new_v4(),
                order_id: id,
                position: 2,
                menu_item_id: None,
                name: "Gaseosa".into(),
                unit_price_cents: 300,
                quantity: 1,
                notes: Some("cold".into()),
                subtotal_cents: 300,
            },
        ],
    }
}

fn restaurant() -> RestaurantConfig {
    RestaurantConfig { name: "La Esquina".into(), utc_offset: offset!(-3), ..RestaurantConfig::default() }
}

#[test]
fn ticket_order_copies_labels_and_shifts_time() {
    let data = ticket_order(&order(), offset!(-3));
    assert_eq!(data.number, 42);
    assert_eq!(data.source_label, "Delivery");
    assert_eq!(data.payment_label, "Card");
    assert_eq!(data.status_label, "Preparing");
    assert_eq!(data.placed_at, datetime!(2024-05-01 20:30 -3));
    assert_eq!(data.items.len(), 2);
    assert_eq!(data.items[0].quantity, 2);
    assert_eq!(data.items[1].notes.as_deref(), Some("cold"));
}

#[test]
fn receipt_text_shows_local_time_and_total() {
    let doc = render_order(&order(), TicketKind::Receipt, TicketFormat::Text, &restaurant());
    assert_eq!(doc.content_type, "text/plain; charset=utf-8");
    assert_eq!(doc.file_name, "receipt-42.txt");
    let text = String::from_utf8(doc.body).unwrap();
    assert!(text.contains("La Esquina"));
    assert!(text.contains("2024-05-01 20:30"));
    assert!(text.contains("$27.00"));
    assert!(text.lines().all(|line| line.chars().count() <= tickets::DEFAULT_COLUMNS));
}

#[test]
fn kitchen_ticket_has_no_prices() {
    let doc = render_order(&order(), TicketKind::Kitchen, TicketFormat::Text, &restaurant());
    assert_eq!(doc.file_name, "kitchen-42.txt");
    let text = String::from_utf8(doc.body).unwrap();
    assert!(text.contains("Pizza muzzarella"));
    assert!(!text.contains('$'));
}

#[test]
fn pdf_and_html_formats_set_content_type() {
    let pdf = render_order(&order(), TicketKind::Receipt, TicketFormat::Pdf, &restaurant());
    assert_eq!(pdf.content_type, "application/pdf");
    assert!(pdf.body.starts_with(b"%PDF-1.4"));

    let html = render_order(&order(), TicketKind::Kitchen, TicketFormat::Html, &restaurant());
    assert_eq!(html.file_name, "kitchen-42.html");
    assert!(String::from_utf8(html.body).unwrap().contains("<title>"));
}

#[test]
fn closure_report_uses_local_offset() {
    let closure = CashRegisterClosure {
        id: Uuid::new_v4(),
        employee_id: None,
        opened_at: datetime!(2024-05-01 12:00 UTC),
        closed_at: Some(datetime!(2024-05-02 02:00 UTC)),
        opening_cash_cents: 10_000,
        counted_cash_cents: Some(24_500),
        expected_cash_cents: Some(25_000),
        difference_cents: Some(-500),
        notes: None,
    };
    let report = closure_report(&closure, Some("Ana".into()), 15_000, offset!(-3));
    assert_eq!(report.opened_at, datetime!(2024-05-01 09:00 -3));
    assert_eq!(report.closed_at, Some(datetime!(2024-05-01 23:00 -3)));
    assert_eq!(report.expected_cash_cents(), 25_000);
    assert_eq!(report.difference_cents(), Some(-500));
}

#[tokio::test]
async fn closed_shift_report_uses_frozen_figures() {
    let state = crate::state::test_helpers::test_app_state();
    let closure = CashRegisterClosure {
        id: Uuid::new_v4(),
        employee_id: None,
        opened_at: datetime!(2024-05-01 12:00 UTC),
        closed_at: Some(datetime!(2024-05-01 20:00 UTC)),
        opening_cash_cents: 5_000,
        counted_cash_cents: Some(9_000),
        expected_cash_cents: Some(9_500),
        difference_cents: Some(-500),
        notes: None,
    };
    let doc = render_closure(&state.pool, &closure, TicketFormat::Text, &RestaurantConfig::default())
        .await
        .unwrap();
    assert_eq!(doc.file_name, "closure-2024-05-01.txt");
    let text = String::from_utf8(doc.body).unwrap();
    assert!(text.contains("CASH REGISTER CLOSURE"));
    assert!(text.contains("$45.00"));
    assert!(text.contains("-$5.00"));
}
