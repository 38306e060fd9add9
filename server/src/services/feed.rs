//! In-process order feed.
//!
//! Order routes publish an [`OrderEvent`] after each successful mutation;
//! the websocket relay in `routes::ws` forwards events to kitchen screens.
//! Publishing never blocks and never fails the request: with no subscribers
//! the event is dropped.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::services::order::Order;
use crate::services::workflow::OrderStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEventKind {
    #[serde(rename = "order:created")]
    Created,
    #[serde(rename = "order:updated")]
    Updated,
    #[serde(rename = "order:status")]
    Status,
    #[serde(rename = "order:deleted")]
    Deleted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    pub event: OrderEventKind,
    pub order_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub order: Option<Box<Order>>,
}

impl OrderEvent {
    fn with_order(event: OrderEventKind, order: &Order) -> Self {
        Self { event, order_id: order.id, status: Some(order.status), order: Some(Box::new(order.clone())) }
    }

    #[must_use]
    pub fn created(order: &Order) -> Self {
        Self::with_order(OrderEventKind::Created, order)
    }

    #[must_use]
    pub fn updated(order: &Order) -> Self {
        Self::with_order(OrderEventKind::Updated, order)
    }

    #[must_use]
    pub fn status_changed(order: &Order) -> Self {
        Self::with_order(OrderEventKind::Status, order)
    }

    #[must_use]
    pub fn deleted(order_id: Uuid) -> Self {
        Self { event: OrderEventKind::Deleted, order_id, status: None, order: None }
    }
}

/// Broadcast an event to current subscribers.
pub fn publish(feed: &broadcast::Sender<OrderEvent>, event: OrderEvent) {
    let kind = event.event;
    let order_id = event.order_id;
    match feed.send(event) {
        Ok(receivers) => tracing::debug!(?kind, %order_id, receivers, "order event published"),
        Err(_) => tracing::trace!(?kind, %order_id, "order event dropped: no subscribers"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deleted_event_serializes_without_optional_fields() {
        let id = Uuid::nil();
        let json = serde_json::to_value(OrderEvent::deleted(id)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"event": "order:deleted", "order_id": "00000000-0000-0000-0000-000000000000"})
        );
    }

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let (tx, mut rx) = broadcast::channel(4);
        let id = Uuid::new_v4();
        publish(&tx, OrderEvent::deleted(id));
        let event = rx.recv().await.unwrap();
        assert_eq!(event.event, OrderEventKind::Deleted);
        assert_eq!(event.order_id, id);
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let (tx, rx) = broadcast::channel::<OrderEvent>(4);
        drop(rx);
        publish(&tx, OrderEvent::deleted(Uuid::new_v4()));
    }
}
