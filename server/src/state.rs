//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the database pool, the restaurant's print and locale settings,
//! and the sending half of the order feed. Everything is cheap to clone.

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::broadcast;

use crate::config::RestaurantConfig;
use crate::services::feed::OrderEvent;

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub restaurant: Arc<RestaurantConfig>,
    /// Order mutations, relayed to websocket subscribers.
    pub feed: broadcast::Sender<OrderEvent>,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, restaurant: RestaurantConfig, feed_capacity: usize) -> Self {
        let (feed, _) = broadcast::channel(feed_capacity.max(1));
        Self { pool, restaurant: Arc::new(restaurant), feed }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
