//! Order status workflow.
//!
//! DESIGN
//! ======
//! Orders move one step at a time through `pending → preparing → ready →
//! delivered`. The kitchen may undo one step (`ready → preparing`,
//! `preparing → pending`) and any non-terminal order may be cancelled.
//! `delivered` and `cancelled` are terminal. Requesting the current status
//! is accepted as a no-op so double-clicks and retries are harmless.

use serde::{Deserialize, Serialize};

use crate::error::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

/// Outcome of checking a requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Already in the requested status; nothing to write.
    Unchanged,
    /// Legal move; write the new status.
    Move { from: OrderStatus, to: OrderStatus },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot move order from {} to {}", from.as_str(), to.as_str())]
pub struct IllegalTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

impl OrderStatus {
    pub const ALL: [Self; 5] = [Self::Pending, Self::Preparing, Self::Ready, Self::Delivered, Self::Cancelled];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    #[must_use]
    pub fn from_str(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "preparing" => Some(Self::Preparing),
            "ready" => Some(Self::Ready),
            "delivered" => Some(Self::Delivered),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Human label for printed tickets.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Preparing => "Preparing",
            Self::Ready => "Ready",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Forward step, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    /// Backward (undo) step, if any.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        match self {
            Self::Preparing => Some(Self::Pending),
            Self::Ready => Some(Self::Preparing),
            Self::Pending | Self::Delivered | Self::Cancelled => None,
        }
    }

    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == Self::Cancelled || self.next() == Some(to) || self.previous() == Some(to)
    }

    /// Check a requested change from `self` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalTransition`] when the move is not allowed.
    pub fn transition(self, to: Self) -> Result<Transition, IllegalTransition> {
        if self == to {
            return Ok(Transition::Unchanged);
        }
        if self.can_transition_to(to) {
            Ok(Transition::Move { from: self, to })
        } else {
            Err(IllegalTransition { from: self, to })
        }
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value).ok_or(UnknownVariant { kind: "order status", value })
    }
}

#[cfg(test)]
#[path = "workflow_test.rs"]
mod tests;
