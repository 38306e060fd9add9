//! Domain services used by the HTTP and websocket routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business rules and SQL so route handlers stay focused
//! on protocol translation. Each service returns its own error enum; the
//! route layer maps it through [`crate::error::ErrorCode`].

pub mod cash_register;
pub mod customer;
pub mod dashboard;
pub mod employee;
pub mod feed;
pub mod fields;
pub mod menu;
pub mod order;
pub mod ticket;
pub mod workflow;
