//! Error classification shared by services and routes.
//!
//! Services return their own `thiserror` enums; each implements [`ErrorCode`]
//! so the HTTP layer can pick a status and a grepable code without matching
//! on every variant itself.

/// How a failure should be reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    NotFound,
    Invalid,
    Conflict,
    Internal,
}

/// Grepable error code and class for structured error responses.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn class(&self) -> ErrorClass;
}

/// Error for a value read from the database that does not map to a known enum variant.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
