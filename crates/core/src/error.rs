//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// balance checks). Storage failures belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. a non-positive spend amount).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Not enough points to cover the requested deduction.
    ///
    /// `available` is the payer balance for adjustments, or the account total
    /// for spends.
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: i64, available: i64 },

    /// An identifier was invalid (e.g. blank account id).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A point total does not fit in a signed 64-bit integer.
    #[error("arithmetic overflow: {0}")]
    Overflow(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn insufficient_balance(requested: i64, available: i64) -> Self {
        Self::InsufficientBalance {
            requested,
            available,
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::Overflow(msg.into())
    }
}
