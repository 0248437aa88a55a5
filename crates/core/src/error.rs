//! Domain error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation. `field` names the offending input.
    #[error("validation failed on `{field}`: {message}")]
    Validation {
        field: String,
        message: String,
        code: ErrorCode,
    },

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource was not found (domain-level).
    #[error("{0} not found")]
    NotFound(String),

    /// A conflict occurred (e.g. stale version).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
            code: ErrorCode::Invalid,
        }
    }

    pub fn required(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::Validation {
            message: format!("{field} is required"),
            field,
            code: ErrorCode::Required,
        }
    }

    pub fn zero_quantity(field: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: "quantity must be positive".to_string(),
            code: ErrorCode::ZeroQuantity,
        }
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

/// Stable, machine-readable error codes exposed to API consumers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Invalid,
    Required,
    NotFound,
    ZeroQuantity,
    PaymentError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Invalid => "INVALID",
            ErrorCode::Required => "REQUIRED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ZeroQuantity => "ZERO_QUANTITY",
            ErrorCode::PaymentError => "PAYMENT_ERROR",
        }
    }
}

impl core::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-attributed validation failure, suitable for client-side form display.
///
/// Serializes as `{"field": .., "message": .., "code": ..}`.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{field}: {message} ({code})")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub code: ErrorCode,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code,
        }
    }

    /// Payment failures are always attributed to the `payment` field.
    pub fn payment(message: impl Into<String>) -> Self {
        Self::new("payment", message, ErrorCode::PaymentError)
    }
}

impl ValidationError {
    /// Attribute a domain failure to an input field.
    ///
    /// Failures that carry no field of their own (invariant violations,
    /// conflicts) are attributed to `subject`, the object being changed.
    pub fn from_domain(err: DomainError, subject: &str) -> Self {
        match err {
            DomainError::Validation {
                field,
                message,
                code,
            } => ValidationError::new(field, message, code),
            DomainError::NotFound(what) => {
                ValidationError::new(what.clone(), format!("{what} not found"), ErrorCode::NotFound)
            }
            DomainError::InvalidId(msg) => ValidationError::new("id", msg, ErrorCode::Invalid),
            DomainError::InvariantViolation(msg) | DomainError::Conflict(msg) => {
                ValidationError::new(subject, msg, ErrorCode::Invalid)
            }
        }
    }
}
