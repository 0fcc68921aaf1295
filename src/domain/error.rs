//! Domain validation errors for core domain types.
//!
//! These errors are returned by `try_new` constructors and parsers when a
//! value falls outside the range the domain allows.
//!
//! # Examples
//!
//! ```
//! use augury::domain::error::DomainError;
//! use augury::domain::snapshot::SentimentReading;
//!
//! let result = SentimentReading::try_new(1.4, 0.2, 3);
//! assert!(matches!(result, Err(DomainError::SentimentOutOfRange { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Identifiers such as tickers and strategy names must not be blank.
    #[error("{kind} identifier cannot be empty")]
    EmptyIdentifier {
        /// Which identifier was blank.
        kind: &'static str,
    },

    /// Action labels must be one of buy, sell or hold.
    #[error("unknown action '{value}'")]
    UnknownAction {
        /// The label that failed to parse.
        value: String,
    },

    /// Confidence must be a finite number in [0, 1].
    #[error("confidence must be within [0, 1], got {value}")]
    InvalidConfidence {
        /// The rejected confidence.
        value: f64,
    },

    /// Sentiment score lives in [-1, 1] and magnitude in [0, 1].
    #[error("sentiment {field} out of range: {value}")]
    SentimentOutOfRange {
        /// Either `score` or `magnitude`.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Observed prices cannot be negative.
    #[error("price cannot be negative, got {price}")]
    NegativePrice {
        /// The rejected price.
        price: rust_decimal::Decimal,
    },
}
