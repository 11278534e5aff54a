//! Budget error types.

use thiserror::Error;

use super::types::LineKind;

/// Baseline construction errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BudgetError {
    /// Amount cannot be negative.
    #[error("Amount cannot be negative for category {0}")]
    NegativeAmount(String),

    /// Amount exceeds [`MAX_AMOUNT`](super::types::MAX_AMOUNT).
    #[error("Amount exceeds the supported maximum for category {0}")]
    AmountTooLarge(String),

    /// A category appears more than once.
    #[error("Duplicate category: {0}")]
    DuplicateCategory(String),

    /// A line item names a category the profile does not define.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// A profile category has no line item.
    #[error("Missing category: {0}")]
    MissingCategory(String),

    /// A line item kind disagrees with its profile policy.
    #[error("Kind mismatch for {category}: expected {expected:?}, got {got:?}")]
    KindMismatch {
        /// Category name.
        category: String,
        /// Kind declared by the profile.
        expected: LineKind,
        /// Kind of the supplied line item.
        got: LineKind,
    },
}
