//! Simulation error types.

use thiserror::Error;

/// Simulation-related errors.
///
/// Numeric drivers are clamped rather than rejected, so these only cover
/// inputs that cannot be mapped onto a valid value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SimulationError {
    /// Market condition name not recognized.
    #[error("Unknown market condition: {0}")]
    UnknownMarketCondition(String),

    /// A driver targets a category the baseline does not have.
    #[error("{driver} targets unknown category {category}")]
    UnknownCategory {
        /// Driver name.
        driver: String,
        /// Category name.
        category: String,
    },

    /// A driver targets a category that does not accept it.
    #[error("{driver} cannot be applied to category {category}")]
    CategoryNotAdjustable {
        /// Driver name.
        driver: String,
        /// Category name.
        category: String,
    },

    /// A configured driver range has min above max.
    #[error("Invalid bounds for {driver}: min is above max")]
    InvalidBounds {
        /// Driver name.
        driver: String,
    },
}
