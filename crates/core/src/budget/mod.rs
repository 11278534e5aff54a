//! Baseline budgets, derived metrics and variance analysis.

pub mod baseline;
pub mod error;
pub mod metrics;
pub mod presets;
pub mod profile;
pub mod types;
pub mod variance;

#[cfg(test)]
mod tests;

pub use baseline::BaselineModel;
pub use error::BudgetError;
pub use metrics::{DerivedMetrics, MetricsAggregator};
pub use profile::{AllocationSide, CategoryPolicy, CategoryProfile};
pub use types::{AMOUNT_DP, BudgetSnapshot, LineItem, LineKind, MAX_AMOUNT, normalize_amount};
pub use variance::{
    DeltaPercent, Favorability, Orientation, VarianceEntry, VarianceReporter, VarianceScope,
};
