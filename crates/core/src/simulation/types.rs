//! Simulation data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::drivers::{ClampNotice, DriverSet};
use super::error::SimulationError;
use crate::budget::{
    AMOUNT_DP, AllocationSide, BudgetSnapshot, CategoryProfile, DerivedMetrics, VarianceEntry,
};

/// Reporting split of the investment pool between R&D and Sales & Marketing.
///
/// Amounts are indicative only; the scenario snapshot is not redistributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentAllocation {
    /// Share of the pool directed to R&D.
    pub research_percent: Decimal,
    /// Share of the pool directed to Sales & Marketing.
    pub commercial_percent: Decimal,
    /// Current sum of every allocated category.
    pub pool: Decimal,
    /// Indicative R&D amount.
    pub research_amount: Decimal,
    /// Indicative Sales & Marketing amount.
    pub commercial_amount: Decimal,
}

impl InvestmentAllocation {
    /// Splits the pool found in `snapshot` by `ratio` percent to R&D.
    #[must_use]
    pub fn compute(snapshot: &BudgetSnapshot, profile: &CategoryProfile, ratio: Decimal) -> Self {
        let pool: Decimal = [AllocationSide::Research, AllocationSide::Commercial]
            .into_iter()
            .flat_map(|side| profile.allocated_to(side))
            .filter_map(|policy| snapshot.amount(&policy.category))
            .sum();
        let research_amount = (pool * ratio / Decimal::ONE_HUNDRED).round_dp(AMOUNT_DP);

        Self {
            research_percent: ratio,
            commercial_percent: Decimal::ONE_HUNDRED - ratio,
            pool,
            research_amount,
            commercial_amount: pool - research_amount,
        }
    }
}

/// Result bundle of one scenario run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Projected budget.
    pub scenario: BudgetSnapshot,
    /// Metrics of the baseline.
    pub baseline_metrics: DerivedMetrics,
    /// Metrics of the projected budget.
    pub metrics: DerivedMetrics,
    /// Per-category and per-metric variance against baseline.
    pub variance: Vec<VarianceEntry>,
    /// Statements describing every non-neutral driver, in stage order.
    pub narrative: Vec<String>,
    /// Investment trade-off split.
    pub allocation: InvestmentAllocation,
    /// Drivers after clamping.
    pub applied_drivers: DriverSet,
    /// Driver values moved into their domain.
    pub adjustments: Vec<ClampNotice>,
    /// Hash of the inputs (for caching).
    pub parameters_hash: String,
    /// Whether this result was returned from cache.
    pub cached: bool,
}

/// A scenario to run as part of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedScenario {
    /// Display name (e.g., "Downside").
    pub name: String,
    /// Drivers.
    pub drivers: DriverSet,
    /// Seed for the volatile market shock.
    pub seed: u64,
}

impl NamedScenario {
    /// Creates a named scenario.
    #[must_use]
    pub fn new(name: impl Into<String>, drivers: DriverSet, seed: u64) -> Self {
        Self {
            name: name.into(),
            drivers,
            seed,
        }
    }
}

/// Outcome of one scenario of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedResult {
    /// Scenario name.
    pub name: String,
    /// Result bundle or the reason the drivers were rejected.
    pub outcome: Result<ScenarioResult, SimulationError>,
}
