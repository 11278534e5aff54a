//! Baseline vs. scenario variance calculations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::metrics::{DerivedMetrics, MetricsAggregator};
use super::types::BudgetSnapshot;

/// Label of the gross profit variance entry.
pub const GROSS_PROFIT: &str = "Gross Profit";
/// Label of the total expense variance entry.
pub const TOTAL_EXPENSE: &str = "Total Expense";
/// Label of the net income variance entry.
pub const NET_INCOME: &str = "Net Income";

/// Which direction of change is good for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Higher is better (revenue, profit).
    Income,
    /// Lower is better (costs).
    Expense,
}

/// What a variance entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceScope {
    /// A budget category.
    Category,
    /// A derived metric.
    Metric,
}

/// Favorability of a variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Favorability {
    /// Scenario is at least as good as baseline.
    Favorable,
    /// Scenario is worse than baseline.
    Unfavorable,
}

/// Relative change against baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum DeltaPercent {
    /// Percentage change, rounded to 2 places.
    Value(Decimal),
    /// Baseline is zero and scenario is not; no finite percentage exists.
    NotApplicable,
}

impl DeltaPercent {
    /// Computes `delta / baseline * 100`.
    #[must_use]
    pub fn compute(baseline: Decimal, delta: Decimal) -> Self {
        if baseline.is_zero() {
            if delta.is_zero() {
                Self::Value(Decimal::ZERO)
            } else {
                Self::NotApplicable
            }
        } else {
            Self::Value((delta / baseline * Decimal::ONE_HUNDRED).round_dp(2))
        }
    }

    /// Numeric value, if defined.
    #[must_use]
    pub const fn value(self) -> Option<Decimal> {
        match self {
            Self::Value(value) => Some(value),
            Self::NotApplicable => None,
        }
    }
}

/// One row of the variance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceEntry {
    /// Category name or metric label.
    pub label: String,
    /// Category or derived metric.
    pub scope: VarianceScope,
    /// Favorability convention applied.
    pub orientation: Orientation,
    /// Baseline amount.
    pub baseline_amount: Decimal,
    /// Scenario amount.
    pub scenario_amount: Decimal,
    /// Scenario minus baseline.
    pub delta: Decimal,
    /// Delta relative to baseline.
    pub delta_percent: DeltaPercent,
    /// Favorable or unfavorable under the entry's orientation.
    pub favorability: Favorability,
}

impl VarianceEntry {
    /// Builds an entry; the delta is always `scenario - baseline`.
    ///
    /// For income orientation a non-negative delta is favorable, for expense
    /// orientation a non-positive one is.
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        scope: VarianceScope,
        orientation: Orientation,
        baseline: Decimal,
        scenario: Decimal,
    ) -> Self {
        let delta = scenario - baseline;
        let favorable = match orientation {
            Orientation::Income => delta >= Decimal::ZERO,
            Orientation::Expense => delta <= Decimal::ZERO,
        };

        Self {
            label: label.into(),
            scope,
            orientation,
            baseline_amount: baseline,
            scenario_amount: scenario,
            delta,
            delta_percent: DeltaPercent::compute(baseline, delta),
            favorability: if favorable {
                Favorability::Favorable
            } else {
                Favorability::Unfavorable
            },
        }
    }
}

/// Compares a scenario against its baseline.
pub struct VarianceReporter;

impl VarianceReporter {
    /// Produces one entry per baseline category, then gross profit, total
    /// expense and net income.
    ///
    /// Categories missing from the scenario count as zero.
    #[must_use]
    pub fn compare(baseline: &BudgetSnapshot, scenario: &BudgetSnapshot) -> Vec<VarianceEntry> {
        let mut entries = Vec::with_capacity(baseline.len() + 3);

        for item in baseline.iter() {
            let orientation = if item.kind().is_expense_like() {
                Orientation::Expense
            } else {
                Orientation::Income
            };
            entries.push(VarianceEntry::new(
                item.category(),
                VarianceScope::Category,
                orientation,
                item.amount(),
                scenario.amount(item.category()).unwrap_or(Decimal::ZERO),
            ));
        }

        let before = MetricsAggregator::compute(baseline);
        let after = MetricsAggregator::compute(scenario);
        entries.extend(Self::compare_metrics(&before, &after));

        entries
    }

    /// Variance entries for the derived metrics only.
    #[must_use]
    pub fn compare_metrics(baseline: &DerivedMetrics, scenario: &DerivedMetrics) -> [VarianceEntry; 3] {
        [
            VarianceEntry::new(
                GROSS_PROFIT,
                VarianceScope::Metric,
                Orientation::Income,
                baseline.gross_profit,
                scenario.gross_profit,
            ),
            VarianceEntry::new(
                TOTAL_EXPENSE,
                VarianceScope::Metric,
                Orientation::Expense,
                baseline.total_expense,
                scenario.total_expense,
            ),
            VarianceEntry::new(
                NET_INCOME,
                VarianceScope::Metric,
                Orientation::Income,
                baseline.net_income,
                scenario.net_income,
            ),
        ]
    }
}
