//! Derived financial metrics.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{BudgetSnapshot, LineKind};

/// Totals derived from a snapshot. Never stored apart from the snapshot it
/// was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Sum of income lines.
    pub revenue: Decimal,
    /// Sum of cost-of-sales lines.
    pub cogs: Decimal,
    /// Revenue minus COGS.
    pub gross_profit: Decimal,
    /// Sum of expense lines, COGS excluded.
    pub total_expense: Decimal,
    /// Gross profit minus total expense.
    pub net_income: Decimal,
}

/// Computes derived metrics.
pub struct MetricsAggregator;

impl MetricsAggregator {
    /// Aggregates a snapshot.
    ///
    /// COGS is only counted in gross profit, never again in total expense.
    #[must_use]
    pub fn compute(snapshot: &BudgetSnapshot) -> DerivedMetrics {
        let revenue = snapshot.total_of(LineKind::Income);
        let cogs = snapshot.total_of(LineKind::CostOfSales);
        let total_expense = snapshot.total_of(LineKind::Expense);
        let gross_profit = revenue - cogs;

        DerivedMetrics {
            revenue,
            cogs,
            gross_profit,
            total_expense,
            net_income: gross_profit - total_expense,
        }
    }
}
