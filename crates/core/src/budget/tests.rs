//! Property-based tests for budget module.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::metrics::MetricsAggregator;
use super::presets;
use super::types::{BudgetSnapshot, LineItem};
use super::variance::{DeltaPercent, Favorability, Orientation, VarianceEntry, VarianceReporter, VarianceScope};

fn operating_snapshot(cents: [i64; 6]) -> BudgetSnapshot {
    let items = presets::operating_profile()
        .policies
        .iter()
        .zip(cents)
        .map(|(policy, cents)| LineItem::new(policy.category.clone(), policy.kind, Decimal::new(cents, 2)))
        .collect();
    BudgetSnapshot::from_items(items)
}

proptest! {
    /// Gross profit excludes operating expense; net income excludes nothing.
    #[test]
    fn test_metrics_identities(
        cents in prop::array::uniform6(0i64..10_000_000_000),
    ) {
        let snapshot = operating_snapshot(cents);
        let metrics = MetricsAggregator::compute(&snapshot);

        prop_assert_eq!(metrics.revenue, Decimal::new(cents[0], 2));
        prop_assert_eq!(metrics.cogs, Decimal::new(cents[1], 2));
        prop_assert_eq!(metrics.gross_profit, metrics.revenue - metrics.cogs);
        prop_assert_eq!(
            metrics.total_expense,
            cents[2..].iter().map(|&c| Decimal::new(c, 2)).sum::<Decimal>()
        );
        prop_assert_eq!(metrics.net_income, metrics.gross_profit - metrics.total_expense);
    }

    /// Income orientation: favorable iff delta >= 0
    #[test]
    fn test_income_favorability(
        baseline in 0i64..1_000_000_000,
        scenario in 0i64..1_000_000_000,
    ) {
        let baseline = Decimal::from(baseline);
        let scenario = Decimal::from(scenario);

        let entry = VarianceEntry::new("Revenue", VarianceScope::Category, Orientation::Income, baseline, scenario);

        prop_assert_eq!(entry.delta, scenario - baseline);
        if entry.delta >= Decimal::ZERO {
            prop_assert_eq!(entry.favorability, Favorability::Favorable);
        } else {
            prop_assert_eq!(entry.favorability, Favorability::Unfavorable);
        }
    }

    /// Expense orientation: favorable iff delta <= 0
    #[test]
    fn test_expense_favorability(
        baseline in 0i64..1_000_000_000,
        scenario in 0i64..1_000_000_000,
    ) {
        let baseline = Decimal::from(baseline);
        let scenario = Decimal::from(scenario);

        let entry = VarianceEntry::new("G&A", VarianceScope::Category, Orientation::Expense, baseline, scenario);

        prop_assert_eq!(entry.delta, scenario - baseline);
        if entry.delta <= Decimal::ZERO {
            prop_assert_eq!(entry.favorability, Favorability::Favorable);
        } else {
            prop_assert_eq!(entry.favorability, Favorability::Unfavorable);
        }
    }

    /// Percentage is defined whenever baseline is non-zero, and never when
    /// only the scenario is.
    #[test]
    fn test_delta_percent_defined(
        baseline in 0i64..1_000_000,
        scenario in 0i64..1_000_000,
    ) {
        let baseline = Decimal::from(baseline);
        let delta = Decimal::from(scenario) - baseline;

        match DeltaPercent::compute(baseline, delta) {
            DeltaPercent::Value(percent) => {
                prop_assert!(!baseline.is_zero() || delta.is_zero());
                prop_assert!(percent.scale() <= 2);
            }
            DeltaPercent::NotApplicable => {
                prop_assert!(baseline.is_zero());
                prop_assert!(!delta.is_zero());
            }
        }
    }

    /// One entry per category plus three metrics, in category order.
    #[test]
    fn test_report_shape(
        before in prop::array::uniform6(0i64..10_000_000_000),
        after in prop::array::uniform6(0i64..10_000_000_000),
    ) {
        let baseline = operating_snapshot(before);
        let scenario = operating_snapshot(after);

        let report = VarianceReporter::compare(&baseline, &scenario);

        prop_assert_eq!(report.len(), baseline.len() + 3);
        for (entry, item) in report.iter().zip(baseline.iter()) {
            prop_assert_eq!(entry.label.as_str(), item.category());
            prop_assert_eq!(entry.scope, VarianceScope::Category);
        }
        let net_income = &report[report.len() - 1];
        let expected = MetricsAggregator::compute(&scenario).net_income
            - MetricsAggregator::compute(&baseline).net_income;
        prop_assert_eq!(net_income.delta, expected);
    }
}
