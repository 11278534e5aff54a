//! Property-based tests for simulation module.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::drivers::{DriverSet, MarketCondition};
use super::engine::SimulationEngine;
use crate::budget::presets::{self, operating};
use crate::budget::{BaselineModel, Favorability, LineItem, VarianceScope};

/// Operating baseline with the given amounts in cents, in profile order.
fn operating_baseline(cents: [i64; 6]) -> BaselineModel {
    let profile = presets::operating_profile();
    let items = profile
        .policies
        .iter()
        .zip(cents)
        .map(|(policy, cents)| LineItem::new(policy.category.clone(), policy.kind, Decimal::new(cents, 2)))
        .collect();
    BaselineModel::new(profile, items).unwrap()
}

fn percent(min_bps: i64, max_bps: i64) -> impl Strategy<Value = Decimal> {
    (min_bps..=max_bps).prop_map(|bps| Decimal::new(bps, 2))
}

fn market_condition() -> impl Strategy<Value = MarketCondition> {
    prop_oneof![
        Just(MarketCondition::Stable),
        Just(MarketCondition::Recession),
        Just(MarketCondition::HighInflation),
        percent(0, 2000).prop_map(|band| MarketCondition::Volatile { band }),
    ]
}

/// Drivers with values inside and outside their domains.
fn drivers() -> impl Strategy<Value = DriverSet> {
    (
        market_condition(),
        percent(-15000, 15000),
        percent(-1000, 8000),
        percent(-1000, 8000),
        percent(-1000, 11000),
        percent(-500, 3000),
    )
        .prop_map(|(condition, growth, marketing, ga, ratio, inflation)| {
            DriverSet::neutral()
                .with_market_condition(condition)
                .with_revenue_growth(growth)
                .with_cost_cut(operating::MARKETING, marketing)
                .with_cost_cut(operating::GA, ga)
                .with_investment_ratio(ratio)
                .with_inflation(inflation)
        })
}

fn cuttable_category() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just(operating::MARKETING),
        Just(operating::RD),
        Just(operating::GA),
    ]
}

proptest! {
    /// Neutral drivers leave the baseline untouched.
    #[test]
    fn test_neutral_drivers_are_noop(
        cents in prop::array::uniform6(0i64..10_000_000_000),
        seed in any::<u64>(),
    ) {
        let baseline = operating_baseline(cents);
        let result = SimulationEngine::default()
            .run(&baseline, &DriverSet::neutral(), seed)
            .unwrap();

        prop_assert_eq!(&result.scenario, baseline.snapshot());
        prop_assert!(result.narrative.is_empty());
        for entry in &result.variance {
            prop_assert_eq!(entry.delta, Decimal::ZERO);
            prop_assert_eq!(entry.favorability, Favorability::Favorable);
        }
    }

    /// Derived metrics always satisfy their defining identities.
    #[test]
    fn test_metric_identities(
        cents in prop::array::uniform6(0i64..10_000_000_000),
        drivers in drivers(),
        seed in any::<u64>(),
    ) {
        let baseline = operating_baseline(cents);
        let result = SimulationEngine::default().run(&baseline, &drivers, seed).unwrap();

        for metrics in [result.baseline_metrics, result.metrics] {
            prop_assert_eq!(metrics.gross_profit, metrics.revenue - metrics.cogs);
            prop_assert_eq!(
                metrics.net_income,
                metrics.gross_profit - metrics.total_expense
            );
        }
    }

    /// Same inputs give the same bundle.
    #[test]
    fn test_idempotent(
        cents in prop::array::uniform6(0i64..10_000_000_000),
        drivers in drivers(),
        seed in any::<u64>(),
    ) {
        let baseline = operating_baseline(cents);
        let engine = SimulationEngine::default();

        let first = engine.run(&baseline, &drivers, seed).unwrap();
        let second = engine.run(&baseline, &drivers, seed).unwrap();

        prop_assert_eq!(first, second);
    }

    /// No driver combination produces a negative amount.
    #[test]
    fn test_amounts_never_negative(
        cents in prop::array::uniform6(0i64..10_000_000_000),
        drivers in drivers(),
        seed in any::<u64>(),
    ) {
        let baseline = operating_baseline(cents);
        let result = SimulationEngine::default().run(&baseline, &drivers, seed).unwrap();

        for item in result.scenario.iter() {
            prop_assert!(item.amount() >= Decimal::ZERO);
            prop_assert!(item.amount().scale() <= 4);
        }
    }

    /// Raising one cut from zero strictly lowers that category and never
    /// raises another.
    #[test]
    fn test_cost_cut_monotonic(
        cents in prop::array::uniform6(100i64..10_000_000_000),
        drivers in drivers(),
        category in cuttable_category(),
        cut in 1i64..=50,
        seed in any::<u64>(),
    ) {
        let baseline = operating_baseline(cents);
        let engine = SimulationEngine::default();
        let without = drivers.with_cost_cut(category, Decimal::ZERO);
        let with = without.clone().with_cost_cut(category, Decimal::from(cut));

        let before = engine.run(&baseline, &without, seed).unwrap().scenario;
        let after = engine.run(&baseline, &with, seed).unwrap().scenario;

        for (old, new) in before.iter().zip(after.iter()) {
            if old.category() == category {
                prop_assert!(new.amount() < old.amount());
            } else {
                prop_assert!(new.amount() <= old.amount());
            }
        }
    }

    /// Cuts above the maximum clamp to it; cuts below zero clamp to zero.
    #[test]
    fn test_cost_cut_clamped(
        cents in prop::array::uniform6(0i64..10_000_000_000),
        category in cuttable_category(),
        over in percent(5001, 100_000),
        under in percent(-100_000, -1),
    ) {
        let baseline = operating_baseline(cents);
        let engine = SimulationEngine::default();
        let original = baseline.snapshot().amount(category).unwrap();

        let high = engine
            .run(&baseline, &DriverSet::neutral().with_cost_cut(category, over), 0)
            .unwrap();
        prop_assert_eq!(high.applied_drivers.cost_cut(category), dec!(50));
        prop_assert_eq!(
            high.scenario.amount(category).unwrap(),
            (original * dec!(0.5)).round_dp(4)
        );
        prop_assert_eq!(high.adjustments.len(), 1);

        let low = engine
            .run(&baseline, &DriverSet::neutral().with_cost_cut(category, under), 0)
            .unwrap();
        prop_assert_eq!(low.applied_drivers.cost_cut(category), Decimal::ZERO);
        prop_assert_eq!(low.scenario.amount(category).unwrap(), original);
    }

    /// A volatile market is reproducible per seed and stays within its band.
    #[test]
    fn test_volatile_within_band(
        cents in prop::array::uniform6(0i64..10_000_000_000),
        band in percent(0, 2000),
        seed in any::<u64>(),
    ) {
        let baseline = operating_baseline(cents);
        let engine = SimulationEngine::default();
        let drivers = DriverSet::neutral()
            .with_market_condition(MarketCondition::Volatile { band });

        let first = engine.run(&baseline, &drivers, seed).unwrap();
        let second = engine.run(&baseline, &drivers, seed).unwrap();
        prop_assert_eq!(&first.scenario, &second.scenario);

        let spread = band / dec!(100);
        let tolerance = dec!(0.0001);
        for (old, new) in baseline.snapshot().iter().zip(first.scenario.iter()) {
            let low = old.amount() * (Decimal::ONE - spread);
            let high = old.amount() * (Decimal::ONE + spread);
            prop_assert!(new.amount() >= low - tolerance);
            prop_assert!(new.amount() <= high + tolerance);
        }
    }

    /// Category variance is scenario minus baseline.
    #[test]
    fn test_variance_delta(
        cents in prop::array::uniform6(0i64..10_000_000_000),
        drivers in drivers(),
    ) {
        let baseline = operating_baseline(cents);
        let result = SimulationEngine::default().run(&baseline, &drivers, 0).unwrap();

        let categories = result
            .variance
            .iter()
            .filter(|entry| entry.scope == VarianceScope::Category);
        for entry in categories {
            let scenario = result.scenario.amount(&entry.label).unwrap();
            let original = baseline.snapshot().amount(&entry.label).unwrap();
            prop_assert_eq!(entry.delta, scenario - original);
        }
    }

    /// Hash should be deterministic for same inputs
    #[test]
    fn test_hash_deterministic(
        drivers in drivers(),
        seed in any::<u64>(),
    ) {
        let engine = SimulationEngine::default();
        let baseline = presets::demo_operating_baseline().unwrap();

        let hash1 = engine.hash_inputs(&baseline, &drivers, seed);
        let hash2 = engine.hash_inputs(&baseline, &drivers, seed);

        prop_assert_eq!(hash1, hash2);
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::simulation::pipeline::{Pipeline, Stage};

    #[test]
    fn test_engine_uses_documented_stage_order() {
        let engine = SimulationEngine::default();
        assert_eq!(engine.pipeline().stages(), Stage::ORDER.to_vec());
        assert_eq!(Pipeline::default().stages(), Stage::ORDER.to_vec());
    }

    #[test]
    fn test_zero_baseline_category_variance() {
        let baseline = operating_baseline([100_000, 0, 0, 0, 0, 0]);
        let drivers = DriverSet::neutral().with_revenue_growth(dec!(10));
        let result = SimulationEngine::default().run(&baseline, &drivers, 0).unwrap();

        // COGS stays at zero, so its percentage is defined.
        let cogs = &result.variance[1];
        assert_eq!(cogs.delta, Decimal::ZERO);
        assert_eq!(cogs.delta_percent.value(), Some(Decimal::ZERO));
    }
}
