//! Benchmark test for simulation performance.

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::time::Instant;

    use crate::budget::{BaselineModel, CategoryPolicy, CategoryProfile, LineItem, LineKind};
    use crate::simulation::{DriverSet, MarketCondition, NamedScenario, SimulationEngine};

    /// Generate a wide baseline with many categories.
    fn generate_baseline(num_categories: usize) -> BaselineModel {
        let mut policies = Vec::with_capacity(num_categories + 1);
        let mut items = Vec::with_capacity(num_categories + 1);

        policies.push(CategoryPolicy::new("Revenue", LineKind::Income));
        items.push(LineItem::new("Revenue", LineKind::Income, dec!(100000000)));

        for i in 0..num_categories {
            let name = format!("Category {i:04}");
            let policy = match i % 3 {
                0 => CategoryPolicy::new(&name, LineKind::Expense).revenue_coupled(),
                1 => CategoryPolicy::new(&name, LineKind::Expense).cuttable(),
                _ => CategoryPolicy::new(&name, LineKind::Expense).capital(),
            };
            policies.push(policy);
            items.push(LineItem::new(
                name,
                LineKind::Expense,
                Decimal::from((i as u64 + 1) * 1000),
            ));
        }

        BaselineModel::new(CategoryProfile::new("benchmark", policies), items).unwrap()
    }

    fn stress_drivers(num_categories: usize) -> DriverSet {
        let mut drivers = DriverSet::neutral()
            .with_market_condition(MarketCondition::Volatile { band: dec!(5) })
            .with_revenue_growth(dec!(7.5))
            .with_investment_ratio(dec!(60))
            .with_inflation(dec!(3));
        for i in 0..num_categories {
            let name = format!("Category {i:04}");
            drivers = match i % 3 {
                1 => drivers.with_cost_cut(name, dec!(12.5)),
                2 => drivers.with_delay(name, dec!(30)),
                _ => drivers,
            };
        }
        drivers
    }

    #[test]
    fn benchmark_single_scenario_300_categories() {
        let baseline = generate_baseline(300);
        let drivers = stress_drivers(300);
        let engine = SimulationEngine::default();

        let start = Instant::now();
        let result = engine.run(&baseline, &drivers, 42).unwrap();
        let duration = start.elapsed();

        println!("\n=== BENCHMARK: 300 categories, one scenario ===");
        println!("Duration: {:?}", duration);
        println!("Variance entries: {}", result.variance.len());

        assert_eq!(result.variance.len(), 301 + 3);
        assert!(
            duration.as_millis() < 2000,
            "Scenario took {}ms, expected <2000ms",
            duration.as_millis()
        );
    }

    #[test]
    fn benchmark_batch_50_scenarios() {
        let baseline = generate_baseline(100);
        let engine = SimulationEngine::default();
        let scenarios: Vec<NamedScenario> = (0..50u64)
            .map(|seed| NamedScenario::new(format!("Scenario {seed}"), stress_drivers(100), seed))
            .collect();

        let start = Instant::now();
        let results = engine.run_many(&baseline, &scenarios);
        let duration = start.elapsed();

        println!("\n=== BENCHMARK: 100 categories, 50 scenarios ===");
        println!("Duration: {:?}", duration);

        assert_eq!(results.len(), 50);
        assert!(results.iter().all(|r| r.outcome.is_ok()));
        assert!(
            duration.as_millis() < 5000,
            "Batch took {}ms, expected <5000ms",
            duration.as_millis()
        );
    }
}
