//! Simulation engine for running scenario projections.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rayon::prelude::*;
use tracing::debug;

use super::config::EngineConfig;
use super::drivers::{ClampNotice, DriverSet, MarketCondition};
use super::error::SimulationError;
use super::narrative::NarrativeGenerator;
use super::pipeline::Pipeline;
use super::types::{NamedResult, NamedScenario, ScenarioResult};
use crate::budget::{BaselineModel, CategoryProfile, MetricsAggregator, VarianceReporter};

/// Engine for running what-if simulations.
///
/// Every run recomputes from the baseline; nothing is carried over between
/// runs.
#[derive(Debug, Default)]
pub struct SimulationEngine {
    config: EngineConfig,
    pipeline: Pipeline,
}

impl SimulationEngine {
    /// Creates an engine with the standard pipeline.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_pipeline(config, Pipeline::standard())
    }

    /// Creates an engine with a custom pipeline.
    #[must_use]
    pub fn with_pipeline(config: EngineConfig, pipeline: Pipeline) -> Self {
        Self { config, pipeline }
    }

    /// Engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Transform pipeline.
    #[must_use]
    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Parses a market condition using the configured default volatility band.
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::UnknownMarketCondition` for unknown names.
    pub fn parse_market_condition(&self, s: &str) -> Result<MarketCondition, SimulationError> {
        MarketCondition::parse_with_band(s, self.config.default_volatility_band)
    }

    /// Validates drivers against the profile, then clamps them into bounds.
    ///
    /// # Errors
    ///
    /// Returns an error when a cut or delay targets an unknown or ineligible
    /// category.
    pub fn prepare(
        &self,
        profile: &CategoryProfile,
        drivers: &DriverSet,
    ) -> Result<(DriverSet, Vec<ClampNotice>), SimulationError> {
        drivers.validate(profile)?;
        Ok(drivers.clamp(&self.config.bounds))
    }

    /// Runs one scenario.
    ///
    /// `seed` only matters for a volatile market.
    ///
    /// # Errors
    ///
    /// Returns an error when the drivers are rejected by [`Self::prepare`].
    pub fn run(
        &self,
        baseline: &BaselineModel,
        drivers: &DriverSet,
        seed: u64,
    ) -> Result<ScenarioResult, SimulationError> {
        let (applied, adjustments) = self.prepare(baseline.profile(), drivers)?;
        let parameters_hash = self.hash_inputs(baseline, drivers, seed);

        debug!(
            hash = %parameters_hash,
            adjustments = adjustments.len(),
            "Running scenario"
        );

        let output = self
            .pipeline
            .run(baseline, &applied, &self.config.shocks, seed);

        let baseline_metrics = MetricsAggregator::compute(baseline.snapshot());
        let metrics = MetricsAggregator::compute(&output.snapshot);
        let variance = VarianceReporter::compare(baseline.snapshot(), &output.snapshot);
        let narrative =
            NarrativeGenerator::describe(baseline.profile(), &applied, &self.config.shocks);

        debug!(
            hash = %parameters_hash,
            net_income = %metrics.net_income,
            "Scenario complete"
        );

        Ok(ScenarioResult {
            scenario: output.snapshot,
            baseline_metrics,
            metrics,
            variance,
            narrative,
            allocation: output.allocation,
            applied_drivers: applied,
            adjustments,
            parameters_hash,
            cached: false,
        })
    }

    /// Runs independent scenarios in parallel.
    ///
    /// Results come back in input order; a rejected scenario does not stop
    /// the others.
    #[must_use]
    pub fn run_many(
        &self,
        baseline: &BaselineModel,
        scenarios: &[NamedScenario],
    ) -> Vec<NamedResult> {
        debug!(count = scenarios.len(), "Running scenario batch");

        scenarios
            .par_iter()
            .map(|scenario| NamedResult {
                name: scenario.name.clone(),
                outcome: self.run(baseline, &scenario.drivers, scenario.seed),
            })
            .collect()
    }

    /// Hashes every input of a run, for use as a cache key.
    #[must_use]
    pub fn hash_inputs(&self, baseline: &BaselineModel, drivers: &DriverSet, seed: u64) -> String {
        let mut hasher = DefaultHasher::new();
        baseline.hash(&mut hasher);
        drivers.hash(&mut hasher);
        seed.hash(&mut hasher);
        self.config.hash(&mut hasher);
        self.pipeline.stages().hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }
}
