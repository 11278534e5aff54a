//! Simulation result caching using Moka.
//!
//! Provides in-memory caching for scenario results to avoid
//! redundant computations when the same inputs are used.

use budgetlab_shared::config::CacheSettings;
use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;

use super::drivers::DriverSet;
use super::engine::SimulationEngine;
use super::error::SimulationError;
use super::types::ScenarioResult;
use crate::budget::BaselineModel;

/// Default cache capacity (number of entries).
const DEFAULT_CACHE_CAPACITY: u64 = 100;

/// Default time-to-live for cache entries (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

/// Cache for scenario results.
///
/// Uses the input hash as the cache key and stores complete
/// result bundles. Thread-safe and suitable for concurrent access.
#[derive(Clone)]
pub struct SimulationCache {
    cache: Cache<String, Arc<ScenarioResult>>,
}

impl SimulationCache {
    /// Creates a new simulation cache with default settings.
    ///
    /// Default: 100 entries max, 5 minute TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a new simulation cache with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `max_capacity` - Maximum number of entries to cache
    /// * `ttl_secs` - Time-to-live in seconds for each entry
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Creates a cache from the `cache` configuration section.
    #[must_use]
    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::with_config(settings.capacity, settings.ttl_secs)
    }

    /// Runs a scenario, returning cached results if available.
    ///
    /// If a cached result exists for the given inputs, it is returned
    /// with `cached: true`. Otherwise, the scenario is run and the result
    /// is cached before being returned. Rejected drivers are never cached.
    ///
    /// # Errors
    ///
    /// Returns the engine's error when the drivers are rejected.
    pub fn run_cached(
        &self,
        engine: &SimulationEngine,
        baseline: &BaselineModel,
        drivers: &DriverSet,
        seed: u64,
    ) -> Result<ScenarioResult, SimulationError> {
        let cache_key = engine.hash_inputs(baseline, drivers, seed);

        // Check cache first
        if let Some(cached_result) = self.cache.get(&cache_key) {
            let mut result = (*cached_result).clone();
            result.cached = true;
            return Ok(result);
        }

        let result = engine.run(baseline, drivers, seed)?;

        self.cache.insert(cache_key, Arc::new(result.clone()));

        Ok(result)
    }

    /// Invalidates all cached entries.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Invalidates the entry for one set of inputs.
    pub fn invalidate(
        &self,
        engine: &SimulationEngine,
        baseline: &BaselineModel,
        drivers: &DriverSet,
        seed: u64,
    ) {
        let cache_key = engine.hash_inputs(baseline, drivers, seed);
        self.cache.invalidate(&cache_key);
    }

    /// Returns the number of entries currently in the cache.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs cache maintenance tasks.
    ///
    /// Moka handles this automatically in the background, but calling
    /// this explicitly can help reclaim memory sooner.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

impl Default for SimulationCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::presets::{self, operating};
    use rust_decimal_macros::dec;

    fn create_test_drivers() -> DriverSet {
        DriverSet::neutral()
            .with_revenue_growth(dec!(10))
            .with_cost_cut(operating::MARKETING, dec!(10))
    }

    fn create_test_baseline() -> BaselineModel {
        presets::demo_operating_baseline().unwrap()
    }

    #[test]
    fn test_cache_miss_then_hit() {
        let cache = SimulationCache::new();
        let engine = SimulationEngine::default();
        let baseline = create_test_baseline();
        let drivers = create_test_drivers();

        let result1 = cache.run_cached(&engine, &baseline, &drivers, 0).unwrap();
        assert!(!result1.cached, "First call should not be cached");

        let result2 = cache.run_cached(&engine, &baseline, &drivers, 0).unwrap();
        assert!(result2.cached, "Second call should be cached");

        assert_eq!(result1.parameters_hash, result2.parameters_hash);
        assert_eq!(result1.scenario, result2.scenario);
    }

    #[test]
    fn test_different_drivers_not_cached() {
        let cache = SimulationCache::new();
        let engine = SimulationEngine::default();
        let baseline = create_test_baseline();

        let drivers1 = create_test_drivers();
        let drivers2 = create_test_drivers().with_inflation(dec!(3));

        let result1 = cache.run_cached(&engine, &baseline, &drivers1, 0).unwrap();
        assert!(!result1.cached);

        let result2 = cache.run_cached(&engine, &baseline, &drivers2, 0).unwrap();
        assert!(!result2.cached, "Different drivers should not hit cache");

        let result3 = cache.run_cached(&engine, &baseline, &drivers1, 0).unwrap();
        assert!(result3.cached, "Same drivers should hit cache");
    }

    #[test]
    fn test_seed_is_part_of_key() {
        let cache = SimulationCache::new();
        let engine = SimulationEngine::default();
        let baseline = create_test_baseline();
        let drivers = create_test_drivers();

        let _ = cache.run_cached(&engine, &baseline, &drivers, 1).unwrap();
        let result = cache.run_cached(&engine, &baseline, &drivers, 2).unwrap();
        assert!(!result.cached);
    }

    #[test]
    fn test_rejected_drivers_not_cached() {
        let cache = SimulationCache::new();
        let engine = SimulationEngine::default();
        let baseline = create_test_baseline();
        let drivers = DriverSet::neutral().with_cost_cut("Travel", dec!(10));

        assert!(cache.run_cached(&engine, &baseline, &drivers, 0).is_err());
        cache.run_pending_tasks();
        assert_eq!(cache.entry_count(), 0);
    }

    #[test]
    fn test_invalidate_all() {
        let cache = SimulationCache::new();
        let engine = SimulationEngine::default();
        let baseline = create_test_baseline();
        let drivers = create_test_drivers();

        let result1 = cache.run_cached(&engine, &baseline, &drivers, 0).unwrap();
        assert!(!result1.cached);

        let result2 = cache.run_cached(&engine, &baseline, &drivers, 0).unwrap();
        assert!(result2.cached, "Should be cached after first call");

        cache.invalidate_all();
        cache.run_pending_tasks();

        let result = cache.run_cached(&engine, &baseline, &drivers, 0).unwrap();
        assert!(!result.cached, "Should be cache miss after invalidate_all");
    }

    #[test]
    fn test_invalidate_specific() {
        let cache = SimulationCache::new();
        let engine = SimulationEngine::default();
        let baseline = create_test_baseline();

        let drivers1 = create_test_drivers();
        let drivers2 = create_test_drivers().with_inflation(dec!(3));

        let _ = cache.run_cached(&engine, &baseline, &drivers1, 0);
        let _ = cache.run_cached(&engine, &baseline, &drivers2, 0);

        cache.invalidate(&engine, &baseline, &drivers1, 0);
        cache.run_pending_tasks();

        let result1 = cache.run_cached(&engine, &baseline, &drivers1, 0).unwrap();
        assert!(!result1.cached, "Invalidated drivers should be cache miss");

        let result2 = cache.run_cached(&engine, &baseline, &drivers2, 0).unwrap();
        assert!(
            result2.cached,
            "Non-invalidated drivers should still hit cache"
        );
    }

    #[test]
    fn test_from_settings() {
        let settings = CacheSettings {
            capacity: 10,
            ttl_secs: 60,
        };
        let cache = SimulationCache::from_settings(&settings);
        let engine = SimulationEngine::default();
        let baseline = create_test_baseline();
        let drivers = create_test_drivers();

        let result = cache.run_cached(&engine, &baseline, &drivers, 0).unwrap();
        assert!(!result.cached);

        let result = cache.run_cached(&engine, &baseline, &drivers, 0).unwrap();
        assert!(result.cached);
    }

    #[test]
    fn test_entry_count() {
        let cache = SimulationCache::new();
        let engine = SimulationEngine::default();
        let baseline = create_test_baseline();

        assert_eq!(cache.entry_count(), 0);

        let _ = cache.run_cached(&engine, &baseline, &create_test_drivers(), 0);

        // Entry count may not update immediately
        cache.run_pending_tasks();
        assert!(cache.entry_count() >= 1);
    }
}
