//! Interactive scenario session with last-write-wins publication.
//!
//! Every driver change triggers a full recomputation from the shared
//! baseline. A result is published only if no newer recomputation has been
//! started since; stale results are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use super::cache::SimulationCache;
use super::drivers::DriverSet;
use super::engine::SimulationEngine;
use super::error::SimulationError;
use super::types::ScenarioResult;
use crate::budget::BaselineModel;

struct Published {
    generation: u64,
    result: Arc<ScenarioResult>,
}

/// A baseline plus the most recently published scenario.
pub struct ScenarioSession {
    baseline: Arc<BaselineModel>,
    engine: Arc<SimulationEngine>,
    cache: Option<SimulationCache>,
    generation: AtomicU64,
    latest: RwLock<Option<Published>>,
}

impl ScenarioSession {
    /// Creates a session without a result cache.
    #[must_use]
    pub fn new(baseline: Arc<BaselineModel>, engine: Arc<SimulationEngine>) -> Self {
        Self {
            baseline,
            engine,
            cache: None,
            generation: AtomicU64::new(0),
            latest: RwLock::new(None),
        }
    }

    /// Routes recomputations through a result cache.
    #[must_use]
    pub fn with_cache(mut self, cache: SimulationCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Shared baseline.
    #[must_use]
    pub fn baseline(&self) -> &Arc<BaselineModel> {
        &self.baseline
    }

    /// Engine used for recomputation.
    #[must_use]
    pub fn engine(&self) -> &Arc<SimulationEngine> {
        &self.engine
    }

    /// Starts a new recomputation and returns its generation.
    ///
    /// Any result from an older generation becomes stale.
    pub fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Latest generation handed out by [`Self::begin`].
    #[must_use]
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Generation of the published result, if any.
    #[must_use]
    pub fn published_generation(&self) -> Option<u64> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|published| published.generation)
    }

    /// Publishes a result computed for `generation`.
    ///
    /// Returns `None` and drops the result if a newer generation exists.
    pub fn publish(&self, generation: u64, result: ScenarioResult) -> Option<Arc<ScenarioResult>> {
        let mut slot = self.latest.write().unwrap_or_else(PoisonError::into_inner);

        let newer_published = slot
            .as_ref()
            .is_some_and(|published| published.generation >= generation);
        if generation != self.current_generation() || newer_published {
            debug!(generation, "Discarding stale scenario result");
            return None;
        }

        let result = Arc::new(result);
        info!(
            generation,
            hash = %result.parameters_hash,
            cached = result.cached,
            "Published scenario result"
        );
        *slot = Some(Published {
            generation,
            result: Arc::clone(&result),
        });
        Some(result)
    }

    /// Recomputes the scenario for `drivers` and publishes it.
    ///
    /// Returns `Ok(None)` when a newer recomputation superseded this one.
    ///
    /// # Errors
    ///
    /// Returns an error when the drivers are rejected. A rejected driver set
    /// does not start a new generation.
    ///
    /// Out-of-range values are clamped once, by the engine run.
    pub fn recompute(
        &self,
        drivers: &DriverSet,
        seed: u64,
    ) -> Result<Option<Arc<ScenarioResult>>, SimulationError> {
        drivers.validate(self.baseline.profile())?;

        let generation = self.begin();
        let result = match &self.cache {
            Some(cache) => cache.run_cached(&self.engine, &self.baseline, drivers, seed)?,
            None => self.engine.run(&self.baseline, drivers, seed)?,
        };

        Ok(self.publish(generation, result))
    }

    /// Most recently published result.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<ScenarioResult>> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|published| Arc::clone(&published.result))
    }
}
