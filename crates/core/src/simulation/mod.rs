//! What-if scenario projections.

pub mod cache;
pub mod config;
pub mod drivers;
pub mod engine;
pub mod error;
pub mod narrative;
pub mod pipeline;
pub mod session;
pub mod types;

#[cfg(test)]
mod tests;

#[cfg(test)]
mod benchmark;

pub use cache::SimulationCache;
pub use config::{DriverBounds, EngineConfig, MarketShocks, PercentRange};
pub use drivers::{
    ClampNotice, DEFAULT_VOLATILITY_BAND, Driver, DriverDomain, DriverSet, DriverValue,
    MarketCondition, NEUTRAL_INVESTMENT_RATIO,
};
pub use engine::SimulationEngine;
pub use error::SimulationError;
pub use narrative::NarrativeGenerator;
pub use pipeline::{Pipeline, PipelineOutput, Stage, Transform, TransformContext};
pub use session::ScenarioSession;
pub use types::{InvestmentAllocation, NamedResult, NamedScenario, ScenarioResult};
