//! Budgetlab Scenario Projector
//!
//! Runs the scenario described in configuration against a preset baseline
//! and prints the result bundle as JSON.

use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use budgetlab_core::budget::{BaselineModel, CategoryProfile, presets};
use budgetlab_core::simulation::{
    DriverSet, EngineConfig, ScenarioSession, SimulationCache, SimulationEngine, SimulationError,
};
use budgetlab_shared::config::ScenarioSettings;
use budgetlab_shared::{AppConfig, AppError, AppResult};

fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the JSON bundle
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "budgetlab=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run() {
        let app_error = err.downcast_ref::<AppError>();
        error!(
            code = app_error.map_or("INTERNAL_ERROR", AppError::error_code),
            "{err:#}"
        );
        std::process::exit(app_error.map_or(1, AppError::exit_code));
    }
}

fn run() -> anyhow::Result<()> {
    let config = AppConfig::load().map_err(AppError::from)?;

    let engine_config = EngineConfig::from_app_config(&config).map_err(simulation_error)?;
    let engine = Arc::new(SimulationEngine::new(engine_config));
    let baseline = Arc::new(load_baseline(&config.scenario.preset)?);
    info!(
        preset = %config.scenario.preset,
        categories = baseline.snapshot().len(),
        "Baseline loaded"
    );

    let drivers = drivers_from_settings(&engine, baseline.profile(), &config.scenario)?;
    for driver in drivers.describe(baseline.profile(), &engine.config().bounds) {
        debug!(name = %driver.name, value = ?driver.value, domain = ?driver.domain, "Driver");
    }

    let session = ScenarioSession::new(Arc::clone(&baseline), engine)
        .with_cache(SimulationCache::from_settings(&config.cache));
    let result = session
        .recompute(&drivers, config.scenario.seed)
        .map_err(simulation_error)?
        .ok_or_else(|| AppError::Internal("scenario result was superseded".to_string()))?;

    info!(
        net_income = %result.metrics.net_income,
        adjustments = result.adjustments.len(),
        "Scenario projected"
    );

    let json = serde_json::to_string_pretty(&*result).context("failed to serialize result")?;
    println!("{json}");

    Ok(())
}

fn load_baseline(preset: &str) -> AppResult<BaselineModel> {
    presets::demo_baseline(preset)
        .ok_or_else(|| AppError::Configuration(format!("unknown preset: {preset}")))?
        .map_err(|err| AppError::Internal(err.to_string()))
}

/// Builds drivers from raw settings.
///
/// Category keys are matched ignoring case, since environment variables
/// arrive lowercased. Unmatched keys are passed through for the engine to
/// reject.
fn drivers_from_settings(
    engine: &SimulationEngine,
    profile: &CategoryProfile,
    settings: &ScenarioSettings,
) -> AppResult<DriverSet> {
    let condition = engine
        .parse_market_condition(&settings.market_condition)
        .map_err(simulation_error)?;

    let mut drivers = DriverSet::neutral()
        .with_market_condition(condition)
        .with_revenue_growth(settings.revenue_growth)
        .with_investment_ratio(settings.investment_ratio)
        .with_inflation(settings.inflation);

    for (category, percent) in &settings.cost_cuts {
        drivers = drivers.with_cost_cut(resolve_category(profile, category), *percent);
    }
    for (category, percent) in &settings.delays {
        drivers = drivers.with_delay(resolve_category(profile, category), *percent);
    }

    Ok(drivers)
}

fn resolve_category(profile: &CategoryProfile, key: &str) -> String {
    profile
        .resolve(key)
        .map_or_else(|| key.to_string(), |policy| policy.category.clone())
}

fn simulation_error(err: SimulationError) -> AppError {
    match err {
        SimulationError::InvalidBounds { .. } => AppError::Configuration(err.to_string()),
        SimulationError::UnknownMarketCondition(_) => AppError::Validation(err.to_string()),
        SimulationError::UnknownCategory { .. } | SimulationError::CategoryNotAdjustable { .. } => {
            AppError::Scenario(err.to_string())
        }
    }
}
