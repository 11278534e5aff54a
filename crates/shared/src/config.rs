//! Application configuration management.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Projection engine configuration.
    #[serde(default)]
    pub engine: EngineSettings,
    /// Driver domain bounds.
    #[serde(default)]
    pub bounds: BoundsSettings,
    /// Result cache configuration.
    #[serde(default)]
    pub cache: CacheSettings,
    /// Scenario to run from the command line.
    #[serde(default)]
    pub scenario: ScenarioSettings,
}

/// Market shock multipliers used by the projection engine.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// Multiplier applied to revenue and COGS in a recession (e.g., 0.90).
    #[serde(default = "default_recession_multiplier")]
    pub recession_multiplier: Decimal,
    /// Multiplier applied to every expense line under high inflation (e.g., 1.04).
    #[serde(default = "default_high_inflation_multiplier")]
    pub high_inflation_multiplier: Decimal,
    /// Default half-width of the volatile market band, in percent.
    #[serde(default = "default_volatility_band")]
    pub volatility_band_percent: Decimal,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            recession_multiplier: default_recession_multiplier(),
            high_inflation_multiplier: default_high_inflation_multiplier(),
            volatility_band_percent: default_volatility_band(),
        }
    }
}

fn default_recession_multiplier() -> Decimal {
    Decimal::new(90, 2)
}

fn default_high_inflation_multiplier() -> Decimal {
    Decimal::new(104, 2)
}

fn default_volatility_band() -> Decimal {
    Decimal::from(5)
}

/// Driver domain bounds, all in percent.
#[derive(Debug, Clone, Deserialize)]
pub struct BoundsSettings {
    /// Lowest accepted revenue growth.
    #[serde(default = "default_revenue_growth_min")]
    pub revenue_growth_min: Decimal,
    /// Highest accepted revenue growth.
    #[serde(default = "default_revenue_growth_max")]
    pub revenue_growth_max: Decimal,
    /// Highest accepted per-category cost cut.
    #[serde(default = "default_cost_cut_max")]
    pub cost_cut_max: Decimal,
    /// Highest accepted delay impact.
    #[serde(default = "default_delay_max")]
    pub delay_max: Decimal,
    /// Highest accepted inflation rate.
    #[serde(default = "default_inflation_max")]
    pub inflation_max: Decimal,
    /// Widest accepted volatility band.
    #[serde(default = "default_volatility_band_max")]
    pub volatility_band_max: Decimal,
}

impl Default for BoundsSettings {
    fn default() -> Self {
        Self {
            revenue_growth_min: default_revenue_growth_min(),
            revenue_growth_max: default_revenue_growth_max(),
            cost_cut_max: default_cost_cut_max(),
            delay_max: default_delay_max(),
            inflation_max: default_inflation_max(),
            volatility_band_max: default_volatility_band_max(),
        }
    }
}

fn default_revenue_growth_min() -> Decimal {
    Decimal::from(-100)
}

fn default_revenue_growth_max() -> Decimal {
    Decimal::ONE_HUNDRED
}

fn default_cost_cut_max() -> Decimal {
    Decimal::from(50)
}

fn default_delay_max() -> Decimal {
    Decimal::ONE_HUNDRED
}

fn default_inflation_max() -> Decimal {
    Decimal::from(25)
}

fn default_volatility_band_max() -> Decimal {
    Decimal::from(20)
}

/// Result cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Maximum number of cached results.
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
    /// Time-to-live for each cached result, in seconds.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_cache_capacity() -> u64 {
    100
}

fn default_cache_ttl() -> u64 {
    300 // 5 minutes
}

/// Scenario drivers supplied through configuration.
///
/// Values are raw user input; the engine clamps and validates them.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioSettings {
    /// Category preset: "operating" or "capex".
    #[serde(default = "default_preset")]
    pub preset: String,
    /// Market condition name (e.g., "stable", "recession").
    #[serde(default = "default_market_condition")]
    pub market_condition: String,
    /// Revenue growth in percent.
    #[serde(default)]
    pub revenue_growth: Decimal,
    /// Cost cuts in percent, keyed by category name.
    #[serde(default)]
    pub cost_cuts: HashMap<String, Decimal>,
    /// Delay impacts in percent, keyed by category name.
    #[serde(default)]
    pub delays: HashMap<String, Decimal>,
    /// Share of the investment pool directed to R&D, in percent.
    #[serde(default = "default_investment_ratio")]
    pub investment_ratio: Decimal,
    /// Inflation rate in percent.
    #[serde(default)]
    pub inflation: Decimal,
    /// Seed for the volatile market shock.
    #[serde(default)]
    pub seed: u64,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            market_condition: default_market_condition(),
            revenue_growth: Decimal::ZERO,
            cost_cuts: HashMap::new(),
            delays: HashMap::new(),
            investment_ratio: default_investment_ratio(),
            inflation: Decimal::ZERO,
            seed: 0,
        }
    }
}

fn default_preset() -> String {
    "operating".to_string()
}

fn default_market_condition() -> String {
    "stable".to_string()
}

fn default_investment_ratio() -> Decimal {
    Decimal::from(50)
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BUDGETLAB").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
