//! Engine configuration: driver domains and market shock multipliers.

use budgetlab_shared::config::{AppConfig, BoundsSettings, EngineSettings};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::drivers::{
    DEFAULT_VOLATILITY_BAND, INFLATION, INVESTMENT_RATIO, REVENUE_GROWTH, VOLATILITY_BAND,
};
use super::error::SimulationError;

/// Inclusive percentage range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PercentRange {
    min: Decimal,
    max: Decimal,
}

impl PercentRange {
    /// Creates a range.
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::InvalidBounds` when `min > max`.
    pub fn new(driver: &str, min: Decimal, max: Decimal) -> Result<Self, SimulationError> {
        if min > max {
            return Err(SimulationError::InvalidBounds {
                driver: driver.to_string(),
            });
        }
        Ok(Self { min, max })
    }

    fn fixed(min: i64, max: i64) -> Self {
        Self {
            min: Decimal::from(min),
            max: Decimal::from(max),
        }
    }

    /// Lowest value.
    #[must_use]
    pub const fn min(&self) -> Decimal {
        self.min
    }

    /// Highest value.
    #[must_use]
    pub const fn max(&self) -> Decimal {
        self.max
    }

    /// Moves a value to the nearest bound if it lies outside.
    #[must_use]
    pub fn clamp(&self, value: Decimal) -> Decimal {
        value.clamp(self.min, self.max)
    }

    /// Returns true if the value lies inside.
    #[must_use]
    pub fn contains(&self, value: Decimal) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Domain of every numeric driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriverBounds {
    /// Revenue growth.
    pub revenue_growth: PercentRange,
    /// Per-category cost cut.
    pub cost_cut: PercentRange,
    /// Per-category delay impact.
    pub delay: PercentRange,
    /// Investment trade-off ratio.
    pub investment_ratio: PercentRange,
    /// Inflation overlay.
    pub inflation: PercentRange,
    /// Volatile market band.
    pub volatility_band: PercentRange,
}

impl Default for DriverBounds {
    fn default() -> Self {
        Self {
            revenue_growth: PercentRange::fixed(-100, 100),
            cost_cut: PercentRange::fixed(0, 50),
            delay: PercentRange::fixed(0, 100),
            investment_ratio: PercentRange::fixed(0, 100),
            inflation: PercentRange::fixed(0, 25),
            volatility_band: PercentRange::fixed(0, 20),
        }
    }
}

impl DriverBounds {
    /// Builds bounds from configuration.
    ///
    /// Cuts, delays, inflation and the volatility band start at zero; the
    /// investment ratio is always 0-100.
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::InvalidBounds` for an inverted range.
    pub fn from_settings(settings: &BoundsSettings) -> Result<Self, SimulationError> {
        Ok(Self {
            revenue_growth: PercentRange::new(
                REVENUE_GROWTH,
                settings.revenue_growth_min,
                settings.revenue_growth_max,
            )?,
            cost_cut: PercentRange::new("cost_cut", Decimal::ZERO, settings.cost_cut_max)?,
            delay: PercentRange::new("delay", Decimal::ZERO, settings.delay_max)?,
            investment_ratio: PercentRange::new(
                INVESTMENT_RATIO,
                Decimal::ZERO,
                Decimal::ONE_HUNDRED,
            )?,
            inflation: PercentRange::new(INFLATION, Decimal::ZERO, settings.inflation_max)?,
            volatility_band: PercentRange::new(
                VOLATILITY_BAND,
                Decimal::ZERO,
                settings.volatility_band_max,
            )?,
        })
    }
}

/// Multipliers of the market-condition stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketShocks {
    /// Applied to income and cost-of-sales lines in a recession.
    pub recession: Decimal,
    /// Applied to every expense-like line under high inflation.
    pub high_inflation: Decimal,
}

impl Default for MarketShocks {
    fn default() -> Self {
        Self {
            recession: Decimal::new(90, 2),
            high_inflation: Decimal::new(104, 2),
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Driver domains.
    pub bounds: DriverBounds,
    /// Market shock multipliers.
    pub shocks: MarketShocks,
    /// Band used for "volatile" when none is given.
    pub default_volatility_band: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bounds: DriverBounds::default(),
            shocks: MarketShocks::default(),
            default_volatility_band: DEFAULT_VOLATILITY_BAND,
        }
    }
}

impl EngineConfig {
    /// Maps shared settings onto engine configuration.
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::InvalidBounds` for an inverted range.
    pub fn from_settings(
        engine: &EngineSettings,
        bounds: &BoundsSettings,
    ) -> Result<Self, SimulationError> {
        Ok(Self {
            bounds: DriverBounds::from_settings(bounds)?,
            shocks: MarketShocks {
                recession: engine.recession_multiplier,
                high_inflation: engine.high_inflation_multiplier,
            },
            default_volatility_band: engine.volatility_band_percent,
        })
    }

    /// Maps the whole application configuration.
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::InvalidBounds` for an inverted range.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, SimulationError> {
        Self::from_settings(&config.engine, &config.bounds)
    }
}
