//! Scenario drivers: named, bounded, user-adjustable assumptions.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::config::{DriverBounds, PercentRange};
use super::error::SimulationError;
use crate::budget::CategoryProfile;

/// Driver name of the market condition.
pub const MARKET_CONDITION: &str = "market_condition";
/// Driver name of revenue growth.
pub const REVENUE_GROWTH: &str = "revenue_growth";
/// Driver name prefix of per-category cost cuts.
pub const COST_CUT: &str = "cost_cut";
/// Driver name prefix of per-category delays.
pub const DELAY: &str = "delay";
/// Driver name of the investment trade-off ratio.
pub const INVESTMENT_RATIO: &str = "investment_ratio";
/// Driver name of the inflation overlay.
pub const INFLATION: &str = "inflation";
/// Driver name of the volatile market band.
pub const VOLATILITY_BAND: &str = "volatility_band";

/// Band used when "volatile" is given without one, in percent.
pub const DEFAULT_VOLATILITY_BAND: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Neutral investment ratio (even split), in percent.
pub const NEUTRAL_INVESTMENT_RATIO: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Market environment applied as the first pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "condition")]
pub enum MarketCondition {
    /// No shock.
    #[default]
    Stable,
    /// Revenue and COGS contract.
    Recession,
    /// Every cost line rises.
    HighInflation,
    /// Seeded random perturbation within `±band` percent per category.
    Volatile {
        /// Half-width of the band, in percent.
        band: Decimal,
    },
}

impl fmt::Display for MarketCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stable => write!(f, "Stable"),
            Self::Recession => write!(f, "Recession"),
            Self::HighInflation => write!(f, "High-Inflation"),
            Self::Volatile { band } => write!(f, "Volatile (±{}%)", band.normalize()),
        }
    }
}

impl MarketCondition {
    /// Names accepted by [`FromStr`].
    pub const NAMES: [&'static str; 4] = ["Stable", "Recession", "High-Inflation", "Volatile"];

    /// Bare condition name, one of [`Self::NAMES`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stable => Self::NAMES[0],
            Self::Recession => Self::NAMES[1],
            Self::HighInflation => Self::NAMES[2],
            Self::Volatile { .. } => Self::NAMES[3],
        }
    }

    /// True when the condition leaves every amount unchanged.
    ///
    /// A volatile market with a zero band perturbs nothing.
    #[must_use]
    pub fn is_neutral(self) -> bool {
        match self {
            Self::Stable => true,
            Self::Volatile { band } => band.is_zero(),
            Self::Recession | Self::HighInflation => false,
        }
    }

    /// Parses a condition name, ignoring case.
    ///
    /// `volatile` takes an optional band (`volatile:7.5`); `default_band` is
    /// used when none is given.
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::UnknownMarketCondition` for anything else.
    pub fn parse_with_band(s: &str, default_band: Decimal) -> Result<Self, SimulationError> {
        let trimmed = s.trim();
        let (name, band) = match trimmed.split_once(':') {
            Some((name, band)) => (name.trim(), Some(band.trim())),
            None => (trimmed, None),
        };

        match (name.to_ascii_lowercase().as_str(), band) {
            ("stable", None) => Ok(Self::Stable),
            ("recession", None) => Ok(Self::Recession),
            ("high-inflation" | "high_inflation" | "highinflation", None) => {
                Ok(Self::HighInflation)
            }
            ("volatile", None) => Ok(Self::Volatile { band: default_band }),
            ("volatile", Some(band)) => Decimal::from_str(band)
                .map(|band| Self::Volatile { band })
                .map_err(|_| SimulationError::UnknownMarketCondition(s.to_string())),
            _ => Err(SimulationError::UnknownMarketCondition(s.to_string())),
        }
    }
}

impl FromStr for MarketCondition {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_band(s, DEFAULT_VOLATILITY_BAND)
    }
}

/// The full set of scenario drivers. All numeric values are percentages.
///
/// `Default` is the neutral set: every stage is an identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriverSet {
    /// Market environment.
    pub market_condition: MarketCondition,
    /// Revenue growth; also scales revenue-coupled categories.
    pub revenue_growth: Decimal,
    /// Cost cuts keyed by category.
    pub cost_cuts: BTreeMap<String, Decimal>,
    /// Delay impacts keyed by capital category.
    pub delays: BTreeMap<String, Decimal>,
    /// Share of the investment pool going to R&D.
    pub investment_ratio: Decimal,
    /// Inflation overlay rate.
    pub inflation: Decimal,
}

impl Default for DriverSet {
    fn default() -> Self {
        Self {
            market_condition: MarketCondition::Stable,
            revenue_growth: Decimal::ZERO,
            cost_cuts: BTreeMap::new(),
            delays: BTreeMap::new(),
            investment_ratio: NEUTRAL_INVESTMENT_RATIO,
            inflation: Decimal::ZERO,
        }
    }
}

impl DriverSet {
    /// Neutral driver set.
    #[must_use]
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Sets the market condition.
    #[must_use]
    pub fn with_market_condition(mut self, condition: MarketCondition) -> Self {
        self.market_condition = condition;
        self
    }

    /// Sets revenue growth.
    #[must_use]
    pub fn with_revenue_growth(mut self, percent: Decimal) -> Self {
        self.revenue_growth = percent;
        self
    }

    /// Sets the cost cut of one category.
    #[must_use]
    pub fn with_cost_cut(mut self, category: impl Into<String>, percent: Decimal) -> Self {
        self.cost_cuts.insert(category.into(), percent);
        self
    }

    /// Sets the delay impact of one capital category.
    #[must_use]
    pub fn with_delay(mut self, category: impl Into<String>, percent: Decimal) -> Self {
        self.delays.insert(category.into(), percent);
        self
    }

    /// Sets the investment trade-off ratio.
    #[must_use]
    pub fn with_investment_ratio(mut self, percent: Decimal) -> Self {
        self.investment_ratio = percent;
        self
    }

    /// Sets inflation.
    #[must_use]
    pub fn with_inflation(mut self, percent: Decimal) -> Self {
        self.inflation = percent;
        self
    }

    /// Cost cut for a category, zero if unset.
    #[must_use]
    pub fn cost_cut(&self, category: &str) -> Decimal {
        self.cost_cuts.get(category).copied().unwrap_or_default()
    }

    /// Delay impact for a category, zero if unset.
    #[must_use]
    pub fn delay(&self, category: &str) -> Decimal {
        self.delays.get(category).copied().unwrap_or_default()
    }

    /// Returns true if every driver sits at its neutral value.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.market_condition.is_neutral()
            && self.revenue_growth.is_zero()
            && self.cost_cuts.values().all(Decimal::is_zero)
            && self.delays.values().all(Decimal::is_zero)
            && self.investment_ratio == NEUTRAL_INVESTMENT_RATIO
            && self.inflation.is_zero()
    }

    /// Checks that every cut and delay names an eligible category.
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::UnknownCategory` when a category is not in
    /// the profile and `SimulationError::CategoryNotAdjustable` when the
    /// category does not accept that driver.
    pub fn validate(&self, profile: &CategoryProfile) -> Result<(), SimulationError> {
        for category in self.cost_cuts.keys() {
            let policy = profile
                .policy(category)
                .ok_or_else(|| SimulationError::UnknownCategory {
                    driver: COST_CUT.to_string(),
                    category: category.clone(),
                })?;
            if !policy.cost_cut {
                return Err(SimulationError::CategoryNotAdjustable {
                    driver: COST_CUT.to_string(),
                    category: category.clone(),
                });
            }
        }

        for category in self.delays.keys() {
            let policy = profile
                .policy(category)
                .ok_or_else(|| SimulationError::UnknownCategory {
                    driver: DELAY.to_string(),
                    category: category.clone(),
                })?;
            if !policy.capital {
                return Err(SimulationError::CategoryNotAdjustable {
                    driver: DELAY.to_string(),
                    category: category.clone(),
                });
            }
        }

        Ok(())
    }

    /// Clamps every numeric driver into its domain.
    ///
    /// Returns the clamped set plus one notice per value that moved.
    #[must_use]
    pub fn clamp(&self, bounds: &DriverBounds) -> (Self, Vec<ClampNotice>) {
        let mut notices = Vec::new();
        let mut clamped = self.clone();

        clamped.revenue_growth =
            clamp_into(REVENUE_GROWTH, self.revenue_growth, bounds.revenue_growth, &mut notices);

        for (category, value) in &mut clamped.cost_cuts {
            let name = format!("{COST_CUT}.{category}");
            *value = clamp_into(&name, *value, bounds.cost_cut, &mut notices);
        }

        for (category, value) in &mut clamped.delays {
            let name = format!("{DELAY}.{category}");
            *value = clamp_into(&name, *value, bounds.delay, &mut notices);
        }

        clamped.investment_ratio = clamp_into(
            INVESTMENT_RATIO,
            self.investment_ratio,
            bounds.investment_ratio,
            &mut notices,
        );
        clamped.inflation = clamp_into(INFLATION, self.inflation, bounds.inflation, &mut notices);

        if let MarketCondition::Volatile { band } = self.market_condition {
            clamped.market_condition = MarketCondition::Volatile {
                band: clamp_into(VOLATILITY_BAND, band, bounds.volatility_band, &mut notices),
            };
        }

        (clamped, notices)
    }

    /// Lists every driver with its current value and domain.
    ///
    /// Cost cuts and delays are listed for every eligible category of the
    /// profile, in profile order.
    #[must_use]
    pub fn describe(&self, profile: &CategoryProfile, bounds: &DriverBounds) -> Vec<Driver> {
        let mut drivers = vec![Driver {
            name: MARKET_CONDITION.to_string(),
            value: DriverValue::Choice(self.market_condition.name().to_string()),
            domain: DriverDomain::Choice {
                options: MarketCondition::NAMES.iter().map(ToString::to_string).collect(),
            },
        }];

        if let MarketCondition::Volatile { band } = self.market_condition {
            drivers.push(Driver::percent(VOLATILITY_BAND, band, bounds.volatility_band));
        }

        drivers.push(Driver::percent(REVENUE_GROWTH, self.revenue_growth, bounds.revenue_growth));

        for policy in profile.policies.iter().filter(|p| p.cost_cut) {
            drivers.push(Driver::percent(
                format!("{COST_CUT}.{}", policy.category),
                self.cost_cut(&policy.category),
                bounds.cost_cut,
            ));
        }

        for policy in profile.policies.iter().filter(|p| p.capital) {
            drivers.push(Driver::percent(
                format!("{DELAY}.{}", policy.category),
                self.delay(&policy.category),
                bounds.delay,
            ));
        }

        drivers.push(Driver::percent(
            INVESTMENT_RATIO,
            self.investment_ratio,
            bounds.investment_ratio,
        ));
        drivers.push(Driver::percent(INFLATION, self.inflation, bounds.inflation));

        drivers
    }
}

fn clamp_into(
    name: &str,
    value: Decimal,
    range: PercentRange,
    notices: &mut Vec<ClampNotice>,
) -> Decimal {
    let applied = range.clamp(value);
    if applied != value {
        warn!(driver = name, requested = %value, applied = %applied, "Driver value clamped");
        notices.push(ClampNotice {
            driver: name.to_string(),
            requested: value,
            applied,
        });
    }
    applied
}

/// Record of a driver value moved into its domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClampNotice {
    /// Driver name.
    pub driver: String,
    /// Value supplied by the caller.
    pub requested: Decimal,
    /// Value used by the engine.
    pub applied: Decimal,
}

/// Domain of a driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum DriverDomain {
    /// Inclusive numeric range.
    Range {
        /// Lowest value.
        min: Decimal,
        /// Highest value.
        max: Decimal,
    },
    /// One of a fixed set of names.
    Choice {
        /// Accepted names.
        options: Vec<String>,
    },
}

/// Current value of a driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DriverValue {
    /// Percentage.
    Percent(Decimal),
    /// Named option.
    Choice(String),
}

/// A named driver with its value and domain, for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    /// Driver name.
    pub name: String,
    /// Current value.
    pub value: DriverValue,
    /// Accepted values.
    pub domain: DriverDomain,
}

impl Driver {
    fn percent(name: impl Into<String>, value: Decimal, range: PercentRange) -> Self {
        Self {
            name: name.into(),
            value: DriverValue::Percent(value),
            domain: DriverDomain::Range {
                min: range.min(),
                max: range.max(),
            },
        }
    }
}
