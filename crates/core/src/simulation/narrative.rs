//! Human-readable description of a driver set.

use rust_decimal::Decimal;

use super::config::MarketShocks;
use super::drivers::{DriverSet, MarketCondition, NEUTRAL_INVESTMENT_RATIO};
use crate::budget::{CategoryProfile, LineKind};

/// Label of the research side of the investment trade-off.
pub const RESEARCH_LABEL: &str = "R&D";
/// Label of the commercial side of the investment trade-off.
pub const COMMERCIAL_LABEL: &str = "Sales & Marketing";

/// Builds narrative statements.
pub struct NarrativeGenerator;

impl NarrativeGenerator {
    /// One statement per non-neutral driver, in pipeline stage order.
    ///
    /// Cost cut and delay statements follow profile order.
    #[must_use]
    pub fn describe(
        profile: &CategoryProfile,
        drivers: &DriverSet,
        shocks: &MarketShocks,
    ) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(line) = Self::market_condition(profile, drivers.market_condition, shocks) {
            lines.push(line);
        }

        if !drivers.revenue_growth.is_zero() {
            lines.push(Self::revenue_growth(profile, drivers.revenue_growth));
        }

        for policy in profile.policies.iter().filter(|p| p.cost_cut) {
            let cut = drivers.cost_cut(&policy.category);
            if !cut.is_zero() {
                lines.push(format!(
                    "{} budget cut by {}%.",
                    policy.category,
                    percent(cut)
                ));
            }
        }

        for policy in profile.policies.iter().filter(|p| p.capital) {
            let delay = drivers.delay(&policy.category);
            if !delay.is_zero() {
                lines.push(format!(
                    "{} spending delayed by {}%.",
                    policy.category,
                    percent(delay)
                ));
            }
        }

        if drivers.investment_ratio != NEUTRAL_INVESTMENT_RATIO {
            lines.push(format!(
                "Investment mix shifted to {}% {RESEARCH_LABEL} / {}% {COMMERCIAL_LABEL}.",
                percent(drivers.investment_ratio),
                percent(Decimal::ONE_HUNDRED - drivers.investment_ratio),
            ));
        }

        if !drivers.inflation.is_zero() {
            let scope = if profile.fully_inflation_exposed() {
                "all categories"
            } else {
                "inflation-exposed categories"
            };
            lines.push(format!(
                "Inflation of {}% applied to {scope}.",
                percent(drivers.inflation)
            ));
        }

        lines
    }

    fn market_condition(
        profile: &CategoryProfile,
        condition: MarketCondition,
        shocks: &MarketShocks,
    ) -> Option<String> {
        if condition.is_neutral() {
            return None;
        }

        let detail = match condition {
            MarketCondition::Stable => None,
            MarketCondition::Recession => {
                let hit = names_of(profile, |kind| {
                    matches!(kind, LineKind::Income | LineKind::CostOfSales)
                });
                (!hit.is_empty()).then(|| {
                    format!(
                        "{} scaled to {}%",
                        join(&hit),
                        percent(shocks.recession * Decimal::ONE_HUNDRED)
                    )
                })
            }
            MarketCondition::HighInflation => Some(format!(
                "cost categories scaled to {}%",
                percent(shocks.high_inflation * Decimal::ONE_HUNDRED)
            )),
            MarketCondition::Volatile { band } => Some(format!(
                "each category perturbed within ±{}%",
                percent(band)
            )),
        };

        let name = condition.name();

        Some(match detail {
            Some(detail) => format!("Market condition set to {name}: {detail}."),
            None => format!("Market condition set to {name}."),
        })
    }

    fn revenue_growth(profile: &CategoryProfile, growth: Decimal) -> String {
        let direction = if growth.is_sign_negative() {
            "decreased"
        } else {
            "increased"
        };
        let coupled: Vec<&str> = profile
            .revenue_coupled()
            .map(|p| p.category.as_str())
            .collect();

        if coupled.is_empty() {
            format!("Revenue {direction} by {}%.", percent(growth.abs()))
        } else {
            format!(
                "Revenue {direction} by {}%, scaling {} budgets proportionally.",
                percent(growth.abs()),
                join(&coupled)
            )
        }
    }
}

fn names_of(profile: &CategoryProfile, pred: impl Fn(LineKind) -> bool) -> Vec<&str> {
    profile
        .policies
        .iter()
        .filter(|p| pred(p.kind))
        .map(|p| p.category.as_str())
        .collect()
}

/// "a", "a and b", "a, b and c".
fn join(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [only] => (*only).to_string(),
        [head @ .., last] => format!("{} and {last}", head.join(", ")),
    }
}

fn percent(value: Decimal) -> String {
    value.normalize().to_string()
}
