//! Transform pipeline: baseline + drivers -> scenario snapshot.
//!
//! Stages run in the order listed by [`Stage::ORDER`]. Each stage reads the
//! previous stage's output, so cuts compound on already-grown amounts and
//! inflation applies last. A stage whose driver is neutral still runs and
//! leaves the snapshot untouched.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::MarketShocks;
use super::drivers::{DriverSet, MarketCondition};
use super::types::InvestmentAllocation;
use crate::budget::{BaselineModel, BudgetSnapshot, CategoryProfile, LineKind};

/// Pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Market-condition shock.
    MarketShock,
    /// Revenue growth scaling.
    RevenueGrowth,
    /// Per-category cost cuts.
    CostCuts,
    /// Capital spending delays.
    Delays,
    /// Investment trade-off reporting.
    InvestmentAllocation,
    /// Inflation overlay.
    Inflation,
}

impl Stage {
    /// Standard stage order.
    pub const ORDER: [Self; 6] = [
        Self::MarketShock,
        Self::RevenueGrowth,
        Self::CostCuts,
        Self::Delays,
        Self::InvestmentAllocation,
        Self::Inflation,
    ];

    /// The transform implementing this stage.
    #[must_use]
    pub fn transform(self) -> Box<dyn Transform> {
        match self {
            Self::MarketShock => Box::new(MarketShock),
            Self::RevenueGrowth => Box::new(RevenueGrowth),
            Self::CostCuts => Box::new(CostCuts),
            Self::Delays => Box::new(Delays),
            Self::InvestmentAllocation => Box::new(InvestmentTradeOff),
            Self::Inflation => Box::new(InflationOverlay),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MarketShock => "market_shock",
            Self::RevenueGrowth => "revenue_growth",
            Self::CostCuts => "cost_cuts",
            Self::Delays => "delays",
            Self::InvestmentAllocation => "investment_allocation",
            Self::Inflation => "inflation",
        };
        f.write_str(name)
    }
}

/// State shared by the stages of one pipeline run.
pub struct TransformContext<'a> {
    profile: &'a CategoryProfile,
    drivers: &'a DriverSet,
    shocks: &'a MarketShocks,
    rng: ChaCha8Rng,
    allocation: Option<InvestmentAllocation>,
}

impl<'a> TransformContext<'a> {
    /// Creates a context. The seed feeds the volatile market shock.
    #[must_use]
    pub fn new(
        profile: &'a CategoryProfile,
        drivers: &'a DriverSet,
        shocks: &'a MarketShocks,
        seed: u64,
    ) -> Self {
        Self {
            profile,
            drivers,
            shocks,
            rng: ChaCha8Rng::seed_from_u64(seed),
            allocation: None,
        }
    }

    /// Category coupling table.
    #[must_use]
    pub fn profile(&self) -> &'a CategoryProfile {
        self.profile
    }

    /// Drivers, already clamped.
    #[must_use]
    pub fn drivers(&self) -> &'a DriverSet {
        self.drivers
    }

    /// Market shock multipliers.
    #[must_use]
    pub fn shocks(&self) -> &'a MarketShocks {
        self.shocks
    }

    /// Draws a percentage uniformly from `[-band, band]` in basis-point steps.
    pub fn perturbation(&mut self, band: Decimal) -> Decimal {
        let limit = (band * Decimal::ONE_HUNDRED)
            .trunc()
            .to_i64()
            .unwrap_or_default();
        if limit <= 0 {
            return Decimal::ZERO;
        }
        Decimal::new(self.rng.random_range(-limit..=limit), 2)
    }

    /// Allocation recorded by the investment stage, if it ran.
    #[must_use]
    pub fn allocation(&self) -> Option<&InvestmentAllocation> {
        self.allocation.as_ref()
    }

    fn record_allocation(&mut self, allocation: InvestmentAllocation) {
        self.allocation = Some(allocation);
    }
}

/// One pipeline stage.
pub trait Transform: Send + Sync {
    /// Stage implemented.
    fn stage(&self) -> Stage;

    /// Consumes a snapshot and produces the adjusted one.
    fn apply(&self, snapshot: BudgetSnapshot, ctx: &mut TransformContext<'_>) -> BudgetSnapshot;
}

/// `1 + percent / 100`.
#[must_use]
pub fn growth_factor(percent: Decimal) -> Decimal {
    Decimal::ONE + percent / Decimal::ONE_HUNDRED
}

/// `1 - percent / 100`.
#[must_use]
pub fn reduction_factor(percent: Decimal) -> Decimal {
    Decimal::ONE - percent / Decimal::ONE_HUNDRED
}

struct MarketShock;

impl Transform for MarketShock {
    fn stage(&self) -> Stage {
        Stage::MarketShock
    }

    fn apply(&self, mut snapshot: BudgetSnapshot, ctx: &mut TransformContext<'_>) -> BudgetSnapshot {
        let shocks = ctx.shocks();
        match ctx.drivers().market_condition {
            MarketCondition::Stable => {}
            MarketCondition::Recession => snapshot.map_amounts(|item| match item.kind() {
                LineKind::Income | LineKind::CostOfSales => item.amount() * shocks.recession,
                LineKind::Expense => item.amount(),
            }),
            MarketCondition::HighInflation => snapshot.map_amounts(|item| {
                if item.kind().is_expense_like() {
                    item.amount() * shocks.high_inflation
                } else {
                    item.amount()
                }
            }),
            MarketCondition::Volatile { band } => snapshot
                .map_amounts(|item| item.amount() * growth_factor(ctx.perturbation(band))),
        }
        snapshot
    }
}

struct RevenueGrowth;

impl Transform for RevenueGrowth {
    fn stage(&self) -> Stage {
        Stage::RevenueGrowth
    }

    fn apply(&self, mut snapshot: BudgetSnapshot, ctx: &mut TransformContext<'_>) -> BudgetSnapshot {
        let profile = ctx.profile();
        let factor = growth_factor(ctx.drivers().revenue_growth);
        snapshot.map_amounts(|item| {
            let coupled = profile
                .policy(item.category())
                .is_some_and(|p| p.revenue_coupled);
            if item.kind() == LineKind::Income || coupled {
                item.amount() * factor
            } else {
                item.amount()
            }
        });
        snapshot
    }
}

struct CostCuts;

impl Transform for CostCuts {
    fn stage(&self) -> Stage {
        Stage::CostCuts
    }

    fn apply(&self, mut snapshot: BudgetSnapshot, ctx: &mut TransformContext<'_>) -> BudgetSnapshot {
        let profile = ctx.profile();
        let drivers = ctx.drivers();
        snapshot.map_amounts(|item| match profile.policy(item.category()) {
            Some(policy) if policy.cost_cut => {
                item.amount() * reduction_factor(drivers.cost_cut(item.category()))
            }
            _ => item.amount(),
        });
        snapshot
    }
}

struct Delays;

impl Transform for Delays {
    fn stage(&self) -> Stage {
        Stage::Delays
    }

    fn apply(&self, mut snapshot: BudgetSnapshot, ctx: &mut TransformContext<'_>) -> BudgetSnapshot {
        let profile = ctx.profile();
        let drivers = ctx.drivers();
        snapshot.map_amounts(|item| match profile.policy(item.category()) {
            Some(policy) if policy.capital => {
                item.amount() * reduction_factor(drivers.delay(item.category()))
            }
            _ => item.amount(),
        });
        snapshot
    }
}

struct InvestmentTradeOff;

impl Transform for InvestmentTradeOff {
    fn stage(&self) -> Stage {
        Stage::InvestmentAllocation
    }

    fn apply(&self, snapshot: BudgetSnapshot, ctx: &mut TransformContext<'_>) -> BudgetSnapshot {
        let allocation = InvestmentAllocation::compute(
            &snapshot,
            ctx.profile(),
            ctx.drivers().investment_ratio,
        );
        ctx.record_allocation(allocation);
        snapshot
    }
}

struct InflationOverlay;

impl Transform for InflationOverlay {
    fn stage(&self) -> Stage {
        Stage::Inflation
    }

    fn apply(&self, mut snapshot: BudgetSnapshot, ctx: &mut TransformContext<'_>) -> BudgetSnapshot {
        let profile = ctx.profile();
        let factor = growth_factor(ctx.drivers().inflation);
        snapshot.map_amounts(|item| {
            if profile
                .policy(item.category())
                .is_some_and(|p| p.inflation_exposed)
            {
                item.amount() * factor
            } else {
                item.amount()
            }
        });
        snapshot
    }
}

/// Output of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    /// Projected budget.
    pub snapshot: BudgetSnapshot,
    /// Investment trade-off split.
    pub allocation: InvestmentAllocation,
}

/// Ordered list of transforms.
pub struct Pipeline {
    stages: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    /// Pipeline with every stage in [`Stage::ORDER`].
    #[must_use]
    pub fn standard() -> Self {
        Self::from_stages(Stage::ORDER.into_iter().map(Stage::transform).collect())
    }

    /// Pipeline with a custom stage list.
    #[must_use]
    pub fn from_stages(stages: Vec<Box<dyn Transform>>) -> Self {
        Self { stages }
    }

    /// Stages in execution order.
    #[must_use]
    pub fn stages(&self) -> Vec<Stage> {
        self.stages.iter().map(|t| t.stage()).collect()
    }

    /// Applies every stage to a copy of the baseline.
    ///
    /// `drivers` must already be clamped.
    #[must_use]
    pub fn run(
        &self,
        baseline: &BaselineModel,
        drivers: &DriverSet,
        shocks: &MarketShocks,
        seed: u64,
    ) -> PipelineOutput {
        let mut ctx = TransformContext::new(baseline.profile(), drivers, shocks, seed);
        let mut snapshot = baseline.snapshot().clone();

        for transform in &self.stages {
            snapshot = transform.apply(snapshot, &mut ctx);
            debug!(stage = %transform.stage(), "Applied pipeline stage");
        }

        let allocation = match ctx.allocation() {
            Some(allocation) => *allocation,
            None => InvestmentAllocation::compute(
                &snapshot,
                baseline.profile(),
                drivers.investment_ratio,
            ),
        };

        PipelineOutput {
            snapshot,
            allocation,
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages())
            .finish()
    }
}
