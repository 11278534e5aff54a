//! Built-in category profiles and the dashboard's mock baselines.

use rust_decimal::Decimal;

use super::baseline::BaselineModel;
use super::error::BudgetError;
use super::profile::{AllocationSide, CategoryPolicy, CategoryProfile};
use super::types::{LineItem, LineKind};

/// Operating budget category names.
pub mod operating {
    /// Revenue.
    pub const REVENUE: &str = "Revenue";
    /// Cost of goods sold.
    pub const COGS: &str = "COGS";
    /// Marketing.
    pub const MARKETING: &str = "Marketing";
    /// Sales.
    pub const SALES: &str = "Sales";
    /// Research and development.
    pub const RD: &str = "R&D";
    /// General and administrative.
    pub const GA: &str = "G&A";
}

/// Capital expenditure category names.
pub mod capex {
    /// Buildings and leases.
    pub const FACILITIES: &str = "Facilities";
    /// Machinery and hardware.
    pub const EQUIPMENT: &str = "Equipment";
    /// Research and development.
    pub const RD: &str = "R&D";
    /// Technology upgrades.
    pub const TECH_UPGRADES: &str = "Tech Upgrades";
}

/// Operating budget: revenue, COGS and four operating expense lines.
///
/// COGS and Sales move with revenue. Marketing, R&D and G&A take cost cuts.
#[must_use]
pub fn operating_profile() -> CategoryProfile {
    CategoryProfile::new(
        "operating",
        vec![
            CategoryPolicy::new(operating::REVENUE, LineKind::Income),
            CategoryPolicy::new(operating::COGS, LineKind::CostOfSales).revenue_coupled(),
            CategoryPolicy::new(operating::MARKETING, LineKind::Expense)
                .cuttable()
                .allocated_to(AllocationSide::Commercial),
            CategoryPolicy::new(operating::SALES, LineKind::Expense)
                .revenue_coupled()
                .allocated_to(AllocationSide::Commercial),
            CategoryPolicy::new(operating::RD, LineKind::Expense)
                .cuttable()
                .allocated_to(AllocationSide::Research),
            CategoryPolicy::new(operating::GA, LineKind::Expense).cuttable(),
        ],
    )
}

/// Capital expenditure budget.
///
/// Facilities and Equipment take delays. R&D and Tech Upgrades take cost cuts.
#[must_use]
pub fn capex_profile() -> CategoryProfile {
    CategoryProfile::new(
        "capex",
        vec![
            CategoryPolicy::new(capex::FACILITIES, LineKind::Expense).capital(),
            CategoryPolicy::new(capex::EQUIPMENT, LineKind::Expense).capital(),
            CategoryPolicy::new(capex::RD, LineKind::Expense)
                .cuttable()
                .allocated_to(AllocationSide::Research),
            CategoryPolicy::new(capex::TECH_UPGRADES, LineKind::Expense).cuttable(),
        ],
    )
}

/// Operating baseline shown on the scenario modeling page.
pub fn demo_operating_baseline() -> Result<BaselineModel, BudgetError> {
    BaselineModel::new(
        operating_profile(),
        vec![
            LineItem::new(operating::REVENUE, LineKind::Income, Decimal::from(25_000_000)),
            LineItem::new(operating::COGS, LineKind::CostOfSales, Decimal::from(8_750_000)),
            LineItem::new(operating::MARKETING, LineKind::Expense, Decimal::from(3_000_000)),
            LineItem::new(operating::SALES, LineKind::Expense, Decimal::from(2_500_000)),
            LineItem::new(operating::RD, LineKind::Expense, Decimal::from(3_750_000)),
            LineItem::new(operating::GA, LineKind::Expense, Decimal::from(1_250_000)),
        ],
    )
}

/// CAPEX baseline shown on the capital investment forecasting page.
pub fn demo_capex_baseline() -> Result<BaselineModel, BudgetError> {
    BaselineModel::new(
        capex_profile(),
        vec![
            LineItem::new(capex::FACILITIES, LineKind::Expense, Decimal::from(5_000_000)),
            LineItem::new(capex::EQUIPMENT, LineKind::Expense, Decimal::from(3_000_000)),
            LineItem::new(capex::RD, LineKind::Expense, Decimal::from(2_000_000)),
            LineItem::new(capex::TECH_UPGRADES, LineKind::Expense, Decimal::from(1_500_000)),
        ],
    )
}

/// Looks up a demo baseline by preset name ("operating" or "capex").
///
/// Returns `None` for an unknown preset.
pub fn demo_baseline(preset: &str) -> Option<Result<BaselineModel, BudgetError>> {
    match preset.to_ascii_lowercase().as_str() {
        "operating" => Some(demo_operating_baseline()),
        "capex" => Some(demo_capex_baseline()),
        _ => None,
    }
}
