//! Budget data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of decimal places every projected amount is kept at.
pub const AMOUNT_DP: u32 = 4;

/// Largest accepted baseline amount (10^15).
///
/// `Decimal` tops out near 7.9 * 10^28, so every category at this ceiling can
/// still be multiplied by the stage factors and summed without overflow.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Classification of a budget line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Revenue line.
    Income,
    /// Cost of goods sold. Expense-like, but kept apart from operating expense.
    CostOfSales,
    /// Operating or capital expense line.
    Expense,
}

impl LineKind {
    /// Returns true if an increase on this line hurts the bottom line.
    #[must_use]
    pub const fn is_expense_like(self) -> bool {
        matches!(self, Self::CostOfSales | Self::Expense)
    }
}

/// A single budget line item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineItem {
    category: String,
    kind: LineKind,
    amount: Decimal,
}

impl LineItem {
    /// Creates a new line item.
    #[must_use]
    pub fn new(category: impl Into<String>, kind: LineKind, amount: Decimal) -> Self {
        Self {
            category: category.into(),
            kind,
            amount,
        }
    }

    /// Category name.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Line kind. Fixed at creation.
    #[must_use]
    pub const fn kind(&self) -> LineKind {
        self.kind
    }

    /// Current amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }
}

/// An ordered set of line items over a fixed, closed set of categories.
///
/// Only amounts can change once a snapshot exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    items: Vec<LineItem>,
}

impl BudgetSnapshot {
    pub(crate) fn from_items(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    /// Line items in category order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterates over the line items in category order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the snapshot has no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up a line item by exact category name.
    #[must_use]
    pub fn get(&self, category: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.category == category)
    }

    /// Amount of a category, if present.
    #[must_use]
    pub fn amount(&self, category: &str) -> Option<Decimal> {
        self.get(category).map(LineItem::amount)
    }

    /// Sum of the amounts of every line of the given kind.
    #[must_use]
    pub fn total_of(&self, kind: LineKind) -> Decimal {
        self.items
            .iter()
            .filter(|item| item.kind == kind)
            .map(|item| item.amount)
            .sum()
    }

    /// Rewrites every amount through `f`.
    ///
    /// Changed amounts are rounded to [`AMOUNT_DP`] places and floored at
    /// zero. Unchanged amounts are kept as they are, so an identity pass never
    /// alters a snapshot.
    pub(crate) fn map_amounts<F>(&mut self, mut f: F)
    where
        F: FnMut(&LineItem) -> Decimal,
    {
        for item in &mut self.items {
            let next = f(item);
            if next != item.amount {
                item.amount = normalize_amount(next);
            }
        }
    }
}

/// Rounds an amount to [`AMOUNT_DP`] places and floors it at zero.
#[must_use]
pub fn normalize_amount(amount: Decimal) -> Decimal {
    let rounded = amount.round_dp(AMOUNT_DP);
    if rounded.is_sign_negative() || rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}
