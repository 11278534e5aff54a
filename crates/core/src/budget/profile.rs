//! Category coupling table.
//!
//! A profile describes, per category, which drivers act on it. The transform
//! stages only ever consult these flags, so a new category set needs a new
//! profile and nothing else.

use serde::{Deserialize, Serialize};

use super::types::LineKind;

/// Side of the investment trade-off a category belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationSide {
    /// Research and development.
    Research,
    /// Sales and marketing.
    Commercial,
}

/// Driver coupling rules for one category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryPolicy {
    /// Category name.
    pub category: String,
    /// Expected line kind.
    pub kind: LineKind,
    /// Scales with the revenue growth driver.
    pub revenue_coupled: bool,
    /// Accepts an independent cost-cut driver.
    pub cost_cut: bool,
    /// Capital category; accepts a delay driver.
    pub capital: bool,
    /// Scaled by the inflation overlay.
    pub inflation_exposed: bool,
    /// Investment trade-off side, if any.
    pub allocation: Option<AllocationSide>,
}

impl CategoryPolicy {
    /// Creates a policy with every coupling disabled except inflation exposure.
    #[must_use]
    pub fn new(category: impl Into<String>, kind: LineKind) -> Self {
        Self {
            category: category.into(),
            kind,
            revenue_coupled: false,
            cost_cut: false,
            capital: false,
            inflation_exposed: true,
            allocation: None,
        }
    }

    /// Marks the category as moving with revenue.
    #[must_use]
    pub fn revenue_coupled(mut self) -> Self {
        self.revenue_coupled = true;
        self
    }

    /// Marks the category as eligible for a cost cut.
    #[must_use]
    pub fn cuttable(mut self) -> Self {
        self.cost_cut = true;
        self
    }

    /// Marks the category as capital spending eligible for delays.
    #[must_use]
    pub fn capital(mut self) -> Self {
        self.capital = true;
        self
    }

    /// Excludes the category from the inflation overlay.
    #[must_use]
    pub fn inflation_free(mut self) -> Self {
        self.inflation_exposed = false;
        self
    }

    /// Assigns the category to a side of the investment trade-off.
    #[must_use]
    pub fn allocated_to(mut self, side: AllocationSide) -> Self {
        self.allocation = Some(side);
        self
    }
}

/// A named, ordered category set with its coupling rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryProfile {
    /// Profile name (e.g., "operating").
    pub name: String,
    /// Policies in display order.
    pub policies: Vec<CategoryPolicy>,
}

impl CategoryProfile {
    /// Creates a profile.
    #[must_use]
    pub fn new(name: impl Into<String>, policies: Vec<CategoryPolicy>) -> Self {
        Self {
            name: name.into(),
            policies,
        }
    }

    /// Policy for an exact category name.
    #[must_use]
    pub fn policy(&self, category: &str) -> Option<&CategoryPolicy> {
        self.policies.iter().find(|p| p.category == category)
    }

    /// Policy for a category name, ignoring ASCII case.
    ///
    /// Meant for user-typed or configuration-supplied names.
    #[must_use]
    pub fn resolve(&self, category: &str) -> Option<&CategoryPolicy> {
        self.policies
            .iter()
            .find(|p| p.category.eq_ignore_ascii_case(category))
    }

    /// Category names in order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.policies.iter().map(|p| p.category.as_str())
    }

    /// Categories that scale with revenue, in order.
    pub fn revenue_coupled(&self) -> impl Iterator<Item = &CategoryPolicy> {
        self.policies.iter().filter(|p| p.revenue_coupled)
    }

    /// Categories on one side of the investment trade-off, in order.
    pub fn allocated_to(&self, side: AllocationSide) -> impl Iterator<Item = &CategoryPolicy> {
        self.policies
            .iter()
            .filter(move |p| p.allocation == Some(side))
    }

    /// Returns true if every category is inflation-exposed.
    #[must_use]
    pub fn fully_inflation_exposed(&self) -> bool {
        self.policies.iter().all(|p| p.inflation_exposed)
    }
}
