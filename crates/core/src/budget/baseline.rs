//! Baseline model: the unmodified reference budget.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::BudgetError;
use super::profile::CategoryProfile;
use super::types::{BudgetSnapshot, LineItem, MAX_AMOUNT};

/// Reference budget every scenario is derived from and compared against.
///
/// Immutable once built. Line items are stored in profile order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BaselineModel {
    profile: CategoryProfile,
    snapshot: BudgetSnapshot,
}

impl BaselineModel {
    /// Builds a baseline from a profile and its line items.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NegativeAmount` for a negative amount,
    /// `BudgetError::AmountTooLarge` above [`MAX_AMOUNT`],
    /// `BudgetError::DuplicateCategory` for a repeated category,
    /// `BudgetError::UnknownCategory` for a category outside the profile,
    /// `BudgetError::KindMismatch` when a kind disagrees with the profile, and
    /// `BudgetError::MissingCategory` when a profile category has no item.
    pub fn new(profile: CategoryProfile, items: Vec<LineItem>) -> Result<Self, BudgetError> {
        let mut seen = HashSet::new();

        for item in &items {
            if item.amount() < Decimal::ZERO {
                return Err(BudgetError::NegativeAmount(item.category().to_string()));
            }
            if item.amount() > MAX_AMOUNT {
                return Err(BudgetError::AmountTooLarge(item.category().to_string()));
            }
            if !seen.insert(item.category()) {
                return Err(BudgetError::DuplicateCategory(item.category().to_string()));
            }
            let policy = profile
                .policy(item.category())
                .ok_or_else(|| BudgetError::UnknownCategory(item.category().to_string()))?;
            if policy.kind != item.kind() {
                return Err(BudgetError::KindMismatch {
                    category: item.category().to_string(),
                    expected: policy.kind,
                    got: item.kind(),
                });
            }
        }

        let mut ordered = Vec::with_capacity(profile.policies.len());
        for category in profile.categories() {
            let item = items
                .iter()
                .find(|item| item.category() == category)
                .ok_or_else(|| BudgetError::MissingCategory(category.to_string()))?;
            ordered.push(item.clone());
        }

        Ok(Self {
            profile,
            snapshot: BudgetSnapshot::from_items(ordered),
        })
    }

    /// Category coupling table.
    #[must_use]
    pub fn profile(&self) -> &CategoryProfile {
        &self.profile
    }

    /// Baseline amounts.
    #[must_use]
    pub fn snapshot(&self) -> &BudgetSnapshot {
        &self.snapshot
    }
}
