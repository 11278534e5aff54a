//! Core business logic for Budgetlab.
//!
//! This crate contains the pure scenario projection engine with ZERO I/O.
//! A baseline budget plus a set of drivers goes in; a projected budget,
//! derived metrics, a variance report and a narrative come out.
//!
//! # Modules
//!
//! - `budget` - Baseline budgets, derived metrics and variance analysis
//! - `simulation` - Drivers, the transform pipeline and what-if scenarios

pub mod budget;
pub mod simulation;
