//! Household financial projection engine
//!
//! This crate projects a household's finances year by year. It supports:
//! - Assets that compound and absorb savings or fund deficits
//! - Liabilities that compound and shrink under a repayment stream
//! - Incomes and expenses with their own growth rates
//! - Time-windowed savings distributions and spend priorities
//! - A validator proving those rules cover the whole planning horizon
//! - A deterministic year-by-year simulator
//!
//! # Builder DSL
//!
//! Use the fluent builder API to refer to assets by name:
//!
//! ```ignore
//! use nestegg_core::config::PortfolioBuilder;
//! use nestegg_core::model::{Asset, Income};
//!
//! let (mut portfolio, metadata) = PortfolioBuilder::new()
//!     .horizon(2025, 2060)
//!     .current_year(2025)
//!     .current_age(40)
//!     .asset(Asset::new("Brokerage", 2025, 50_000.0, 0.06))
//!     .income(Income::new("Salary", 2025, 2050, 90_000.0, 0.02)?)
//!     .savings_distribution(2025, 2060, [("Brokerage", 100.0)])
//!     .spend_priority(2025, 2060, [("Brokerage", 1)])
//!     .build()?;
//!
//! let report = portfolio.simulate()?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod goal;
pub mod portfolio;
pub mod simulation;
pub mod validator;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{PortfolioBuilder, PortfolioConfig, PortfolioMetadata};
pub use error::PortfolioError;
pub use portfolio::Portfolio;
pub use simulation::{SimulationReport, simulate_many};
