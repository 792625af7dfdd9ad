//! Portfolio configuration
//!
//! `PortfolioConfig` is the serializable description of a household plan:
//! its profile, pools, streams, goals and allocation rules, all referring to
//! each other by name. [`PortfolioConfig::build`] turns it into a validated
//! [`Portfolio`] through the [`PortfolioBuilder`].
//!
//! # Builder DSL
//!
//! For assembling portfolios in code, use the builder directly:
//!
//! ```ignore
//! use nestegg_core::config::PortfolioBuilder;
//! use nestegg_core::model::Asset;
//!
//! let (portfolio, metadata) = PortfolioBuilder::new()
//!     .horizon(2025, 2055)
//!     .current_year(2025)
//!     .asset(Asset::new("Brokerage", 2025, 40_000.0, 0.06))
//!     .savings_distribution(2025, 2055, [("Brokerage", 100.0)])
//!     .spend_priority(2025, 2055, [("Brokerage", 1)])
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{BoundsError, PortfolioError, TimeSeriesError};
use crate::goal::Goal;
use crate::model::{
    Asset, Expense, Income, Liability, MoneyPlottable, PlotPoint, PlottableKind, Year,
};
use crate::portfolio::Portfolio;

pub mod builder;
pub mod metadata;

pub use builder::{DEFAULT_HORIZON_YEARS, PortfolioBuilder};
pub use metadata::PortfolioMetadata;

fn default_true() -> bool {
    true
}

/// Who the plan is for and the horizon it covers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Defaults to `current_year`
    #[serde(default)]
    pub start_year: Option<Year>,
    /// Defaults to `start_year` plus [`DEFAULT_HORIZON_YEARS`]
    #[serde(default)]
    pub end_year: Option<Year>,
    /// Defaults to the current civil year
    #[serde(default)]
    pub current_year: Option<Year>,
    #[serde(default)]
    pub current_age: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    pub name: String,
    pub init_year: Year,
    pub init_value: f64,
    #[serde(default)]
    pub growth_rate: f64,
    #[serde(default = "default_true")]
    pub liquid: bool,
    #[serde(default)]
    pub spend_cutoff: f64,
    /// Linear ramp from this point up to the init year; applied before `past_values`
    #[serde(default)]
    pub extrapolate_from: Option<PlotPoint>,
    /// Known balances before the init year
    #[serde(default)]
    pub past_values: Vec<PlotPoint>,
}

impl AssetConfig {
    pub fn to_asset(&self) -> Result<Asset, TimeSeriesError> {
        let mut asset = Asset::new(
            self.name.clone(),
            self.init_year,
            self.init_value,
            self.growth_rate,
        )
        .liquid(self.liquid)
        .with_spend_cutoff(self.spend_cutoff);

        if let Some(start) = self.extrapolate_from {
            asset.extrapolate_from_start(start.year, start.value)?;
        }
        if !self.past_values.is_empty() {
            asset.populate_past_values(&self.past_values)?;
        }
        Ok(asset)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiabilityConfig {
    pub name: String,
    pub init_year: Year,
    pub init_value: f64,
    #[serde(default)]
    pub growth_rate: f64,
    /// Name of the expense whose payments pay this liability down
    #[serde(default)]
    pub repayment: Option<String>,
    #[serde(default)]
    pub past_values: Vec<PlotPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeConfig {
    pub name: String,
    pub init_year: Year,
    pub end_year: Year,
    pub init_value: f64,
    #[serde(default)]
    pub growth_rate: f64,
}

impl IncomeConfig {
    pub fn to_income(&self) -> Result<Income, BoundsError> {
        Income::new(
            self.name.clone(),
            self.init_year,
            self.end_year,
            self.init_value,
            self.growth_rate,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseConfig {
    pub name: String,
    pub init_year: Year,
    pub end_year: Year,
    pub init_value: f64,
    #[serde(default)]
    pub growth_rate: f64,
    /// One-time amount added in the init year
    #[serde(default)]
    pub down_payment: Option<f64>,
}

impl ExpenseConfig {
    pub fn to_expense(&self) -> Result<Expense, BoundsError> {
        let expense = Expense::new(
            self.name.clone(),
            self.init_year,
            self.end_year,
            self.init_value,
            self.growth_rate,
        )?;
        Ok(match self.down_payment {
            Some(down_payment) => expense.with_down_payment(down_payment),
            None => expense,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    pub asset: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsDistributionConfig {
    pub start_year: Year,
    pub end_year: Year,
    pub allocations: Vec<ShareConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityConfig {
    pub asset: String,
    pub priority: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendPriorityConfig {
    pub start_year: Year,
    pub end_year: Year,
    pub order: Vec<PriorityConfig>,
}

/// Complete, serializable description of a portfolio
///
/// **Your situation**:
/// - `profile` - horizon, current year and age
/// - `assets` / `liabilities` - standing balances
///
/// **Your plan**:
/// - `incomes` / `expenses` - yearly flows
/// - `goals` - purchases, optionally financed
/// - `savings_distributions` / `spend_priorities` - where surplus goes and
///   where deficit comes from, by year window
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioConfig {
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub assets: Vec<AssetConfig>,
    #[serde(default)]
    pub liabilities: Vec<LiabilityConfig>,
    #[serde(default)]
    pub incomes: Vec<IncomeConfig>,
    #[serde(default)]
    pub expenses: Vec<ExpenseConfig>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub savings_distributions: Vec<SavingsDistributionConfig>,
    #[serde(default)]
    pub spend_priorities: Vec<SpendPriorityConfig>,
}

impl PortfolioConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a variant with a different yearly amount for one expense.
    /// Returns `None` if no expense has that name.
    #[must_use]
    pub fn with_expense_value(&self, name: &str, init_value: f64) -> Option<Self> {
        let mut config = self.clone();
        let expense = config.expenses.iter_mut().find(|e| e.name == name)?;
        expense.init_value = init_value;
        Some(config)
    }

    /// Create a variant where one income stops at `end_year` (e.g. an earlier
    /// retirement). Returns `None` if no income has that name.
    #[must_use]
    pub fn with_income_end_year(&self, name: &str, end_year: Year) -> Option<Self> {
        let mut config = self.clone();
        let income = config.incomes.iter_mut().find(|i| i.name == name)?;
        income.end_year = end_year;
        Some(config)
    }

    /// Translate into a builder, resolving repayment streams by name
    pub fn builder(&self) -> Result<PortfolioBuilder, PortfolioError> {
        let mut builder = PortfolioBuilder::new().current_age(self.profile.current_age);
        if let Some(year) = self.profile.current_year {
            builder = builder.current_year(year);
        }
        if let Some(year) = self.profile.start_year {
            builder = builder.start_year(year);
        }
        if let Some(year) = self.profile.end_year {
            builder = builder.end_year(year);
        }

        for asset in &self.assets {
            builder = builder.asset(asset.to_asset()?);
        }
        for income in &self.incomes {
            builder = builder.income(income.to_income()?);
        }
        for expense in &self.expenses {
            builder = builder.expense(expense.to_expense()?);
        }
        for liability in &self.liabilities {
            builder = builder.liability(self.to_liability(liability)?);
        }
        for goal in &self.goals {
            builder = builder.goal(goal.clone());
        }

        for rule in &self.savings_distributions {
            builder = builder.savings_distribution(
                rule.start_year,
                rule.end_year,
                rule.allocations
                    .iter()
                    .map(|s| (s.asset.as_str(), s.percentage)),
            );
        }
        for rule in &self.spend_priorities {
            builder = builder.spend_priority(
                rule.start_year,
                rule.end_year,
                rule.order.iter().map(|p| (p.asset.as_str(), p.priority)),
            );
        }
        Ok(builder)
    }

    /// Build and fully validate the portfolio
    pub fn build(&self) -> Result<(Portfolio, PortfolioMetadata), PortfolioError> {
        self.builder()?.build()
    }

    fn to_liability(&self, config: &LiabilityConfig) -> Result<Liability, PortfolioError> {
        let mut liability = Liability::new(
            config.name.clone(),
            config.init_year,
            config.init_value,
            config.growth_rate,
        );
        if let Some(name) = &config.repayment {
            let expense = self
                .expenses
                .iter()
                .find(|e| &e.name == name)
                .ok_or_else(|| PortfolioError::UnknownName {
                    kind: PlottableKind::EXPENSE,
                    name: name.clone(),
                })?;
            liability = liability.with_repayment(expense.to_expense()?);
        }
        if !config.past_values.is_empty() {
            liability.populate_past_values(&config.past_values)?;
        }
        Ok(liability)
    }
}
