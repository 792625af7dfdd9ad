//! Portfolio Builder
//!
//! The PortfolioBuilder provides a fluent API for assembling a portfolio with
//! name-based asset references, automatic ID assignment and metadata tracking.
//! Nothing is checked until [`PortfolioBuilder::build`], which adds every
//! entity through the portfolio's own validating add-operations and then runs
//! the full coverage check.
//!
//! # Example
//!
//! ```ignore
//! use nestegg_core::config::PortfolioBuilder;
//! use nestegg_core::model::{Asset, Expense, Income};
//!
//! let (portfolio, metadata) = PortfolioBuilder::new()
//!     .horizon(2025, 2070)
//!     .current_year(2025)
//!     .current_age(35)
//!
//!     .asset(Asset::new("Brokerage", 2025, 40_000.0, 0.06))
//!     .asset(Asset::new("Savings", 2025, 15_000.0, 0.01).with_spend_cutoff(10_000.0))
//!
//!     .income(Income::new("Salary", 2025, 2055, 85_000.0, 0.02)?)
//!     .expense(Expense::new("Living", 2025, 2070, 60_000.0, 0.03)?)
//!
//!     .savings_distribution(2025, 2070, [("Brokerage", 80.0), ("Savings", 20.0)])
//!     .spend_priority(2025, 2070, [("Savings", 1), ("Brokerage", 2)])
//!     .build()?;
//! ```

use super::metadata::PortfolioMetadata;
use crate::error::PortfolioError;
use crate::goal::Goal;
use crate::model::{
    Asset, AssetId, Expense, Income, Liability, MoneyPlottable, PlottableKind,
    SavingsDistribution, SpendPriority, Year,
};
use crate::portfolio::{Portfolio, this_year};

/// Horizon length used when no end year is given
pub const DEFAULT_HORIZON_YEARS: Year = 30;

/// Builder for creating portfolios with automatic ID assignment and metadata tracking
#[derive(Debug, Clone, Default)]
pub struct PortfolioBuilder {
    start_year: Option<Year>,
    end_year: Option<Year>,
    current_year: Option<Year>,
    current_age: u32,

    // Pending entities (added during build)
    assets: Vec<Asset>,
    liabilities: Vec<Liability>,
    incomes: Vec<Income>,
    expenses: Vec<Expense>,
    goals: Vec<Goal>,
    savings_distributions: Vec<PendingRule<f64>>,
    spend_priorities: Vec<PendingRule<u32>>,
}

/// An allocation rule whose assets are still referred to by name
#[derive(Debug, Clone)]
struct PendingRule<T> {
    start_year: Year,
    end_year: Year,
    entries: Vec<(String, T)>,
}

impl<T> PendingRule<T> {
    fn new<S: Into<String>>(
        start_year: Year,
        end_year: Year,
        entries: impl IntoIterator<Item = (S, T)>,
    ) -> Self {
        Self {
            start_year,
            end_year,
            entries: entries
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }

    fn resolve(
        self,
        metadata: &PortfolioMetadata,
    ) -> Result<(Year, Year, Vec<(AssetId, T)>), PortfolioError> {
        let entries = self
            .entries
            .into_iter()
            .map(|(name, value)| match metadata.asset_id(&name) {
                Some(id) => Ok((id, value)),
                None => Err(PortfolioError::UnknownName {
                    kind: PlottableKind::ASSET,
                    name,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((self.start_year, self.end_year, entries))
    }
}

impl PortfolioBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Profile
    // =========================================================================

    #[must_use]
    pub fn start_year(mut self, year: Year) -> Self {
        self.start_year = Some(year);
        self
    }

    #[must_use]
    pub fn end_year(mut self, year: Year) -> Self {
        self.end_year = Some(year);
        self
    }

    /// Set both ends of the planning horizon
    #[must_use]
    pub fn horizon(self, start_year: Year, end_year: Year) -> Self {
        self.start_year(start_year).end_year(end_year)
    }

    /// Defaults to the current civil year
    #[must_use]
    pub fn current_year(mut self, year: Year) -> Self {
        self.current_year = Some(year);
        self
    }

    #[must_use]
    pub fn current_age(mut self, age: u32) -> Self {
        self.current_age = age;
        self
    }

    // =========================================================================
    // Pools and streams
    // =========================================================================

    #[must_use]
    pub fn asset(mut self, asset: Asset) -> Self {
        self.assets.push(asset);
        self
    }

    #[must_use]
    pub fn liability(mut self, liability: Liability) -> Self {
        self.liabilities.push(liability);
        self
    }

    #[must_use]
    pub fn income(mut self, income: Income) -> Self {
        self.incomes.push(income);
        self
    }

    #[must_use]
    pub fn expense(mut self, expense: Expense) -> Self {
        self.expenses.push(expense);
        self
    }

    /// Add a purchase, expanded into an expense and an optional loan
    #[must_use]
    pub fn goal(mut self, goal: Goal) -> Self {
        self.goals.push(goal);
        self
    }

    // =========================================================================
    // Allocation rules
    // =========================================================================

    /// Distribute surplus over `start_year..=end_year` by asset name and percentage
    #[must_use]
    pub fn savings_distribution<S: Into<String>>(
        mut self,
        start_year: Year,
        end_year: Year,
        shares: impl IntoIterator<Item = (S, f64)>,
    ) -> Self {
        self.savings_distributions
            .push(PendingRule::new(start_year, end_year, shares));
        self
    }

    /// Drain assets over `start_year..=end_year` in ascending priority
    #[must_use]
    pub fn spend_priority<S: Into<String>>(
        mut self,
        start_year: Year,
        end_year: Year,
        order: impl IntoIterator<Item = (S, u32)>,
    ) -> Self {
        self.spend_priorities
            .push(PendingRule::new(start_year, end_year, order));
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Assemble and fully validate the portfolio.
    ///
    /// Entity names must be unique within their kind; allocation rules must
    /// name assets added to this builder.
    pub fn build(self) -> Result<(Portfolio, PortfolioMetadata), PortfolioError> {
        let current_year = self.current_year.unwrap_or_else(this_year);
        let start_year = self.start_year.unwrap_or(current_year);
        let end_year = self
            .end_year
            .unwrap_or(start_year.saturating_add(DEFAULT_HORIZON_YEARS));

        let mut portfolio = Portfolio::new(start_year, end_year, current_year, self.current_age)?;
        let mut metadata = PortfolioMetadata::new();

        for asset in self.assets {
            let name = unique_name(&asset, metadata.asset_id(asset.name()).is_some())?;
            let id = portfolio.add_asset(asset)?;
            metadata.register_asset(id, name);
        }
        for liability in self.liabilities {
            let name = unique_name(&liability, metadata.liability_id(liability.name()).is_some())?;
            let id = portfolio.add_liability(liability)?;
            metadata.register_liability(id, name);
        }
        for income in self.incomes {
            let name = unique_name(&income, metadata.income_id(income.name()).is_some())?;
            let id = portfolio.add_income(income)?;
            metadata.register_income(id, name);
        }
        for expense in self.expenses {
            let name = unique_name(&expense, metadata.expense_id(expense.name()).is_some())?;
            let id = portfolio.add_expense(expense)?;
            metadata.register_expense(id, name);
        }

        for goal in &self.goals {
            let financing = goal.financing()?;
            unique_name(
                &financing.expense,
                metadata.expense_id(financing.expense.name()).is_some(),
            )?;
            if let Some(loan) = &financing.liability {
                unique_name(loan, metadata.liability_id(loan.name()).is_some())?;
            }
            let (expense_id, liability_id) = portfolio.add_goal(goal)?;
            metadata.register_expense(expense_id, financing.expense.name());
            if let (Some(id), Some(loan)) = (liability_id, &financing.liability) {
                metadata.register_liability(id, loan.name());
            }
        }

        for rule in self.savings_distributions {
            let (start, end, shares) = rule.resolve(&metadata)?;
            let distribution = SavingsDistribution::new(&portfolio, start, end, shares)?;
            portfolio.add_savings_distribution(distribution)?;
        }
        for rule in self.spend_priorities {
            let (start, end, order) = rule.resolve(&metadata)?;
            let priority = SpendPriority::new(&portfolio, start, end, order)?;
            portfolio.add_spend_priority(priority)?;
        }

        portfolio.validate()?;
        Ok((portfolio, metadata))
    }
}

fn unique_name(entity: &impl MoneyPlottable, taken: bool) -> Result<String, PortfolioError> {
    if taken {
        return Err(PortfolioError::DuplicateName {
            kind: entity.kind(),
            name: entity.name().to_string(),
        });
    }
    Ok(entity.name().to_string())
}
