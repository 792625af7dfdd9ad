//! Portfolio validation
//!
//! Two kinds of checks live here:
//! - bounds: every entity's years fall inside the horizon (pools from the
//!   current year on, streams anywhere in `start_year..=end_year`);
//! - coverage: each allocation rule list starts where the first asset (or
//!   the current year) starts, ends at the horizon's end, and has neither
//!   gaps nor overlaps in between.
//!
//! Passing both means the simulator can rely on exactly one savings
//! distribution and one spend priority being in force for every year in
//! which an asset can receive or fund money.

use crate::error::{BoundsError, CoverageError, ValidationError};
use crate::model::{
    AllocationWindow, Asset, Expense, Income, Liability, MoneyPlottable, PlottableKind,
    RuleFamily, Year,
};
use crate::portfolio::Portfolio;

pub struct PortfolioValidator<'a> {
    portfolio: &'a Portfolio,
}

impl<'a> PortfolioValidator<'a> {
    pub fn new(portfolio: &'a Portfolio) -> Self {
        Self { portfolio }
    }

    /// Run every check: entity bounds first, then both coverage proofs
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (_, asset) in self.portfolio.assets() {
            self.validate_asset(asset)?;
        }
        for (_, liability) in self.portfolio.liabilities() {
            self.validate_liability(liability)?;
        }
        for (_, income) in self.portfolio.incomes() {
            self.validate_income(income)?;
        }
        for (_, expense) in self.portfolio.expenses() {
            self.validate_expense(expense)?;
        }
        self.validate_savings_distribution_list()?;
        self.validate_spend_priority_list()?;
        Ok(())
    }

    // =========================================================================
    // Bounds
    // =========================================================================

    /// Pools describe what exists from now on, so they are bounded by the
    /// current year rather than the start of the horizon.
    fn check_pool(&self, pool: &impl MoneyPlottable) -> Result<(), BoundsError> {
        let min_year = self.portfolio.current_year();
        let max_year = self.portfolio.end_year();
        let year = pool.init_year();
        if year < min_year || year > max_year {
            return Err(BoundsError::OutsidePortfolio {
                kind: pool.kind(),
                name: pool.name().to_string(),
                first_year: year,
                last_year: year,
                min_year,
                max_year,
            });
        }
        Ok(())
    }

    fn check_stream(
        &self,
        kind: PlottableKind,
        name: &str,
        init_year: Year,
        end_year: Year,
    ) -> Result<(), BoundsError> {
        let min_year = self.portfolio.start_year();
        let max_year = self.portfolio.end_year();
        let inside = |year: Year| year >= min_year && year <= max_year;
        if !inside(init_year) || !inside(end_year) {
            return Err(BoundsError::OutsidePortfolio {
                kind,
                name: name.to_string(),
                first_year: init_year,
                last_year: end_year,
                min_year,
                max_year,
            });
        }
        Ok(())
    }

    pub fn validate_asset(&self, asset: &Asset) -> Result<(), BoundsError> {
        self.check_pool(asset)
    }

    pub fn validate_liability(&self, liability: &Liability) -> Result<(), BoundsError> {
        self.check_pool(liability)
    }

    pub fn validate_income(&self, income: &Income) -> Result<(), BoundsError> {
        self.check_stream(
            income.kind(),
            income.name(),
            income.init_year(),
            income.end_year(),
        )
    }

    pub fn validate_expense(&self, expense: &Expense) -> Result<(), BoundsError> {
        self.check_stream(
            expense.kind(),
            expense.name(),
            expense.init_year(),
            expense.end_year(),
        )
    }

    // =========================================================================
    // Coverage
    // =========================================================================

    pub fn validate_savings_distribution_list(&self) -> Result<(), CoverageError> {
        self.validate_coverage(
            RuleFamily::SavingsDistribution,
            self.portfolio.savings_distributions(),
        )
    }

    pub fn validate_spend_priority_list(&self) -> Result<(), CoverageError> {
        self.validate_coverage(RuleFamily::SpendPriority, self.portfolio.spend_priorities())
    }

    /// Year the first rule window must start in, or `None` when the portfolio
    /// has no assets and there is nothing to distribute to or spend from.
    pub fn coverage_start(&self) -> Option<Year> {
        self.portfolio
            .assets()
            .map(|(_, asset)| asset.init_year())
            .min()
            .map(|first| first.max(self.portfolio.current_year()))
    }

    fn validate_coverage<R: AllocationWindow>(
        &self,
        family: RuleFamily,
        windows: &[R],
    ) -> Result<(), CoverageError> {
        let Some(expected_start) = self.coverage_start() else {
            return Ok(());
        };
        let end_year = self.portfolio.end_year();

        let (Some(first), Some(last)) = (windows.first(), windows.last()) else {
            return Err(CoverageError::Gap {
                family,
                from: expected_start,
                to: end_year,
            });
        };

        if first.start_year() != expected_start {
            return Err(CoverageError::FirstWindowStart {
                family,
                expected: expected_start,
                actual: first.start_year(),
            });
        }

        for pair in windows.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            let boundary = current.end_year() + 1;
            if next.start_year() < boundary {
                return Err(CoverageError::Overlap {
                    family,
                    from: next.start_year(),
                    to: current.end_year().min(next.end_year()),
                });
            }
            if next.start_year() > boundary {
                return Err(CoverageError::Gap {
                    family,
                    from: boundary,
                    to: next.start_year() - 1,
                });
            }
        }

        if last.end_year() != end_year {
            return Err(CoverageError::LastWindowEnd {
                family,
                expected: end_year,
                actual: last.end_year(),
            });
        }

        Ok(())
    }
}
