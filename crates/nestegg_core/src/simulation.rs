//! Year-by-year projection of a portfolio
//!
//! For each year of the horizon, in order:
//! 1. sum the incomes and expenses active that year into the net flow;
//! 2. on a surplus, credit each asset its share under the savings
//!    distribution in force;
//! 3. on a deficit, drain assets in spend-priority order, first down to
//!    their spend cutoffs and then, if needed, down to zero;
//! 4. grow every remaining active asset that was not touched.
//!
//! A deficit left over after both passes aborts the run: the plan is not
//! sustainable in that year.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{AllocationError, SimulationError};
use crate::model::{AllocationWindow, AssetId, MoneyPlottable, RuleFamily, Year};
use crate::portfolio::Portfolio;
use crate::validator::PortfolioValidator;

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};

/// Deficits smaller than this are considered covered
const DEFICIT_TOLERANCE: f64 = 0.001;

/// How money moved into or out of an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationKind {
    /// Share of a yearly surplus
    Savings,
    /// First-pass withdrawal, stopping at the spend cutoff
    CutoffWithdrawal,
    /// Second-pass withdrawal, ignoring the spend cutoff
    FullWithdrawal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub asset_id: AssetId,
    /// Positive for savings, positive magnitude withdrawn for withdrawals
    pub amount: f64,
    pub kind: AllocationKind,
}

/// What happened in one simulated year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: Year,
    pub gross_income: f64,
    pub gross_expenses: f64,
    pub net_flow: f64,
    /// Savings credited and withdrawals made, in the order they happened
    pub allocations: Vec<Allocation>,
}

impl YearSummary {
    pub fn total_saved(&self) -> f64 {
        self.allocations
            .iter()
            .filter(|a| a.kind == AllocationKind::Savings)
            .map(|a| a.amount)
            .sum()
    }

    pub fn total_withdrawn(&self) -> f64 {
        self.allocations
            .iter()
            .filter(|a| a.kind != AllocationKind::Savings)
            .map(|a| a.amount)
            .sum()
    }
}

/// Complete record of a simulation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub years: Vec<YearSummary>,
}

impl SimulationReport {
    pub fn year(&self, year: Year) -> Option<&YearSummary> {
        self.years.iter().find(|s| s.year == year)
    }

    /// Years that ran a deficit, in order
    pub fn deficit_years(&self) -> impl Iterator<Item = Year> + '_ {
        self.years
            .iter()
            .filter(|s| s.net_flow < 0.0)
            .map(|s| s.year)
    }
}

/// Validate the portfolio, then run it over the whole horizon.
///
/// Any previously simulated values are discarded first, so running twice
/// yields the same result.
pub fn simulate(portfolio: &mut Portfolio) -> Result<SimulationReport, SimulationError> {
    PortfolioValidator::new(portfolio).validate()?;
    portfolio.invalidate();

    let mut simulator = PortfolioSimulator::new(portfolio);
    let report = simulator.run()?;

    portfolio.simulated = true;
    Ok(report)
}

/// Simulate independent portfolios, in parallel when the `parallel` feature
/// is enabled. Results are returned in input order.
pub fn simulate_many(
    portfolios: &mut [Portfolio],
) -> Vec<Result<SimulationReport, SimulationError>> {
    #[cfg(feature = "parallel")]
    {
        portfolios.par_iter_mut().map(simulate).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        portfolios.iter_mut().map(simulate).collect()
    }
}

struct PortfolioSimulator<'a> {
    portfolio: &'a mut Portfolio,
}

impl<'a> PortfolioSimulator<'a> {
    fn new(portfolio: &'a mut Portfolio) -> Self {
        Self { portfolio }
    }

    fn run(&mut self) -> Result<SimulationReport, SimulationError> {
        let mut report = SimulationReport::default();
        for year in self.portfolio.start_year..=self.portfolio.end_year {
            report.years.push(self.step(year)?);
        }
        self.record_net_worth()?;
        Ok(report)
    }

    fn step(&mut self, year: Year) -> Result<YearSummary, SimulationError> {
        let gross_income: f64 = self
            .portfolio
            .incomes
            .iter()
            .filter(|(_, s)| s.init_year() <= year)
            .try_fold(0.0, |total, (_, s)| s.value_at(year).map(|v| total + v))?;
        let gross_expenses: f64 = self
            .portfolio
            .expenses
            .iter()
            .filter(|(_, s)| s.init_year() <= year)
            .try_fold(0.0, |total, (_, s)| s.value_at(year).map(|v| total + v))?;
        let net_flow = gross_income - gross_expenses;
        self.portfolio.net_flow.record(year, net_flow)?;

        debug!(year, gross_income, gross_expenses, net_flow, "simulating year");

        let mut allocations = Vec::new();
        if net_flow >= 0.0 {
            self.distribute_surplus(year, net_flow, &mut allocations)?;
        } else {
            self.cover_deficit(year, -net_flow, &mut allocations)?;
        }

        // Dragnet: grow every active asset nothing else touched this year
        for (_, asset) in &mut self.portfolio.assets {
            if asset.init_year() <= year {
                asset.update_plot_point(year, 0.0, false)?;
            }
        }

        Ok(YearSummary {
            year,
            gross_income,
            gross_expenses,
            net_flow,
            allocations,
        })
    }

    fn distribute_surplus(
        &mut self,
        year: Year,
        surplus: f64,
        allocations: &mut Vec<Allocation>,
    ) -> Result<(), SimulationError> {
        let Portfolio {
            assets,
            savings_distributions,
            ..
        } = &mut *self.portfolio;

        if surplus == 0.0 {
            return Ok(());
        }
        let Some(rule) = savings_distributions.iter().find(|r| r.covers(year)) else {
            warn!(year, surplus, "no savings distribution in force, surplus not allocated");
            return Ok(());
        };

        for share in rule.shares() {
            let (_, asset) = assets
                .iter_mut()
                .find(|(id, _)| *id == share.asset_id)
                .ok_or(AllocationError::UnknownAsset {
                    family: RuleFamily::SavingsDistribution,
                    asset_id: share.asset_id,
                })?;
            // Only assets that already existed last year can take inflow
            if asset.init_year() >= year {
                continue;
            }
            let amount = share.percentage / 100.0 * surplus;
            if asset.update_plot_point(year, amount, false)? {
                trace!(year, asset = asset.name(), amount, "saved");
                allocations.push(Allocation {
                    asset_id: share.asset_id,
                    amount,
                    kind: AllocationKind::Savings,
                });
            }
        }
        Ok(())
    }

    fn cover_deficit(
        &mut self,
        year: Year,
        deficit: f64,
        allocations: &mut Vec<Allocation>,
    ) -> Result<(), SimulationError> {
        if self.portfolio.spend_priority_for(year).is_none() {
            warn!(year, deficit, "no spend priority in force, deficit cannot be funded");
            if deficit > DEFICIT_TOLERANCE {
                return Err(SimulationError::DeficitExceedsAssets {
                    year,
                    remaining: deficit,
                });
            }
            return Ok(());
        }

        let mut remaining = deficit;
        self.draw_down(year, &mut remaining, false, allocations)?;
        if remaining > DEFICIT_TOLERANCE {
            self.draw_down(year, &mut remaining, true, allocations)?;
        }

        if remaining > DEFICIT_TOLERANCE {
            return Err(SimulationError::DeficitExceedsAssets { year, remaining });
        }
        Ok(())
    }

    /// One pass over the spend priority order. Without `ignore_cutoff`, each
    /// asset gives at most its prior-year balance above the spend cutoff;
    /// with it, at most its whole prior-year balance. Both caps shrink by
    /// what the asset already gave this year.
    fn draw_down(
        &mut self,
        year: Year,
        remaining: &mut f64,
        ignore_cutoff: bool,
        allocations: &mut Vec<Allocation>,
    ) -> Result<(), SimulationError> {
        let Portfolio {
            assets,
            spend_priorities,
            ..
        } = &mut *self.portfolio;

        let Some(rule) = spend_priorities.iter().find(|r| r.covers(year)) else {
            return Ok(());
        };
        let kind = if ignore_cutoff {
            AllocationKind::FullWithdrawal
        } else {
            AllocationKind::CutoffWithdrawal
        };

        for entry in rule.order() {
            if *remaining <= DEFICIT_TOLERANCE {
                break;
            }
            let (_, asset) = assets
                .iter_mut()
                .find(|(id, _)| *id == entry.asset_id)
                .ok_or(AllocationError::UnknownAsset {
                    family: RuleFamily::SpendPriority,
                    asset_id: entry.asset_id,
                })?;
            if asset.init_year() >= year {
                continue;
            }

            let floor = if ignore_cutoff {
                0.0
            } else {
                asset.spend_cutoff().max(0.0)
            };
            // Capped by last year's balance, less what earlier passes took
            let drawn: f64 = allocations
                .iter()
                .filter(|a| a.asset_id == entry.asset_id && a.kind != AllocationKind::Savings)
                .map(|a| a.amount)
                .sum();
            let prior_headroom = asset.value_at(year - 1)? - floor - drawn;
            let headroom = prior_headroom.min(asset.available_balance(year)? - floor);
            if headroom <= 0.0 {
                continue;
            }

            let amount = headroom.min(*remaining);
            if asset.update_plot_point(year, -amount, ignore_cutoff)? {
                trace!(year, asset = asset.name(), amount, ignore_cutoff, "withdrew");
                *remaining -= amount;
                allocations.push(Allocation {
                    asset_id: entry.asset_id,
                    amount,
                    kind,
                });
            }
        }
        Ok(())
    }

    fn record_net_worth(&mut self) -> Result<(), SimulationError> {
        for year in self.portfolio.start_year..=self.portfolio.end_year {
            let mut worth = 0.0;
            for (_, asset) in &self.portfolio.assets {
                worth += asset.value_at(year)?;
            }
            for (_, liability) in &self.portfolio.liabilities {
                worth -= liability.value_at(year)?;
            }
            self.portfolio.net_worth.set(year, worth);
        }
        Ok(())
    }
}
