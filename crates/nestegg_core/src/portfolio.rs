//! The portfolio: every pool, stream and allocation rule of one household
//! over a bounded planning horizon.
//!
//! Each add-operation checks the new entity against the horizon right away.
//! Whole-list coverage of the allocation rules is checked by
//! [`Portfolio::validate`], which [`Portfolio::simulate`] always runs first.

use crate::error::{BoundsError, PortfolioError, SimulationError, ValidationError};
use crate::goal::Goal;
use crate::model::{
    AllocationWindow, Asset, AssetId, Expense, ExpenseId, Income, IncomeId, Liability,
    LiabilityId, MoneyPlottable, NetFlow, NetWorth, SavingsDistribution, SpendPriority, Year,
};
use crate::simulation::{SimulationReport, simulate};
use crate::validator::PortfolioValidator;

/// Insert keeping the list ordered by init year; equal years keep add order
fn insert_by_year<I, T: MoneyPlottable>(list: &mut Vec<(I, T)>, id: I, entity: T) {
    let year = entity.init_year();
    let pos = list.partition_point(|(_, e)| e.init_year() <= year);
    list.insert(pos, (id, entity));
}

fn insert_by_window<R: AllocationWindow>(list: &mut Vec<R>, rule: R) {
    let year = rule.start_year();
    let pos = list.partition_point(|r| r.start_year() <= year);
    list.insert(pos, rule);
}

#[derive(Debug, Clone)]
pub struct Portfolio {
    pub(crate) start_year: Year,
    pub(crate) end_year: Year,
    pub(crate) current_year: Year,
    pub(crate) current_age: u32,

    pub(crate) assets: Vec<(AssetId, Asset)>,
    pub(crate) liabilities: Vec<(LiabilityId, Liability)>,
    pub(crate) incomes: Vec<(IncomeId, Income)>,
    pub(crate) expenses: Vec<(ExpenseId, Expense)>,
    pub(crate) savings_distributions: Vec<SavingsDistribution>,
    pub(crate) spend_priorities: Vec<SpendPriority>,

    pub(crate) net_flow: NetFlow,
    pub(crate) net_worth: NetWorth,
    pub(crate) simulated: bool,

    next_asset_id: u16,
    next_liability_id: u16,
    next_income_id: u16,
    next_expense_id: u16,
}

impl Portfolio {
    /// Create an empty portfolio over `start_year..=end_year`, anchored at
    /// `current_year` when the household is `current_age` years old.
    pub fn new(
        start_year: Year,
        end_year: Year,
        current_year: Year,
        current_age: u32,
    ) -> Result<Self, BoundsError> {
        if start_year > end_year {
            return Err(BoundsError::InvalidHorizon {
                start_year,
                end_year,
            });
        }
        if current_year < start_year || current_year > end_year {
            return Err(BoundsError::CurrentYearOutsideHorizon {
                current_year,
                start_year,
                end_year,
            });
        }

        Ok(Self {
            start_year,
            end_year,
            current_year,
            current_age,
            assets: Vec::new(),
            liabilities: Vec::new(),
            incomes: Vec::new(),
            expenses: Vec::new(),
            savings_distributions: Vec::new(),
            spend_priorities: Vec::new(),
            net_flow: NetFlow::new(start_year, end_year),
            net_worth: NetWorth::new(start_year, end_year),
            simulated: false,
            next_asset_id: 0,
            next_liability_id: 0,
            next_income_id: 0,
            next_expense_id: 0,
        })
    }

    /// Create a portfolio anchored at today's calendar year
    pub fn starting_now(
        start_year: Year,
        end_year: Year,
        current_age: u32,
    ) -> Result<Self, BoundsError> {
        Self::new(start_year, end_year, this_year(), current_age)
    }

    // =========================================================================
    // Profile
    // =========================================================================

    pub fn start_year(&self) -> Year {
        self.start_year
    }

    pub fn end_year(&self) -> Year {
        self.end_year
    }

    pub fn current_year(&self) -> Year {
        self.current_year
    }

    pub fn current_age(&self) -> u32 {
        self.current_age
    }

    /// Age of the household in `year` (negative before birth)
    pub fn age_at(&self, year: Year) -> i32 {
        self.current_age as i32 + i32::from(year - self.current_year)
    }

    pub fn years(&self) -> impl Iterator<Item = Year> + use<> {
        self.start_year..=self.end_year
    }

    // =========================================================================
    // Add operations
    // =========================================================================

    pub fn add_asset(&mut self, asset: Asset) -> Result<AssetId, BoundsError> {
        PortfolioValidator::new(self).validate_asset(&asset)?;
        self.invalidate();
        let id = AssetId(self.next_asset_id);
        self.next_asset_id += 1;
        insert_by_year(&mut self.assets, id, asset);
        Ok(id)
    }

    pub fn add_liability(&mut self, liability: Liability) -> Result<LiabilityId, BoundsError> {
        PortfolioValidator::new(self).validate_liability(&liability)?;
        self.invalidate();
        let id = LiabilityId(self.next_liability_id);
        self.next_liability_id += 1;
        insert_by_year(&mut self.liabilities, id, liability);
        Ok(id)
    }

    pub fn add_income(&mut self, income: Income) -> Result<IncomeId, BoundsError> {
        PortfolioValidator::new(self).validate_income(&income)?;
        self.invalidate();
        let id = IncomeId(self.next_income_id);
        self.next_income_id += 1;
        insert_by_year(&mut self.incomes, id, income);
        Ok(id)
    }

    pub fn add_expense(&mut self, expense: Expense) -> Result<ExpenseId, BoundsError> {
        PortfolioValidator::new(self).validate_expense(&expense)?;
        self.invalidate();
        let id = ExpenseId(self.next_expense_id);
        self.next_expense_id += 1;
        insert_by_year(&mut self.expenses, id, expense);
        Ok(id)
    }

    /// Add the expense (and loan, if financed) a goal expands into. Nothing is
    /// added unless both fit the horizon.
    pub fn add_goal(
        &mut self,
        goal: &Goal,
    ) -> Result<(ExpenseId, Option<LiabilityId>), BoundsError> {
        let financing = goal.financing()?;
        {
            let validator = PortfolioValidator::new(self);
            validator.validate_expense(&financing.expense)?;
            if let Some(liability) = &financing.liability {
                validator.validate_liability(liability)?;
            }
        }

        let expense_id = self.add_expense(financing.expense)?;
        let liability_id = financing
            .liability
            .map(|liability| self.add_liability(liability))
            .transpose()?;
        Ok((expense_id, liability_id))
    }

    pub fn add_savings_distribution(
        &mut self,
        distribution: SavingsDistribution,
    ) -> Result<(), PortfolioError> {
        self.check_window(&distribution)?;
        distribution.check_against(self)?;
        self.invalidate();
        insert_by_window(&mut self.savings_distributions, distribution);
        Ok(())
    }

    pub fn add_spend_priority(&mut self, priority: SpendPriority) -> Result<(), PortfolioError> {
        self.check_window(&priority)?;
        priority.check_against(self)?;
        self.invalidate();
        insert_by_window(&mut self.spend_priorities, priority);
        Ok(())
    }

    fn check_window(&self, rule: &impl AllocationWindow) -> Result<(), BoundsError> {
        if rule.start_year() < self.start_year || rule.end_year() > self.end_year {
            return Err(BoundsError::WindowOutsidePortfolio {
                family: rule.family(),
                start_year: rule.start_year(),
                end_year: rule.end_year(),
            });
        }
        Ok(())
    }

    /// Drop every simulated value; called before any mutation of a simulated
    /// portfolio and before each simulation run.
    pub(crate) fn invalidate(&mut self) {
        for (_, asset) in &mut self.assets {
            asset.reset_simulation();
        }
        self.net_flow.clear();
        self.net_worth.clear();
        self.simulated = false;
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn asset(&self, id: AssetId) -> Option<&Asset> {
        self.assets.iter().find(|(i, _)| *i == id).map(|(_, a)| a)
    }

    pub fn asset_by_name(&self, name: &str) -> Option<(AssetId, &Asset)> {
        self.assets
            .iter()
            .find(|(_, a)| a.name() == name)
            .map(|(i, a)| (*i, a))
    }

    pub fn liability(&self, id: LiabilityId) -> Option<&Liability> {
        self.liabilities
            .iter()
            .find(|(i, _)| *i == id)
            .map(|(_, l)| l)
    }

    pub fn income(&self, id: IncomeId) -> Option<&Income> {
        self.incomes.iter().find(|(i, _)| *i == id).map(|(_, s)| s)
    }

    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|(i, _)| *i == id).map(|(_, s)| s)
    }

    /// Assets ordered by init year
    pub fn assets(&self) -> impl Iterator<Item = (AssetId, &Asset)> {
        self.assets.iter().map(|(i, a)| (*i, a))
    }

    pub fn liabilities(&self) -> impl Iterator<Item = (LiabilityId, &Liability)> {
        self.liabilities.iter().map(|(i, l)| (*i, l))
    }

    pub fn incomes(&self) -> impl Iterator<Item = (IncomeId, &Income)> {
        self.incomes.iter().map(|(i, s)| (*i, s))
    }

    pub fn expenses(&self) -> impl Iterator<Item = (ExpenseId, &Expense)> {
        self.expenses.iter().map(|(i, s)| (*i, s))
    }

    /// Savings distributions ordered by start year
    pub fn savings_distributions(&self) -> &[SavingsDistribution] {
        &self.savings_distributions
    }

    /// Spend priorities ordered by start year
    pub fn spend_priorities(&self) -> &[SpendPriority] {
        &self.spend_priorities
    }

    pub fn savings_distribution_for(&self, year: Year) -> Option<&SavingsDistribution> {
        self.savings_distributions.iter().find(|r| r.covers(year))
    }

    pub fn spend_priority_for(&self, year: Year) -> Option<&SpendPriority> {
        self.spend_priorities.iter().find(|r| r.covers(year))
    }

    pub fn net_flow(&self) -> &NetFlow {
        &self.net_flow
    }

    pub fn net_worth(&self) -> &NetWorth {
        &self.net_worth
    }

    /// Whether pool values are materialized for the whole horizon
    pub fn is_simulated(&self) -> bool {
        self.simulated
    }

    /// Every entity plus the derived series, in display order: assets,
    /// liabilities, incomes, expenses, net flow, net worth.
    pub fn plottables(&self) -> Vec<&dyn MoneyPlottable> {
        let mut out: Vec<&dyn MoneyPlottable> = Vec::new();
        out.extend(self.assets.iter().map(|(_, a)| a as &dyn MoneyPlottable));
        out.extend(self.liabilities.iter().map(|(_, l)| l as &dyn MoneyPlottable));
        out.extend(self.incomes.iter().map(|(_, s)| s as &dyn MoneyPlottable));
        out.extend(self.expenses.iter().map(|(_, s)| s as &dyn MoneyPlottable));
        out.push(&self.net_flow);
        out.push(&self.net_worth);
        out
    }

    // =========================================================================
    // Validation and simulation
    // =========================================================================

    /// Check every entity against the horizon and prove both allocation rule
    /// lists cover it without gaps or overlaps.
    pub fn validate(&self) -> Result<(), ValidationError> {
        PortfolioValidator::new(self).validate()
    }

    /// Validate, then walk the horizon year by year materializing every pool
    pub fn simulate(&mut self) -> Result<SimulationReport, SimulationError> {
        simulate(self)
    }
}

/// Current civil year in the system time zone
pub fn this_year() -> Year {
    jiff::Zoned::now().year()
}
