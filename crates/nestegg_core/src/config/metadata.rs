//! Name registry for portfolio entities
//!
//! `PortfolioMetadata` maps human-readable names to the ids the portfolio
//! assigned, in both directions, so the builder DSL and config files can
//! refer to assets by name.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::model::{AssetId, ExpenseId, IncomeId, LiabilityId};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioMetadata {
    pub assets: FxHashMap<AssetId, String>,
    pub liabilities: FxHashMap<LiabilityId, String>,
    pub incomes: FxHashMap<IncomeId, String>,
    pub expenses: FxHashMap<ExpenseId, String>,

    /// Name to Asset ID reverse lookup
    #[serde(default)]
    pub asset_names: FxHashMap<String, AssetId>,
    /// Name to Liability ID reverse lookup
    #[serde(default)]
    pub liability_names: FxHashMap<String, LiabilityId>,
    /// Name to Income ID reverse lookup
    #[serde(default)]
    pub income_names: FxHashMap<String, IncomeId>,
    /// Name to Expense ID reverse lookup
    #[serde(default)]
    pub expense_names: FxHashMap<String, ExpenseId>,
}

impl PortfolioMetadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_asset(&mut self, id: AssetId, name: impl Into<String>) {
        let name = name.into();
        self.asset_names.insert(name.clone(), id);
        self.assets.insert(id, name);
    }

    pub fn register_liability(&mut self, id: LiabilityId, name: impl Into<String>) {
        let name = name.into();
        self.liability_names.insert(name.clone(), id);
        self.liabilities.insert(id, name);
    }

    pub fn register_income(&mut self, id: IncomeId, name: impl Into<String>) {
        let name = name.into();
        self.income_names.insert(name.clone(), id);
        self.incomes.insert(id, name);
    }

    pub fn register_expense(&mut self, id: ExpenseId, name: impl Into<String>) {
        let name = name.into();
        self.expense_names.insert(name.clone(), id);
        self.expenses.insert(id, name);
    }

    #[must_use]
    pub fn asset_id(&self, name: &str) -> Option<AssetId> {
        self.asset_names.get(name).copied()
    }

    #[must_use]
    pub fn liability_id(&self, name: &str) -> Option<LiabilityId> {
        self.liability_names.get(name).copied()
    }

    #[must_use]
    pub fn income_id(&self, name: &str) -> Option<IncomeId> {
        self.income_names.get(name).copied()
    }

    #[must_use]
    pub fn expense_id(&self, name: &str) -> Option<ExpenseId> {
        self.expense_names.get(name).copied()
    }

    #[must_use]
    pub fn asset_name(&self, id: AssetId) -> Option<&str> {
        self.assets.get(&id).map(String::as_str)
    }

    #[must_use]
    pub fn liability_name(&self, id: LiabilityId) -> Option<&str> {
        self.liabilities.get(&id).map(String::as_str)
    }

    #[must_use]
    pub fn income_name(&self, id: IncomeId) -> Option<&str> {
        self.incomes.get(&id).map(String::as_str)
    }

    #[must_use]
    pub fn expense_name(&self, id: ExpenseId) -> Option<&str> {
        self.expenses.get(&id).map(String::as_str)
    }
}
