mod allocation;
mod asset;
mod derived;
mod ids;
mod liability;
mod plot_points;
mod plottable;
mod streams;

pub use allocation::{
    AllocationWindow, PriorityEntry, RuleFamily, SavingsDistribution, SavingsShare, SpendPriority,
};
pub use asset::Asset;
pub use derived::{NetFlow, NetWorth};
pub use ids::{AssetId, ExpenseId, IncomeId, LiabilityId, Year};
pub use liability::Liability;
pub use plot_points::{PlotPoint, PlotPoints};
pub use plottable::{MoneyPlottable, PlottableKind, PoolKind, StreamKind};
pub use streams::{Expense, Income};
