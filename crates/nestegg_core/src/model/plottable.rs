//! The shared time-series contract
//!
//! Every pool and stream answers the same two questions: what is the value in
//! a given year, and what are the values over a range of years. The set of
//! kinds is closed; consumers match on [`PlottableKind`] exhaustively.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::Year;
use super::plot_points::PlotPoint;
use crate::error::TimeSeriesError;

/// Kinds of standing balances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolKind {
    Asset,
    Liability,
    /// Derived: assets minus liabilities
    NetWorth,
}

/// Kinds of recurring annual flows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamKind {
    Income,
    Expense,
    /// Derived: gross income minus gross expenses
    NetFlow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlottableKind {
    Pool(PoolKind),
    Stream(StreamKind),
}

impl PlottableKind {
    pub const ASSET: PlottableKind = PlottableKind::Pool(PoolKind::Asset);
    pub const LIABILITY: PlottableKind = PlottableKind::Pool(PoolKind::Liability);
    pub const NET_WORTH: PlottableKind = PlottableKind::Pool(PoolKind::NetWorth);
    pub const INCOME: PlottableKind = PlottableKind::Stream(StreamKind::Income);
    pub const EXPENSE: PlottableKind = PlottableKind::Stream(StreamKind::Expense);
    pub const NET_FLOW: PlottableKind = PlottableKind::Stream(StreamKind::NetFlow);

    /// Display sign for stacked charts. Values are stored as unsigned
    /// magnitudes; liabilities and expenses render below the axis.
    pub fn sign(self) -> f64 {
        match self {
            PlottableKind::Pool(PoolKind::Liability)
            | PlottableKind::Stream(StreamKind::Expense) => -1.0,
            PlottableKind::Pool(PoolKind::Asset | PoolKind::NetWorth)
            | PlottableKind::Stream(StreamKind::Income | StreamKind::NetFlow) => 1.0,
        }
    }

    pub fn is_pool(self) -> bool {
        matches!(self, PlottableKind::Pool(_))
    }

    pub fn is_stream(self) -> bool {
        matches!(self, PlottableKind::Stream(_))
    }
}

impl fmt::Display for PlottableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlottableKind::Pool(PoolKind::Asset) => "asset",
            PlottableKind::Pool(PoolKind::Liability) => "liability",
            PlottableKind::Pool(PoolKind::NetWorth) => "net worth",
            PlottableKind::Stream(StreamKind::Income) => "income",
            PlottableKind::Stream(StreamKind::Expense) => "expense",
            PlottableKind::Stream(StreamKind::NetFlow) => "net flow",
        };
        f.write_str(label)
    }
}

/// Capability shared by every financial entity that can be charted.
///
/// `value_at` must be idempotent: asking twice for the same year returns the
/// same answer. Streams return 0 outside their active window rather than an
/// error; pools may fail with [`TimeSeriesError::SimulationIncomplete`] when a
/// forward year has not been materialized yet.
pub trait MoneyPlottable {
    fn name(&self) -> &str;

    fn kind(&self) -> PlottableKind;

    /// Year at which `init_value` applies
    fn init_year(&self) -> Year;

    fn init_value(&self) -> f64;

    /// Fractional yearly growth (0.05 = 5%/yr)
    fn growth_rate(&self) -> f64;

    fn value_at(&self, year: Year) -> Result<f64, TimeSeriesError>;

    /// Values for every year in `start..=end`, in increasing year order
    fn values_over(&self, start: Year, end: Year) -> Result<Vec<PlotPoint>, TimeSeriesError> {
        (start..=end)
            .map(|year| self.value_at(year).map(|value| PlotPoint { year, value }))
            .collect()
    }

    /// Fill the years before `init_year` with a linear ramp starting at
    /// `(start_year, start_value)`. Only assets support this.
    fn extrapolate_from_start(
        &mut self,
        start_year: Year,
        start_value: f64,
    ) -> Result<(), TimeSeriesError> {
        let _ = (start_year, start_value);
        Err(TimeSeriesError::UnsupportedExtrapolation {
            name: self.name().to_string(),
            kind: self.kind(),
        })
    }
}
