//! Series derived from a simulation run rather than entered by the user

use super::ids::Year;
use super::plot_points::PlotPoints;
use super::plottable::{MoneyPlottable, PlottableKind};
use crate::error::{BoundsError, TimeSeriesError};

/// Yearly gross income minus gross expenses, recorded by the simulator
#[derive(Debug, Clone)]
pub struct NetFlow {
    start_year: Year,
    end_year: Year,
    plot_points: PlotPoints,
}

impl NetFlow {
    pub const NAME: &'static str = "Net Flow";

    pub fn new(start_year: Year, end_year: Year) -> Self {
        Self {
            start_year,
            end_year,
            plot_points: PlotPoints::default(),
        }
    }

    pub fn end_year(&self) -> Year {
        self.end_year
    }

    pub fn record(&mut self, year: Year, value: f64) -> Result<(), BoundsError> {
        if year < self.start_year || year > self.end_year {
            return Err(BoundsError::OutsidePortfolio {
                kind: PlottableKind::NET_FLOW,
                name: Self::NAME.to_string(),
                first_year: year,
                last_year: year,
                min_year: self.start_year,
                max_year: self.end_year,
            });
        }
        self.plot_points.set(year, value);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.plot_points = PlotPoints::default();
    }
}

impl MoneyPlottable for NetFlow {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> PlottableKind {
        PlottableKind::NET_FLOW
    }

    fn init_year(&self) -> Year {
        self.start_year
    }

    fn init_value(&self) -> f64 {
        0.0
    }

    fn growth_rate(&self) -> f64 {
        0.0
    }

    /// Unrecorded years read as zero
    fn value_at(&self, year: Year) -> Result<f64, TimeSeriesError> {
        Ok(self.plot_points.get(year).unwrap_or(0.0))
    }
}

/// Assets minus liabilities for every year of the horizon
#[derive(Debug, Clone)]
pub struct NetWorth {
    start_year: Year,
    end_year: Year,
    plot_points: PlotPoints,
}

impl NetWorth {
    pub const NAME: &'static str = "Net Worth";

    pub fn new(start_year: Year, end_year: Year) -> Self {
        Self {
            start_year,
            end_year,
            plot_points: PlotPoints::default(),
        }
    }

    pub(crate) fn set(&mut self, year: Year, value: f64) {
        self.plot_points.set(year, value);
    }

    pub fn clear(&mut self) {
        self.plot_points = PlotPoints::default();
    }
}

impl MoneyPlottable for NetWorth {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> PlottableKind {
        PlottableKind::NET_WORTH
    }

    fn init_year(&self) -> Year {
        self.start_year
    }

    fn init_value(&self) -> f64 {
        self.plot_points.get(self.start_year).unwrap_or(0.0)
    }

    fn growth_rate(&self) -> f64 {
        0.0
    }

    fn value_at(&self, year: Year) -> Result<f64, TimeSeriesError> {
        if year < self.start_year || year > self.end_year {
            return Err(TimeSeriesError::OutOfBounds {
                name: Self::NAME.to_string(),
                year,
                start_year: self.start_year,
                end_year: self.end_year,
            });
        }
        self.plot_points
            .get(year)
            .ok_or_else(|| TimeSeriesError::SimulationIncomplete {
                name: Self::NAME.to_string(),
                year,
            })
    }
}
