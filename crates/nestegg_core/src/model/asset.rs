//! Assets: standing balances that compound and absorb savings or fund deficits
//!
//! Unlike liabilities, an asset's forward values are not a pure function of
//! its inputs. Each year after `init_year` is produced exactly once, in
//! increasing order, by the simulator through [`Asset::update_plot_point`].

use super::ids::Year;
use super::plot_points::{PlotPoint, PlotPoints};
use super::plottable::{MoneyPlottable, PlottableKind};
use crate::error::TimeSeriesError;

/// Slack allowed when a withdrawal lands exactly on a floor balance
const BALANCE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct Asset {
    name: String,
    init_year: Year,
    init_value: f64,
    growth_rate: f64,
    /// Illiquid assets never receive savings and are never drawn down
    is_liquid: bool,
    /// Floor the first deficit-spending pass will not breach
    spend_cutoff: f64,
    plot_points: PlotPoints,
}

impl Asset {
    /// Create a liquid asset with no spend cutoff
    pub fn new(
        name: impl Into<String>,
        init_year: Year,
        init_value: f64,
        growth_rate: f64,
    ) -> Self {
        Self {
            name: name.into(),
            init_year,
            init_value,
            growth_rate,
            is_liquid: true,
            spend_cutoff: 0.0,
            plot_points: PlotPoints::anchored(init_year, init_value),
        }
    }

    #[must_use]
    pub fn liquid(mut self, is_liquid: bool) -> Self {
        self.is_liquid = is_liquid;
        self
    }

    #[must_use]
    pub fn illiquid(self) -> Self {
        self.liquid(false)
    }

    #[must_use]
    pub fn with_spend_cutoff(mut self, cutoff: f64) -> Self {
        self.spend_cutoff = cutoff;
        self
    }

    pub fn is_liquid(&self) -> bool {
        self.is_liquid
    }

    pub fn spend_cutoff(&self) -> f64 {
        self.spend_cutoff
    }

    /// Whether a value exists for `year` (history, anchor or simulated)
    pub fn is_materialized(&self, year: Year) -> bool {
        self.plot_points.contains(year)
    }

    /// Manually back-fill history before `init_year`.
    ///
    /// Points may be given in any order; the years between consecutive points
    /// (and between the last point and `init_year`) are linearly interpolated.
    /// A point at `init_year` itself is accepted but `init_value` wins.
    pub fn populate_past_values(&mut self, points: &[PlotPoint]) -> Result<(), TimeSeriesError> {
        if let Some(late) = points.iter().find(|p| p.year > self.init_year) {
            return Err(TimeSeriesError::PastValueNotBeforeInit {
                name: self.name.clone(),
                year: late.year,
                init_year: self.init_year,
            });
        }
        self.plot_points
            .fill_past(self.init_year, self.init_value, points);
        Ok(())
    }

    /// Balance available to draw from in `year`: the value already committed
    /// for that year, or last year's value grown by one year.
    pub fn available_balance(&self, year: Year) -> Result<f64, TimeSeriesError> {
        if let Some(value) = self.plot_points.get(year) {
            return Ok(value);
        }
        self.grown_from_previous(year)
    }

    fn grown_from_previous(&self, year: Year) -> Result<f64, TimeSeriesError> {
        let previous = self.plot_points.get(year - 1).ok_or_else(|| {
            TimeSeriesError::SimulationIncomplete {
                name: self.name.clone(),
                year: year - 1,
            }
        })?;
        Ok(previous * (1.0 + self.growth_rate))
    }

    /// Apply this year's growth plus `inflow` (negative for a withdrawal).
    ///
    /// Returns `Ok(false)` without mutating when:
    /// - `year` is the init year (its value is fixed at construction),
    /// - `inflow` is zero and `year` already has a value,
    /// - a withdrawal would push the balance below `spend_cutoff` while
    ///   `ignore_cutoff` is false,
    /// - a withdrawal would push the balance below zero.
    ///
    /// Writes to a year that already has a value build on that value, so a
    /// second draw in the same year does not discard the first.
    pub fn update_plot_point(
        &mut self,
        year: Year,
        inflow: f64,
        ignore_cutoff: bool,
    ) -> Result<bool, TimeSeriesError> {
        if year < self.init_year {
            return Err(TimeSeriesError::BeforeInitYear {
                name: self.name.clone(),
                year,
                init_year: self.init_year,
            });
        }
        if year == self.init_year {
            return Ok(false);
        }
        if inflow == 0.0 && self.plot_points.contains(year) {
            return Ok(false);
        }

        let grown = self.grown_from_previous(year)?;
        let base = self.plot_points.get(year).unwrap_or(grown);
        let mut next = base + inflow;

        if inflow < 0.0 {
            let floor = if ignore_cutoff {
                0.0
            } else {
                self.spend_cutoff.max(0.0)
            };
            if next < floor - BALANCE_EPSILON {
                return Ok(false);
            }
            next = next.max(floor);
        }

        self.plot_points.set(year, next);
        Ok(true)
    }

    /// Forget every simulated year, keeping the anchor and pre-init history
    pub fn reset_simulation(&mut self) {
        self.plot_points.clear_after(self.init_year);
    }
}

impl MoneyPlottable for Asset {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PlottableKind {
        PlottableKind::ASSET
    }

    fn init_year(&self) -> Year {
        self.init_year
    }

    fn init_value(&self) -> f64 {
        self.init_value
    }

    fn growth_rate(&self) -> f64 {
        self.growth_rate
    }

    fn value_at(&self, year: Year) -> Result<f64, TimeSeriesError> {
        if year < self.init_year {
            return Ok(self.plot_points.get(year).unwrap_or(0.0));
        }
        self.plot_points
            .get(year)
            .ok_or_else(|| TimeSeriesError::SimulationIncomplete {
                name: self.name.clone(),
                year,
            })
    }

    fn extrapolate_from_start(
        &mut self,
        start_year: Year,
        start_value: f64,
    ) -> Result<(), TimeSeriesError> {
        if start_year >= self.init_year {
            return Err(TimeSeriesError::InvalidExtrapolationStart {
                name: self.name.clone(),
                start_year,
                init_year: self.init_year,
            });
        }
        self.plot_points
            .ramp_to_init(self.init_year, self.init_value, start_year, start_value);
        Ok(())
    }
}
