//! Liabilities: balances owed that compound at their own rate
//!
//! A liability's forward values are a pure function of its inputs, so they are
//! computed on demand and memoized. With a repayment stream attached, each
//! year's payment is subtracted after growth.

use std::cell::RefCell;

use super::ids::Year;
use super::plot_points::{PlotPoint, PlotPoints};
use super::plottable::{MoneyPlottable, PlottableKind};
use super::streams::Expense;
use crate::error::TimeSeriesError;

/// Balances this close to zero are treated as paid off
const PAYOFF_SNAP: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct Liability {
    name: String,
    init_year: Year,
    init_value: f64,
    growth_rate: f64,
    repayment: Option<Expense>,
    plot_points: RefCell<PlotPoints>,
}

impl Liability {
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
            repayment: None,
            plot_points: RefCell::new(PlotPoints::anchored(init_year, init_value)),
        }
    }

    /// Attach the expense stream that pays this liability down
    #[must_use]
    pub fn with_repayment(mut self, expense: Expense) -> Self {
        self.repayment = Some(expense);
        self.plot_points
            .get_mut()
            .clear_after(self.init_year);
        self
    }

    pub fn repayment(&self) -> Option<&Expense> {
        self.repayment.as_ref()
    }

    /// Manually back-fill history strictly before `init_year`
    pub fn populate_past_values(&mut self, points: &[PlotPoint]) -> Result<(), TimeSeriesError> {
        if let Some(late) = points.iter().find(|p| p.year >= self.init_year) {
            return Err(TimeSeriesError::PastValueNotBeforeInit {
                name: self.name.clone(),
                year: late.year,
                init_year: self.init_year,
            });
        }
        self.plot_points
            .get_mut()
            .fill_past(self.init_year, self.init_value, points);
        Ok(())
    }

    fn next_balance(&self, previous: f64, year: Year) -> f64 {
        let mut value = previous * (1.0 + self.growth_rate);
        if let Some(repayment) = &self.repayment {
            // Streams never fail to answer
            value -= repayment.value_at(year).unwrap_or(0.0);
        }
        if value.abs() < PAYOFF_SNAP {
            value = 0.0;
        }
        value
    }
}

impl MoneyPlottable for Liability {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PlottableKind {
        PlottableKind::LIABILITY
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
        let mut cache = self.plot_points.borrow_mut();
        if let Some(value) = cache.get(year) {
            return Ok(value);
        }
        if year < self.init_year {
            return Ok(0.0);
        }

        let mut previous = self.init_value;
        for y in (self.init_year + 1)..=year {
            let value = match cache.get(y) {
                Some(value) => value,
                None => {
                    let value = self.next_balance(previous, y);
                    cache.set(y, value);
                    value
                }
            };
            previous = value;
        }
        Ok(previous)
    }
}
