//! Income and expense streams
//!
//! A stream flows at `init_value` per year from `init_year` through
//! `end_year` (inclusive), compounding at its own growth rate. Values are a
//! closed-form function of the year, so queries need no simulation order.

use super::ids::Year;
use super::plottable::{MoneyPlottable, PlottableKind};
use crate::error::{BoundsError, TimeSeriesError};

/// `init_value * (1 + growth_rate)^(year - init_year)` inside the window, 0 outside
fn compounded(
    init_year: Year,
    end_year: Year,
    init_value: f64,
    growth_rate: f64,
    year: Year,
) -> f64 {
    if year < init_year || year > end_year {
        return 0.0;
    }
    let years_of_growth = i32::from(year - init_year);
    init_value * (1.0 + growth_rate).powi(years_of_growth)
}

fn check_window(
    kind: PlottableKind,
    name: &str,
    init_year: Year,
    end_year: Year,
) -> Result<(), BoundsError> {
    if end_year < init_year {
        return Err(BoundsError::StreamEndsBeforeStart {
            kind,
            name: name.to_string(),
            init_year,
            end_year,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Income {
    name: String,
    init_year: Year,
    end_year: Year,
    init_value: f64,
    growth_rate: f64,
}

impl Income {
    pub fn new(
        name: impl Into<String>,
        init_year: Year,
        end_year: Year,
        init_value: f64,
        growth_rate: f64,
    ) -> Result<Self, BoundsError> {
        let name = name.into();
        check_window(PlottableKind::INCOME, &name, init_year, end_year)?;
        Ok(Self {
            name,
            init_year,
            end_year,
            init_value,
            growth_rate,
        })
    }

    /// Last year (inclusive) the stream pays out
    pub fn end_year(&self) -> Year {
        self.end_year
    }
}

impl MoneyPlottable for Income {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PlottableKind {
        PlottableKind::INCOME
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
        Ok(compounded(
            self.init_year,
            self.end_year,
            self.init_value,
            self.growth_rate,
            year,
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    name: String,
    init_year: Year,
    end_year: Year,
    init_value: f64,
    growth_rate: f64,
    /// One-time amount paid on top of the first year's value (loan down payments)
    down_payment: Option<f64>,
}

impl Expense {
    pub fn new(
        name: impl Into<String>,
        init_year: Year,
        end_year: Year,
        init_value: f64,
        growth_rate: f64,
    ) -> Result<Self, BoundsError> {
        let name = name.into();
        check_window(PlottableKind::EXPENSE, &name, init_year, end_year)?;
        Ok(Self {
            name,
            init_year,
            end_year,
            init_value,
            growth_rate,
            down_payment: None,
        })
    }

    #[must_use]
    pub fn with_down_payment(mut self, down_payment: f64) -> Self {
        self.down_payment = Some(down_payment);
        self
    }

    pub fn end_year(&self) -> Year {
        self.end_year
    }

    pub fn down_payment(&self) -> Option<f64> {
        self.down_payment
    }
}

impl MoneyPlottable for Expense {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PlottableKind {
        PlottableKind::EXPENSE
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
        let mut value = compounded(
            self.init_year,
            self.end_year,
            self.init_value,
            self.growth_rate,
            year,
        );
        if year == self.init_year {
            value += self.down_payment.unwrap_or(0.0);
        }
        Ok(value)
    }
}
