//! Financing goals
//!
//! A goal is a purchase in a given year, optionally financed by a fixed-rate
//! loan. It expands into the entities the engine understands: an `Expense`
//! carrying the cash outlay and, when financed, a `Liability` that the same
//! payments amortize.

use serde::{Deserialize, Serialize};

use crate::error::BoundsError;
use crate::model::{Expense, Liability, Year};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    pub start_year: Year,
    /// Total purchase price
    pub amount: f64,
    /// Fractional yearly loan rate
    #[serde(default)]
    pub interest_rate: f64,
    /// Loan term in years; 0 means the purchase is paid outright
    #[serde(default)]
    pub term: u16,
    #[serde(default)]
    pub down_payment: f64,
}

/// The entities a goal expands into
#[derive(Debug, Clone)]
pub struct Financing {
    pub expense: Expense,
    pub liability: Option<Liability>,
}

impl Goal {
    pub fn new(
        name: impl Into<String>,
        start_year: Year,
        amount: f64,
        interest_rate: f64,
        term: u16,
    ) -> Self {
        Self {
            name: name.into(),
            start_year,
            amount,
            interest_rate,
            term,
            down_payment: 0.0,
        }
    }

    #[must_use]
    pub fn with_down_payment(mut self, down_payment: f64) -> Self {
        self.down_payment = down_payment;
        self
    }

    /// Amount borrowed after the down payment
    pub fn loan_amount(&self) -> f64 {
        self.amount - self.down_payment
    }

    /// Fixed yearly payment amortizing the loan over `term` years:
    /// `L * r(1+r)^n / ((1+r)^n - 1)`, or `L / n` without interest.
    pub fn yearly_payment(&self) -> f64 {
        if self.term == 0 {
            return self.amount;
        }
        let loan = self.loan_amount();
        let n = i32::from(self.term);
        let r = self.interest_rate;
        if r == 0.0 {
            return loan / f64::from(n);
        }
        let factor = (1.0 + r).powi(n);
        loan * (r * factor) / (factor - 1.0)
    }

    /// Expand into an expense and, for financed goals, a liability repaid by
    /// that expense.
    pub fn financing(&self) -> Result<Financing, BoundsError> {
        if self.term == 0 {
            let mut expense = Expense::new(
                self.name.clone(),
                self.start_year,
                self.start_year,
                self.loan_amount(),
                0.0,
            )?;
            if self.down_payment != 0.0 {
                expense = expense.with_down_payment(self.down_payment);
            }
            return Ok(Financing {
                expense,
                liability: None,
            });
        }

        let last_year = Year::try_from(self.term)
            .ok()
            .and_then(|term| self.start_year.checked_add(term))
            .ok_or_else(|| BoundsError::TermOutOfRange {
                name: self.name.clone(),
                start_year: self.start_year,
                term: self.term,
            })?;
        let mut expense = Expense::new(
            format!("{} Payment", self.name),
            self.start_year,
            last_year,
            self.yearly_payment(),
            0.0,
        )?;
        if self.down_payment != 0.0 {
            expense = expense.with_down_payment(self.down_payment);
        }

        let liability = Liability::new(
            format!("{} Loan", self.name),
            self.start_year,
            self.loan_amount(),
            self.interest_rate,
        )
        .with_repayment(expense.clone());

        Ok(Financing {
            expense,
            liability: Some(liability),
        })
    }
}
