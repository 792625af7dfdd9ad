//! Allocation rules: where yearly surplus goes and where yearly deficit comes from
//!
//! Both rules are time-windowed (`start_year..=end_year`). All invariants are
//! checked at construction, so a rule that exists is internally consistent;
//! whether the rule list covers the horizon is the validator's concern.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::ids::{AssetId, Year};
use super::plottable::MoneyPlottable;
use crate::error::AllocationError;
use crate::portfolio::Portfolio;

/// Tolerance when checking that savings percentages add up to 100
const PERCENT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleFamily {
    SavingsDistribution,
    SpendPriority,
}

impl fmt::Display for RuleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleFamily::SavingsDistribution => f.write_str("savings distribution"),
            RuleFamily::SpendPriority => f.write_str("spend priority"),
        }
    }
}

/// Common view over time-windowed rules, used by the coverage check
pub trait AllocationWindow {
    fn family(&self) -> RuleFamily;

    fn start_year(&self) -> Year;

    fn end_year(&self) -> Year;

    fn covers(&self, year: Year) -> bool {
        self.start_year() <= year && year <= self.end_year()
    }
}

/// Check a window and every asset it references against the portfolio
fn check_rule<'a>(
    portfolio: &Portfolio,
    family: RuleFamily,
    start_year: Year,
    end_year: Year,
    asset_ids: impl IntoIterator<Item = &'a AssetId>,
) -> Result<(), AllocationError> {
    if end_year < start_year {
        return Err(AllocationError::InvertedWindow {
            family,
            start_year,
            end_year,
        });
    }

    let mut seen = FxHashSet::default();
    for &asset_id in asset_ids {
        let asset = portfolio
            .asset(asset_id)
            .ok_or(AllocationError::UnknownAsset { family, asset_id })?;
        if !seen.insert(asset_id) {
            return Err(AllocationError::DuplicateAsset {
                family,
                asset: asset.name().to_string(),
            });
        }
        if start_year < asset.init_year() {
            return Err(AllocationError::AssetNotStarted {
                family,
                asset: asset.name().to_string(),
                init_year: asset.init_year(),
                window_start: start_year,
            });
        }
        if !asset.is_liquid() {
            return Err(AllocationError::IlliquidAsset {
                family,
                asset: asset.name().to_string(),
            });
        }
    }
    Ok(())
}

/// One asset's share of the yearly surplus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsShare {
    pub asset_id: AssetId,
    /// Percentage of surplus, 0..=100
    pub percentage: f64,
}

/// How surplus cashflow is split across liquid assets during a window
#[derive(Debug, Clone, PartialEq)]
pub struct SavingsDistribution {
    start_year: Year,
    end_year: Year,
    shares: Vec<SavingsShare>,
}

impl SavingsDistribution {
    /// Build a distribution; the percentages must add up to exactly 100 and
    /// every asset must be liquid and already started by `start_year`.
    pub fn new(
        portfolio: &Portfolio,
        start_year: Year,
        end_year: Year,
        shares: impl IntoIterator<Item = (AssetId, f64)>,
    ) -> Result<Self, AllocationError> {
        let shares: Vec<SavingsShare> = shares
            .into_iter()
            .map(|(asset_id, percentage)| SavingsShare {
                asset_id,
                percentage,
            })
            .collect();

        check_rule(
            portfolio,
            RuleFamily::SavingsDistribution,
            start_year,
            end_year,
            shares.iter().map(|s| &s.asset_id),
        )?;

        if let Some(invalid) = shares
            .iter()
            .find(|s| !s.percentage.is_finite() || s.percentage < 0.0)
        {
            let asset = portfolio
                .asset(invalid.asset_id)
                .map(|a| a.name().to_string())
                .unwrap_or_default();
            return Err(AllocationError::InvalidPercentage {
                asset,
                percentage: invalid.percentage,
            });
        }

        let total: f64 = shares.iter().map(|s| s.percentage).sum();
        if (total - 100.0).abs() > PERCENT_TOLERANCE {
            return Err(AllocationError::NotFullyMapped { total });
        }

        Ok(Self {
            start_year,
            end_year,
            shares,
        })
    }

    /// Shares in the order they were declared
    pub fn shares(&self) -> &[SavingsShare] {
        &self.shares
    }

    /// Re-check the referenced assets against the portfolio taking the rule
    pub(crate) fn check_against(&self, portfolio: &Portfolio) -> Result<(), AllocationError> {
        check_rule(
            portfolio,
            RuleFamily::SavingsDistribution,
            self.start_year,
            self.end_year,
            self.shares.iter().map(|s| &s.asset_id),
        )
    }
}

impl AllocationWindow for SavingsDistribution {
    fn family(&self) -> RuleFamily {
        RuleFamily::SavingsDistribution
    }

    fn start_year(&self) -> Year {
        self.start_year
    }

    fn end_year(&self) -> Year {
        self.end_year
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityEntry {
    pub asset_id: AssetId,
    /// Lower values are drained first
    pub priority: u32,
}

/// Order in which liquid assets are drained to cover a deficit.
///
/// Spending happens in two passes over the same order. The first pass stops
/// at each asset's spend cutoff; if a deficit remains, the second pass ignores
/// the cutoffs and may take an asset down to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendPriority {
    start_year: Year,
    end_year: Year,
    order: Vec<PriorityEntry>,
}

impl SpendPriority {
    pub fn new(
        portfolio: &Portfolio,
        start_year: Year,
        end_year: Year,
        entries: impl IntoIterator<Item = (AssetId, u32)>,
    ) -> Result<Self, AllocationError> {
        let mut order: Vec<PriorityEntry> = entries
            .into_iter()
            .map(|(asset_id, priority)| PriorityEntry { asset_id, priority })
            .collect();

        check_rule(
            portfolio,
            RuleFamily::SpendPriority,
            start_year,
            end_year,
            order.iter().map(|e| &e.asset_id),
        )?;

        let mut priorities = FxHashSet::default();
        for entry in &order {
            if !priorities.insert(entry.priority) {
                return Err(AllocationError::DuplicatePriority {
                    priority: entry.priority,
                });
            }
        }

        order.sort_by_key(|e| e.priority);

        Ok(Self {
            start_year,
            end_year,
            order,
        })
    }

    /// Entries sorted ascending by priority
    pub fn order(&self) -> &[PriorityEntry] {
        &self.order
    }

    pub(crate) fn check_against(&self, portfolio: &Portfolio) -> Result<(), AllocationError> {
        check_rule(
            portfolio,
            RuleFamily::SpendPriority,
            self.start_year,
            self.end_year,
            self.order.iter().map(|e| &e.asset_id),
        )
    }
}

impl AllocationWindow for SpendPriority {
    fn family(&self) -> RuleFamily {
        RuleFamily::SpendPriority
    }

    fn start_year(&self) -> Year {
        self.start_year
    }

    fn end_year(&self) -> Year {
        self.end_year
    }
}
