//! Unique identifiers for portfolio entities
//!
//! Each entity type has its own ID type so that an asset handle can never be
//! passed where a liability handle is expected.

use serde::{Deserialize, Serialize};

/// Calendar year used throughout the projection
pub type Year = i16;

/// Unique identifier for an Asset within a portfolio
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(pub u16);

/// Unique identifier for a Liability within a portfolio
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LiabilityId(pub u16);

/// Unique identifier for an Income stream within a portfolio
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IncomeId(pub u16);

/// Unique identifier for an Expense stream within a portfolio
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExpenseId(pub u16);
