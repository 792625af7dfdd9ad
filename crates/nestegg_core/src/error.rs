use std::fmt;

use crate::model::{AssetId, PlottableKind, RuleFamily, Year};

/// Errors raised by time-series queries and writes
#[derive(Debug, Clone, PartialEq)]
pub enum TimeSeriesError {
    /// A forward pool value was requested before the simulator produced it
    SimulationIncomplete { name: String, year: Year },
    /// Only assets can be ramped up before their init year
    UnsupportedExtrapolation { name: String, kind: PlottableKind },
    InvalidExtrapolationStart {
        name: String,
        start_year: Year,
        init_year: Year,
    },
    /// A manual history point lies after the init year (or at it, for liabilities)
    PastValueNotBeforeInit {
        name: String,
        year: Year,
        init_year: Year,
    },
    /// Simulation writes are only defined from the init year onwards
    BeforeInitYear {
        name: String,
        year: Year,
        init_year: Year,
    },
    /// A derived series was queried outside the portfolio horizon
    OutOfBounds {
        name: String,
        year: Year,
        start_year: Year,
        end_year: Year,
    },
}

impl fmt::Display for TimeSeriesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSeriesError::SimulationIncomplete { name, year } => write!(
                f,
                "value of {name} for {year} has not been simulated yet; run the simulation first"
            ),
            TimeSeriesError::UnsupportedExtrapolation { name, kind } => {
                write!(f, "{kind} {name} cannot be extrapolated before its init year")
            }
            TimeSeriesError::InvalidExtrapolationStart {
                name,
                start_year,
                init_year,
            } => write!(
                f,
                "extrapolation start {start_year} for {name} must be before init year {init_year}"
            ),
            TimeSeriesError::PastValueNotBeforeInit {
                name,
                year,
                init_year,
            } => write!(
                f,
                "past value for {name} in {year} is not before init year {init_year}"
            ),
            TimeSeriesError::BeforeInitYear {
                name,
                year,
                init_year,
            } => write!(
                f,
                "cannot simulate {name} in {year}, before its init year {init_year}"
            ),
            TimeSeriesError::OutOfBounds {
                name,
                year,
                start_year,
                end_year,
            } => write!(
                f,
                "{name} is not defined for {year}, outside {start_year}..={end_year}"
            ),
        }
    }
}

impl std::error::Error for TimeSeriesError {}

/// Errors raised when an entity or window does not fit the planning horizon
#[derive(Debug, Clone, PartialEq)]
pub enum BoundsError {
    InvalidHorizon {
        start_year: Year,
        end_year: Year,
    },
    CurrentYearOutsideHorizon {
        current_year: Year,
        start_year: Year,
        end_year: Year,
    },
    /// Entity years fall outside `[min_year, max_year]`
    OutsidePortfolio {
        kind: PlottableKind,
        name: String,
        first_year: Year,
        last_year: Year,
        min_year: Year,
        max_year: Year,
    },
    StreamEndsBeforeStart {
        kind: PlottableKind,
        name: String,
        init_year: Year,
        end_year: Year,
    },
    WindowOutsidePortfolio {
        family: RuleFamily,
        start_year: Year,
        end_year: Year,
    },
    /// A loan term that runs past the last representable year
    TermOutOfRange {
        name: String,
        start_year: Year,
        term: u16,
    },
}

impl fmt::Display for BoundsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundsError::InvalidHorizon {
                start_year,
                end_year,
            } => write!(
                f,
                "portfolio start year {start_year} is after end year {end_year}"
            ),
            BoundsError::CurrentYearOutsideHorizon {
                current_year,
                start_year,
                end_year,
            } => write!(
                f,
                "current year {current_year} is outside the portfolio horizon {start_year}..={end_year}"
            ),
            BoundsError::OutsidePortfolio {
                kind,
                name,
                first_year,
                last_year,
                min_year,
                max_year,
            } => {
                if first_year == last_year {
                    write!(
                        f,
                        "{kind} {name} ({first_year}) is outside the portfolio bounds {min_year}..={max_year}"
                    )
                } else {
                    write!(
                        f,
                        "{kind} {name} ({first_year}..={last_year}) is outside the portfolio bounds {min_year}..={max_year}"
                    )
                }
            }
            BoundsError::StreamEndsBeforeStart {
                kind,
                name,
                init_year,
                end_year,
            } => write!(
                f,
                "{kind} {name} ends in {end_year}, before it starts in {init_year}"
            ),
            BoundsError::WindowOutsidePortfolio {
                family,
                start_year,
                end_year,
            } => write!(
                f,
                "{family} window {start_year}..={end_year} is outside the portfolio bounds"
            ),
            BoundsError::TermOutOfRange {
                name,
                start_year,
                term,
            } => write!(
                f,
                "goal {name} starting in {start_year} has an out of range term of {term} years"
            ),
        }
    }
}

impl std::error::Error for BoundsError {}

/// Errors raised while constructing a savings distribution or spend priority
#[derive(Debug, Clone, PartialEq)]
pub enum AllocationError {
    InvertedWindow {
        family: RuleFamily,
        start_year: Year,
        end_year: Year,
    },
    /// Savings percentages must add up to exactly 100
    NotFullyMapped { total: f64 },
    /// Negative or not a finite number
    InvalidPercentage { asset: String, percentage: f64 },
    DuplicatePriority { priority: u32 },
    DuplicateAsset { family: RuleFamily, asset: String },
    IlliquidAsset { family: RuleFamily, asset: String },
    /// The asset starts after the window does
    AssetNotStarted {
        family: RuleFamily,
        asset: String,
        init_year: Year,
        window_start: Year,
    },
    UnknownAsset { family: RuleFamily, asset_id: AssetId },
}

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationError::InvertedWindow {
                family,
                start_year,
                end_year,
            } => write!(
                f,
                "{family} window starts in {start_year}, after it ends in {end_year}"
            ),
            AllocationError::NotFullyMapped { total } => {
                write!(f, "savings distribution must be 100% mapped, got {total}%")
            }
            AllocationError::InvalidPercentage { asset, percentage } => {
                write!(f, "savings share for {asset} is not a valid percentage ({percentage}%)")
            }
            AllocationError::DuplicatePriority { priority } => {
                write!(f, "spend priority {priority} is used more than once")
            }
            AllocationError::DuplicateAsset { family, asset } => {
                write!(f, "{family} lists asset {asset} more than once")
            }
            AllocationError::IlliquidAsset { family, asset } => {
                write!(f, "{family} cannot use illiquid asset {asset}")
            }
            AllocationError::AssetNotStarted {
                family,
                asset,
                init_year,
                window_start,
            } => write!(
                f,
                "{family} starting {window_start} uses asset {asset}, which only starts in {init_year}"
            ),
            AllocationError::UnknownAsset { family, asset_id } => {
                write!(f, "{family} references unknown asset {asset_id:?}")
            }
        }
    }
}

impl std::error::Error for AllocationError {}

/// Errors proving that an allocation rule list does not cover the horizon
/// exactly once
#[derive(Debug, Clone, PartialEq)]
pub enum CoverageError {
    FirstWindowStart {
        family: RuleFamily,
        expected: Year,
        actual: Year,
    },
    LastWindowEnd {
        family: RuleFamily,
        expected: Year,
        actual: Year,
    },
    /// Years `from..=to` are covered by no window
    Gap {
        family: RuleFamily,
        from: Year,
        to: Year,
    },
    /// Years `from..=to` are covered by two consecutive windows
    Overlap {
        family: RuleFamily,
        from: Year,
        to: Year,
    },
}

impl CoverageError {
    pub fn family(&self) -> RuleFamily {
        match self {
            CoverageError::FirstWindowStart { family, .. }
            | CoverageError::LastWindowEnd { family, .. }
            | CoverageError::Gap { family, .. }
            | CoverageError::Overlap { family, .. } => *family,
        }
    }
}

impl fmt::Display for CoverageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageError::FirstWindowStart {
                family,
                expected,
                actual,
            } => write!(
                f,
                "first {family} must start in {expected} (first asset or current year), starts in {actual}"
            ),
            CoverageError::LastWindowEnd {
                family,
                expected,
                actual,
            } => write!(
                f,
                "last {family} must end at portfolio end year {expected}, ends in {actual}"
            ),
            CoverageError::Gap { family, from, to } => {
                write!(f, "{family} has a gap: {from}..={to} is not covered")
            }
            CoverageError::Overlap { family, from, to } => {
                write!(f, "{family} has an overlap: {from}..={to} is covered twice")
            }
        }
    }
}

impl std::error::Error for CoverageError {}

/// Errors from the whole-portfolio validator
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Bounds(BoundsError),
    Coverage(CoverageError),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Bounds(e) => write!(f, "{e}"),
            ValidationError::Coverage(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ValidationError::Bounds(e) => Some(e),
            ValidationError::Coverage(e) => Some(e),
        }
    }
}

impl From<BoundsError> for ValidationError {
    fn from(e: BoundsError) -> Self {
        ValidationError::Bounds(e)
    }
}

impl From<CoverageError> for ValidationError {
    fn from(e: CoverageError) -> Self {
        ValidationError::Coverage(e)
    }
}

/// Errors that abort a simulation run
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// The plan is not sustainable: assets could not cover this year's deficit
    DeficitExceedsAssets { year: Year, remaining: f64 },
    Validation(ValidationError),
    TimeSeries(TimeSeriesError),
    Allocation(AllocationError),
    Bounds(BoundsError),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::DeficitExceedsAssets { year, remaining } => write!(
                f,
                "deficit of {remaining:.2} remains in {year} after spending from all assets; plan is not sustainable"
            ),
            SimulationError::Validation(e) => write!(f, "{e}"),
            SimulationError::TimeSeries(e) => write!(f, "{e}"),
            SimulationError::Allocation(e) => write!(f, "{e}"),
            SimulationError::Bounds(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::DeficitExceedsAssets { .. } => None,
            SimulationError::Validation(e) => Some(e),
            SimulationError::TimeSeries(e) => Some(e),
            SimulationError::Allocation(e) => Some(e),
            SimulationError::Bounds(e) => Some(e),
        }
    }
}

impl From<ValidationError> for SimulationError {
    fn from(e: ValidationError) -> Self {
        SimulationError::Validation(e)
    }
}

impl From<TimeSeriesError> for SimulationError {
    fn from(e: TimeSeriesError) -> Self {
        SimulationError::TimeSeries(e)
    }
}

impl From<AllocationError> for SimulationError {
    fn from(e: AllocationError) -> Self {
        SimulationError::Allocation(e)
    }
}

impl From<BoundsError> for SimulationError {
    fn from(e: BoundsError) -> Self {
        SimulationError::Bounds(e)
    }
}

/// Umbrella error for building, populating and running a portfolio
#[derive(Debug, Clone, PartialEq)]
pub enum PortfolioError {
    TimeSeries(TimeSeriesError),
    Bounds(BoundsError),
    Allocation(AllocationError),
    Validation(ValidationError),
    Simulation(SimulationError),
    /// Two entities of the same kind share a name
    DuplicateName { kind: PlottableKind, name: String },
    /// An allocation rule or repayment refers to a name that was never added
    UnknownName { kind: PlottableKind, name: String },
}

impl fmt::Display for PortfolioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortfolioError::TimeSeries(e) => write!(f, "{e}"),
            PortfolioError::Bounds(e) => write!(f, "{e}"),
            PortfolioError::Allocation(e) => write!(f, "{e}"),
            PortfolioError::Validation(e) => write!(f, "{e}"),
            PortfolioError::Simulation(e) => write!(f, "{e}"),
            PortfolioError::DuplicateName { kind, name } => {
                write!(f, "{kind} name {name:?} is used more than once")
            }
            PortfolioError::UnknownName { kind, name } => {
                write!(f, "no {kind} named {name:?}")
            }
        }
    }
}

impl std::error::Error for PortfolioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PortfolioError::TimeSeries(e) => Some(e),
            PortfolioError::Bounds(e) => Some(e),
            PortfolioError::Allocation(e) => Some(e),
            PortfolioError::Validation(e) => Some(e),
            PortfolioError::Simulation(e) => Some(e),
            PortfolioError::DuplicateName { .. } | PortfolioError::UnknownName { .. } => None,
        }
    }
}

impl From<TimeSeriesError> for PortfolioError {
    fn from(e: TimeSeriesError) -> Self {
        PortfolioError::TimeSeries(e)
    }
}

impl From<BoundsError> for PortfolioError {
    fn from(e: BoundsError) -> Self {
        PortfolioError::Bounds(e)
    }
}

impl From<AllocationError> for PortfolioError {
    fn from(e: AllocationError) -> Self {
        PortfolioError::Allocation(e)
    }
}

impl From<ValidationError> for PortfolioError {
    fn from(e: ValidationError) -> Self {
        PortfolioError::Validation(e)
    }
}

impl From<CoverageError> for PortfolioError {
    fn from(e: CoverageError) -> Self {
        PortfolioError::Validation(ValidationError::Coverage(e))
    }
}

impl From<SimulationError> for PortfolioError {
    fn from(e: SimulationError) -> Self {
        PortfolioError::Simulation(e)
    }
}
