//! Tests for portfolio bounds and allocation coverage
//!
//! These tests verify that:
//! - Entities outside the horizon are rejected as they are added
//! - Rule lists must start at the first asset, end at the horizon, and be
//!   contiguous in between
//! - A portfolio without assets needs no rules at all

use crate::error::{BoundsError, CoverageError, PortfolioError, ValidationError};
use crate::model::{Asset, AssetId, Expense, Income, RuleFamily, SavingsDistribution, SpendPriority};
use crate::portfolio::Portfolio;
use crate::validator::PortfolioValidator;

fn with_asset(start: i16, end: i16, current: i16, asset_year: i16) -> (Portfolio, AssetId) {
    let mut portfolio = Portfolio::new(start, end, current, 30).unwrap();
    let id = portfolio
        .add_asset(Asset::new("Brokerage", asset_year, 100_000.0, 0.05))
        .unwrap();
    (portfolio, id)
}

fn add_distributions(portfolio: &mut Portfolio, asset: AssetId, windows: &[(i16, i16)]) {
    for &(start, end) in windows {
        let rule = SavingsDistribution::new(portfolio, start, end, [(asset, 100.0)]).unwrap();
        portfolio.add_savings_distribution(rule).unwrap();
    }
}

fn add_priorities(portfolio: &mut Portfolio, asset: AssetId, windows: &[(i16, i16)]) {
    for &(start, end) in windows {
        let rule = SpendPriority::new(portfolio, start, end, [(asset, 1)]).unwrap();
        portfolio.add_spend_priority(rule).unwrap();
    }
}

// ============================================================================
// Horizon and entity bounds
// ============================================================================

#[test]
fn test_invalid_horizon() {
    assert!(matches!(
        Portfolio::new(2050, 2040, 2045, 30),
        Err(BoundsError::InvalidHorizon { .. })
    ));
    assert!(matches!(
        Portfolio::new(2020, 2040, 2041, 30),
        Err(BoundsError::CurrentYearOutsideHorizon { .. })
    ));
}

#[test]
fn test_pool_bounded_by_current_year() {
    let mut portfolio = Portfolio::new(2015, 2060, 2020, 30).unwrap();

    let err = portfolio
        .add_asset(Asset::new("Old Account", 2018, 1_000.0, 0.0))
        .unwrap_err();
    assert!(matches!(
        err,
        BoundsError::OutsidePortfolio {
            min_year: 2020,
            max_year: 2060,
            ..
        }
    ));
    assert_eq!(portfolio.assets().count(), 0, "rejected asset must not be added");

    portfolio
        .add_asset(Asset::new("New Account", 2020, 1_000.0, 0.0))
        .unwrap();
    assert!(
        portfolio
            .add_asset(Asset::new("Late Account", 2061, 1_000.0, 0.0))
            .is_err()
    );
}

#[test]
fn test_stream_bounded_by_horizon() {
    let mut portfolio = Portfolio::new(2015, 2060, 2020, 30).unwrap();

    portfolio
        .add_income(Income::new("Old Job", 2015, 2019, 50_000.0, 0.0).unwrap())
        .unwrap();

    let err = portfolio
        .add_expense(Expense::new("Rent", 2050, 2070, 12_000.0, 0.0).unwrap())
        .unwrap_err();
    assert!(matches!(
        err,
        BoundsError::OutsidePortfolio {
            first_year: 2050,
            last_year: 2070,
            ..
        }
    ));
}

#[test]
fn test_window_outside_horizon_rejected() {
    let (mut portfolio, asset) = with_asset(2020, 2075, 2020, 2020);
    let rule = SavingsDistribution::new(&portfolio, 2020, 2080, [(asset, 100.0)]).unwrap();
    assert!(matches!(
        portfolio.add_savings_distribution(rule),
        Err(PortfolioError::Bounds(
            BoundsError::WindowOutsidePortfolio { .. }
        ))
    ));
}

// ============================================================================
// Coverage
// ============================================================================

/// A household with an asset but no savings distribution has a gap over the
/// whole horizon.
#[test]
fn test_missing_distribution_is_a_gap() {
    let (mut portfolio, _) = with_asset(2020, 2075, 2020, 2020);
    portfolio
        .add_income(Income::new("Salary", 2020, 2024, 100_000.0, 0.05).unwrap())
        .unwrap();

    let err = PortfolioValidator::new(&portfolio)
        .validate_savings_distribution_list()
        .unwrap_err();
    assert_eq!(
        err,
        CoverageError::Gap {
            family: RuleFamily::SavingsDistribution,
            from: 2020,
            to: 2075,
        }
    );
    assert!(matches!(
        portfolio.validate(),
        Err(ValidationError::Coverage(CoverageError::Gap { .. }))
    ));
}

#[test]
fn test_contiguous_windows_pass() {
    let (mut portfolio, asset) = with_asset(2020, 2075, 2020, 2020);
    // Added out of order; the portfolio keeps them sorted by start year
    add_distributions(&mut portfolio, asset, &[(2051, 2075), (2020, 2030), (2031, 2050)]);
    add_priorities(&mut portfolio, asset, &[(2020, 2075)]);

    let validator = PortfolioValidator::new(&portfolio);
    validator.validate_savings_distribution_list().unwrap();
    validator.validate_spend_priority_list().unwrap();
    validator.validate().unwrap();
    // Re-running never changes the verdict
    validator.validate().unwrap();
}

#[test]
fn test_overlap_detected() {
    let (mut portfolio, asset) = with_asset(2020, 2075, 2020, 2020);
    add_priorities(&mut portfolio, asset, &[(2020, 2030), (2030, 2075)]);

    let err = PortfolioValidator::new(&portfolio)
        .validate_spend_priority_list()
        .unwrap_err();
    assert_eq!(
        err,
        CoverageError::Overlap {
            family: RuleFamily::SpendPriority,
            from: 2030,
            to: 2030,
        }
    );
}

#[test]
fn test_gap_between_windows_detected() {
    let (mut portfolio, asset) = with_asset(2020, 2075, 2020, 2020);
    add_distributions(&mut portfolio, asset, &[(2020, 2030), (2033, 2075)]);

    let err = PortfolioValidator::new(&portfolio)
        .validate_savings_distribution_list()
        .unwrap_err();
    assert_eq!(
        err,
        CoverageError::Gap {
            family: RuleFamily::SavingsDistribution,
            from: 2031,
            to: 2032,
        }
    );
}

#[test]
fn test_first_window_must_start_at_first_asset() {
    let (mut portfolio, asset) = with_asset(2020, 2075, 2020, 2020);
    add_distributions(&mut portfolio, asset, &[(2021, 2075)]);

    let err = PortfolioValidator::new(&portfolio)
        .validate_savings_distribution_list()
        .unwrap_err();
    assert!(matches!(
        err,
        CoverageError::FirstWindowStart {
            expected: 2020,
            actual: 2021,
            ..
        }
    ));
}

#[test]
fn test_coverage_starts_at_later_asset() {
    let (mut portfolio, asset) = with_asset(2020, 2075, 2022, 2030);
    assert_eq!(
        PortfolioValidator::new(&portfolio).coverage_start(),
        Some(2030)
    );

    add_distributions(&mut portfolio, asset, &[(2030, 2075)]);
    add_priorities(&mut portfolio, asset, &[(2030, 2075)]);
    portfolio.validate().unwrap();
}

#[test]
fn test_last_window_must_reach_horizon_end() {
    let (mut portfolio, asset) = with_asset(2020, 2075, 2020, 2020);
    add_priorities(&mut portfolio, asset, &[(2020, 2070)]);

    let err = PortfolioValidator::new(&portfolio)
        .validate_spend_priority_list()
        .unwrap_err();
    assert!(matches!(
        err,
        CoverageError::LastWindowEnd {
            expected: 2075,
            actual: 2070,
            ..
        }
    ));
    assert_eq!(err.family(), RuleFamily::SpendPriority);
}

#[test]
fn test_no_assets_needs_no_rules() {
    let mut portfolio = Portfolio::new(2020, 2040, 2020, 30).unwrap();
    portfolio
        .add_income(Income::new("Salary", 2020, 2040, 50_000.0, 0.0).unwrap())
        .unwrap();

    let validator = PortfolioValidator::new(&portfolio);
    assert_eq!(validator.coverage_start(), None);
    validator.validate().unwrap();
}
