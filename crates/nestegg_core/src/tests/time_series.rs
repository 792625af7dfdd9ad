//! Tests for the time-series value model
//!
//! These tests verify that:
//! - Streams compound in closed form and read zero outside their window
//! - Liabilities compound lazily and are paid down by their repayment stream
//! - Assets only materialize forward years through `update_plot_point`
//! - Back-filled and extrapolated history interpolates linearly

use crate::error::{BoundsError, TimeSeriesError};
use crate::model::{
    Asset, Expense, Income, Liability, MoneyPlottable, NetFlow, PlotPoint, PlottableKind,
};

const TOLERANCE: f64 = 1e-9;

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "{what}: expected {expected}, got {actual}"
    );
}

// ============================================================================
// Streams
// ============================================================================

#[test]
fn test_income_compounds_inside_window() {
    let income = Income::new("Salary", 2020, 2024, 100_000.0, 0.05).unwrap();

    for n in 0..=4 {
        let expected = 100_000.0 * 1.05_f64.powi(n);
        let actual = income.value_at(2020 + n as i16).unwrap();
        assert!(
            (actual - expected).abs() < TOLERANCE * expected,
            "year {}: expected {expected}, got {actual}",
            2020 + n
        );
    }
}

#[test]
fn test_stream_is_zero_outside_window() {
    let income = Income::new("Salary", 2020, 2024, 100_000.0, 0.05).unwrap();
    assert_eq!(income.value_at(2019).unwrap(), 0.0);
    assert_eq!(income.value_at(2025).unwrap(), 0.0);
    assert_eq!(income.value_at(1900).unwrap(), 0.0);
}

#[test]
fn test_stream_end_before_start_rejected() {
    let result = Expense::new("Rent", 2030, 2029, 12_000.0, 0.0);
    assert!(matches!(
        result,
        Err(BoundsError::StreamEndsBeforeStart { .. })
    ));
}

#[test]
fn test_single_year_stream() {
    let expense = Expense::new("Wedding", 2027, 2027, 30_000.0, 0.1).unwrap();
    assert_eq!(expense.value_at(2027).unwrap(), 30_000.0);
    assert_eq!(expense.value_at(2028).unwrap(), 0.0);
}

#[test]
fn test_expense_down_payment_only_in_first_year() {
    let expense = Expense::new("Car Payment", 2025, 2029, 5_000.0, 0.0)
        .unwrap()
        .with_down_payment(8_000.0);

    assert_close(expense.value_at(2025).unwrap(), 13_000.0, "first year");
    assert_close(expense.value_at(2026).unwrap(), 5_000.0, "second year");
    assert_eq!(expense.down_payment(), Some(8_000.0));
}

#[test]
fn test_stream_extrapolation_unsupported() {
    let mut income = Income::new("Salary", 2020, 2024, 100_000.0, 0.0).unwrap();
    let err = income.extrapolate_from_start(2015, 0.0).unwrap_err();
    assert!(matches!(
        err,
        TimeSeriesError::UnsupportedExtrapolation { .. }
    ));
}

#[test]
fn test_values_over_is_ordered_and_inclusive() {
    let income = Income::new("Salary", 2020, 2022, 1_000.0, 0.0).unwrap();
    let points = income.values_over(2019, 2023).unwrap();

    let years: Vec<i16> = points.iter().map(|p| p.year).collect();
    assert_eq!(years, vec![2019, 2020, 2021, 2022, 2023]);
    assert_eq!(points[0].value, 0.0);
    assert_eq!(points[2].value, 1_000.0);
    assert_eq!(points[4].value, 0.0);
}

// ============================================================================
// Liabilities
// ============================================================================

/// Growth-only query path: 1000 at 5% for two years
#[test]
fn test_liability_pure_growth() {
    let liability = Liability::new("Loan", 2020, 1_000.0, 0.05);
    assert_close(liability.value_at(2022).unwrap(), 1_102.5, "two years of growth");
    assert_close(liability.value_at(2020).unwrap(), 1_000.0, "init year");
}

#[test]
fn test_liability_queries_are_idempotent() {
    let liability = Liability::new("Loan", 2020, 1_000.0, 0.07);
    let late = liability.value_at(2040).unwrap();
    let early = liability.value_at(2030).unwrap();
    assert_eq!(liability.value_at(2040).unwrap(), late);
    assert_eq!(liability.value_at(2030).unwrap(), early);
    assert_close(early, 1_000.0 * 1.07_f64.powi(10), "out-of-order query");
}

#[test]
fn test_liability_repayment_reduces_balance() {
    let payment = Expense::new("Loan Payment", 2020, 2030, 250.0, 0.0).unwrap();
    let liability = Liability::new("Loan", 2020, 1_000.0, 0.0).with_repayment(payment);

    assert_close(liability.value_at(2021).unwrap(), 750.0, "after one payment");
    assert_close(liability.value_at(2023).unwrap(), 250.0, "after three payments");
    assert_eq!(liability.value_at(2024).unwrap(), 0.0);
}

#[test]
fn test_liability_snaps_near_zero_balance() {
    let payment = Expense::new("Loan Payment", 2021, 2021, 99.95, 0.0).unwrap();
    let liability = Liability::new("Loan", 2020, 100.0, 0.0).with_repayment(payment);

    assert_eq!(
        liability.value_at(2021).unwrap(),
        0.0,
        "a residual under 0.1 should snap to exactly zero"
    );
}

#[test]
fn test_liability_before_init_is_zero() {
    let liability = Liability::new("Loan", 2020, 1_000.0, 0.05);
    assert_eq!(liability.value_at(2019).unwrap(), 0.0);
}

#[test]
fn test_liability_extrapolation_unsupported() {
    let mut liability = Liability::new("Loan", 2020, 1_000.0, 0.05);
    let err = liability.extrapolate_from_start(2010, 0.0).unwrap_err();
    assert!(matches!(
        err,
        TimeSeriesError::UnsupportedExtrapolation {
            kind: PlottableKind::LIABILITY,
            ..
        }
    ));
}

#[test]
fn test_liability_past_values_must_precede_init() {
    let mut liability = Liability::new("Loan", 2020, 1_000.0, 0.05);
    let err = liability
        .populate_past_values(&[PlotPoint::new(2020, 900.0)])
        .unwrap_err();
    assert!(matches!(err, TimeSeriesError::PastValueNotBeforeInit { .. }));

    liability
        .populate_past_values(&[PlotPoint::new(2016, 200.0)])
        .unwrap();
    assert_close(liability.value_at(2016).unwrap(), 200.0, "explicit point");
    assert_close(liability.value_at(2018).unwrap(), 600.0, "interpolated");
}

// ============================================================================
// Assets
// ============================================================================

#[test]
fn test_asset_forward_years_require_simulation() {
    let asset = Asset::new("Brokerage", 2020, 1_000.0, 0.05);

    assert_eq!(asset.value_at(2020).unwrap(), 1_000.0);
    assert!(matches!(
        asset.value_at(2021),
        Err(TimeSeriesError::SimulationIncomplete { year: 2021, .. })
    ));
}

#[test]
fn test_asset_before_init_defaults_to_zero() {
    let asset = Asset::new("Brokerage", 2020, 1_000.0, 0.05);
    assert_eq!(asset.value_at(2015).unwrap(), 0.0);
}

#[test]
fn test_asset_populate_past_values_interpolates() {
    let mut asset = Asset::new("Brokerage", 2025, 1_000.0, 0.05);
    asset
        .populate_past_values(&[PlotPoint::new(2023, 600.0), PlotPoint::new(2020, 0.0)])
        .unwrap();

    assert_close(asset.value_at(2020).unwrap(), 0.0, "first point");
    assert_close(asset.value_at(2021).unwrap(), 200.0, "between first and second");
    assert_close(asset.value_at(2022).unwrap(), 400.0, "between first and second");
    assert_close(asset.value_at(2023).unwrap(), 600.0, "second point");
    assert_close(asset.value_at(2024).unwrap(), 800.0, "between last point and init");
    assert_close(asset.value_at(2025).unwrap(), 1_000.0, "init anchor");
    assert_eq!(asset.value_at(2019).unwrap(), 0.0);
}

#[test]
fn test_asset_past_point_at_init_keeps_init_value() {
    let mut asset = Asset::new("Brokerage", 2025, 1_000.0, 0.05);
    asset
        .populate_past_values(&[PlotPoint::new(2025, 5.0), PlotPoint::new(2024, 900.0)])
        .unwrap();
    assert_eq!(asset.value_at(2025).unwrap(), 1_000.0);
    assert_eq!(asset.value_at(2024).unwrap(), 900.0);
}

#[test]
fn test_asset_past_values_after_init_rejected() {
    let mut asset = Asset::new("Brokerage", 2025, 1_000.0, 0.05);
    let err = asset
        .populate_past_values(&[PlotPoint::new(2026, 5.0)])
        .unwrap_err();
    assert!(matches!(
        err,
        TimeSeriesError::PastValueNotBeforeInit { year: 2026, .. }
    ));
}

#[test]
fn test_asset_extrapolate_from_start() {
    let mut asset = Asset::new("Brokerage", 2025, 1_000.0, 0.05);
    asset.extrapolate_from_start(2021, 0.0).unwrap();

    assert_close(asset.value_at(2021).unwrap(), 0.0, "ramp start");
    assert_close(asset.value_at(2022).unwrap(), 250.0, "ramp");
    assert_close(asset.value_at(2024).unwrap(), 750.0, "ramp end");
    assert_close(asset.value_at(2025).unwrap(), 1_000.0, "init anchor");
}

#[test]
fn test_asset_extrapolate_overwrites_previous_history() {
    let mut asset = Asset::new("Brokerage", 2025, 1_000.0, 0.05);
    asset.extrapolate_from_start(2021, 0.0).unwrap();
    asset.extrapolate_from_start(2023, 500.0).unwrap();

    assert_eq!(
        asset.value_at(2021).unwrap(),
        0.0,
        "years before the new ramp should be cleared"
    );
    assert_close(asset.value_at(2024).unwrap(), 750.0, "new ramp");
}

#[test]
fn test_asset_extrapolate_start_must_precede_init() {
    let mut asset = Asset::new("Brokerage", 2025, 1_000.0, 0.05);
    assert!(matches!(
        asset.extrapolate_from_start(2025, 0.0),
        Err(TimeSeriesError::InvalidExtrapolationStart { .. })
    ));
}

#[test]
fn test_update_plot_point_sequencing() {
    let mut asset = Asset::new("Brokerage", 2020, 1_000.0, 0.10);

    assert!(matches!(
        asset.update_plot_point(2019, 10.0, false),
        Err(TimeSeriesError::BeforeInitYear { .. })
    ));
    assert!(!asset.update_plot_point(2020, 10.0, false).unwrap());
    assert!(matches!(
        asset.update_plot_point(2022, 10.0, false),
        Err(TimeSeriesError::SimulationIncomplete { year: 2021, .. })
    ));

    assert!(asset.update_plot_point(2021, 100.0, false).unwrap());
    assert_close(asset.value_at(2021).unwrap(), 1_200.0, "grown plus inflow");
}

#[test]
fn test_update_plot_point_zero_inflow_is_idempotent() {
    let mut asset = Asset::new("Brokerage", 2020, 1_000.0, 0.10);

    assert!(asset.update_plot_point(2021, 0.0, false).unwrap());
    assert!(!asset.update_plot_point(2021, 0.0, false).unwrap());
    assert_close(asset.value_at(2021).unwrap(), 1_100.0, "grown only");
}

#[test]
fn test_update_plot_point_respects_cutoff() {
    let mut asset = Asset::new("Savings", 2020, 1_000.0, 0.0).with_spend_cutoff(900.0);

    assert!(
        !asset.update_plot_point(2021, -200.0, false).unwrap(),
        "withdrawal through the cutoff should be refused"
    );
    assert!(!asset.is_materialized(2021));

    assert!(asset.update_plot_point(2021, -200.0, true).unwrap());
    assert_close(asset.value_at(2021).unwrap(), 800.0, "cutoff ignored");
}

#[test]
fn test_update_plot_point_never_goes_negative() {
    let mut asset = Asset::new("Savings", 2020, 1_000.0, 0.0);
    assert!(!asset.update_plot_point(2021, -1_000.5, true).unwrap());
    assert!(asset.update_plot_point(2021, -1_000.0, true).unwrap());
    assert_eq!(asset.value_at(2021).unwrap(), 0.0);
}

#[test]
fn test_update_plot_point_accumulates_within_year() {
    let mut asset = Asset::new("Savings", 2020, 1_000.0, 0.10);
    assert!(asset.update_plot_point(2021, -100.0, false).unwrap());
    assert!(asset.update_plot_point(2021, -50.0, true).unwrap());
    assert_close(
        asset.value_at(2021).unwrap(),
        950.0,
        "second draw should build on the first",
    );
    assert_close(asset.available_balance(2021).unwrap(), 950.0, "available");
    assert_close(asset.available_balance(2022).unwrap(), 1_045.0, "next year grown");
}

#[test]
fn test_reset_simulation_keeps_history() {
    let mut asset = Asset::new("Savings", 2020, 1_000.0, 0.10);
    asset.extrapolate_from_start(2018, 0.0).unwrap();
    asset.update_plot_point(2021, 0.0, false).unwrap();

    asset.reset_simulation();

    assert!(!asset.is_materialized(2021));
    assert_close(asset.value_at(2019).unwrap(), 500.0, "history retained");
}

// ============================================================================
// Derived series
// ============================================================================

#[test]
fn test_net_flow_bounds() {
    let mut net_flow = NetFlow::new(2020, 2030);
    net_flow.record(2025, -500.0).unwrap();

    assert_eq!(net_flow.value_at(2025).unwrap(), -500.0);
    assert_eq!(net_flow.value_at(2026).unwrap(), 0.0, "unrecorded year");
    assert!(matches!(
        net_flow.record(2031, 1.0),
        Err(BoundsError::OutsidePortfolio {
            kind: PlottableKind::NET_FLOW,
            ..
        })
    ));
}

#[test]
fn test_kind_signs() {
    assert_eq!(PlottableKind::ASSET.sign(), 1.0);
    assert_eq!(PlottableKind::INCOME.sign(), 1.0);
    assert_eq!(PlottableKind::LIABILITY.sign(), -1.0);
    assert_eq!(PlottableKind::EXPENSE.sign(), -1.0);
    assert!(PlottableKind::NET_WORTH.is_pool());
    assert!(PlottableKind::NET_FLOW.is_stream());
}
