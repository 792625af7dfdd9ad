//! Rendering simulation results
//!
//! Two outputs: a fixed-width yearly table for the terminal, and a JSON
//! document with one signed series per entity for charting tools. Values in
//! the series are multiplied by `PlottableKind::sign` so liabilities and
//! expenses stack below the axis.

use std::fmt::Write;

use nestegg_core::error::TimeSeriesError;
use nestegg_core::model::{MoneyPlottable, PlotPoint, Year};
use nestegg_core::{Portfolio, SimulationReport};
use serde::Serialize;

/// One labelled, signed time series
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub name: String,
    pub kind: String,
    pub points: Vec<PlotPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportDocument<'a> {
    pub start_year: Year,
    pub end_year: Year,
    pub series: Vec<Series>,
    pub report: &'a SimulationReport,
}

fn signed_series(
    entity: &dyn MoneyPlottable,
    start: Year,
    end: Year,
) -> Result<Series, TimeSeriesError> {
    let sign = entity.kind().sign();
    let points = entity
        .values_over(start, end)?
        .into_iter()
        .map(|p| PlotPoint::new(p.year, p.value * sign))
        .collect();
    Ok(Series {
        name: entity.name().to_string(),
        kind: entity.kind().to_string(),
        points,
    })
}

/// Every entity and derived series over the whole horizon
pub fn export_series(portfolio: &Portfolio) -> Result<Vec<Series>, TimeSeriesError> {
    portfolio
        .plottables()
        .into_iter()
        .map(|entity| signed_series(entity, portfolio.start_year(), portfolio.end_year()))
        .collect()
}

pub fn to_json(portfolio: &Portfolio, report: &SimulationReport) -> color_eyre::Result<String> {
    let document = ExportDocument {
        start_year: portfolio.start_year(),
        end_year: portfolio.end_year(),
        series: export_series(portfolio)?,
        report,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Yearly table: age, flows, each asset's balance, total liabilities and net worth
pub fn render_table(
    portfolio: &Portfolio,
    report: &SimulationReport,
) -> Result<String, TimeSeriesError> {
    let assets: Vec<_> = portfolio.assets().map(|(_, a)| a).collect();

    let mut out = String::new();
    let _ = write!(
        out,
        "{:>6} {:>4} {:>12} {:>12} {:>12}",
        "Year", "Age", "Income", "Expenses", "Net Flow"
    );
    for asset in &assets {
        let _ = write!(out, " {:>14}", truncate(asset.name(), 14));
    }
    let _ = writeln!(out, " {:>14} {:>14}", "Liabilities", "Net Worth");

    for summary in &report.years {
        let year = summary.year;
        let _ = write!(
            out,
            "{:>6} {:>4} {:>12.0} {:>12.0} {:>12.0}",
            year,
            portfolio.age_at(year),
            summary.gross_income,
            summary.gross_expenses,
            summary.net_flow
        );
        for asset in &assets {
            let _ = write!(out, " {:>14.0}", asset.value_at(year)?);
        }
        let mut owed = 0.0;
        for (_, liability) in portfolio.liabilities() {
            owed += liability.value_at(year)?;
        }
        let _ = writeln!(
            out,
            " {:>14.0} {:>14.0}",
            owed,
            portfolio.net_worth().value_at(year)?
        );
    }
    Ok(out)
}

fn truncate(name: &str, width: usize) -> &str {
    match name.char_indices().nth(width) {
        Some((i, _)) => &name[..i],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nestegg_core::config::PortfolioBuilder;
    use nestegg_core::model::{Asset, Expense, Income, Liability, PlottableKind};

    fn simulated() -> (Portfolio, SimulationReport) {
        let (mut portfolio, _) = PortfolioBuilder::new()
            .horizon(2025, 2027)
            .current_year(2025)
            .current_age(60)
            .asset(Asset::new("Brokerage", 2025, 10_000.0, 0.0))
            .liability(Liability::new("Loan", 2025, 1_000.0, 0.0))
            .income(Income::new("Salary", 2025, 2027, 5_000.0, 0.0).unwrap())
            .expense(Expense::new("Living", 2025, 2027, 3_000.0, 0.0).unwrap())
            .savings_distribution(2025, 2027, [("Brokerage", 100.0)])
            .spend_priority(2025, 2027, [("Brokerage", 1)])
            .build()
            .unwrap();
        let report = portfolio.simulate().unwrap();
        (portfolio, report)
    }

    #[test]
    fn test_series_are_signed_by_kind() {
        let (portfolio, _) = simulated();
        let series = export_series(&portfolio).unwrap();

        let find = |name: &str| series.iter().find(|s| s.name == name).unwrap();
        assert_eq!(find("Living").points[0].value, -3_000.0);
        assert_eq!(find("Loan").points[0].value, -1_000.0);
        assert_eq!(find("Salary").points[0].value, 5_000.0);
        assert_eq!(find("Brokerage").points[2].value, 14_000.0);
        assert_eq!(find("Net Worth").points[2].value, 13_000.0);
        assert_eq!(find("Net Flow").kind, PlottableKind::NET_FLOW.to_string());
    }

    #[test]
    fn test_table_has_one_row_per_year() {
        let (portfolio, report) = simulated();
        let table = render_table(&portfolio, &report).unwrap();

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4, "header plus three years");
        assert!(lines[0].contains("Brokerage"));
        assert!(lines[3].trim_start().starts_with("2027"));
        assert!(lines[3].contains("14000"));
    }

    #[test]
    fn test_json_export_parses() {
        let (portfolio, report) = simulated();
        let json = to_json(&portfolio, &report).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["start_year"], 2025);
        assert_eq!(value["report"]["years"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_truncate_long_names() {
        assert_eq!(truncate("Brokerage", 4), "Brok");
        assert_eq!(truncate("IRA", 14), "IRA");
    }
}
