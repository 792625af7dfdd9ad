//! Command implementations behind the CLI
//!
//! Each command returns the text to print so the binary stays a thin shell.

use std::path::Path;

use color_eyre::eyre::{Context, eyre};
use nestegg_core::Portfolio;
use nestegg_core::error::SimulationError;
use nestegg_core::model::Year;
use tracing::info;

use crate::report;
use crate::scenario::{load_scenario, sample_scenario, save_scenario};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

fn build(path: &Path) -> color_eyre::Result<Portfolio> {
    let config = load_scenario(path)?;
    let (portfolio, metadata) = config
        .build()
        .wrap_err_with(|| format!("invalid scenario {}", path.display()))?;
    info!(
        assets = metadata.assets.len(),
        liabilities = metadata.liabilities.len(),
        start_year = portfolio.start_year(),
        end_year = portfolio.end_year(),
        "scenario is valid"
    );
    Ok(portfolio)
}

/// Load a scenario and run every bounds and coverage check
pub fn validate(path: &Path) -> color_eyre::Result<String> {
    let portfolio = build(path)?;
    Ok(format!(
        "{} is valid: {} assets, {} liabilities, {} incomes, {} expenses over {}-{}\n",
        path.display(),
        portfolio.assets().count(),
        portfolio.liabilities().count(),
        portfolio.incomes().count(),
        portfolio.expenses().count(),
        portfolio.start_year(),
        portfolio.end_year(),
    ))
}

/// Load, validate and simulate a scenario
pub fn simulate(path: &Path, format: OutputFormat) -> color_eyre::Result<String> {
    let mut portfolio = build(path)?;

    let report = match portfolio.simulate() {
        Ok(report) => report,
        Err(SimulationError::DeficitExceedsAssets { year, remaining }) => {
            return Err(eyre!(
                "plan is not sustainable in {year}: {remaining:.2} of expenses cannot be funded"
            ));
        }
        Err(e) => return Err(e.into()),
    };
    info!(years = report.years.len(), "simulation complete");

    match format {
        OutputFormat::Table => Ok(report::render_table(&portfolio, &report)?),
        OutputFormat::Json => report::to_json(&portfolio, &report),
    }
}

/// Write a starter scenario anchored at `current_year`
pub fn init(path: &Path, current_year: Year, force: bool) -> color_eyre::Result<String> {
    if path.exists() && !force {
        return Err(eyre!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    save_scenario(path, &sample_scenario(current_year))?;
    Ok(format!("wrote sample scenario to {}\n", path.display()))
}
