//! Scenario files
//!
//! A scenario is a [`PortfolioConfig`] stored as YAML, or as JSON when the
//! file name ends in `.json`.

use std::fs;
use std::io;
use std::path::Path;

use nestegg_core::PortfolioConfig;
use nestegg_core::config::{
    AssetConfig, ExpenseConfig, IncomeConfig, PriorityConfig, ProfileConfig,
    SavingsDistributionConfig, ShareConfig, SpendPriorityConfig,
};
use nestegg_core::goal::Goal;
use nestegg_core::model::{PlotPoint, Year};

/// Error types for scenario file operations
#[derive(Debug)]
pub enum ScenarioError {
    Io(String),
    Parse(String),
    Serialize(String),
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::Io(msg) => write!(f, "IO error: {msg}"),
            ScenarioError::Parse(msg) => write!(f, "Parse error: {msg}"),
            ScenarioError::Serialize(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for ScenarioError {}

impl From<io::Error> for ScenarioError {
    fn from(e: io::Error) -> Self {
        ScenarioError::Io(e.to_string())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

pub fn parse_yaml(yaml: &str) -> Result<PortfolioConfig, ScenarioError> {
    serde_saphyr::from_str(yaml).map_err(|e| ScenarioError::Parse(e.to_string()))
}

pub fn parse_json(json: &str) -> Result<PortfolioConfig, ScenarioError> {
    serde_json::from_str(json).map_err(|e| ScenarioError::Parse(e.to_string()))
}

pub fn load_scenario(path: &Path) -> Result<PortfolioConfig, ScenarioError> {
    let content = fs::read_to_string(path)
        .map_err(|e| ScenarioError::Io(format!("{}: {e}", path.display())))?;
    let config = if is_json(path) {
        parse_json(&content)?
    } else {
        parse_yaml(&content)?
    };
    tracing::debug!(
        path = %path.display(),
        assets = config.assets.len(),
        incomes = config.incomes.len(),
        expenses = config.expenses.len(),
        "loaded scenario"
    );
    Ok(config)
}

/// Write a scenario using write-then-rename so an interrupted write never
/// leaves a truncated file behind.
pub fn save_scenario(path: &Path, config: &PortfolioConfig) -> Result<(), ScenarioError> {
    let content = if is_json(path) {
        serde_json::to_string_pretty(config).map_err(|e| ScenarioError::Serialize(e.to_string()))?
    } else {
        serde_saphyr::to_string(config).map_err(|e| ScenarioError::Serialize(e.to_string()))?
    };

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Starter scenario: a salaried household saving into two accounts, then
/// drawing them down after retirement.
pub fn sample_scenario(current_year: Year) -> PortfolioConfig {
    let end_year = current_year + 40;
    let retire_year = current_year + 25;

    let asset = |name: &str, value: f64, growth_rate: f64, spend_cutoff: f64| AssetConfig {
        name: name.to_string(),
        init_year: current_year,
        init_value: value,
        growth_rate,
        liquid: true,
        spend_cutoff,
        extrapolate_from: None,
        past_values: Vec::new(),
    };

    PortfolioConfig {
        profile: ProfileConfig {
            start_year: Some(current_year),
            end_year: Some(end_year),
            current_year: Some(current_year),
            current_age: 40,
        },
        assets: vec![
            AssetConfig {
                extrapolate_from: Some(PlotPoint::new(current_year - 10, 0.0)),
                ..asset("Brokerage", 150_000.0, 0.06, 0.0)
            },
            asset("Savings", 25_000.0, 0.01, 15_000.0),
        ],
        liabilities: Vec::new(),
        incomes: vec![
            IncomeConfig {
                name: "Salary".to_string(),
                init_year: current_year,
                end_year: retire_year,
                init_value: 95_000.0,
                growth_rate: 0.025,
            },
            IncomeConfig {
                name: "Pension".to_string(),
                init_year: retire_year + 1,
                end_year,
                init_value: 24_000.0,
                growth_rate: 0.02,
            },
        ],
        expenses: vec![ExpenseConfig {
            name: "Living".to_string(),
            init_year: current_year,
            end_year,
            init_value: 60_000.0,
            growth_rate: 0.025,
            down_payment: None,
        }],
        goals: vec![Goal::new("Car", current_year + 3, 35_000.0, 0.05, 5).with_down_payment(7_000.0)],
        savings_distributions: vec![SavingsDistributionConfig {
            start_year: current_year,
            end_year,
            allocations: vec![
                ShareConfig {
                    asset: "Brokerage".to_string(),
                    percentage: 80.0,
                },
                ShareConfig {
                    asset: "Savings".to_string(),
                    percentage: 20.0,
                },
            ],
        }],
        spend_priorities: vec![SpendPriorityConfig {
            start_year: current_year,
            end_year,
            order: vec![
                PriorityConfig {
                    asset: "Savings".to_string(),
                    priority: 1,
                },
                PriorityConfig {
                    asset: "Brokerage".to_string(),
                    priority: 2,
                },
            ],
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const YAML: &str = "
profile:
  start_year: 2025
  end_year: 2030
  current_year: 2025
  current_age: 50
assets:
  - name: Cash
    init_year: 2025
    init_value: 100000.0
    growth_rate: 0.02
    spend_cutoff: 5000.0
incomes:
  - name: Salary
    init_year: 2025
    end_year: 2027
    init_value: 60000.0
expenses:
  - name: Living
    init_year: 2025
    end_year: 2030
    init_value: 45000.0
savings_distributions:
  - start_year: 2025
    end_year: 2030
    allocations:
      - asset: Cash
        percentage: 100.0
spend_priorities:
  - start_year: 2025
    end_year: 2030
    order:
      - asset: Cash
        priority: 1
";

    #[test]
    fn test_parse_yaml_scenario() {
        let config = parse_yaml(YAML).unwrap();
        assert_eq!(config.assets.len(), 1);
        assert!(config.assets[0].liquid);
        assert_eq!(config.assets[0].spend_cutoff, 5_000.0);
        assert_eq!(config.incomes[0].growth_rate, 0.0);

        let (mut portfolio, _) = config.build().unwrap();
        portfolio.simulate().unwrap();
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = parse_yaml("assets: [ { name: 1").unwrap_err();
        assert!(matches!(err, ScenarioError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_scenario(&temp_dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ScenarioError::Io(_)));
    }

    #[test]
    fn test_save_and_load_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plan.yaml");

        let config = sample_scenario(2025);
        save_scenario(&path, &config).unwrap();
        assert!(!path.with_extension("tmp").exists());

        let loaded = load_scenario(&path).unwrap();
        assert_eq!(loaded.assets.len(), config.assets.len());
        assert_eq!(loaded.goals, config.goals);
        assert_eq!(loaded.profile.end_year, Some(2065));
    }

    #[test]
    fn test_save_and_load_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plan.json");

        save_scenario(&path, &sample_scenario(2030)).unwrap();

        let loaded = load_scenario(&path).unwrap();
        assert_eq!(loaded.profile.current_year, Some(2030));
    }

    #[test]
    fn test_sample_scenario_is_sustainable() {
        let (mut portfolio, metadata) = sample_scenario(2025).build().unwrap();
        portfolio.simulate().unwrap();
        assert!(metadata.liability_id("Car Loan").is_some());
    }
}
