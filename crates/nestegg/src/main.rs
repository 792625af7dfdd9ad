use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nestegg::{OutputFormat, commands, init_logging};
use nestegg_core::model::Year;
use nestegg_core::portfolio::this_year;

#[derive(Parser, Debug)]
#[command(name = "nestegg")]
#[command(about = "Year-by-year household financial projections")]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a scenario's bounds and allocation coverage
    Validate { file: PathBuf },
    /// Simulate a scenario and print the yearly results
    Simulate {
        file: PathBuf,
        /// Emit every series and the allocation ledger as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a starter scenario
    Init {
        file: PathBuf,
        /// First year of the plan (default: this year)
        #[arg(long)]
        year: Option<Year>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level, args.log_file.as_deref())?;

    let output = match args.command {
        Command::Validate { file } => commands::validate(&file)?,
        Command::Simulate { file, json } => {
            let format = if json {
                OutputFormat::Json
            } else {
                OutputFormat::Table
            };
            commands::simulate(&file, format)?
        }
        Command::Init { file, year, force } => {
            let year = year.unwrap_or_else(this_year);
            commands::init(&file, year, force)?
        }
    };
    print!("{output}");

    Ok(())
}
