//! Command-line front end for the nestegg projection engine
//!
//! Loads a scenario file, validates it, simulates it and prints a yearly
//! table or exports every series as JSON.

pub mod commands;
pub mod logging;
pub mod report;
pub mod scenario;

pub use commands::OutputFormat;
pub use logging::init_logging;
