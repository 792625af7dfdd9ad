//! Tests for the nestegg projection engine
//!
//! Tests are organized by topic:
//! - `time_series` - Pools, streams and derived series as time series
//! - `allocation` - Savings distribution and spend priority construction
//! - `validator` - Bounds and coverage checks
//! - `simulation` - Year-by-year projection, surplus and deficit handling
//! - `builder_dsl` - Builder DSL and serializable configuration
//! - `goals` - Purchases expanded into expenses and loans

mod time_series;
mod validator;
