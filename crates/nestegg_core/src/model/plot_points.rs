//! Sparse year -> value storage shared by pools
//!
//! Pools keep their history in a `PlotPoints` cache. Years that were never
//! written are simply absent; callers decide whether absence means zero
//! (pre-init history) or an error (forward years not yet simulated).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::ids::Year;

/// A single (year, value) sample of a time series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub year: Year,
    pub value: f64,
}

impl PlotPoint {
    #[must_use]
    pub fn new(year: Year, value: f64) -> Self {
        Self { year, value }
    }
}

impl From<(Year, f64)> for PlotPoint {
    fn from((year, value): (Year, f64)) -> Self {
        Self { year, value }
    }
}

/// Sparse cache of materialized values keyed by year
#[derive(Debug, Clone, Default)]
pub struct PlotPoints {
    values: FxHashMap<Year, f64>,
}

impl PlotPoints {
    /// Create a cache seeded with the anchor value at `init_year`
    pub fn anchored(init_year: Year, init_value: f64) -> Self {
        let mut values = FxHashMap::default();
        values.insert(init_year, init_value);
        Self { values }
    }

    pub fn get(&self, year: Year) -> Option<f64> {
        self.values.get(&year).copied()
    }

    pub fn contains(&self, year: Year) -> bool {
        self.values.contains_key(&year)
    }

    pub fn set(&mut self, year: Year, value: f64) {
        self.values.insert(year, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop every entry strictly before `year`
    pub fn clear_before(&mut self, year: Year) {
        self.values.retain(|&y, _| y >= year);
    }

    /// Drop every entry strictly after `year`
    pub fn clear_after(&mut self, year: Year) {
        self.values.retain(|&y, _| y <= year);
    }

    /// Replace all history before `init_year` with a linear ramp from
    /// `(start_year, start_value)` up to `(init_year, init_value)`.
    ///
    /// The caller guarantees `start_year < init_year`.
    pub fn ramp_to_init(
        &mut self,
        init_year: Year,
        init_value: f64,
        start_year: Year,
        start_value: f64,
    ) {
        self.clear_before(init_year);

        let span = f64::from(init_year - start_year);
        let step = (init_value - start_value) / span;
        for year in start_year..init_year {
            let offset = f64::from(year - start_year);
            self.values.insert(year, start_value + step * offset);
        }
        self.values.insert(init_year, init_value);
    }

    /// Write manually supplied history points, linearly interpolating the
    /// years between consecutive points. An implicit final point at
    /// `(init_year, init_value)` closes the series.
    ///
    /// The caller guarantees every point lies at or before `init_year`.
    pub fn fill_past(&mut self, init_year: Year, init_value: f64, points: &[PlotPoint]) {
        let mut anchors: Vec<PlotPoint> = points
            .iter()
            .filter(|p| p.year < init_year)
            .copied()
            .collect();
        anchors.push(PlotPoint::new(init_year, init_value));
        anchors.sort_by_key(|p| p.year);

        for pair in anchors.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            let span = f64::from(next.year - prev.year);
            if span > 1.0 {
                let step = (next.value - prev.value) / span;
                for year in (prev.year + 1)..next.year {
                    let offset = f64::from(year - prev.year);
                    self.values.insert(year, prev.value + step * offset);
                }
            }
        }

        for anchor in &anchors {
            self.values.insert(anchor.year, anchor.value);
        }
    }
}
