//! Symmetric fixed-fraction trimming of a sorted sample set.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::error::StatsError;

/// Fraction of runs discarded from each tail of the sorted samples.
pub const DEFAULT_IGNORE_FRACTION: f64 = 0.2;

/// Multiplier applied to the IQR when building the fence.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Trim parameters shared by every experiment of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimParams {
    ignore_fraction: f64,
    iqr_multiplier: f64,
}

impl TrimParams {
    /// Validate and build trim parameters.
    ///
    /// `ignore_fraction` must lie in `[0, 0.5)` so that at least one run
    /// survives trimming, and `iqr_multiplier` must be finite.
    pub fn new(ignore_fraction: f64, iqr_multiplier: f64) -> Result<Self, StatsError> {
        if !(0.0..0.5).contains(&ignore_fraction) {
            return Err(StatsError::InvalidParameters(format!(
                "ignore_fraction must be in [0, 0.5), got {}",
                ignore_fraction
            )));
        }
        if !iqr_multiplier.is_finite() {
            return Err(StatsError::InvalidParameters(format!(
                "iqr_multiplier must be finite, got {}",
                iqr_multiplier
            )));
        }

        Ok(Self {
            ignore_fraction,
            iqr_multiplier,
        })
    }

    pub fn ignore_fraction(&self) -> f64 {
        self.ignore_fraction
    }

    pub fn iqr_multiplier(&self) -> f64 {
        self.iqr_multiplier
    }
}

impl Default for TrimParams {
    fn default() -> Self {
        Self {
            ignore_fraction: DEFAULT_IGNORE_FRACTION,
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
        }
    }
}

/// The central window of `runs` sorted samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimWindow {
    /// Total number of samples.
    pub runs: usize,
    /// Samples dropped from each end: `floor(runs * ignore_fraction)`.
    pub ignore_runs: usize,
    /// Samples left in the window: `runs - 2 * ignore_runs`.
    pub effective_runs: usize,
}

impl TrimWindow {
    pub fn new(runs: usize, params: &TrimParams) -> Self {
        let ignore_runs = (runs as f64 * params.ignore_fraction).floor() as usize;
        let effective_runs = runs - 2 * ignore_runs;

        Self {
            runs,
            ignore_runs,
            effective_runs,
        }
    }

    /// Indices of the window in the sorted sample array.
    pub fn range(&self) -> Range<usize> {
        self.ignore_runs..self.runs - self.ignore_runs
    }

    /// Index of Q1 in the full sorted array, not in the window.
    pub fn q1_index(&self) -> usize {
        self.ignore_runs + self.effective_runs / 4
    }

    /// Index of Q3 in the full sorted array, not in the window.
    pub fn q3_index(&self) -> usize {
        self.ignore_runs + 3 * self.effective_runs / 4
    }

    pub fn is_empty(&self) -> bool {
        self.effective_runs == 0
    }
}
