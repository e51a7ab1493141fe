//! Robust aggregation of latency samples
//!
//! Each operation's samples go through the same pipeline: sort, drop a fixed
//! fraction from both tails, fence the remaining central window by its
//! interquartile range and summarise what is left.
//!
//! # Examples
//!
//! ```
//! use latency_harness::stats::{aggregate, PlotOrder, PlotSeries, TrimParams};
//!
//! let samples: Vec<f64> = (1..=50).map(|i| (i * 10) as f64).collect();
//! let params = TrimParams::default();
//!
//! let summary = aggregate(&samples, &params).unwrap();
//! assert_eq!(summary.window.ignore_runs, 10);
//! assert_eq!(summary.mean, 255.0);
//!
//! let series = PlotSeries::from_samples(&samples, &params, PlotOrder::Sorted).unwrap();
//! assert_eq!(series.x_range(), Some((11, 40)));
//! ```

pub mod aggregate;
pub mod fence;
pub mod series;
pub mod window;

pub use aggregate::{aggregate, RobustSummary};
pub use fence::Fence;
pub use series::{PlotOrder, PlotPoint, PlotSeries};
pub use window::{TrimParams, TrimWindow, DEFAULT_IGNORE_FRACTION, DEFAULT_IQR_MULTIPLIER};

use crate::error::StatsError;

/// Latencies must be finite and non-negative.
fn check_samples(samples: &[f64]) -> Result<(), StatsError> {
    match samples.iter().position(|v| !v.is_finite() || *v < 0.0) {
        Some(index) => Err(StatsError::InvalidSample { index }),
        None => Ok(()),
    }
}

fn sorted_copy(samples: &[f64]) -> Result<Vec<f64>, StatsError> {
    check_samples(samples)?;
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}
