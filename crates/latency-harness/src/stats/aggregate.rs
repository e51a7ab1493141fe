//! Trimmed, fenced mean and population standard deviation.

use serde::{Deserialize, Serialize};

use super::fence::Fence;
use super::window::{TrimParams, TrimWindow};
use super::sorted_copy;
use crate::error::StatsError;

/// Robust summary of one operation's samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobustSummary {
    /// Mean of the valid runs
    pub mean: f64,
    /// Population standard deviation of the valid runs
    pub std_dev: f64,
    /// `std_dev / mean * 100`
    pub std_dev_percentage: f64,
    /// Window samples inside the fence
    pub valid_runs: usize,
    /// Window samples outside the fence
    pub outliers_removed: usize,
    pub window: TrimWindow,
    pub fence: Fence,
}

/// Aggregate `samples` (in any order) into a [`RobustSummary`].
///
/// 1. Sort a copy of the samples.
/// 2. Keep the central window `[ignore_runs, N - ignore_runs)`.
/// 3. Build the IQR fence from the window's quartiles.
/// 4. Average the window samples inside the fence and take their population
///    standard deviation.
///
/// # Errors
///
/// - [`StatsError::InvalidSample`] if a sample is NaN, infinite or negative
/// - [`StatsError::EmptyWindow`] if there are no samples
/// - [`StatsError::EmptyAggregate`] if the fence rejects the whole window
pub fn aggregate(samples: &[f64], params: &TrimParams) -> Result<RobustSummary, StatsError> {
    let sorted = sorted_copy(samples)?;
    let window = TrimWindow::new(sorted.len(), params);
    let fence = Fence::detect(&sorted, &window, params.iqr_multiplier())
        .ok_or(StatsError::EmptyWindow { runs: sorted.len() })?;

    let valid: Vec<f64> = sorted[window.range()]
        .iter()
        .copied()
        .filter(|&v| fence.contains(v))
        .collect();

    if valid.is_empty() {
        return Err(StatsError::EmptyAggregate {
            lower: fence.lower,
            upper: fence.upper,
        });
    }

    let count = valid.len() as f64;
    let mean = valid.iter().sum::<f64>() / count;
    let variance = valid
        .iter()
        .map(|&v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>()
        / count;
    let std_dev = variance.sqrt();

    Ok(RobustSummary {
        mean,
        std_dev,
        std_dev_percentage: relative_std_dev(mean, std_dev),
        valid_runs: valid.len(),
        outliers_removed: window.effective_runs - valid.len(),
        window,
        fence,
    })
}

fn relative_std_dev(mean: f64, std_dev: f64) -> f64 {
    if mean == 0.0 {
        if std_dev == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        std_dev / mean * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_scenario() {
        let samples: Vec<f64> = (1..=50).map(|i| (i * 10) as f64).collect();
        let summary = aggregate(&samples, &TrimParams::default()).unwrap();

        assert_eq!(summary.window.ignore_runs, 10);
        assert_eq!(summary.window.effective_runs, 30);
        assert_eq!(summary.valid_runs, 30);
        assert_eq!(summary.outliers_removed, 0);
        assert_eq!(summary.mean, 255.0);
        assert_eq!(summary.std_dev, (224_750.0_f64 / 30.0).sqrt());
        assert_eq!(summary.std_dev_percentage, summary.std_dev / 255.0 * 100.0);
    }

    #[test]
    fn test_identical_samples() {
        let summary = aggregate(&[1.0; 50], &TrimParams::default()).unwrap();
        assert_eq!(summary.mean, 1.0);
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.std_dev_percentage, 0.0);
        assert_eq!(summary.valid_runs, 30);
    }

    #[test]
    fn test_all_zero_samples() {
        let summary = aggregate(&[0.0; 10], &TrimParams::default()).unwrap();
        assert_eq!(summary.mean, 0.0);
        assert_eq!(summary.std_dev_percentage, 0.0);
    }

    #[test]
    fn test_single_extreme_outlier_excluded() {
        // Tight cluster with one straggler at 1000x the median. With no
        // fixed-fraction trimming only the fence can remove it.
        let mut samples: Vec<f64> = (0..20).map(|i| 100.0 + (i % 5) as f64).collect();
        samples[7] = 102_000.0;
        let params = TrimParams::new(0.0, 1.5).unwrap();

        let summary = aggregate(&samples, &params).unwrap();
        assert_eq!(summary.outliers_removed, 1);
        assert_eq!(summary.valid_runs, 19);
        assert!(summary.mean < 105.0);
    }

    #[test]
    fn test_empty_aggregate() {
        let samples: Vec<f64> = (1..=50).map(|i| (i * 10) as f64).collect();
        let params = TrimParams::new(0.2, -1.0).unwrap();

        let err = aggregate(&samples, &params).unwrap_err();
        assert_eq!(
            err,
            StatsError::EmptyAggregate {
                lower: 330.0,
                upper: 180.0
            }
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            aggregate(&[], &TrimParams::default()).unwrap_err(),
            StatsError::EmptyWindow { runs: 0 }
        );
    }

    #[test]
    fn test_nan_rejected() {
        let err = aggregate(&[1.0, f64::NAN, 2.0], &TrimParams::default()).unwrap_err();
        assert_eq!(err, StatsError::InvalidSample { index: 1 });
    }

    #[test]
    fn test_negative_rejected() {
        let err = aggregate(&[-1.0, -2.0, -3.0], &TrimParams::default()).unwrap_err();
        assert_eq!(err, StatsError::InvalidSample { index: 0 });

        let err = aggregate(&[4.0, 5.0, -0.5, 6.0], &TrimParams::default()).unwrap_err();
        assert_eq!(err, StatsError::InvalidSample { index: 2 });

        // negative zero compares equal to zero
        assert!(aggregate(&[-0.0, 0.0, 1.0], &TrimParams::default()).is_ok());
    }

    #[test]
    fn test_order_does_not_matter() {
        let ascending: Vec<f64> = (1..=50).map(|i| (i * 10) as f64).collect();
        let mut shuffled = ascending.clone();
        shuffled.reverse();
        shuffled.swap(3, 41);

        assert_eq!(
            aggregate(&ascending, &TrimParams::default()).unwrap(),
            aggregate(&shuffled, &TrimParams::default()).unwrap()
        );
    }

    #[test]
    fn test_relative_std_dev_zero_mean() {
        assert_eq!(relative_std_dev(0.0, 0.0), 0.0);
        assert_eq!(relative_std_dev(0.0, 1.0), f64::INFINITY);
        assert_eq!(relative_std_dev(50.0, 5.0), 10.0);
    }
}
