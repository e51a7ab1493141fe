//! Interquartile-range fence over the central window.
//!
//! Quartiles are read at fixed positions of the full sorted array (see
//! [`TrimWindow::q1_index`]) rather than interpolated, so reported numbers stay
//! comparable with earlier measurement campaigns.

use serde::{Deserialize, Serialize};

use super::window::TrimWindow;

/// Acceptance interval `[Q1 - k*IQR, Q3 + k*IQR]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fence {
    /// First quartile
    pub q1: f64,
    /// Third quartile
    pub q3: f64,
    /// Interquartile range (Q3 - Q1)
    pub iqr: f64,
    /// Lower bound (Q1 - k*IQR)
    pub lower: f64,
    /// Upper bound (Q3 + k*IQR)
    pub upper: f64,
}

impl Fence {
    /// Build the fence for `window` over an ascending `sorted` array.
    ///
    /// Returns `None` when the window is empty or does not fit `sorted`.
    pub fn detect(sorted: &[f64], window: &TrimWindow, multiplier: f64) -> Option<Self> {
        if window.is_empty() || window.runs != sorted.len() {
            return None;
        }

        let q1 = sorted[window.q1_index()];
        let q3 = sorted[window.q3_index()];
        let iqr = q3 - q1;

        Some(Fence {
            q1,
            q3,
            iqr,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    /// Inclusive on both bounds.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::TrimParams;

    fn ascending(n: usize) -> Vec<f64> {
        (1..=n).map(|i| (i * 10) as f64).collect()
    }

    #[test]
    fn test_reference_fence() {
        let sorted = ascending(50);
        let window = TrimWindow::new(50, &TrimParams::default());
        let fence = Fence::detect(&sorted, &window, 1.5).unwrap();

        assert_eq!(fence.q1, 180.0);
        assert_eq!(fence.q3, 330.0);
        assert_eq!(fence.iqr, 150.0);
        assert_eq!(fence.lower, -45.0);
        assert_eq!(fence.upper, 555.0);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let fence = Fence {
            q1: 2.0,
            q3: 4.0,
            iqr: 2.0,
            lower: -1.0,
            upper: 7.0,
        };
        assert!(fence.contains(-1.0));
        assert!(fence.contains(7.0));
        assert!(!fence.contains(7.000001));
        assert!(!fence.contains(-1.000001));
    }

    #[test]
    fn test_empty_window() {
        let window = TrimWindow::new(0, &TrimParams::default());
        assert!(Fence::detect(&[], &window, 1.5).is_none());
    }

    #[test]
    fn test_mismatched_window() {
        let window = TrimWindow::new(10, &TrimParams::default());
        assert!(Fence::detect(&ascending(5), &window, 1.5).is_none());
    }

    #[test]
    fn test_negative_multiplier_inverts_fence() {
        let sorted = ascending(50);
        let window = TrimWindow::new(50, &TrimParams::default());
        let fence = Fence::detect(&sorted, &window, -1.0).unwrap();

        assert!(fence.lower > fence.upper);
        assert!(!fence.contains(fence.q1));
    }
}
