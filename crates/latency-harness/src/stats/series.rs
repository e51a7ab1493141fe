//! Plot series of the central window.

use serde::{Deserialize, Serialize};

use super::{check_samples, sorted_copy};
use super::window::{TrimParams, TrimWindow};
use crate::error::StatsError;

/// Which values are drawn against the run numbers of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotOrder {
    /// Ascending window values.
    #[default]
    Sorted,
    /// Values at window positions in the order they were measured.
    Arrival,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    /// 1-based run number
    pub run: usize,
    pub value: f64,
}

/// Points for one operation's line plot.
///
/// The IQR fence does not apply here: every window sample is plotted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSeries {
    pub order: PlotOrder,
    pub points: Vec<PlotPoint>,
}

impl PlotSeries {
    /// Build the series for `samples` given in arrival order.
    ///
    /// x runs over `ignore_runs + 1 ..= N - ignore_runs`.
    pub fn from_samples(
        samples: &[f64],
        params: &TrimParams,
        order: PlotOrder,
    ) -> Result<Self, StatsError> {
        let window = TrimWindow::new(samples.len(), params);
        if window.is_empty() {
            return Err(StatsError::EmptyWindow {
                runs: samples.len(),
            });
        }

        let values = match order {
            PlotOrder::Sorted => sorted_copy(samples)?[window.range()].to_vec(),
            PlotOrder::Arrival => {
                check_samples(samples)?;
                samples[window.range()].to_vec()
            }
        };

        let points = window
            .range()
            .zip(values)
            .map(|(index, value)| PlotPoint {
                run: index + 1,
                value,
            })
            .collect();

        Ok(Self { order, points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last run number.
    pub fn x_range(&self) -> Option<(usize, usize)> {
        Some((self.points.first()?.run, self.points.last()?.run))
    }

    pub fn max_value(&self) -> Option<f64> {
        self.points.iter().map(|p| p.value).reduce(f64::max)
    }
}
