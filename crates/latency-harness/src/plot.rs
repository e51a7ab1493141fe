//! SVG line plots of the central window
//!
//! One file per algorithm and operation, named
//! `{algorithm}_{operation}_plot.svg`, with the run number on the x axis and
//! the sample value on the y axis.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crypto_provider::{AlgorithmId, Operation};

use crate::error::BenchError;
use crate::runner::{BenchmarkResults, OperationResult};
use crate::sampler::TimingMode;
use crate::stats::PlotSeries;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const TICKS: usize = 5;

/// Headroom above the largest value.
const Y_HEADROOM: f64 = 1.1;

/// Writes plot files into one output directory.
#[derive(Debug, Clone)]
pub struct PlotWriter {
    output_dir: PathBuf,
    y_label: &'static str,
}

impl PlotWriter {
    pub fn new<P: Into<PathBuf>>(output_dir: P, timing: TimingMode) -> Self {
        Self {
            output_dir: output_dir.into(),
            y_label: timing.axis_label(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn path_for(&self, algorithm: AlgorithmId, operation: Operation) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}_plot.svg", algorithm, operation.name()))
    }

    /// Write every aggregated operation of `results`.
    pub fn write_all(&self, results: &BenchmarkResults) -> Result<Vec<PathBuf>, BenchError> {
        let mut written = Vec::new();
        for algorithm in &results.algorithms {
            for operation in &algorithm.operations {
                written.push(self.write(algorithm.algorithm, operation)?);
            }
        }
        Ok(written)
    }

    /// Write one plot, creating the output directory if needed.
    pub fn write(
        &self,
        algorithm: AlgorithmId,
        result: &OperationResult,
    ) -> Result<PathBuf, BenchError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| BenchError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let path = self.path_for(algorithm, result.operation);
        let svg = self.render(result.operation.name(), &result.series);
        fs::write(&path, svg).map_err(|source| BenchError::Io {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), points = result.series.len(), "Plot written");
        Ok(path)
    }

    /// Render `series` as a standalone SVG document.
    pub fn render(&self, title: &str, series: &PlotSeries) -> String {
        let (x_min, x_max) = series.x_range().unwrap_or((1, 1));
        let y_max = match series.max_value() {
            Some(max) if max > 0.0 => max * Y_HEADROOM,
            _ => 1.0,
        };
        let axes = Axes {
            x_min: x_min as f64,
            x_max: x_max as f64,
            y_max,
        };

        let plot_right = WIDTH - MARGIN_RIGHT;
        let plot_bottom = HEIGHT - MARGIN_BOTTOM;
        let mut svg = String::new();

        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = WIDTH,
            h = HEIGHT
        ));
        svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"18\">{}</text>\n",
            WIDTH / 2.0,
            MARGIN_TOP / 2.0 + 6.0,
            title
        ));

        // Axes
        svg.push_str(&format!(
            "<polyline points=\"{l},{t} {l},{b} {r},{b}\" fill=\"none\" stroke=\"black\"/>\n",
            l = MARGIN_LEFT,
            t = MARGIN_TOP,
            b = plot_bottom,
            r = plot_right
        ));

        for i in 0..=TICKS {
            let fraction = i as f64 / TICKS as f64;

            let value = axes.y_max * fraction;
            let y = axes.y(value);
            svg.push_str(&format!(
                "<line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#ddd\"/>\n",
                MARGIN_LEFT,
                plot_right,
                y = y
            ));
            svg.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-family=\"sans-serif\" font-size=\"11\">{}</text>\n",
                MARGIN_LEFT - 6.0,
                y + 4.0,
                tick_label(value)
            ));

            let run = (axes.x_min + (axes.x_max - axes.x_min) * fraction).round();
            svg.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"11\">{}</text>\n",
                axes.x(run),
                plot_bottom + 18.0,
                run
            ));
        }

        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"13\">Run</text>\n",
            (MARGIN_LEFT + plot_right) / 2.0,
            HEIGHT - 15.0
        ));
        svg.push_str(&format!(
            "<text x=\"20\" y=\"{y:.1}\" transform=\"rotate(-90 20 {y:.1})\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"13\">{}</text>\n",
            self.y_label,
            y = (MARGIN_TOP + plot_bottom) / 2.0
        ));

        let points: Vec<String> = series
            .points
            .iter()
            .map(|p| format!("{:.2},{:.2}", axes.x(p.run as f64), axes.y(p.value)))
            .collect();
        svg.push_str(&format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"steelblue\" stroke-width=\"1.5\"/>\n",
            points.join(" ")
        ));

        svg.push_str("</svg>\n");
        svg
    }
}

/// Data ranges mapped onto the plot area.
struct Axes {
    x_min: f64,
    x_max: f64,
    y_max: f64,
}

impl Axes {
    fn x(&self, run: f64) -> f64 {
        let width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        if self.x_max <= self.x_min {
            return MARGIN_LEFT + width / 2.0;
        }
        MARGIN_LEFT + (run - self.x_min) / (self.x_max - self.x_min) * width
    }

    fn y(&self, value: f64) -> f64 {
        let height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        HEIGHT - MARGIN_BOTTOM - value / self.y_max * height
    }
}

fn tick_label(value: f64) -> String {
    if value >= 100.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}
