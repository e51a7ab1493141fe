//! Console reporter for benchmark results
//!
//! Provides human-readable output with box-drawn tables, one per algorithm.

use anyhow::Result;
use std::fmt::Write;

use crypto_provider::ArtifactSizes;

use crate::runner::{AlgorithmResult, BenchmarkResults, OperationResult};
use crate::sampler::TimingMode;

/// Inner widths of the operation table columns.
const COLUMNS: [usize; 6] = [15, 14, 14, 10, 9, 10];

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Format benchmark results for console output
    pub fn format(results: &BenchmarkResults) -> Result<String> {
        let mut output = String::new();
        let summary = &results.config_summary;

        // Header
        writeln!(output)?;
        writeln!(output, "╔══════════════════════════════════════════════════════════════╗")?;
        writeln!(output, "║                    CRYPTO LATENCY RESULTS                    ║")?;
        writeln!(output, "╚══════════════════════════════════════════════════════════════╝")?;
        writeln!(output)?;

        writeln!(output, "Suite:     {}", results.suite_name)?;
        writeln!(output, "Started:   {}", results.started_at)?;
        writeln!(output, "Duration:  {}ms", results.total_duration_ms)?;
        writeln!(output)?;

        writeln!(output, "Configuration:")?;
        writeln!(output, "  Default Runs:     {}", summary.default_runs)?;
        writeln!(output, "  Message Size:     {} bytes", summary.message_bytes)?;
        writeln!(output, "  Timing:           {}", describe_timing(&summary.timing))?;
        writeln!(output, "  Ignore Fraction:  {} per tail", summary.ignore_fraction)?;
        writeln!(output, "  IQR Multiplier:   {}", summary.iqr_multiplier)?;
        writeln!(output)?;

        for algorithm in &results.algorithms {
            Self::format_algorithm(&mut output, algorithm, summary.timing.unit())?;
        }

        writeln!(output)?;
        writeln!(output, "────────────────────────────────────────────────────────────────")?;
        if results.passed() {
            writeln!(output, "All {} algorithms aggregated ✓", results.algorithms.len())?;
        } else {
            writeln!(output, "Aggregation failures:")?;
            for failure in &results.failures {
                writeln!(output, "  • {}", failure)?;
            }
        }

        writeln!(output)?;
        Ok(output)
    }

    fn format_algorithm(output: &mut String, result: &AlgorithmResult, unit: &str) -> Result<()> {
        let status = if result.error.is_none() { "✓" } else { "✗" };

        writeln!(output, "────────────────────────────────────────────────────────────────")?;
        writeln!(output, "Algorithm: {} ({}) {}", result.algorithm, result.family, status)?;
        writeln!(output, "────────────────────────────────────────────────────────────────")?;
        writeln!(output)?;

        writeln!(output, "  Runs:   {}", result.runs)?;
        if let Some(sizes) = &result.sizes {
            writeln!(output, "  Sizes:  {}", describe_sizes(sizes))?;
        }
        writeln!(output)?;

        if !result.operations.is_empty() {
            writeln!(output, "  {}", rule('┌', '┬', '┐'))?;
            writeln!(
                output,
                "  │ {:<13} │ {:>12} │ {:>12} │ {:>8} │ {:>7} │ {:>8} │",
                "Operation",
                format!("Mean ({})", unit),
                format!("StdDev ({})", unit),
                "StdDev %",
                "Valid",
                "Outliers"
            )?;
            writeln!(output, "  {}", rule('├', '┼', '┤'))?;
            for operation in &result.operations {
                Self::format_operation_row(output, operation)?;
            }
            writeln!(output, "  {}", rule('└', '┴', '┘'))?;
            writeln!(output)?;
        }

        if let Some(error) = &result.error {
            writeln!(output, "  ✗ {}", error)?;
            writeln!(output)?;
        }

        Ok(())
    }

    fn format_operation_row(output: &mut String, result: &OperationResult) -> Result<()> {
        let summary = &result.summary;
        writeln!(
            output,
            "  │ {:<13} │ {:>12.2} │ {:>12.2} │ {:>7.2}% │ {:>7} │ {:>8} │",
            result.operation.name(),
            summary.mean,
            summary.std_dev,
            summary.std_dev_percentage,
            format!("{}/{}", summary.valid_runs, summary.window.effective_runs),
            summary.outliers_removed
        )?;
        Ok(())
    }
}

fn rule(left: char, middle: char, right: char) -> String {
    let segments: Vec<String> = COLUMNS.iter().map(|&w| "─".repeat(w)).collect();
    format!("{}{}{}", left, segments.join(&middle.to_string()), right)
}

fn describe_timing(timing: &TimingMode) -> String {
    match timing {
        TimingMode::Wall => "wall clock (µs)".to_string(),
        TimingMode::Cycles { cpu_frequency_hz } => {
            format!("estimated cycles at {:.2} GHz", cpu_frequency_hz / 1e9)
        }
    }
}

fn describe_sizes(sizes: &ArtifactSizes) -> String {
    let mut parts = vec![
        format!("public key {} B", sizes.public_key),
        format!("secret key {} B", sizes.secret_key),
    ];
    if let Some(signature) = sizes.signature {
        parts.push(format!("signature {} B", signature));
    }
    if let Some(ciphertext) = sizes.ciphertext {
        parts.push(format!("ciphertext {} B", ciphertext));
    }
    if let Some(shared_secret) = sizes.shared_secret {
        parts.push(format!("shared secret {} B", shared_secret));
    }
    parts.join(", ")
}
