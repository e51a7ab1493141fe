//! Benchmark result reporting
//!
//! # Output Formats
//!
//! - **Console**: Human-readable tables, one block per algorithm
//! - **JSON**: Machine-readable serialisation of [`BenchmarkResults`]
//!
//! # Example
//!
//! ```no_run
//! use latency_harness::reporter::{OutputFormat, Reporter};
//! use latency_harness::runner::BenchmarkResults;
//!
//! # fn example(results: BenchmarkResults) -> anyhow::Result<()> {
//! Reporter::new(OutputFormat::Console).report(&results)?;
//!
//! Reporter::new(OutputFormat::JsonPretty).write_to_file(&results, "results.json")?;
//! # Ok(())
//! # }
//! ```

mod console;
mod json;

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::runner::BenchmarkResults;

pub use console::ConsoleReporter;
pub use json::JsonReporter;

/// Output format for benchmark results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON format for machine parsing
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Console tables
    #[default]
    Console,
}

/// Reporter for benchmark results
#[derive(Debug, Default)]
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Report results to stdout
    pub fn report(&self, results: &BenchmarkResults) -> Result<()> {
        let output = self.format_results(results)?;
        print!("{}", output);
        io::stdout().flush()?;
        Ok(())
    }

    /// Write results to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, results: &BenchmarkResults, path: P) -> Result<()> {
        let path = path.as_ref();
        let output = self.format_results(results)?;
        fs::write(path, output)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }

    /// Format results as a string
    pub fn format_results(&self, results: &BenchmarkResults) -> Result<String> {
        match self.format {
            OutputFormat::Json => JsonReporter::format(results, false),
            OutputFormat::JsonPretty => JsonReporter::format(results, true),
            OutputFormat::Console => ConsoleReporter::format(results),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crypto_provider::{AlgorithmFamily, AlgorithmId, ArtifactSizes, Operation};

    use crate::runner::{AlgorithmResult, BenchmarkResults, ConfigSummary, OperationResult};
    use crate::sampler::TimingMode;
    use crate::stats::{aggregate, PlotOrder, PlotSeries, TrimParams};

    fn operation(operation: Operation, scale: f64) -> OperationResult {
        let samples: Vec<f64> = (1..=50).map(|i| i as f64 * scale).collect();
        let params = TrimParams::default();
        OperationResult {
            operation,
            summary: aggregate(&samples, &params).unwrap(),
            series: PlotSeries::from_samples(&samples, &params, PlotOrder::Sorted).unwrap(),
        }
    }

    pub(crate) fn results() -> BenchmarkResults {
        BenchmarkResults {
            suite_name: "Test Suite".to_string(),
            started_at: "2024-01-01T00:00:00Z".to_string(),
            total_duration_ms: 1500,
            config_summary: ConfigSummary {
                default_runs: 50,
                message_bytes: 1024,
                timing: TimingMode::Wall,
                ignore_fraction: 0.2,
                iqr_multiplier: 1.5,
                plot_order: PlotOrder::Sorted,
            },
            algorithms: vec![
                AlgorithmResult {
                    algorithm: AlgorithmId::Dilithium2,
                    family: AlgorithmFamily::Dilithium,
                    runs: 50,
                    sizes: Some(ArtifactSizes {
                        public_key: 1312,
                        secret_key: 2560,
                        signature: Some(2420),
                        ciphertext: None,
                        shared_secret: None,
                    }),
                    operations: vec![
                        operation(Operation::Keygen, 10.0),
                        operation(Operation::Sign, 20.0),
                        operation(Operation::Verify, 5.0),
                    ],
                    error: None,
                },
                AlgorithmResult {
                    algorithm: AlgorithmId::Kyber512,
                    family: AlgorithmFamily::Kyber,
                    runs: 50,
                    sizes: None,
                    operations: vec![operation(Operation::Keygen, 3.0)],
                    error: Some("kyber512 encapsulation: no valid runs".to_string()),
                },
            ],
            failures: vec!["kyber512: kyber512 encapsulation: no valid runs".to_string()],
        }
    }
}
