//! Configuration parsing for latency experiments
//!
//! This module provides TOML-based configuration for the benchmark: the run
//! defaults, the trim parameters and the list of algorithm experiments.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crypto_provider::{AlgorithmFamily, AlgorithmId, Operation};

use crate::error::{BenchError, StatsError};
use crate::sampler::TimingMode;
use crate::stats::{PlotOrder, TrimParams, DEFAULT_IGNORE_FRACTION, DEFAULT_IQR_MULTIPLIER};

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Run-wide settings
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
    /// Trimming and fencing parameters
    #[serde(default)]
    pub stats: StatsConfig,
    /// Algorithms to measure, in report order
    #[serde(default)]
    pub experiments: Vec<Experiment>,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed
    /// - An algorithm or operation name is unknown
    ///
    /// # Example
    ///
    /// ```no_run
    /// use latency_harness::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = Config::from_file("bench.toml")?;
    /// config.validate()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use latency_harness::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let toml = r#"
    ///     [[experiments]]
    ///     algorithm = "kyber768"
    ///     operations = ["keygen", "encapsulation"]
    /// "#;
    /// let config = Config::from_str(toml)?;
    /// assert_eq!(config.benchmark.runs, 50);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    /// The experiment set of the first measurement campaign: post-quantum
    /// signatures with keygen, signing and verifying over 350 runs, classical
    /// signature key generation over 350 runs, and key exchange over 50 runs.
    pub fn default_suite() -> Self {
        let signature_ops = vec![Operation::Keygen, Operation::Sign, Operation::Verify];
        let kem_ops = vec![
            Operation::Keygen,
            Operation::Encapsulate,
            Operation::Decapsulate,
        ];

        let experiments = AlgorithmId::ALL
            .into_iter()
            .map(|algorithm| {
                let family = algorithm.family();
                let (operations, runs) = match family {
                    AlgorithmFamily::Rsa | AlgorithmFamily::Ecdsa => (vec![Operation::Keygen], 350),
                    AlgorithmFamily::Ecdh => (vec![Operation::Keygen], 50),
                    AlgorithmFamily::Kyber => (kem_ops.clone(), 50),
                    _ => (signature_ops.clone(), 350),
                };
                Experiment {
                    algorithm,
                    operations,
                    runs: Some(runs),
                }
            })
            .collect();

        Self {
            benchmark: BenchmarkConfig {
                name: "Post-quantum vs classical latency".to_string(),
                ..BenchmarkConfig::default()
            },
            stats: StatsConfig::default(),
            experiments,
        }
    }

    /// Check the settings that serde cannot.
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.experiments.is_empty() {
            return Err(BenchError::Config("no experiments configured".to_string()));
        }
        if self.benchmark.runs == 0 {
            return Err(BenchError::Config("benchmark.runs must be at least 1".to_string()));
        }
        if let TimingMode::Cycles { cpu_frequency_hz } = self.benchmark.timing {
            if !(cpu_frequency_hz.is_finite() && cpu_frequency_hz > 0.0) {
                return Err(BenchError::Config(format!(
                    "cpu_frequency_hz must be positive, got {}",
                    cpu_frequency_hz
                )));
            }
        }
        self.stats
            .trim_params()
            .map_err(|e| BenchError::Config(e.to_string()))?;

        for experiment in &self.experiments {
            if experiment.runs == Some(0) {
                return Err(BenchError::Config(format!(
                    "{}: runs must be at least 1",
                    experiment.algorithm
                )));
            }
            if let Some(operation) = experiment
                .operations
                .iter()
                .find(|op| !experiment.algorithm.supports(**op))
            {
                return Err(BenchError::Config(format!(
                    "{} ({}) does not support {}",
                    experiment.algorithm,
                    experiment.algorithm.family(),
                    operation
                )));
            }
        }

        Ok(())
    }
}

/// Run-wide benchmark settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Name of the benchmark suite
    #[serde(default = "default_name")]
    pub name: String,
    /// Runs per experiment unless overridden (default: 50)
    #[serde(default = "default_runs")]
    pub runs: usize,
    /// Size of the generated message to sign (default: 1024)
    #[serde(default = "default_message_size")]
    pub message_size: usize,
    /// Sign the contents of this file instead of a generated message
    #[serde(default)]
    pub message_file: Option<PathBuf>,
    /// Directory for plot files (default: "plots")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Wall-clock microseconds or estimated cycles
    #[serde(default)]
    pub timing: TimingMode,
}

impl BenchmarkConfig {
    /// The message signed and verified by signature experiments.
    pub fn message(&self) -> Result<Vec<u8>, BenchError> {
        match &self.message_file {
            Some(path) => fs::read(path).map_err(|source| BenchError::Io {
                path: path.clone(),
                source,
            }),
            None => Ok((0..self.message_size).map(|i| (i % 251) as u8).collect()),
        }
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            runs: default_runs(),
            message_size: default_message_size(),
            message_file: None,
            output_dir: default_output_dir(),
            timing: TimingMode::default(),
        }
    }
}

fn default_name() -> String {
    "Crypto latency".to_string()
}

fn default_runs() -> usize {
    50
}

fn default_message_size() -> usize {
    1024
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("plots")
}

/// Robust aggregation settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Fraction trimmed from each end of the sorted samples (default: 0.2)
    #[serde(default = "default_ignore_fraction")]
    pub ignore_fraction: f64,
    /// IQR fence multiplier (default: 1.5)
    #[serde(default = "default_iqr_multiplier")]
    pub iqr_multiplier: f64,
    /// Value order of the plotted window (default: sorted)
    #[serde(default)]
    pub plot_order: PlotOrder,
}

impl StatsConfig {
    pub fn trim_params(&self) -> Result<TrimParams, StatsError> {
        TrimParams::new(self.ignore_fraction, self.iqr_multiplier)
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            ignore_fraction: DEFAULT_IGNORE_FRACTION,
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            plot_order: PlotOrder::default(),
        }
    }
}

fn default_ignore_fraction() -> f64 {
    DEFAULT_IGNORE_FRACTION
}

fn default_iqr_multiplier() -> f64 {
    DEFAULT_IQR_MULTIPLIER
}

/// One algorithm and the operations measured for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub algorithm: AlgorithmId,
    /// Every operation the family supports when empty
    #[serde(default)]
    pub operations: Vec<Operation>,
    /// Overrides `benchmark.runs`
    #[serde(default)]
    pub runs: Option<usize>,
}

impl Experiment {
    /// Operations to measure, in the order reports list them.
    pub fn operations(&self) -> Vec<Operation> {
        let family = self.algorithm.family();
        Operation::ALL
            .into_iter()
            .filter(|op| family.supports(*op))
            .filter(|op| self.operations.is_empty() || self.operations.contains(op))
            .collect()
    }

    pub fn runs(&self, benchmark: &BenchmarkConfig) -> usize {
        self.runs.unwrap_or(benchmark.runs)
    }
}
