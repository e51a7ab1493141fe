//! Benchmark execution orchestration
//!
//! The runner walks the configured experiments in order, one algorithm at a
//! time and one call at a time. Every provider is created before the first
//! sample is taken, so a missing algorithm fails the run up front instead of
//! halfway through a campaign.
//!
//! ```text
//! Config ──► providers ──► per experiment:
//!                            keygen loop            (signature families)
//!                            sign ► verify loop     (one key, reused)
//!                            keygen ► encaps ► decaps loop   (KEMs)
//!                          ──► aggregate ──► PlotSeries ──► results
//! ```
//!
//! # Example
//!
//! ```no_run
//! use latency_harness::{BenchmarkRunner, Config};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::from_file("bench.toml")?;
//! let results = BenchmarkRunner::new().run(&config)?;
//!
//! for algorithm in &results.algorithms {
//!     for op in &algorithm.operations {
//!         println!("{} {}: {:.2}", algorithm.algorithm, op.operation, op.summary.mean);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crypto_provider::{
    provider_for, AlgorithmFamily, AlgorithmId, ArtifactSizes, CryptoProvider, Operation,
    ProviderError,
};

use crate::config::{Config, Experiment};
use crate::error::BenchError;
use crate::sampler::{OperationSamples, SampleFailure, Sampler, TimingMode};
use crate::stats::{aggregate, PlotOrder, PlotSeries, RobustSummary, TrimParams};

/// Creates the provider for an algorithm.
pub type ProviderFactory =
    Box<dyn Fn(AlgorithmId) -> Result<Box<dyn CryptoProvider>, ProviderError>>;

/// Results from a complete benchmark run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResults {
    /// Name of the benchmark suite
    pub suite_name: String,
    /// Timestamp when the benchmark started
    pub started_at: String,
    /// Total duration of the benchmark run
    pub total_duration_ms: u64,
    /// Configuration used for the run
    pub config_summary: ConfigSummary,
    /// Results for each experiment, in configuration order
    pub algorithms: Vec<AlgorithmResult>,
    /// Algorithms whose aggregation was abandoned
    pub failures: Vec<String>,
}

impl BenchmarkResults {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Summary of the configuration used
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSummary {
    /// Runs per experiment unless overridden
    pub default_runs: usize,
    /// Length of the signed message
    pub message_bytes: usize,
    pub timing: TimingMode,
    pub ignore_fraction: f64,
    pub iqr_multiplier: f64,
    pub plot_order: PlotOrder,
}

/// Results for one algorithm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmResult {
    pub algorithm: AlgorithmId,
    pub family: AlgorithmFamily,
    /// Runs per operation
    pub runs: usize,
    /// Key, signature and ciphertext sizes observed during sampling
    pub sizes: Option<ArtifactSizes>,
    /// Aggregated operations, in report order
    pub operations: Vec<OperationResult>,
    /// Why the remaining operations were not aggregated
    pub error: Option<String>,
}

impl AlgorithmResult {
    fn new(algorithm: AlgorithmId, runs: usize) -> Self {
        Self {
            algorithm,
            family: algorithm.family(),
            runs,
            sizes: None,
            operations: Vec::new(),
            error: None,
        }
    }

    pub fn operation(&self, operation: Operation) -> Option<&OperationResult> {
        self.operations.iter().find(|r| r.operation == operation)
    }
}

/// Summary and plot points of one operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult {
    pub operation: Operation,
    pub summary: RobustSummary,
    pub series: PlotSeries,
}

/// The benchmark runner
pub struct BenchmarkRunner {
    factory: ProviderFactory,
}

impl Default for BenchmarkRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchmarkRunner {
    /// Create a runner backed by the built-in providers.
    pub fn new() -> Self {
        Self::with_factory(provider_for)
    }

    /// Create a runner that obtains its providers from `factory`.
    ///
    /// # Example
    ///
    /// ```
    /// use crypto_provider::{provider_for, AlgorithmId, ProviderError};
    /// use latency_harness::BenchmarkRunner;
    ///
    /// let runner = BenchmarkRunner::with_factory(|algorithm| match algorithm {
    ///     AlgorithmId::Rsa4096 => Err(ProviderError::Unavailable(algorithm)),
    ///     other => provider_for(other),
    /// });
    /// # let _ = runner;
    /// ```
    pub fn with_factory<F>(factory: F) -> Self
    where
        F: Fn(AlgorithmId) -> Result<Box<dyn CryptoProvider>, ProviderError> + 'static,
    {
        Self {
            factory: Box::new(factory),
        }
    }

    /// Run every experiment of `config`.
    ///
    /// # Errors
    ///
    /// Invalid configuration, a provider that cannot be created and any
    /// failing operation abort the run. An algorithm whose fence rejects every
    /// sample is recorded in [`BenchmarkResults::failures`] instead.
    #[instrument(skip(self, config), fields(suite = %config.benchmark.name))]
    pub fn run(&self, config: &Config) -> Result<BenchmarkResults, BenchError> {
        config.validate()?;
        let params = config
            .stats
            .trim_params()
            .map_err(|e| BenchError::Config(e.to_string()))?;
        let message = config.benchmark.message()?;

        let start_time = Instant::now();
        let started_at = chrono::Utc::now().to_rfc3339();

        let providers = config
            .experiments
            .iter()
            .map(|experiment| {
                (self.factory)(experiment.algorithm).map_err(|source| BenchError::ProviderInit {
                    algorithm: experiment.algorithm,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Starting benchmark suite '{}' with {} experiments",
            config.benchmark.name,
            config.experiments.len()
        );

        let mut algorithms = Vec::with_capacity(config.experiments.len());
        let mut failures = Vec::new();

        for (experiment, provider) in config.experiments.iter().zip(&providers) {
            let result =
                self.run_experiment(config, &params, experiment, provider.as_ref(), &message)?;
            if let Some(error) = &result.error {
                failures.push(format!("{}: {}", experiment.algorithm, error));
            }
            algorithms.push(result);
        }

        let results = BenchmarkResults {
            suite_name: config.benchmark.name.clone(),
            started_at,
            total_duration_ms: start_time.elapsed().as_millis() as u64,
            config_summary: ConfigSummary {
                default_runs: config.benchmark.runs,
                message_bytes: message.len(),
                timing: config.benchmark.timing,
                ignore_fraction: params.ignore_fraction(),
                iqr_multiplier: params.iqr_multiplier(),
                plot_order: config.stats.plot_order,
            },
            algorithms,
            failures,
        };

        if results.passed() {
            info!(
                "Benchmark suite '{}' completed in {}ms",
                results.suite_name, results.total_duration_ms
            );
        } else {
            warn!(
                "Benchmark suite '{}' completed with {} failures",
                results.suite_name,
                results.failures.len()
            );
        }

        Ok(results)
    }

    #[instrument(skip_all, fields(algorithm = %experiment.algorithm))]
    fn run_experiment(
        &self,
        config: &Config,
        params: &TrimParams,
        experiment: &Experiment,
        provider: &dyn CryptoProvider,
        message: &[u8],
    ) -> Result<AlgorithmResult, BenchError> {
        let runs = experiment.runs(&config.benchmark);
        let operations = experiment.operations();
        let order = config.stats.plot_order;
        let sampler = Sampler::new(experiment.algorithm, config.benchmark.timing);
        let mut result = AlgorithmResult::new(experiment.algorithm, runs);

        info!(runs, ?operations, "Running experiment");

        if result.family.is_kem() {
            let buffers = sample_kem(&sampler, provider, runs, &operations, &mut result.sizes)?;
            summarise_stage(&mut result, buffers, params, order)?;
            return Ok(result);
        }

        if operations.contains(&Operation::Keygen) {
            let values = sample_keygen(&sampler, provider, runs, &mut result.sizes)?;
            let buffers = vec![OperationSamples {
                operation: Operation::Keygen,
                values,
            }];
            if !summarise_stage(&mut result, buffers, params, order)? {
                return Ok(result);
            }
        }

        let signature_ops: Vec<Operation> = operations
            .iter()
            .copied()
            .filter(|op| matches!(op, Operation::Sign | Operation::Verify))
            .collect();
        if !signature_ops.is_empty() {
            let buffers = sample_signatures(
                &sampler,
                provider,
                runs,
                &signature_ops,
                message,
                &mut result.sizes,
            )?;
            summarise_stage(&mut result, buffers, params, order)?;
        }

        Ok(result)
    }
}

/// A fresh key pair per run.
fn sample_keygen(
    sampler: &Sampler,
    provider: &dyn CryptoProvider,
    runs: usize,
    sizes: &mut Option<ArtifactSizes>,
) -> Result<Vec<f64>, BenchError> {
    sampler.sample(Operation::Keygen, runs, |_| {
        let timed = provider.generate_keypair()?;
        if sizes.is_none() {
            *sizes = Some(provider.key_sizes(&timed.value)?.into());
        }
        Ok(timed)
    })
}

/// Sign the message and verify the signature with one key pair per run.
fn sample_signatures(
    sampler: &Sampler,
    provider: &dyn CryptoProvider,
    runs: usize,
    operations: &[Operation],
    message: &[u8],
    sizes: &mut Option<ArtifactSizes>,
) -> Result<Vec<OperationSamples>, BenchError> {
    let algorithm = provider.algorithm();
    let setup_failure = |source| BenchError::OperationFailure {
        algorithm,
        operation: Operation::Keygen,
        run: 0,
        source,
    };

    // Not part of any sample.
    let key = provider.generate_keypair().map_err(setup_failure)?.value;
    let key_sizes = provider.key_sizes(&key).map_err(setup_failure)?;
    debug!(message_bytes = message.len(), "Signing key ready");

    let mut signature_len = None;
    let buffers = sampler.sample_interleaved(runs, operations, |_, recorder| {
        let signature = recorder.record(Operation::Sign, provider.sign(&key, message))?;
        let verified =
            recorder.record(Operation::Verify, provider.verify(&key, message, &signature))?;
        if !verified {
            return Err(SampleFailure::new(
                Operation::Verify,
                ProviderError::failed(algorithm, Operation::Verify, "signature did not verify"),
            ));
        }
        signature_len = Some(signature.len());
        Ok(())
    })?;

    sizes.get_or_insert_with(|| key_sizes.into()).signature = signature_len;
    Ok(buffers)
}

/// Key generation, encapsulation and decapsulation back to back per run.
fn sample_kem(
    sampler: &Sampler,
    provider: &dyn CryptoProvider,
    runs: usize,
    operations: &[Operation],
    sizes: &mut Option<ArtifactSizes>,
) -> Result<Vec<OperationSamples>, BenchError> {
    let algorithm = provider.algorithm();
    let mut last = None;

    let buffers = sampler.sample_interleaved(runs, operations, |_, recorder| {
        let key = recorder.record(Operation::Keygen, provider.generate_keypair())?;
        let encapsulation = recorder.record(Operation::Encapsulate, provider.encapsulate(&key))?;
        let shared_secret = recorder.record(
            Operation::Decapsulate,
            provider.decapsulate(&key, &encapsulation.ciphertext),
        )?;
        if shared_secret != encapsulation.shared_secret {
            return Err(SampleFailure::new(
                Operation::Decapsulate,
                ProviderError::failed(algorithm, Operation::Decapsulate, "shared secret mismatch"),
            ));
        }

        let key_sizes = provider
            .key_sizes(&key)
            .map_err(|source| SampleFailure::new(Operation::Keygen, source))?;
        last = Some((key_sizes, encapsulation));
        Ok(())
    })?;

    if let Some((key_sizes, encapsulation)) = last {
        let mut artifacts = ArtifactSizes::from(key_sizes);
        artifacts.ciphertext = Some(encapsulation.ciphertext.len());
        artifacts.shared_secret = Some(encapsulation.shared_secret.as_bytes().len());
        *sizes = Some(artifacts);
    }
    Ok(buffers)
}

/// Aggregate the buffers of one workflow into `result`.
///
/// Returns `Ok(false)` when an empty aggregate ended the algorithm.
fn summarise_stage(
    result: &mut AlgorithmResult,
    buffers: Vec<OperationSamples>,
    params: &TrimParams,
    order: PlotOrder,
) -> Result<bool, BenchError> {
    for buffer in buffers {
        match summarise(result.algorithm, &buffer, params, order) {
            Ok(operation) => result.operations.push(operation),
            Err(err) if err.is_recoverable() => {
                warn!(algorithm = %result.algorithm, operation = %buffer.operation, "{}", err);
                result.error = Some(err.to_string());
                return Ok(false);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(true)
}

fn summarise(
    algorithm: AlgorithmId,
    samples: &OperationSamples,
    params: &TrimParams,
    order: PlotOrder,
) -> Result<OperationResult, BenchError> {
    let operation = samples.operation;
    let stats_error = |source| BenchError::from_stats(algorithm, operation, source);

    let summary = aggregate(&samples.values, params).map_err(stats_error)?;
    let series = PlotSeries::from_samples(&samples.values, params, order).map_err(stats_error)?;

    info!(
        %operation,
        mean = summary.mean,
        std_dev = summary.std_dev,
        valid_runs = summary.valid_runs,
        outliers = summary.outliers_removed,
        "Aggregated"
    );

    Ok(OperationResult {
        operation,
        summary,
        series,
    })
}
