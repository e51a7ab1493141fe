//! Latency benchmarking for classical and post-quantum cryptography
//!
//! This crate measures key generation, signing, verification, encapsulation
//! and decapsulation latencies through the providers of `crypto-provider` and
//! summarises each operation with a trimmed, IQR-fenced mean.
//!
//! # Features
//!
//! - **Sequential sampling**: one call at a time, wall-clock or cycle estimates
//! - **Robust statistics**: fixed-fraction trimming plus an IQR fence
//! - **Plots**: one SVG line plot per algorithm and operation
//! - **Output Formats**: Console tables and JSON
//!
//! # Example
//!
//! ```no_run
//! use latency_harness::{BenchmarkRunner, Config, OutputFormat, PlotWriter, Reporter};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::from_file("bench.toml")?;
//!
//! let results = BenchmarkRunner::new().run(&config)?;
//!
//! Reporter::new(OutputFormat::Console).report(&results)?;
//! PlotWriter::new(&config.benchmark.output_dir, config.benchmark.timing).write_all(&results)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [benchmark]
//! name = "PQ vs classical latency"
//! runs = 50
//! timing = { mode = "wall" }
//!
//! [stats]
//! ignore_fraction = 0.2
//! iqr_multiplier = 1.5
//!
//! [[experiments]]
//! algorithm = "falcon512"
//! operations = ["keygen", "signing", "verifying"]
//! runs = 350
//! ```

pub mod config;
pub mod error;
pub mod plot;
pub mod reporter;
pub mod runner;
pub mod sampler;
pub mod stats;

// Re-export main types for convenience
pub use config::Config;
pub use error::{BenchError, StatsError};
pub use plot::PlotWriter;
pub use reporter::{OutputFormat, Reporter};
pub use runner::{AlgorithmResult, BenchmarkResults, BenchmarkRunner, OperationResult};
pub use sampler::{Sampler, TimingMode};
