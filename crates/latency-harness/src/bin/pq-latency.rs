//! pq-latency binary
//!
//! Runs the configured latency experiments, prints the console report and
//! writes one SVG plot per algorithm and operation.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use latency_harness::{BenchmarkRunner, Config, OutputFormat, PlotWriter, Reporter};

#[derive(Parser, Debug)]
#[command(name = "pq-latency")]
#[command(
    version,
    about = "Latency of classical and post-quantum signatures and key exchange"
)]
struct Args {
    /// TOML configuration; the built-in suite runs when omitted
    config: Option<PathBuf>,

    /// Also write the results as pretty-printed JSON
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Reports go to stdout, logs to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match &args.config {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            Config::from_file(path)?
        }
        None => {
            tracing::info!("No configuration given, running the default suite");
            Config::default_suite()
        }
    };
    config.validate()?;

    let results = BenchmarkRunner::new().run(&config)?;

    Reporter::new(OutputFormat::Console).report(&results)?;

    let plots = PlotWriter::new(&config.benchmark.output_dir, config.benchmark.timing)
        .write_all(&results)?;
    tracing::info!(
        "Wrote {} plots to {}",
        plots.len(),
        config.benchmark.output_dir.display()
    );

    if let Some(path) = &args.json {
        Reporter::new(OutputFormat::JsonPretty).write_to_file(&results, path)?;
        tracing::info!("Wrote JSON results to {}", path.display());
    }

    Ok(())
}
