use latency_harness::config::Config;
use std::env;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let config_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("crates/latency-harness/experiments/signatures.toml")
    };

    println!("Validating config file: {}", config_path.display());

    let config = Config::from_file(&config_path)?;
    config.validate()?;

    println!("\n✓ Successfully parsed configuration!");
    println!("\nBenchmark: {}", config.benchmark.name);
    println!("Runs: {}", config.benchmark.runs);
    println!("Timing: {:?}", config.benchmark.timing);
    println!("Plots: {}", config.benchmark.output_dir.display());

    println!("\nStats:");
    println!("  Ignore fraction: {}", config.stats.ignore_fraction);
    println!("  IQR multiplier: {}", config.stats.iqr_multiplier);
    println!("  Plot order: {:?}", config.stats.plot_order);

    println!("\nExperiments ({}):", config.experiments.len());
    for (i, experiment) in config.experiments.iter().enumerate() {
        let operations: Vec<&str> = experiment.operations().iter().map(|op| op.name()).collect();
        println!(
            "  {}. {} ({} runs): {}",
            i + 1,
            experiment.algorithm,
            experiment.runs(&config.benchmark),
            operations.join(", ")
        );
    }

    println!("\n✓ All validations passed!");

    Ok(())
}
