use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use tracing::{info, warn, Level};
use zpf_core::{derive_output_path, read_table_from_path, write_table_to_path, FilterSpec};
use zpf_processing::{ErrorHandling, FilterPipeline, NonNumericPolicy, ProcessingConfig};

mod cli;

use cli::Cli;

const OUTPUT_FILE_SUFFIX: &str = "_filtered";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let config = resolve_config(&cli)?;
    info!(filter = %config.filter, input = %cli.input.display(), "starting");

    let table = read_table_from_path(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let pipeline = FilterPipeline::new(config.clone())?;
    let result = if config.parallel {
        let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
        runtime.block_on(pipeline.run_concurrent(&table))?
    } else {
        pipeline.run(&table)?
    };

    if result.table.is_empty() {
        warn!("no numeric columns to write");
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| derive_output_path(&cli.input, OUTPUT_FILE_SUFFIX));
    write_table_to_path(&result.table, &output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    if let Some(path) = &cli.report {
        std::fs::write(path, result.report.to_json()?)
            .with_context(|| format!("failed to write report {}", path.display()))?;
    }

    println!("{}", output.display());
    Ok(())
}

/// Configuration file first, then flag overrides
fn resolve_config(cli: &Cli) -> Result<ProcessingConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = ProcessingConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            if let Some(cutoff) = cli.cutoff {
                config.filter.cutoff_hz = cutoff;
            }
            if let Some(rate) = cli.sample_rate {
                config.filter.sample_rate_hz = rate;
            }
            if let Some(order) = cli.order {
                config.filter.order = order;
            }
            config
        }
        None => {
            let cutoff = cli.cutoff.context("--cutoff is required without --config")?;
            let rate = cli
                .sample_rate
                .context("--sample-rate is required without --config")?;
            let order = cli.order.context("--order is required without --config")?;
            ProcessingConfig::new(FilterSpec {
                cutoff_hz: cutoff,
                sample_rate_hz: rate,
                order,
            })
        }
    };

    if let Some(suffix) = &cli.suffix {
        config.column_suffix = suffix.clone();
    }
    if cli.keep_non_numeric {
        config.non_numeric = NonNumericPolicy::PassThrough;
    }
    if cli.skip_failed {
        config.error_handling = ErrorHandling::BypassMode;
    }
    if cli.parallel {
        config.parallel = true;
    }

    config.validate()?;
    Ok(config)
}
