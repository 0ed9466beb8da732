//! Basic usage of the zero-phase low-pass filter
//!
//! Designs a filter, cleans a noisy sine and filters a small table with a
//! text column, printing the run report at the end.

use std::f64::consts::PI;
use zpf_core::{time_vector, Column, FilterSpec, Table, ZpfResult};
use zpf_processing::{
    design_lowpass, tone_amplitude, FilterPipeline, NonNumericPolicy, ProcessingConfig,
    ZeroPhaseLowpass,
};

fn main() -> ZpfResult<()> {
    println!("=== Zero-phase filtering examples ===\n");

    design_example()?;
    signal_example()?;
    table_example()?;

    println!("=== All examples completed successfully! ===");
    Ok(())
}

/// Example 1: designing a filter and inspecting its response
fn design_example() -> ZpfResult<()> {
    println!("1. Filter design");

    let spec = FilterSpec::new(8.0, 100.0, 4)?;
    let coefficients = design_lowpass(&spec)?;

    println!("   {}", spec);
    println!("   b = {:?}", coefficients.b());
    println!("   a = {:?}", coefficients.a());
    for freq in [1.0, 8.0, 16.0, 30.0] {
        println!("   |H({:>4.1} Hz)| = {:>7.2} dB", freq, coefficients.magnitude_db(freq));
    }
    println!();
    Ok(())
}

/// Example 2: removing 30 Hz noise from a 1 Hz signal
fn signal_example() -> ZpfResult<()> {
    println!("2. Noisy sine");

    let fs = 100.0;
    let t = time_vector(100, fs);
    let noisy: Vec<f64> = t
        .iter()
        .map(|t| (2.0 * PI * t).sin() + (2.0 * PI * 30.0 * t).sin())
        .collect();

    let filter = ZeroPhaseLowpass::new(&FilterSpec::new(8.0, fs, 4)?)?;
    let clean = filter.apply(&noisy)?;

    println!("   30 Hz amplitude before: {:.4}", tone_amplitude(&noisy, fs, 30.0));
    println!("   30 Hz amplitude after:  {:.4}", tone_amplitude(&clean, fs, 30.0));
    println!();
    Ok(())
}

/// Example 3: filtering every numeric column of a table
fn table_example() -> ZpfResult<()> {
    println!("3. Table");

    let fs = 100.0;
    let t = time_vector(500, fs);
    let accel: Vec<f64> = t
        .iter()
        .map(|t| (2.0 * PI * 0.5 * t).sin() + 0.2 * (2.0 * PI * 25.0 * t).sin())
        .collect();
    let phase: Vec<String> = t
        .iter()
        .map(|t| if *t < 2.5 { "rest" } else { "walk" }.to_string())
        .collect();

    let table = Table::new()
        .with_column("time", Column::Numeric(t.clone()))?
        .with_column("accel", Column::Numeric(accel))?
        .with_column("phase", Column::Text(phase))?;

    let config = ProcessingConfig::new(FilterSpec::new(8.0, fs, 4)?)
        .with_non_numeric(NonNumericPolicy::PassThrough);
    let result = FilterPipeline::new(config)?.run(&table)?;

    println!("   output columns: {:?}", result.table.names());
    println!("{}", result.report.to_json()?);
    Ok(())
}
