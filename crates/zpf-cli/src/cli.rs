use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "zpf",
    version,
    about = "Zero-phase Butterworth low-pass filtering of CSV recordings",
    long_about = "Filters every numeric column of a CSV file forward and backward with a\n\
                  Butterworth low-pass, writing each as <column>_filt.\n\
                  Cutoff, sample rate and order come from --config or the matching flags."
)]
pub struct Cli {
    /// Input CSV file with a header row
    pub input: PathBuf,

    /// Output CSV path [default: <input stem>_filtered.csv next to the input]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON processing configuration; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Cutoff frequency in Hz
    #[arg(long)]
    pub cutoff: Option<f64>,

    /// Sampling rate of the recording in Hz
    #[arg(long)]
    pub sample_rate: Option<f64>,

    /// Filter order
    #[arg(long)]
    pub order: Option<usize>,

    /// Suffix for filtered column names
    #[arg(long)]
    pub suffix: Option<String>,

    /// Copy non-numeric columns to the output instead of dropping them
    #[arg(long)]
    pub keep_non_numeric: bool,

    /// Skip columns that cannot be filtered instead of aborting
    #[arg(long)]
    pub skip_failed: bool,

    /// Filter columns concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Write the JSON run report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
