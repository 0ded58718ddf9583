use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use segmerge::merge::MergeConfig;
use segmerge::segment::SegmentBound;

mod config;
mod demo;
mod inspect;
mod merge;

/// segmerge - Scan Segment Merger for segmented mass spectrometry acquisitions
#[derive(Parser)]
#[command(name = "segmerge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Merge behaviour preset, refined by the other flags.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum PresetArg {
    /// Detect the phase from the first spectrum, warn below 98% retention
    #[default]
    AutoAligned,
    /// Assume the run starts on segment 0, warn below 90% retention
    FixedOrder,
}

impl PresetArg {
    fn base_config(self) -> MergeConfig {
        match self {
            PresetArg::AutoAligned => MergeConfig::auto_aligned(Vec::new()),
            PresetArg::FixedOrder => MergeConfig::fixed_order(Vec::new()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Merge segmented spectra into one composite spectrum per cycle
    Merge(MergeArgs),

    /// Generate a synthetic segmented acquisition for testing
    Demo {
        /// Output spectrum file (.json, .jsonl or .ndjson)
        #[arg(value_name = "OUTPUT", default_value = "demo_segmented_run.jsonl")]
        output: PathBuf,

        /// Number of segments per cycle
        #[arg(short = 's', long, default_value = "3")]
        segments: usize,

        /// Number of cycles to generate
        #[arg(short = 'c', long, default_value = "100")]
        cycles: usize,

        /// Segment the acquisition starts on
        #[arg(short = 'p', long, default_value = "0")]
        phase: usize,
    },

    /// Display a summary of a spectrum file
    Inspect {
        /// Input spectrum file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Arguments of the merge command
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Input spectrum file (.json, .jsonl or .ndjson)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output spectrum file (defaults to <stem>.merged.json)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// TOML configuration file with a [merge] table
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Behaviour preset
    #[arg(long, default_value = "auto-aligned", value_enum)]
    pub preset: PresetArg,

    /// Segments per cycle (defaults to the number of bounds)
    #[arg(short = 'n', long = "segments", value_name = "N")]
    pub segment_count: Option<usize>,

    /// Segment window, repeat once per segment in acquisition order
    #[arg(short = 'b', long = "bound", value_name = "LOWER:UPPER")]
    pub bounds: Vec<SegmentBound>,

    /// Detect the starting segment from the first spectrum
    #[arg(long, overrides_with = "no_align")]
    pub align: bool,

    /// Assume the run starts on the first segment
    #[arg(long, overrides_with = "align")]
    pub no_align: bool,

    /// Retention fraction below which a warning is raised
    #[arg(short = 't', long, value_name = "F")]
    pub threshold: Option<f64>,

    /// Emit a composite for a trailing partial cycle instead of dropping it
    #[arg(long)]
    pub flush_partial: bool,

    /// Warn when a cycle does not start on the expected segment
    #[arg(long)]
    pub verify_order: bool,

    /// Write the run report as JSON
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

impl MergeArgs {
    /// Phase alignment requested on the command line, if any
    pub fn align_override(&self) -> Option<bool> {
        match (self.align, self.no_align) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Merge(args) => merge::run(args),
        Commands::Demo {
            output,
            segments,
            cycles,
            phase,
        } => demo::run(output, segments, cycles, phase),
        Commands::Inspect { file } => inspect::run(file),
    }
}
