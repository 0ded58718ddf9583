//! # segmerge
//!
//! A command-line tool for merging segmented mass spectrometry acquisitions.
//!
//! ## Usage
//!
//! ```bash
//! # Merge a three-segment run
//! segmerge merge run.jsonl --bound 100:400 --bound 400:700 --bound 700:1000
//!
//! # Generate demo data
//! segmerge demo demo_segmented_run.jsonl
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
