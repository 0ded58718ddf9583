use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

use segmerge::io::{read_spectra, write_report, write_spectra};
use segmerge::merge::{CollectingDiagnostics, SegmentMerger};

use super::config::{Config, MergeSettings};
use super::MergeArgs;

/// Merge a segmented spectrum file
pub fn run(args: MergeArgs) -> Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input));

    let file_config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let mut config = args.preset.base_config();
    file_config.merge.apply_to(&mut config);
    overrides(&args).apply_to(&mut config);

    let merger = SegmentMerger::new(config).context("Invalid merge configuration")?;

    info!("segmerge - Scan Segment Merge");
    info!("=============================");
    info!("Input:  {}", args.input.display());
    info!("Output: {}", output.display());
    for (index, bound) in merger.segments().iter().enumerate() {
        info!("Segment {}: {}", index, bound);
    }
    for (low, high) in merger.segments().gaps() {
        info!("No segment covers [{}, {}); samples there are discarded", low, high);
    }

    let spectra = read_spectra(&args.input)
        .with_context(|| format!("Failed to read spectra from {}", args.input.display()))?;

    let mut diagnostics = CollectingDiagnostics::forwarding();
    let merged = merger.merge(&spectra, &mut diagnostics);

    write_spectra(&output, &merged.spectra)
        .with_context(|| format!("Failed to write spectra to {}", output.display()))?;

    let report = merged.report.with_warnings(diagnostics.warnings);
    if let Some(path) = &args.report {
        write_report(path, &report)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    Ok(())
}

/// Command-line flags as settings layered over the config file
fn overrides(args: &MergeArgs) -> MergeSettings {
    MergeSettings {
        segment_count: args.segment_count,
        segments: (!args.bounds.is_empty()).then(|| args.bounds.clone()),
        auto_align_phase: args.align_override(),
        retention_warning_threshold: args.threshold,
        flush_trailing_partial_cycle: args.flush_partial.then_some(true),
        verify_segment_order: args.verify_order.then_some(true),
        progress_checkpoints: None,
    }
}

/// `<dir>/<stem>.merged.json` next to the input
fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}.merged.json", stem))
}
