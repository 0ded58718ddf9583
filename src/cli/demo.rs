use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use segmerge::io::write_spectra;
use segmerge::segment::{SegmentBound, MAX_SEGMENT_SLOTS, MIN_SEGMENT_COUNT};
use segmerge::spectrum::{Spectrum, SpectrumBuilder};

const MASS_RANGE: (f64, f64) = (200.0, 2000.0);

/// How far an instrument scan overshoots its segment on each side
const SCAN_MARGIN: f64 = 2.0;

const PEAKS_PER_SEGMENT: usize = 60;
const PROFILE_POINTS_PER_PEAK: usize = 5;

/// Generate a synthetic segmented acquisition
pub fn run(output: PathBuf, segments: usize, cycles: usize, phase: usize) -> Result<()> {
    if !(MIN_SEGMENT_COUNT..=MAX_SEGMENT_SLOTS).contains(&segments) {
        anyhow::bail!(
            "Segment count must be between {} and {}, got {}",
            MIN_SEGMENT_COUNT,
            MAX_SEGMENT_SLOTS,
            segments
        );
    }
    if phase >= segments {
        anyhow::bail!("Phase {} is out of range for {} segments", phase, segments);
    }

    info!("segmerge - Segmented Acquisition Demo");
    info!("=====================================");

    let bounds = demo_bounds(segments);
    let spectra = generate_segmented_run(&bounds, cycles, phase);

    info!(
        "Writing {} spectra ({} centroids) to {}",
        spectra.len(),
        spectra.iter().map(|s| s.centroid_count()).sum::<usize>(),
        output.display()
    );
    write_spectra(&output, &spectra)
        .with_context(|| format!("Failed to write demo spectra to {}", output.display()))?;

    let flags: Vec<String> = bounds
        .iter()
        .map(|b| format!("--bound {}:{}", b.lower, b.upper))
        .collect();
    println!("Wrote {} spectra to {}", spectra.len(), output.display());
    println!("Merge with:");
    println!("  segmerge merge {} {}", output.display(), flags.join(" "));

    Ok(())
}

/// Split the demo mass range into `count` equal segments
pub(crate) fn demo_bounds(count: usize) -> Vec<SegmentBound> {
    let (low, high) = MASS_RANGE;
    let width = (high - low) / count as f64;
    (0..count)
        .map(|i| {
            let lower = low + width * i as f64;
            let upper = if i + 1 == count { high } else { lower + width };
            SegmentBound::new(lower, upper)
        })
        .collect()
}

/// Spectra cycling through `bounds`, starting on segment `phase`.
///
/// Each scan overshoots its segment by [`SCAN_MARGIN`], so a few centroids
/// per spectrum fall outside the segment window.
pub(crate) fn generate_segmented_run(
    bounds: &[SegmentBound],
    cycles: usize,
    phase: usize,
) -> Vec<Spectrum> {
    let total = cycles * bounds.len();
    (0..total)
        .map(|index| {
            let bound = bounds[(index + phase) % bounds.len()];
            generate_segment_spectrum(index, bound, total)
        })
        .collect()
}

fn generate_segment_spectrum(index: usize, bound: SegmentBound, total: usize) -> Spectrum {
    let scan_low = (bound.lower - SCAN_MARGIN).max(0.0);
    let scan_high = bound.upper + SCAN_MARGIN;

    // Elution profile over the run
    let run_position = index as f64 / total.max(1) as f64;
    let elution = 1.0 - (run_position - 0.5).abs();

    let mut builder = SpectrumBuilder::new(index as i64, index as i64 + 1)
        .ms_level(1)
        .retention_time(index as f32 * 0.25)
        .polarity(1)
        .scan_range(scan_low, scan_high);

    let step = (scan_high - scan_low) / PEAKS_PER_SEGMENT as f64;
    for i in 0..PEAKS_PER_SEGMENT {
        let position = scan_low + step * (i as f64 + 0.5) + (i as f64 * 0.123).sin() * 0.01;
        let intensity = 1e5 * elution * (0.1 + (i as f64 * 0.456 + index as f64).sin().abs() * 0.9);

        builder = builder.add_centroid(position, intensity);
        for p in 0..PROFILE_POINTS_PER_PEAK {
            let offset = (p as f64 - (PROFILE_POINTS_PER_PEAK / 2) as f64) * 0.005;
            let shape = 1.0 - (offset.abs() / 0.02);
            builder = builder.add_profile_point(position + offset, intensity * shape);
        }
    }

    builder.build()
}
