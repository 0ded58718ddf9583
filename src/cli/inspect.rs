use anyhow::{Context, Result};
use std::path::PathBuf;

use segmerge::io::read_spectra;
use segmerge::spectrum::Spectrum;

/// Distinct scan ranges, in order of first appearance, with their spectrum counts
fn scan_range_histogram(spectra: &[Spectrum]) -> Vec<((f64, f64), usize)> {
    let mut ranges: Vec<((f64, f64), usize)> = Vec::new();
    for spectrum in spectra {
        let range = spectrum.scan_range();
        match ranges.iter_mut().find(|(r, _)| *r == range) {
            Some((_, count)) => *count += 1,
            None => ranges.push((range, 1)),
        }
    }
    ranges
}

/// Display a summary of a spectrum file
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let spectra = read_spectra(&file)
        .with_context(|| format!("Failed to read spectra from {}", file.display()))?;

    println!("Spectrum File Information");
    println!("=========================");
    println!("File: {}", file.display());
    println!();

    let centroids: usize = spectra.iter().map(|s| s.centroid_count()).sum();
    let profile: usize = spectra.iter().map(|s| s.profile_count()).sum();
    let invalid = spectra.iter().filter(|s| !s.is_valid()).count();

    println!("Statistics:");
    println!("  Spectra: {}", spectra.len());
    println!("  Centroids: {}", centroids);
    println!("  Profile points: {}", profile);
    if invalid > 0 {
        println!("  Invalid headers: {}", invalid);
    }

    if let (Some(first), Some(last)) = (spectra.first(), spectra.last()) {
        println!(
            "  Retention time: {:.2} - {:.2} s",
            first.header.retention_time, last.header.retention_time
        );

        let low = spectra
            .iter()
            .map(|s| s.header.low_position)
            .fold(f64::INFINITY, f64::min);
        let high = spectra
            .iter()
            .map(|s| s.header.high_position)
            .fold(f64::NEG_INFINITY, f64::max);
        println!("  Mass extent: [{}, {})", low, high);
    }
    println!();

    let ranges = scan_range_histogram(&spectra);
    println!("Scan Ranges ({} distinct):", ranges.len());
    for ((low, high), count) in ranges {
        println!("  [{}, {}): {} spectra", low, high, count);
    }

    Ok(())
}
