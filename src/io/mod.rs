//! # Spectrum Files
//!
//! Reading and writing spectra as JSON.
//!
//! Two layouts are supported, chosen by file extension:
//!
//! | Extension            | Layout                                   |
//! |----------------------|------------------------------------------|
//! | `.json`              | One array holding every spectrum          |
//! | `.jsonl`, `.ndjson`  | One spectrum object per line (JSON Lines) |
//!
//! Blank lines in JSON Lines input are skipped. Merge reports are always
//! written as a single pretty-printed JSON object.

mod error;

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::merge::MergeReport;
use crate::spectrum::Spectrum;

pub use error::SpectrumIoError;

/// On-disk layout of a spectrum file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectrumFormat {
    /// A single JSON array
    Json,
    /// One JSON object per line
    JsonLines,
}

impl SpectrumFormat {
    /// Detect the layout from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, SpectrumIoError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Ok(Self::Json),
            "jsonl" | "ndjson" => Ok(Self::JsonLines),
            _ => Err(SpectrumIoError::UnsupportedFormat(
                path.display().to_string(),
            )),
        }
    }
}

/// Read every spectrum of a file, in file order
pub fn read_spectra(path: impl AsRef<Path>) -> Result<Vec<Spectrum>, SpectrumIoError> {
    let path = path.as_ref();
    let format = SpectrumFormat::from_path(path)?;
    let reader = BufReader::new(File::open(path)?);
    let spectra = read_spectra_from(reader, format)?;
    debug!("Read {} spectra from {}", spectra.len(), path.display());
    Ok(spectra)
}

/// Read spectra from any buffered reader
pub fn read_spectra_from<R: BufRead>(
    reader: R,
    format: SpectrumFormat,
) -> Result<Vec<Spectrum>, SpectrumIoError> {
    match format {
        SpectrumFormat::Json => Ok(serde_json::from_reader(reader)?),
        SpectrumFormat::JsonLines => {
            let mut spectra = Vec::new();
            for (index, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let spectrum = serde_json::from_str(&line).map_err(|source| {
                    SpectrumIoError::Line {
                        line: index + 1,
                        source,
                    }
                })?;
                spectra.push(spectrum);
            }
            Ok(spectra)
        }
    }
}

/// Write spectra to a file, layout chosen by extension
pub fn write_spectra(path: impl AsRef<Path>, spectra: &[Spectrum]) -> Result<(), SpectrumIoError> {
    let path = path.as_ref();
    let format = SpectrumFormat::from_path(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    write_spectra_to(&mut writer, spectra, format)?;
    writer.flush()?;
    debug!("Wrote {} spectra to {}", spectra.len(), path.display());
    Ok(())
}

/// Write spectra to any writer
pub fn write_spectra_to<W: Write>(
    mut writer: W,
    spectra: &[Spectrum],
    format: SpectrumFormat,
) -> Result<(), SpectrumIoError> {
    match format {
        SpectrumFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, spectra)?;
            writeln!(writer)?;
        }
        SpectrumFormat::JsonLines => {
            for spectrum in spectra {
                serde_json::to_writer(&mut writer, spectrum)?;
                writeln!(writer)?;
            }
        }
    }
    Ok(())
}

/// Write a merge report as pretty-printed JSON
pub fn write_report(path: impl AsRef<Path>, report: &MergeReport) -> Result<(), SpectrumIoError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
