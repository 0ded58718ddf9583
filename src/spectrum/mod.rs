//! # Spectrum Records
//!
//! In-memory representation of a single acquisition: a header with derived
//! summary values, the scan event, the precursor record, and two ordered sample
//! sequences (centroids and profile points).
//!
//! Sample sequences keep insertion order and may contain duplicates. Nothing in
//! this crate sorts or deduplicates them.

mod builder;
mod types;


pub use builder::SpectrumBuilder;
pub use types::{Centroid, MassSample, Precursor, ProfilePoint, ScanEvent, Spectrum, SpectrumHeader};
