//! # segmerge - Scan Segment Merging for Mass Spectrometry
//!
//! Some acquisition methods split the mass range of a survey scan into a fixed
//! number of consecutive "scan segments": the instrument cycles through N
//! spectra, each covering its own mass window, and then starts over. Most
//! downstream tools expect one full-range spectrum per cycle instead.
//!
//! `segmerge` rebuilds those composite spectra:
//!
//! - **Phase alignment**: the first recorded spectrum may belong to any segment,
//!   so the rotation between cycle position and segment index is detected once
//!   from its scan range.
//! - **Window filtering**: each spectrum only contributes the centroids and
//!   profile points that fall inside its own segment's `[lower, upper)` window.
//! - **Composite statistics**: base peak, total intensity, scan range and a
//!   synthetic isolation window are recomputed for every composite.
//! - **Retention reporting**: discarded centroids are tallied and a warning is
//!   raised when the retained fraction suggests misconfigured segment bounds.
//!
//! ## Quick Start
//!
//! ```rust
//! use segmerge::merge::{CollectingDiagnostics, MergeConfig, SegmentMerger};
//! use segmerge::segment::SegmentBound;
//! use segmerge::spectrum::SpectrumBuilder;
//!
//! let config = MergeConfig::new(vec![
//!     SegmentBound::new(0.0, 100.0),
//!     SegmentBound::new(100.0, 200.0),
//! ]);
//! let merger = SegmentMerger::new(config)?;
//!
//! let spectra: Vec<_> = (0..4)
//!     .map(|i| {
//!         let (low, high) = if i % 2 == 0 { (0.0, 100.0) } else { (100.0, 200.0) };
//!         SpectrumBuilder::new(i, i + 1)
//!             .scan_range(low, high)
//!             .add_centroid(50.0, 1000.0)
//!             .add_centroid(150.0, 2000.0)
//!             .build()
//!     })
//!     .collect();
//!
//! let mut diagnostics = CollectingDiagnostics::new();
//! let output = merger.merge(&spectra, &mut diagnostics);
//!
//! assert_eq!(output.spectra.len(), 2);
//! assert_eq!(output.report.statistics.centroids_kept, 4);
//! assert_eq!(output.report.statistics.centroids_discarded, 4);
//! # Ok::<(), segmerge::merge::MergeError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`spectrum`]: spectrum records, samples and a fluent builder
//! - [`segment`]: validated segment bounds
//! - [`merge`]: phase alignment, per-cycle accumulation and the run driver
//! - [`io`]: JSON and JSON Lines spectrum exchange

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod io;
pub mod merge;
pub mod segment;
pub mod spectrum;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::io::{read_spectra, write_report, write_spectra, SpectrumFormat, SpectrumIoError};
    pub use crate::merge::{
        CollectingDiagnostics, CycleError, Diagnostics, LogDiagnostics, MergeConfig, MergeError,
        MergeOutput, MergeReport, MergeSession, PhaseAligner, RunStatistics, SegmentMerger,
        SpectrumAccumulator,
    };
    pub use crate::segment::{SegmentBound, SegmentError, SegmentSet};
    pub use crate::spectrum::{
        Centroid, MassSample, Precursor, ProfilePoint, ScanEvent, Spectrum, SpectrumBuilder,
        SpectrumHeader,
    };
}
