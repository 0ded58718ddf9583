//! # Segment Merge
//!
//! Turns a stream of segmented spectra into one composite spectrum per cycle.
//!
//! ## Pipeline
//!
//! 1. [`SegmentMerger::new`] validates the [`MergeConfig`] once.
//! 2. The first spectrum fixes the phase ([`PhaseAligner`]): which segment the
//!    stream starts on.
//! 3. Every `segment_count`th spectrum starts a new [`SpectrumAccumulator`];
//!    each spectrum contributes only the samples inside its own segment window.
//! 4. When a cycle closes, its composite gets a recomputed header and its
//!    kept/discarded counts are folded into [`RunStatistics`].
//! 5. The run ends with a [`MergeReport`] and, when too many centroids were
//!    discarded, a single warning through the [`Diagnostics`] sink.
//!
//! A cycle whose spectra keep no centroid at all has no base peak. It is
//! skipped, reported as [`CycleError::Degenerate`] and listed in the
//! statistics.

mod accumulator;
mod config;
mod diagnostics;
mod error;
mod merger;
mod phase;
mod session;
mod stats;

#[cfg(test)]
mod tests;

pub use accumulator::{FinishedCycle, SpectrumAccumulator};
pub use config::{
    MergeConfig, DEFAULT_PROGRESS_CHECKPOINTS, DEFAULT_RETENTION_WARNING_THRESHOLD,
    FIXED_ORDER_RETENTION_WARNING_THRESHOLD,
};
pub use diagnostics::{CollectingDiagnostics, Diagnostics, LogDiagnostics, LOG_TARGET};
pub use error::{CycleError, MergeError};
pub use merger::{MergeOutput, SegmentMerger};
pub use phase::PhaseAligner;
pub use session::MergeSession;
pub use stats::{MergeReport, RunStatistics};
