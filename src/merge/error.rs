use crate::segment::SegmentError;

/// Errors that prevent a merge run from starting
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Invalid segment count or bounds
    #[error("Configuration error: {0}")]
    Segment(#[from] SegmentError),

    /// Retention warning threshold outside [0, 1]
    #[error("Configuration error: retention warning threshold must lie in [0, 1], got {0}")]
    InvalidThreshold(f64),
}

/// Recoverable problems with a single cycle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CycleError {
    /// No centroid of the cycle fell inside its segment window, so the
    /// composite has no base peak
    #[error("Cycle {cycle} kept no centroids ({discarded} discarded); composite skipped")]
    Degenerate {
        /// Zero-based cycle index
        cycle: usize,
        /// Centroids discarded by the window filter
        discarded: usize,
        /// Profile points that fell inside the windows
        profile_points: usize,
    },
}
