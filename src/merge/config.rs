use serde::{Deserialize, Serialize};

use crate::segment::SegmentBound;

/// Retention fraction below which the auto-aligning merge warns
pub const DEFAULT_RETENTION_WARNING_THRESHOLD: f64 = 0.98;

/// Retention fraction below which the fixed-order merge warns
pub const FIXED_ORDER_RETENTION_WARNING_THRESHOLD: f64 = 0.90;

/// Default number of progress spot checks per run
pub const DEFAULT_PROGRESS_CHECKPOINTS: usize = 4;

/// Configuration for a segment merge run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Number of consecutive spectra forming one cycle. `None` uses every
    /// entry of `segments`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_count: Option<usize>,

    /// Segment windows in acquisition order. Only the first `segment_count`
    /// entries are used.
    pub segments: Vec<SegmentBound>,

    /// Detect the phase of the first spectrum from its scan range.
    /// When disabled the stream is assumed to start at segment 0.
    pub auto_align_phase: bool,

    /// Warn when kept / (kept + discarded) centroids falls below this value
    pub retention_warning_threshold: f64,

    /// Emit a composite for a trailing cycle with fewer than `segment_count`
    /// spectra instead of dropping it
    pub flush_trailing_partial_cycle: bool,

    /// Compare the scan range of each cycle's first spectrum against the
    /// segment it is expected to cover, warning on mismatch
    pub verify_segment_order: bool,

    /// Number of progress spot checks per run (0 disables them)
    pub progress_checkpoints: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            segment_count: None,
            segments: Vec::new(),
            auto_align_phase: true,
            retention_warning_threshold: DEFAULT_RETENTION_WARNING_THRESHOLD,
            flush_trailing_partial_cycle: false,
            verify_segment_order: false,
            progress_checkpoints: DEFAULT_PROGRESS_CHECKPOINTS,
        }
    }
}

impl MergeConfig {
    /// Configuration using every supplied segment, with default settings
    pub fn new(segments: Vec<SegmentBound>) -> Self {
        Self {
            segments,
            ..Default::default()
        }
    }

    /// Fixed segment order starting at segment 0, warning below 90% retention
    pub fn fixed_order(segments: Vec<SegmentBound>) -> Self {
        Self {
            auto_align_phase: false,
            retention_warning_threshold: FIXED_ORDER_RETENTION_WARNING_THRESHOLD,
            ..Self::new(segments)
        }
    }

    /// Phase detected from the first spectrum, warning below 98% retention
    pub fn auto_aligned(segments: Vec<SegmentBound>) -> Self {
        Self::new(segments)
    }

    /// Use only the first `count` segments
    pub fn with_segment_count(mut self, count: usize) -> Self {
        self.segment_count = Some(count);
        self
    }

    /// Segments per cycle: the explicit count, or the number of segments
    pub fn resolved_segment_count(&self) -> usize {
        self.segment_count.unwrap_or(self.segments.len())
    }

    /// Enable or disable phase detection
    pub fn with_auto_align_phase(mut self, enabled: bool) -> Self {
        self.auto_align_phase = enabled;
        self
    }

    /// Set the retention warning threshold
    pub fn with_retention_warning_threshold(mut self, threshold: f64) -> Self {
        self.retention_warning_threshold = threshold;
        self
    }

    /// Flush or drop a trailing partial cycle
    pub fn with_flush_trailing_partial_cycle(mut self, flush: bool) -> Self {
        self.flush_trailing_partial_cycle = flush;
        self
    }

    /// Enable or disable the per-cycle segment order check
    pub fn with_verify_segment_order(mut self, verify: bool) -> Self {
        self.verify_segment_order = verify;
        self
    }

    /// Set the number of progress spot checks per run
    pub fn with_progress_checkpoints(mut self, checkpoints: usize) -> Self {
        self.progress_checkpoints = checkpoints;
        self
    }
}
