//! TOML configuration file support.
//!
//! Segment layouts are instrument-method specific and tend to be reused, so
//! they can live in a file instead of being repeated on the command line:
//!
//! ```toml
//! # segmerge.toml
//! [merge]
//! segment_count = 3
//! segments = [
//!     { lower = 100.0, upper = 400.0 },
//!     { lower = 400.0, upper = 700.0 },
//!     { lower = 700.0, upper = 1000.0 },
//! ]
//! auto_align_phase = true
//! retention_warning_threshold = 0.98
//! flush_trailing_partial_cycle = false
//! verify_segment_order = true
//! ```
//!
//! Command-line flags take precedence over file values.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use segmerge::merge::MergeConfig;
use segmerge::segment::SegmentBound;

/// Root configuration structure for segmerge.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Merge-specific settings.
    #[serde(default)]
    pub merge: MergeSettings,
}

/// Optional overrides of a [`MergeConfig`].
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MergeSettings {
    /// Segments per cycle. Defaults to the number of `segments` given.
    pub segment_count: Option<usize>,

    /// Segment windows in acquisition order.
    pub segments: Option<Vec<SegmentBound>>,

    /// Detect the phase from the first spectrum.
    pub auto_align_phase: Option<bool>,

    /// Retention fraction below which a warning is raised.
    pub retention_warning_threshold: Option<f64>,

    /// Emit a composite for a trailing partial cycle.
    pub flush_trailing_partial_cycle: Option<bool>,

    /// Check that each cycle starts on the expected segment.
    pub verify_segment_order: Option<bool>,

    /// Number of progress spot checks over the run.
    pub progress_checkpoints: Option<usize>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

impl MergeSettings {
    /// Overwrite the fields of `config` that are set here.
    ///
    /// New `segments` also clear an inherited `segment_count` unless a count
    /// is given alongside, so every new segment is used.
    pub fn apply_to(&self, config: &mut MergeConfig) {
        if let Some(segments) = &self.segments {
            config.segments = segments.clone();
            config.segment_count = None;
        }
        if let Some(count) = self.segment_count {
            config.segment_count = Some(count);
        }
        if let Some(enabled) = self.auto_align_phase {
            config.auto_align_phase = enabled;
        }
        if let Some(threshold) = self.retention_warning_threshold {
            config.retention_warning_threshold = threshold;
        }
        if let Some(flush) = self.flush_trailing_partial_cycle {
            config.flush_trailing_partial_cycle = flush;
        }
        if let Some(verify) = self.verify_segment_order {
            config.verify_segment_order = verify;
        }
        if let Some(checkpoints) = self.progress_checkpoints {
            config.progress_checkpoints = checkpoints;
        }
    }
}
