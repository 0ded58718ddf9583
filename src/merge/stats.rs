use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[cfg(feature = "colorized_output")]
use console::style;

/// Running counters of a merge run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    /// Source spectra consumed
    pub spectra_consumed: usize,
    /// Composite spectra emitted
    pub composites_emitted: usize,
    /// Centroids kept across all finalized cycles
    pub centroids_kept: usize,
    /// Centroids discarded across all finalized cycles
    pub centroids_discarded: usize,
    /// Profile points that passed the window filter, including those of
    /// degenerate cycles whose composite was skipped
    pub profile_points_in_window: usize,
    /// Cycles that kept no centroid and produced no composite
    pub degenerate_cycles: Vec<usize>,
    /// Cycles whose first spectrum did not match its expected segment
    pub order_mismatches: usize,
    /// Spectra of a trailing partial cycle that were dropped
    pub trailing_spectra_dropped: usize,
    /// Whether a trailing partial cycle was flushed into a composite
    pub trailing_cycle_flushed: bool,
}

impl RunStatistics {
    /// Fold the counts of a finalized cycle into the run totals
    pub fn record_cycle(&mut self, kept: usize, discarded: usize, profile_points: usize) {
        self.centroids_kept += kept;
        self.centroids_discarded += discarded;
        self.profile_points_in_window += profile_points;
    }

    /// Record a cycle without kept centroids
    pub fn record_degenerate(&mut self, cycle: usize, discarded: usize, profile_points: usize) {
        self.centroids_discarded += discarded;
        self.profile_points_in_window += profile_points;
        self.degenerate_cycles.push(cycle);
    }

    /// kept / (kept + discarded), or `None` when no centroid was seen
    pub fn retention_fraction(&self) -> Option<f64> {
        let total = self.centroids_kept + self.centroids_discarded;
        if total == 0 {
            None
        } else {
            Some(self.centroids_kept as f64 / total as f64)
        }
    }
}

/// End-of-run summary of a merge
#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    /// Unique identifier of the run
    pub run_id: Uuid,
    /// Completion time
    pub completed_at: DateTime<Utc>,
    /// Segments per cycle
    pub segment_count: usize,
    /// Resolved phase offset, `None` when no spectrum was seen
    pub phase_offset: Option<usize>,
    /// Configured retention warning threshold
    pub retention_warning_threshold: f64,
    /// kept / (kept + discarded) centroids, `None` when not applicable
    pub retention_fraction: Option<f64>,
    /// Whether the retention fraction fell below the threshold
    pub low_retention: bool,
    /// Run counters
    #[serde(flatten)]
    pub statistics: RunStatistics,
    /// Warnings raised during the run, when collected
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl MergeReport {
    /// Build the report from the final counters
    pub fn new(
        statistics: RunStatistics,
        segment_count: usize,
        phase_offset: Option<usize>,
        retention_warning_threshold: f64,
    ) -> Self {
        let retention_fraction = statistics.retention_fraction();
        let low_retention = retention_fraction
            .map(|fraction| fraction < retention_warning_threshold)
            .unwrap_or(false);

        Self {
            run_id: Uuid::new_v4(),
            completed_at: Utc::now(),
            segment_count,
            phase_offset,
            retention_warning_threshold,
            retention_fraction,
            low_retention,
            statistics,
            warnings: Vec::new(),
        }
    }

    /// Attach the warnings collected by a [`CollectingDiagnostics`](super::CollectingDiagnostics) sink
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Whether anything in the run deserves attention
    pub fn has_warnings(&self) -> bool {
        self.low_retention
            || !self.statistics.degenerate_cycles.is_empty()
            || self.statistics.order_mismatches > 0
            || !self.warnings.is_empty()
    }

    /// One-line summary used for the completion log message
    pub fn summary_line(&self) -> String {
        format!(
            "Merge completed - composites: {}/{} spectra - centroids kept: {}/{} - fraction: {}",
            self.statistics.composites_emitted,
            self.statistics.spectra_consumed,
            self.statistics.centroids_kept,
            self.statistics.centroids_kept + self.statistics.centroids_discarded,
            self.fraction_text()
        )
    }

    fn fraction_text(&self) -> String {
        match self.retention_fraction {
            Some(fraction) => format!("{:.4}", fraction),
            None => "n/a".to_string(),
        }
    }

    fn offset_text(&self) -> String {
        match self.phase_offset {
            Some(offset) => offset.to_string(),
            None => "n/a".to_string(),
        }
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let stats = &self.statistics;
            let mut output = String::new();

            output.push_str(&format!("{}\n", style("Scan Segment Merge Report").bold().cyan()));
            output.push_str(&format!("{}\n", style("=========================").cyan()));
            output.push_str(&format!("{}: {}\n\n", style("Run").bold(), self.run_id));

            output.push_str(&format!("Segments per cycle: {}\n", self.segment_count));
            output.push_str(&format!("Phase offset:       {}\n", self.offset_text()));
            output.push_str(&format!(
                "Spectra:            {} consumed, {} composites\n",
                stats.spectra_consumed,
                style(stats.composites_emitted).green()
            ));
            output.push_str(&format!(
                "Centroids:          {} kept, {} discarded\n",
                style(stats.centroids_kept).green(),
                style(stats.centroids_discarded).yellow()
            ));
            output.push_str(&format!("Profile points:     {} in window\n", stats.profile_points_in_window));

            let fraction = self.fraction_text();
            if self.low_retention {
                output.push_str(&format!(
                    "Retention:          {} (below {})\n",
                    style(fraction).red().bold(),
                    self.retention_warning_threshold
                ));
            } else {
                output.push_str(&format!("Retention:          {}\n", style(fraction).green()));
            }

            if !stats.degenerate_cycles.is_empty() {
                output.push_str(&format!(
                    "{} degenerate cycles skipped: {:?}\n",
                    style("WARNING").yellow().bold(),
                    stats.degenerate_cycles
                ));
            }
            if stats.order_mismatches > 0 {
                output.push_str(&format!(
                    "{} {} cycles did not start on the expected segment\n",
                    style("WARNING").yellow().bold(),
                    stats.order_mismatches
                ));
            }
            if stats.trailing_spectra_dropped > 0 {
                output.push_str(&format!(
                    "Trailing partial cycle dropped ({} spectra)\n",
                    stats.trailing_spectra_dropped
                ));
            }

            output.push('\n');
            if self.has_warnings() {
                output.push_str(&format!("{}\n", style("Merge finished with warnings").yellow().bold()));
            } else {
                output.push_str(&format!("{}\n", style("Merge finished").green().bold()));
            }

            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.statistics;

        writeln!(f, "Scan Segment Merge Report")?;
        writeln!(f, "=========================")?;
        writeln!(f, "Run: {}", self.run_id)?;
        writeln!(f)?;
        writeln!(f, "Segments per cycle: {}", self.segment_count)?;
        writeln!(f, "Phase offset:       {}", self.offset_text())?;
        writeln!(
            f,
            "Spectra:            {} consumed, {} composites",
            stats.spectra_consumed, stats.composites_emitted
        )?;
        writeln!(
            f,
            "Centroids:          {} kept, {} discarded",
            stats.centroids_kept, stats.centroids_discarded
        )?;
        writeln!(f, "Profile points:     {} in window", stats.profile_points_in_window)?;
        if self.low_retention {
            writeln!(
                f,
                "Retention:          {} (below {})",
                self.fraction_text(),
                self.retention_warning_threshold
            )?;
        } else {
            writeln!(f, "Retention:          {}", self.fraction_text())?;
        }

        if !stats.degenerate_cycles.is_empty() {
            writeln!(f, "WARNING: degenerate cycles skipped: {:?}", stats.degenerate_cycles)?;
        }
        if stats.order_mismatches > 0 {
            writeln!(
                f,
                "WARNING: {} cycles did not start on the expected segment",
                stats.order_mismatches
            )?;
        }
        if stats.trailing_spectra_dropped > 0 {
            writeln!(
                f,
                "Trailing partial cycle dropped ({} spectra)",
                stats.trailing_spectra_dropped
            )?;
        }

        writeln!(f)?;
        if self.has_warnings() {
            writeln!(f, "Merge finished with warnings")
        } else {
            writeln!(f, "Merge finished")
        }
    }
}
