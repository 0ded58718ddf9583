use log::debug;

use crate::segment::SegmentSet;
use crate::spectrum::Spectrum;

use super::accumulator::{FinishedCycle, SpectrumAccumulator};
use super::config::MergeConfig;
use super::diagnostics::Diagnostics;
use super::error::CycleError;
use super::phase::PhaseAligner;
use super::stats::{MergeReport, RunStatistics};

/// One merge run over a stream of source spectra.
///
/// Feed spectra in acquisition order with [`push`](Self::push); every `N`th
/// spectrum closes the previous cycle and may yield its composite. Call
/// [`finish`](Self::finish) once the stream is exhausted to close the last
/// cycle and get the run report.
///
/// Precondition: the instrument visits the segments in configuration order for
/// the whole run. Only the first spectrum is used to find the phase.
pub struct MergeSession<'a, D: Diagnostics> {
    config: &'a MergeConfig,
    segments: &'a SegmentSet,
    diagnostics: D,
    aligner: Option<PhaseAligner>,
    accumulator: Option<SpectrumAccumulator>,
    position: usize,
    expected_spectra: Option<usize>,
    stats: RunStatistics,
    last_closed: Option<(usize, usize, usize)>,
}

impl<'a, D: Diagnostics> MergeSession<'a, D> {
    pub(super) fn new(
        config: &'a MergeConfig,
        segments: &'a SegmentSet,
        mut diagnostics: D,
        expected_spectra: Option<usize>,
    ) -> Self {
        for (a, b) in segments.overlapping_pairs() {
            diagnostics.warn(&format!(
                "Segments {} {} and {} {} overlap; samples in the shared range are merged twice",
                a,
                segments.bound(a),
                b,
                segments.bound(b)
            ));
        }

        Self {
            config,
            segments,
            diagnostics,
            aligner: None,
            accumulator: None,
            position: 0,
            expected_spectra,
            stats: RunStatistics::default(),
            last_closed: None,
        }
    }

    /// Merge the next source spectrum.
    ///
    /// Returns the composite of the previous cycle when `spectrum` starts a
    /// new one.
    pub fn push(&mut self, spectrum: &Spectrum) -> Option<Spectrum> {
        let aligner = match self.aligner {
            Some(aligner) => aligner,
            None => self.align(spectrum),
        };

        let segment_count = self.segments.len();
        let mut emitted = None;

        if self.position % segment_count == 0 {
            if let Some(accumulator) = self.accumulator.take() {
                emitted = self.close_cycle(accumulator);
                self.spot_check();
            }

            let cycle = self.position / segment_count;
            if self.config.verify_segment_order {
                self.verify_order(cycle, aligner.segment_index(self.position), spectrum);
            }
            self.accumulator = Some(SpectrumAccumulator::begin(cycle, spectrum));
        }

        let segment_index = aligner.segment_index(self.position);
        let bound = self.segments.bound(segment_index);
        if let Some(accumulator) = self.accumulator.as_mut() {
            accumulator.absorb(spectrum, bound);
        }
        debug!(
            "Spectrum {} (scan {}) -> segment {} {}",
            self.position, spectrum.header.scan_number, segment_index, bound
        );

        self.stats.spectra_consumed += 1;
        self.position += 1;
        emitted
    }

    /// Close the run.
    ///
    /// A complete final cycle is always emitted. A trailing partial cycle is
    /// emitted only with `flush_trailing_partial_cycle`, otherwise dropped.
    pub fn finish(mut self) -> (Option<Spectrum>, MergeReport) {
        let segment_count = self.segments.len();
        let mut emitted = None;

        if let Some(accumulator) = self.accumulator.take() {
            let members = accumulator.members();
            if members == segment_count {
                emitted = self.close_cycle(accumulator);
            } else if self.config.flush_trailing_partial_cycle {
                self.diagnostics.info(&format!(
                    "Flushing trailing partial cycle {} ({}/{} spectra)",
                    accumulator.cycle(),
                    members,
                    segment_count
                ));
                emitted = self.close_cycle(accumulator);
                self.stats.trailing_cycle_flushed = true;
            } else {
                self.diagnostics.info(&format!(
                    "Dropping trailing partial cycle {} ({}/{} spectra)",
                    accumulator.cycle(),
                    members,
                    segment_count
                ));
                self.stats.trailing_spectra_dropped = members;
            }
        }

        let report = MergeReport::new(
            self.stats,
            segment_count,
            self.aligner.map(|a| a.offset()),
            self.config.retention_warning_threshold,
        );

        self.diagnostics.info(&report.summary_line());
        if report.low_retention {
            self.diagnostics.warn(&format!(
                "Only {:.2}% of centroids were kept (threshold {:.2}%). Are the segment bounds set appropriately?",
                report.retention_fraction.unwrap_or(0.0) * 100.0,
                report.retention_warning_threshold * 100.0
            ));
        }

        (emitted, report)
    }

    /// Spectra pushed so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// Counters accumulated so far (finalized cycles only)
    pub fn statistics(&self) -> &RunStatistics {
        &self.stats
    }

    /// Resolved phase aligner, once the first spectrum has been pushed
    pub fn aligner(&self) -> Option<PhaseAligner> {
        self.aligner
    }

    fn align(&mut self, first: &Spectrum) -> PhaseAligner {
        let aligner = PhaseAligner::resolve(self.segments, first, self.config.auto_align_phase);

        match self.expected_spectra {
            Some(total) => self
                .diagnostics
                .info(&format!("Starting - Number of spectra: {}", total)),
            None => self.diagnostics.info("Starting"),
        }
        if self.config.auto_align_phase {
            let (low, high) = first.scan_range();
            self.diagnostics.info(&format!(
                "First spectrum [{}, {}) matches segment {}",
                low,
                high,
                aligner.offset()
            ));
        }

        self.aligner = Some(aligner);
        aligner
    }

    fn close_cycle(&mut self, accumulator: SpectrumAccumulator) -> Option<Spectrum> {
        match accumulator.finalize(self.segments) {
            Ok(finished) => Some(self.accept(finished)),
            Err(err) => {
                match &err {
                    CycleError::Degenerate {
                        cycle,
                        discarded,
                        profile_points,
                    } => {
                        self.stats
                            .record_degenerate(*cycle, *discarded, *profile_points);
                        self.last_closed = Some((*cycle, 0, *discarded));
                    }
                }
                self.diagnostics.warn(&err.to_string());
                None
            }
        }
    }

    /// Log the counts of the cycle just closed every `total / checkpoints`
    /// spectra
    fn spot_check(&mut self) {
        let interval = match self.expected_spectra {
            Some(total) if self.config.progress_checkpoints > 0 => {
                total / self.config.progress_checkpoints
            }
            _ => return,
        };
        if interval == 0 || self.position % interval != 0 {
            return;
        }
        if let Some((cycle, kept, discarded)) = self.last_closed {
            self.diagnostics.info(&format!(
                "Spot check - cycle {}: centroids kept {}; centroids discarded {}",
                cycle, kept, discarded
            ));
        }
    }

    fn verify_order(&mut self, cycle: usize, expected: usize, first: &Spectrum) {
        let (low, high) = first.scan_range();
        let observed = self.segments.best_match(low, high);
        if observed != expected {
            self.stats.order_mismatches += 1;
            self.diagnostics.warn(&format!(
                "Cycle {} starts with scan range [{}, {}) matching segment {}, expected segment {}",
                cycle, low, high, observed, expected
            ));
        }
    }

    fn accept(&mut self, finished: FinishedCycle) -> Spectrum {
        self.stats
            .record_cycle(finished.kept, finished.discarded, finished.profile_points);
        self.stats.composites_emitted += 1;

        if finished.kept < finished.discarded {
            self.diagnostics.warn(&format!(
                "Cycle {}: number of centroids kept ({}) is smaller than number discarded ({}). Are the segment bounds set appropriately?",
                finished.cycle, finished.kept, finished.discarded
            ));
        }
        if !finished.spectrum.is_valid() {
            self.diagnostics
                .info(&format!("Composite spectrum of cycle {} is invalid", finished.cycle));
        }
        debug!(
            "Cycle {} closed: {} spectra, {} centroids kept, {} discarded",
            finished.cycle, finished.members, finished.kept, finished.discarded
        );

        self.last_closed = Some((finished.cycle, finished.kept, finished.discarded));
        finished.spectrum
    }
}
