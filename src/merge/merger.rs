use crate::segment::SegmentSet;
use crate::spectrum::Spectrum;

use super::config::MergeConfig;
use super::diagnostics::{Diagnostics, LogDiagnostics};
use super::error::MergeError;
use super::session::MergeSession;
use super::stats::MergeReport;

/// Composite spectra and the report of a completed run
#[derive(Debug, Clone)]
pub struct MergeOutput {
    /// One composite per complete cycle, in cycle order
    pub spectra: Vec<Spectrum>,
    /// End-of-run statistics
    pub report: MergeReport,
}

/// Validated merge configuration, ready to run over any number of inputs.
///
/// Runs share no state: merging the same input twice gives the same composites.
#[derive(Debug, Clone)]
pub struct SegmentMerger {
    config: MergeConfig,
    segments: SegmentSet,
}

impl SegmentMerger {
    /// Validate `config` and build the segment set
    pub fn new(config: MergeConfig) -> Result<Self, MergeError> {
        let threshold = config.retention_warning_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(MergeError::InvalidThreshold(threshold));
        }

        let segments = SegmentSet::new(config.resolved_segment_count(), &config.segments)?;
        Ok(Self { config, segments })
    }

    /// Configuration in use
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Active segments
    pub fn segments(&self) -> &SegmentSet {
        &self.segments
    }

    /// Start an incremental run.
    ///
    /// `expected_spectra` enables the periodic progress spot checks.
    pub fn session<D: Diagnostics>(
        &self,
        diagnostics: D,
        expected_spectra: Option<usize>,
    ) -> MergeSession<'_, D> {
        MergeSession::new(&self.config, &self.segments, diagnostics, expected_spectra)
    }

    /// Merge a whole sequence of spectra
    pub fn merge<'s, I, D>(&self, spectra: I, diagnostics: D) -> MergeOutput
    where
        I: IntoIterator<Item = &'s Spectrum>,
        D: Diagnostics,
    {
        let spectra = spectra.into_iter();
        let expected = match spectra.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(lower),
            _ => None,
        };

        let mut session = self.session(diagnostics, expected);
        let mut merged = Vec::with_capacity(expected.unwrap_or(0) / self.segments.len());

        for spectrum in spectra {
            if let Some(composite) = session.push(spectrum) {
                merged.push(composite);
            }
        }

        let (last, report) = session.finish();
        merged.extend(last);

        MergeOutput {
            spectra: merged,
            report,
        }
    }

    /// [`merge`](Self::merge) reporting through the `log` facade
    pub fn merge_logged(&self, spectra: &[Spectrum]) -> MergeOutput {
        self.merge(spectra, LogDiagnostics)
    }
}
