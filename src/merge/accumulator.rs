use crate::segment::{SegmentBound, SegmentSet};
use crate::spectrum::{MassSample, Spectrum};

use super::error::CycleError;

/// Capacity hint for composite sample buffers, relative to the seed spectrum
const CAPACITY_FACTOR: usize = 4;

/// A finalized composite spectrum with its cycle counts
#[derive(Debug, Clone)]
pub struct FinishedCycle {
    /// Zero-based cycle index
    pub cycle: usize,
    /// The composite spectrum
    pub spectrum: Spectrum,
    /// Source spectra merged into the composite
    pub members: usize,
    /// Centroids inside their segment window
    pub kept: usize,
    /// Centroids outside their segment window
    pub discarded: usize,
    /// Profile points inside their segment window
    pub profile_points: usize,
}

/// Builds the composite spectrum of one cycle.
///
/// Owns the composite's sample buffers until [`finalize`](Self::finalize)
/// hands the finished spectrum over.
#[derive(Debug)]
pub struct SpectrumAccumulator {
    cycle: usize,
    composite: Spectrum,
    members: usize,
    kept: usize,
    discarded: usize,
    profile_points: usize,
}

impl SpectrumAccumulator {
    /// Start a composite from the first spectrum of a cycle.
    ///
    /// Header, scan event and precursor are copied from `seed`; the sample
    /// buffers start empty. `seed` still has to be passed to
    /// [`absorb`](Self::absorb).
    pub fn begin(cycle: usize, seed: &Spectrum) -> Self {
        let composite = Spectrum {
            header: seed.header.clone(),
            scan_event: seed.scan_event.clone(),
            precursor: seed.precursor.clone(),
            centroids: Vec::with_capacity(seed.centroids.len() * CAPACITY_FACTOR),
            profile: Vec::with_capacity(seed.profile.len() * CAPACITY_FACTOR),
        };

        Self {
            cycle,
            composite,
            members: 0,
            kept: 0,
            discarded: 0,
            profile_points: 0,
        }
    }

    /// Append the samples of `source` that fall inside `bound`.
    ///
    /// Out-of-window centroids are counted as discarded. Out-of-window profile
    /// points are dropped without being counted.
    pub fn absorb(&mut self, source: &Spectrum, bound: &SegmentBound) {
        let kept = retain_within(&source.centroids, bound, &mut self.composite.centroids);
        self.kept += kept;
        self.discarded += source.centroids.len() - kept;

        self.profile_points += retain_within(&source.profile, bound, &mut self.composite.profile);
        self.members += 1;
    }

    /// Zero-based index of the cycle being built
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Number of spectra absorbed so far
    pub fn members(&self) -> usize {
        self.members
    }

    /// Centroids kept so far
    pub fn kept(&self) -> usize {
        self.kept
    }

    /// Centroids discarded so far
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Finish the composite.
    ///
    /// The scan range and isolation window are derived from the full segment
    /// set rather than from the merged data. Fails with
    /// [`CycleError::Degenerate`] when no centroid was kept.
    pub fn finalize(self, segments: &SegmentSet) -> Result<FinishedCycle, CycleError> {
        let Some(base_peak) = self.composite.most_intense_centroid().copied() else {
            return Err(CycleError::Degenerate {
                cycle: self.cycle,
                discarded: self.discarded,
                profile_points: self.profile_points,
            });
        };

        let low = segments.min_lower();
        let high = segments.max_upper();

        let mut spectrum = self.composite;
        spectrum.header.low_position = low;
        spectrum.header.high_position = high;
        spectrum.header.base_peak_position = base_peak.position;
        spectrum.header.base_peak_intensity = base_peak.intensity;
        spectrum.header.total_intensity = spectrum.total_centroid_intensity();

        // Stand-in for the combined isolation window of all segments
        spectrum.scan_event.isolation_mass = Some((high + low) / 2.0);
        spectrum.scan_event.isolation_width = Some(high - low);

        Ok(FinishedCycle {
            cycle: self.cycle,
            spectrum,
            members: self.members,
            kept: self.kept,
            discarded: self.discarded,
            profile_points: self.profile_points,
        })
    }
}

/// Copy the samples inside `bound` onto `dest`, returning how many were copied
fn retain_within<T: MassSample>(source: &[T], bound: &SegmentBound, dest: &mut Vec<T>) -> usize {
    let before = dest.len();
    dest.extend(source.iter().filter(|s| bound.contains(s.position())).copied());
    dest.len() - before
}
