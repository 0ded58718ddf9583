use crate::segment::SegmentSet;
use crate::spectrum::Spectrum;

/// Maps a spectrum's position in the stream to the segment it covers.
///
/// The stream may start anywhere in the cycle. The offset is resolved once
/// from the first spectrum and then applied to every later position:
/// `segment = (position + offset) mod segment_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseAligner {
    segment_count: usize,
    offset: usize,
}

impl PhaseAligner {
    /// Assume the stream starts at segment 0
    pub fn fixed(segments: &SegmentSet) -> Self {
        Self {
            segment_count: segments.len(),
            offset: 0,
        }
    }

    /// Pick the segment whose window overlaps the first spectrum's scan range
    /// the most
    pub fn detect(segments: &SegmentSet, first: &Spectrum) -> Self {
        let (low, high) = first.scan_range();
        Self {
            segment_count: segments.len(),
            offset: segments.best_match(low, high),
        }
    }

    /// `detect` when `auto_align` is set, `fixed` otherwise
    pub fn resolve(segments: &SegmentSet, first: &Spectrum, auto_align: bool) -> Self {
        if auto_align {
            Self::detect(segments, first)
        } else {
            Self::fixed(segments)
        }
    }

    /// Resolved rotation
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Segment index for the spectrum at `position` in the stream
    #[inline]
    pub fn segment_index(&self, position: usize) -> usize {
        (position % self.segment_count + self.offset) % self.segment_count
    }
}
