//! # Segment Configuration
//!
//! A segment is one mass window of the repeating acquisition cycle. Bounds are
//! half-open: a sample at `position` belongs to a segment when
//! `lower <= position < upper`.
//!
//! Segment order is significant. The merge assumes that the instrument visits
//! the segments in exactly this order for the whole run.

mod error;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use error::SegmentError;

/// Smallest number of segments in a cycle
pub const MIN_SEGMENT_COUNT: usize = 2;

/// Largest number of configurable segment slots
pub const MAX_SEGMENT_SLOTS: usize = 16;

/// A half-open `[lower, upper)` mass window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentBound {
    /// Inclusive lower bound
    pub lower: f64,
    /// Exclusive upper bound
    pub upper: f64,
}

impl SegmentBound {
    /// Create a new bound
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Whether `position` falls inside `[lower, upper)`
    #[inline]
    pub fn contains(&self, position: f64) -> bool {
        position >= self.lower && position < self.upper
    }

    /// Width of the window
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Signed overlap between this window and `[low, high)`.
    ///
    /// Negative when the ranges are disjoint; the magnitude is then the gap.
    pub fn overlap_with(&self, low: f64, high: f64) -> f64 {
        high.min(self.upper) - low.max(self.lower)
    }

    fn validate(&self, index: usize) -> Result<(), SegmentError> {
        if !self.lower.is_finite() || !self.upper.is_finite() {
            return Err(SegmentError::NonFiniteBound {
                index,
                lower: self.lower,
                upper: self.upper,
            });
        }
        if self.lower < 0.0 {
            return Err(SegmentError::NegativeLower {
                index,
                lower: self.lower,
            });
        }
        if self.lower > self.upper {
            return Err(SegmentError::InvertedBound {
                index,
                lower: self.lower,
                upper: self.upper,
            });
        }
        Ok(())
    }
}

impl fmt::Display for SegmentBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.lower, self.upper)
    }
}

impl FromStr for SegmentBound {
    type Err = SegmentError;

    /// Parse `LOWER:UPPER`, e.g. `100:400.5`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lower, upper) = s
            .split_once(':')
            .ok_or_else(|| SegmentError::Parse(s.to_string()))?;
        let lower = lower
            .trim()
            .parse::<f64>()
            .map_err(|_| SegmentError::Parse(s.to_string()))?;
        let upper = upper
            .trim()
            .parse::<f64>()
            .map_err(|_| SegmentError::Parse(s.to_string()))?;
        Ok(Self::new(lower, upper))
    }
}

/// The validated, ordered list of active segment bounds
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSet {
    bounds: Vec<SegmentBound>,
    min_lower: f64,
    max_upper: f64,
}

impl SegmentSet {
    /// Take the first `segment_count` bounds as the active set.
    ///
    /// Bounds beyond `segment_count` are ignored and not validated. Overlaps and
    /// gaps between segments are accepted.
    pub fn new(segment_count: usize, bounds: &[SegmentBound]) -> Result<Self, SegmentError> {
        if segment_count < MIN_SEGMENT_COUNT {
            return Err(SegmentError::TooFewSegments {
                count: segment_count,
                min: MIN_SEGMENT_COUNT,
            });
        }
        if segment_count > MAX_SEGMENT_SLOTS {
            return Err(SegmentError::TooManySegments {
                count: segment_count,
                max: MAX_SEGMENT_SLOTS,
            });
        }
        if segment_count > bounds.len() {
            return Err(SegmentError::MissingBounds {
                count: segment_count,
                available: bounds.len(),
            });
        }

        let bounds = bounds[..segment_count].to_vec();
        for (index, bound) in bounds.iter().enumerate() {
            bound.validate(index)?;
        }

        let min_lower = bounds.iter().map(|b| b.lower).fold(f64::INFINITY, f64::min);
        let max_upper = bounds
            .iter()
            .map(|b| b.upper)
            .fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            bounds,
            min_lower,
            max_upper,
        })
    }

    /// Number of segments per cycle
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// Always false for a validated set
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Bound of segment `index`, wrapping around the cycle
    pub fn bound(&self, index: usize) -> &SegmentBound {
        &self.bounds[index % self.bounds.len()]
    }

    /// Iterate the bounds in segment order
    pub fn iter(&self) -> std::slice::Iter<'_, SegmentBound> {
        self.bounds.iter()
    }

    /// Smallest lower bound over all segments
    pub fn min_lower(&self) -> f64 {
        self.min_lower
    }

    /// Largest upper bound over all segments
    pub fn max_upper(&self) -> f64 {
        self.max_upper
    }

    /// Index of the segment overlapping `[low, high)` the most.
    ///
    /// Ties go to the lowest index.
    pub fn best_match(&self, low: f64, high: f64) -> usize {
        let mut best = 0;
        let mut best_overlap = f64::NEG_INFINITY;
        for (index, bound) in self.bounds.iter().enumerate() {
            let overlap = bound.overlap_with(low, high);
            if overlap > best_overlap {
                best = index;
                best_overlap = overlap;
            }
        }
        best
    }

    /// Pairs of segment indices whose windows share at least one position
    pub fn overlapping_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, a) in self.bounds.iter().enumerate() {
            for (j, b) in self.bounds.iter().enumerate().skip(i + 1) {
                if a.overlap_with(b.lower, b.upper) > 0.0 {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// Mass ranges between `min_lower` and `max_upper` covered by no segment.
    ///
    /// Samples falling into a gap are always discarded.
    pub fn gaps(&self) -> Vec<(f64, f64)> {
        let mut sorted: Vec<&SegmentBound> = self.bounds.iter().collect();
        sorted.sort_by(|a, b| a.lower.total_cmp(&b.lower));

        let mut gaps = Vec::new();
        let mut covered = self.min_lower;
        for bound in sorted {
            if bound.lower > covered {
                gaps.push((covered, bound.lower));
            }
            covered = covered.max(bound.upper);
        }
        gaps
    }
}

impl<'a> IntoIterator for &'a SegmentSet {
    type Item = &'a SegmentBound;
    type IntoIter = std::slice::Iter<'a, SegmentBound>;

    fn into_iter(self) -> Self::IntoIter {
        self.bounds.iter()
    }
}
