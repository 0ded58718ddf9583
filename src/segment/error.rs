/// Errors raised while validating the segment configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SegmentError {
    /// Fewer than two segments were requested
    #[error("Segment count must be at least {min}, got {count}")]
    TooFewSegments {
        /// Requested segment count
        count: usize,
        /// Smallest accepted segment count
        min: usize,
    },

    /// More segments were requested than there are configurable slots
    #[error("Segment count must not exceed {max}, got {count}")]
    TooManySegments {
        /// Requested segment count
        count: usize,
        /// Largest accepted segment count
        max: usize,
    },

    /// The segment count is larger than the number of supplied bounds
    #[error("Segment count is {count} but only {available} segment bounds were supplied")]
    MissingBounds {
        /// Requested segment count
        count: usize,
        /// Number of supplied bounds
        available: usize,
    },

    /// A bound is NaN or infinite
    #[error("Segment {index} has a non-finite bound [{lower}, {upper})")]
    NonFiniteBound {
        /// Index of the segment
        index: usize,
        /// Lower bound
        lower: f64,
        /// Upper bound
        upper: f64,
    },

    /// A lower bound is negative
    #[error("Segment {index} has a negative lower bound {lower}")]
    NegativeLower {
        /// Index of the segment
        index: usize,
        /// Lower bound
        lower: f64,
    },

    /// A lower bound exceeds its upper bound
    #[error("Segment {index} has lower bound {lower} above upper bound {upper}")]
    InvertedBound {
        /// Index of the segment
        index: usize,
        /// Lower bound
        lower: f64,
        /// Upper bound
        upper: f64,
    },

    /// A textual bound could not be parsed
    #[error("Invalid segment bound '{0}', expected LOWER:UPPER")]
    Parse(String),
}
