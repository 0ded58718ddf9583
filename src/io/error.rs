use thiserror::Error;

/// Errors that can occur while reading or writing spectrum files
#[derive(Error, Debug)]
pub enum SpectrumIoError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error in a whole-document file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON error on one line of a JSON Lines file
    #[error("JSON error on line {line}: {source}")]
    Line {
        /// One-based line number
        line: usize,
        /// Underlying parse error
        source: serde_json::Error,
    },

    /// File extension not recognized
    #[error("Unsupported spectrum file format: {0}")]
    UnsupportedFormat(String),
}
