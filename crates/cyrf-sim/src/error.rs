//! Error types for trace loading and saving

use thiserror::Error;

/// Errors reading or writing a bus trace
#[derive(Debug, Error)]
pub enum TraceError {
    /// Underlying IO failure
    #[error("trace I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line was not a valid JSON bus event
    #[error("invalid event on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Events go backwards in time
    #[error("event on line {line} starts at sample {start}, before previous event at {previous}")]
    OutOfOrder {
        line: usize,
        start: u64,
        previous: u64,
    },
}
