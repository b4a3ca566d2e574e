//! Unified error type for report rendering.
//!
//! A failed write is fatal to that reporting call only: the tracker's
//! counters are untouched by rendering and keep accumulating, and the next
//! `write_summary` call starts over from a fresh summary.

use thiserror::Error;

/// Unified error type for all reporter operations.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The console sink rejected a write or a flush.
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),

    /// A summary record could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for reporter operations.
pub type Result<T> = std::result::Result<T, ReportError>;
