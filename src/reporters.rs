//! Reporter implementations for periodic traffic summaries.
//!
//! A reporter consumes one [`Summary`](crate::tracker::Summary) per call and
//! renders it somewhere. The set of renderings is deliberately closed:
//!
//! - [`log::TracingReporter`] emits one structured `tracing` event with the
//!   lifetime totals and the interval deltas as named JSON objects.
//! - [`console::ConsoleReporter`] prints a fixed-width aligned table to any
//!   byte sink.
//!
//! Both variants share the [`Reporter`] contract and a unified [`ReportError`]
//! type, so the enclosing tool can swap them without touching error handling.

mod error;

pub use error::{ReportError, Result};

pub mod console;
pub mod log;

use crate::tracker::StatsTracker;

/// Renders periodic summaries pulled from a [`StatsTracker`].
pub trait Reporter {
    /// Pulls one summary from the tracker and renders it.
    ///
    /// Each call advances the tracker's interval baseline exactly once, so
    /// repeated calls produce successive, non-overlapping deltas; a call with
    /// no traffic since the previous one renders an all-zero interval.
    /// Counters are only read, never mutated, and they keep accumulating
    /// even when rendering fails.
    fn write_summary(&mut self, tracker: &StatsTracker) -> Result<()>;
}
