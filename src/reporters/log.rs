//! Structured-log reporter built on `tracing`.
//!
//! Each summary becomes exactly one event at INFO level with four named
//! fields, each carrying the JSON encoding of one summary member:
//!
//! ```text
//! stats total={"requests_attempted":20,...} targets={"A":{...},"B":{...}}
//!       total_since_last_report={...} targets_since_last_report={...}
//! ```
//!
//! The subscriber side is an external collaborator; this reporter only
//! guarantees the record shape. Every `Stats` object serializes as five
//! named numeric fields in enumeration order.

use serde::Serialize;
use tracing::info;

use super::{Reporter, Result};
use crate::stats::{PerTargetStats, Stats};
use crate::tracker::{StatsTracker, Summary};

/// The structured record emitted once per summary.
///
/// Field names are the wire contract; [`From<Summary>`] maps the tracker's
/// summary members onto them.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRecord {
    /// Aggregate lifetime totals.
    pub total: Stats,
    /// Per-target lifetime totals.
    pub targets: PerTargetStats,
    /// Aggregate delta since the previous report.
    pub total_since_last_report: Stats,
    /// Per-target deltas since the previous report.
    pub targets_since_last_report: PerTargetStats,
}

impl From<Summary> for SummaryRecord {
    fn from(summary: Summary) -> Self {
        Self {
            total: summary.total,
            targets: summary.targets,
            total_since_last_report: summary.total_interval,
            targets_since_last_report: summary.targets_interval,
        }
    }
}

/// A [`Reporter`] that emits summaries as structured `tracing` events.
///
/// # Examples
///
/// ```rust
/// use loadgauge::reporters::log::TracingReporter;
/// use loadgauge::reporters::Reporter;
/// use loadgauge::stats::Stat;
/// use loadgauge::tracker::StatsTracker;
///
/// let tracker = StatsTracker::new();
/// tracker.add("https://example.com", Stat::RequestsSent, 1);
///
/// let mut reporter = TracingReporter::new();
/// reporter.write_summary(&tracker).unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct TracingReporter {
    group_targets: bool,
}

impl TracingReporter {
    /// Creates a reporter with grouping disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds targets that share a group label into one entry each.
    pub fn group_targets(mut self, enabled: bool) -> Self {
        self.group_targets = enabled;
        self
    }
}

impl Reporter for TracingReporter {
    fn write_summary(&mut self, tracker: &StatsTracker) -> Result<()> {
        let record = SummaryRecord::from(tracker.summary(self.group_targets));

        // Encode each member directly to a string so field order survives;
        // going through serde_json::Value would re-sort the keys.
        let total = serde_json::to_string(&record.total)?;
        let targets = serde_json::to_string(&record.targets)?;
        let total_since_last_report = serde_json::to_string(&record.total_since_last_report)?;
        let targets_since_last_report = serde_json::to_string(&record.targets_since_last_report)?;

        info!(
            total = %total,
            targets = %targets,
            total_since_last_report = %total_since_last_report,
            targets_since_last_report = %targets_since_last_report,
            "stats"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::stats::Stat;

    use super::*;

    fn seed(tracker: &StatsTracker, target: &str, counters: [u64; Stat::COUNT]) {
        for (stat, value) in Stat::ALL.into_iter().zip(counters) {
            tracker.add(target, stat, value);
        }
    }

    #[test]
    fn test_record_shape() {
        let tracker = StatsTracker::new();
        seed(&tracker, "A", [10, 8, 8, 1, 2]);
        seed(&tracker, "B", [5, 5, 5, 0, 1]);

        let record = SummaryRecord::from(tracker.summary(false));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["total"]["requests_attempted"], 15);
        assert_eq!(json["total"]["bytes_received"], 3);
        assert_eq!(json["targets"]["A"]["requests_sent"], 8);
        assert_eq!(json["targets"]["B"]["responses_received"], 5);
        // First report ever: the interval equals the lifetime values.
        assert_eq!(json["total_since_last_report"], json["total"]);
        assert_eq!(json["targets_since_last_report"], json["targets"]);
    }

    #[test]
    fn test_record_interval_after_updates() {
        let tracker = StatsTracker::new();
        seed(&tracker, "A", [10, 8, 8, 1, 2]);
        let _ = SummaryRecord::from(tracker.summary(false));

        seed(&tracker, "A", [5, 4, 4, 1, 1]);
        let record = SummaryRecord::from(tracker.summary(false));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["total"]["requests_attempted"], 15);
        assert_eq!(json["total_since_last_report"]["requests_attempted"], 5);
        assert_eq!(json["targets_since_last_report"]["A"]["requests_sent"], 4);
    }

    #[test]
    fn test_write_summary_advances_baseline() {
        let tracker = StatsTracker::new();
        seed(&tracker, "A", [10, 8, 8, 1, 2]);

        let mut reporter = TracingReporter::new();
        reporter.write_summary(&tracker).unwrap();
        reporter.write_summary(&tracker).unwrap();

        // No traffic since the first report, so the next interval is zero.
        let summary = tracker.summary(false);
        assert!(summary.total_interval.is_zero());
    }

    #[test]
    fn test_grouping() {
        let tracker = StatsTracker::new();
        seed(&tracker, "https://host/a", [1, 1, 1, 0, 0]);
        seed(&tracker, "https://host/b", [2, 2, 2, 0, 0]);

        let mut reporter = TracingReporter::new().group_targets(true);
        reporter.write_summary(&tracker).unwrap();

        let record = SummaryRecord::from(tracker.summary(true));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["targets"]["https://host"]["requests_attempted"], 3);
        assert!(json["targets"].get("https://host/a").is_none());
    }
}
