//! The statistics aggregator: live atomic counters per target plus the
//! last-reported baseline that turns successive snapshots into interval
//! deltas.
//!
//! Producers call [`StatsTracker::add`] once per observed event, from any
//! number of threads. The reporting path calls [`StatsTracker::summary`],
//! which snapshots every counter, diffs the snapshot against the previously
//! reported one, and advances the baseline in the same guarded step. Repeated
//! summaries therefore produce successive, non-overlapping interval deltas.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_utils::CachePadded;
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::stats::{PerTargetStats, Stat, Stats};

/// Live counter block for a single target.
///
/// Each slot sits on its own cache line so concurrent producers updating
/// different counters of a hot target do not invalidate each other.
#[derive(Debug, Default)]
struct TargetCounters {
    slots: [CachePadded<AtomicU64>; Stat::COUNT],
}

impl TargetCounters {
    #[inline]
    fn add(&self, stat: Stat, value: u64) {
        self.slots[stat as usize].fetch_add(value, Ordering::Relaxed);
    }

    fn load(&self) -> Stats {
        let mut stats = Stats::ZERO;
        for stat in Stat::ALL {
            stats[stat] = self.slots[stat as usize].load(Ordering::Relaxed);
        }
        stats
    }
}

/// One report's worth of data: lifetime totals plus the deltas accumulated
/// since the previous report.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Per-target lifetime totals.
    pub targets: PerTargetStats,
    /// Aggregate lifetime total across all targets.
    pub total: Stats,
    /// Per-target deltas since the last report.
    pub targets_interval: PerTargetStats,
    /// Aggregate delta since the last report.
    pub total_interval: Stats,
}

/// Concurrency-safe accumulator of per-target traffic counters.
///
/// Increments are relaxed atomic fetch-adds; the target registry is guarded
/// by a read-write lock that writers only take on the first observation of a
/// new target. Counters only ever grow, and they keep accumulating no matter
/// what happens on the reporting path.
///
/// # Examples
///
/// ```rust
/// use loadgauge::stats::Stat;
/// use loadgauge::tracker::StatsTracker;
///
/// let tracker = StatsTracker::new();
/// tracker.add("https://example.com", Stat::RequestsAttempted, 1);
/// tracker.add("https://example.com", Stat::BytesSent, 512);
///
/// let snapshot = tracker.snapshot();
/// assert_eq!(snapshot.get("https://example.com").unwrap()[Stat::BytesSent], 512);
/// ```
#[derive(Debug, Default)]
pub struct StatsTracker {
    targets: RwLock<HashMap<String, Arc<TargetCounters>>>,
    /// Snapshot handed out by the previous `summary` call, always ungrouped.
    last_reported: Mutex<Option<PerTargetStats>>,
}

impl StatsTracker {
    /// Creates a tracker with no targets and no reporting baseline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` to one counter of `target`.
    ///
    /// The target's counter block is created atomically on first observation;
    /// concurrent first observers converge on the same block. Blocks are
    /// never removed.
    pub fn add(&self, target: &str, stat: Stat, value: u64) {
        if let Some(counters) = self.targets.read().get(target) {
            counters.add(stat, value);
            return;
        }

        let counters = {
            let mut targets = self.targets.write();
            Arc::clone(targets.entry(target.to_owned()).or_insert_with(|| {
                debug!("tracking new target: {target}");
                Arc::new(TargetCounters::default())
            }))
        };
        counters.add(stat, value);
    }

    /// Captures a consistent point-in-time copy of all counter vectors.
    ///
    /// The target map is read under its lock, so a snapshot never observes a
    /// target mid-registration; each counter is loaded atomically.
    pub fn snapshot(&self) -> PerTargetStats {
        self.targets
            .read()
            .iter()
            .map(|(target, counters)| (target.clone(), counters.load()))
            .collect()
    }

    /// Produces a [`Summary`] and advances the reporting baseline.
    ///
    /// The snapshot, the diff against the previous baseline, and the baseline
    /// swap all happen under the baseline mutex, so concurrent callers get
    /// successive, non-overlapping intervals. The stored baseline is always
    /// the raw, ungrouped snapshot; with `group_targets` set, grouping is
    /// applied to the output maps after diffing, so callers with different
    /// grouping settings still see coherent deltas.
    ///
    /// A summary taken with no increments since the previous one reports an
    /// all-zero interval.
    pub fn summary(&self, group_targets: bool) -> Summary {
        let (current, interval) = {
            let mut last_reported = self.last_reported.lock();
            let current = self.snapshot();
            let interval = current.diff(last_reported.as_ref());
            *last_reported = Some(current.clone());
            (current, interval)
        };

        let (targets, targets_interval) = if group_targets {
            (current.grouped(), interval.grouped())
        } else {
            (current, interval)
        };

        Summary {
            total: targets.total(),
            total_interval: targets_interval.total(),
            targets,
            targets_interval,
        }
    }
}
