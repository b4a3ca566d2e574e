//! Per-target traffic statistics: the closed counter enumeration, the fixed
//! counter vector, and the per-target map with its interval-diff model.
//!
//! Counters are cumulative and monotonically non-decreasing for the lifetime
//! of a target. Periodic reporting works on value snapshots of these types:
//! the tracker captures a [`PerTargetStats`] snapshot, diffs it against the
//! previously reported snapshot, and hands both to a reporter.
//!
//! # Examples
//!
//! ```rust
//! use loadgauge::stats::{PerTargetStats, Stat, Stats};
//!
//! let mut current = PerTargetStats::new();
//! current.insert("https://example.com", Stats::from([15, 12, 12, 2, 3]));
//!
//! let mut previous = PerTargetStats::new();
//! previous.insert("https://example.com", Stats::from([10, 8, 8, 1, 2]));
//!
//! let interval = current.diff(Some(&previous));
//! assert_eq!(
//!     interval.get("https://example.com").unwrap()[Stat::RequestsSent],
//!     4,
//! );
//! ```

use std::collections::BTreeMap;
use std::ops::{AddAssign, Index, IndexMut};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One slot in the traffic counter vector.
///
/// The enumeration is closed and ordinal-indexed; it is never extended at
/// runtime. The discriminant doubles as the index into [`Stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Stat {
    /// Requests the generator decided to make, including ones that failed
    /// before hitting the wire.
    RequestsAttempted = 0,
    /// Requests fully written to the transport.
    RequestsSent,
    /// Responses read back from the transport.
    ResponsesReceived,
    /// Payload bytes written.
    BytesSent,
    /// Payload bytes read.
    BytesReceived,
}

impl Stat {
    /// Number of counters in the vector.
    pub const COUNT: usize = 5;

    /// All stats in ordinal order.
    pub const ALL: [Stat; Stat::COUNT] = [
        Stat::RequestsAttempted,
        Stat::RequestsSent,
        Stat::ResponsesReceived,
        Stat::BytesSent,
        Stat::BytesReceived,
    ];

    /// Canonical field name used in serialized summary records.
    pub const fn field_name(self) -> &'static str {
        match self {
            Stat::RequestsAttempted => "requests_attempted",
            Stat::RequestsSent => "requests_sent",
            Stat::ResponsesReceived => "responses_received",
            Stat::BytesSent => "bytes_sent",
            Stat::BytesReceived => "bytes_received",
        }
    }
}

/// A fixed-length vector of cumulative counters, one slot per [`Stat`].
///
/// `Stats` is a plain value type; the live atomic counters sit in the
/// tracker, which loads them into `Stats` snapshots for diffing and
/// rendering. Serializes as an object of five named numeric fields in
/// enumeration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats([u64; Stat::COUNT]);

impl Stats {
    /// The all-zero vector.
    pub const ZERO: Stats = Stats([0; Stat::COUNT]);

    /// Pointwise subtraction of `baseline` from `self`.
    ///
    /// Subtraction is wrapping and unchecked: counters are assumed monotonic,
    /// so the result is well-defined for correct inputs. Diffing against a
    /// newer snapshot produces garbage, not a panic.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use loadgauge::stats::Stats;
    ///
    /// let a = Stats::from([15, 12, 12, 2, 3]);
    /// let b = Stats::from([10, 8, 8, 1, 2]);
    /// assert_eq!(a.diff(&b), Stats::from([5, 4, 4, 1, 1]));
    /// assert_eq!(a.diff(&a), Stats::ZERO);
    /// ```
    pub fn diff(&self, baseline: &Stats) -> Stats {
        let mut res = Stats::ZERO;
        for stat in Stat::ALL {
            res.0[stat as usize] = self.0[stat as usize].wrapping_sub(baseline.0[stat as usize]);
        }
        res
    }

    /// Returns `true` if every counter is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&v| v == 0)
    }
}

impl From<[u64; Stat::COUNT]> for Stats {
    fn from(counters: [u64; Stat::COUNT]) -> Self {
        Stats(counters)
    }
}

impl Index<Stat> for Stats {
    type Output = u64;

    fn index(&self, stat: Stat) -> &u64 {
        &self.0[stat as usize]
    }
}

impl IndexMut<Stat> for Stats {
    fn index_mut(&mut self, stat: Stat) -> &mut u64 {
        &mut self.0[stat as usize]
    }
}

impl AddAssign<&Stats> for Stats {
    fn add_assign(&mut self, rhs: &Stats) {
        for stat in Stat::ALL {
            self.0[stat as usize] += rhs.0[stat as usize];
        }
    }
}

impl Serialize for Stats {
    /// Serializes the vector as five named fields in enumeration order.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(Stat::COUNT))?;
        for stat in Stat::ALL {
            map.serialize_entry(stat.field_name(), &self.0[stat as usize])?;
        }
        map.end()
    }
}

/// Cumulative counter vectors keyed by target identifier.
///
/// Targets are created on first observation and persist for the process
/// lifetime; there is no eviction. Iteration order is lexicographic by
/// target name, so any rendering built on it is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerTargetStats(BTreeMap<String, Stats>);

impl PerTargetStats {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the counter vector for `target`, if it has been observed.
    pub fn get(&self, target: &str) -> Option<&Stats> {
        self.0.get(target)
    }

    /// Inserts or replaces the counter vector for `target`.
    pub fn insert(&mut self, target: impl Into<String>, stats: Stats) {
        self.0.insert(target.into(), stats);
    }

    /// Iterates over `(target, stats)` pairs in lexicographic target order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Stats)> {
        self.0.iter().map(|(target, stats)| (target.as_str(), stats))
    }

    /// Iterates over target names in lexicographic order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of tracked targets.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no target has been observed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sums the counter vectors of all targets.
    pub fn total(&self) -> Stats {
        let mut total = Stats::ZERO;
        for stats in self.0.values() {
            total += stats;
        }
        total
    }

    /// Pointwise diff of every target in `self` against `baseline`.
    ///
    /// With no baseline (the first report ever) the map is returned
    /// unchanged. A target absent from the baseline diffs against the
    /// implicit zero vector, so its delta equals its current value.
    pub fn diff(&self, baseline: Option<&PerTargetStats>) -> PerTargetStats {
        let Some(baseline) = baseline else {
            return self.clone();
        };

        let mut res = PerTargetStats::new();
        for (target, stats) in self.iter() {
            let base = baseline.get(target).unwrap_or(&Stats::ZERO);
            res.insert(target, stats.diff(base));
        }
        res
    }

    /// Folds targets that share a group label, summing their vectors.
    ///
    /// URL-shaped targets group by their `scheme://authority` prefix, so
    /// `https://host/a` and `https://host/b` land in one `https://host` row.
    /// Targets without a scheme group by the part before the first `/`.
    pub fn grouped(&self) -> PerTargetStats {
        let mut groups = PerTargetStats::new();
        for (target, stats) in self.iter() {
            let slot = groups.0.entry(group_label(target).to_owned()).or_default();
            *slot += stats;
        }
        groups
    }
}

impl<K: Into<String>> FromIterator<(K, Stats)> for PerTargetStats {
    fn from_iter<I: IntoIterator<Item = (K, Stats)>>(iter: I) -> Self {
        PerTargetStats(
            iter.into_iter()
                .map(|(target, stats)| (target.into(), stats))
                .collect(),
        )
    }
}

/// Strips the path component of a URL-shaped target, keeping
/// `scheme://authority`. Schemeless targets are cut at the first `/`.
fn group_label(target: &str) -> &str {
    match target.find("://") {
        Some(scheme_end) => {
            let authority = &target[scheme_end + 3..];
            match authority.find('/') {
                Some(slash) => &target[..scheme_end + 3 + slash],
                None => target,
            }
        }
        None => target.split('/').next().unwrap_or(target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_self_is_zero() {
        let stats = Stats::from([10, 8, 8, 1, 2]);
        assert_eq!(stats.diff(&stats), Stats::ZERO);
        assert!(stats.diff(&stats).is_zero());
    }

    #[test]
    fn test_diff_pointwise() {
        let current = Stats::from([15, 12, 12, 2, 3]);
        let baseline = Stats::from([10, 8, 8, 1, 2]);
        assert_eq!(current.diff(&baseline), Stats::from([5, 4, 4, 1, 1]));
    }

    #[test]
    fn test_index_by_stat() {
        let mut stats = Stats::ZERO;
        stats[Stat::BytesSent] = 42;
        assert_eq!(stats[Stat::BytesSent], 42);
        assert_eq!(stats[Stat::BytesReceived], 0);
    }

    #[test]
    fn test_add_assign() {
        let mut total = Stats::from([1, 1, 1, 100, 200]);
        total += &Stats::from([2, 2, 2, 300, 400]);
        assert_eq!(total, Stats::from([3, 3, 3, 400, 600]));
    }

    #[test]
    fn test_serialize_field_names_in_order() {
        let stats = Stats::from([10, 8, 8, 1, 2]);
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(
            json,
            r#"{"requests_attempted":10,"requests_sent":8,"responses_received":8,"bytes_sent":1,"bytes_received":2}"#
        );
    }

    #[test]
    fn test_per_target_diff_no_baseline() {
        let current: PerTargetStats = [
            ("A", Stats::from([10, 8, 8, 1, 2])),
            ("B", Stats::from([5, 5, 5, 0, 1])),
        ]
        .into_iter()
        .collect();

        assert_eq!(current.diff(None), current);
    }

    #[test]
    fn test_per_target_diff_interval() {
        let previous: PerTargetStats = [
            ("A", Stats::from([10, 8, 8, 1, 2])),
            ("B", Stats::from([5, 5, 5, 0, 1])),
        ]
        .into_iter()
        .collect();
        let current: PerTargetStats = [
            ("A", Stats::from([15, 12, 12, 2, 3])),
            ("B", Stats::from([5, 5, 5, 0, 1])),
        ]
        .into_iter()
        .collect();

        let interval = current.diff(Some(&previous));
        assert_eq!(interval.get("A"), Some(&Stats::from([5, 4, 4, 1, 1])));
        assert_eq!(interval.get("B"), Some(&Stats::ZERO));
        assert_eq!(current.total(), Stats::from([20, 17, 17, 2, 4]));
    }

    #[test]
    fn test_per_target_diff_unseen_target() {
        let previous: PerTargetStats =
            [("A", Stats::from([1, 1, 1, 0, 0]))].into_iter().collect();
        let current: PerTargetStats = [
            ("A", Stats::from([2, 2, 2, 0, 0])),
            ("C", Stats::from([7, 6, 5, 4, 3])),
        ]
        .into_iter()
        .collect();

        let interval = current.diff(Some(&previous));
        // C was unseen in the baseline, so its delta is its current value.
        assert_eq!(interval.get("C"), Some(&Stats::from([7, 6, 5, 4, 3])));
    }

    #[test]
    fn test_targets_sorted() {
        let stats: PerTargetStats = [
            ("zulu", Stats::ZERO),
            ("alpha", Stats::ZERO),
            ("mike", Stats::ZERO),
        ]
        .into_iter()
        .collect();

        let order: Vec<&str> = stats.targets().collect();
        assert_eq!(order, vec!["alpha", "mike", "zulu"]);
    }

    #[test]
    fn test_serialize_per_target_as_object() {
        let stats: PerTargetStats =
            [("b", Stats::from([1, 0, 0, 0, 0])), ("a", Stats::ZERO)]
                .into_iter()
                .collect();
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.starts_with(r#"{"a":"#));
        assert!(json.contains(r#""b":{"requests_attempted":1"#));
    }

    #[test]
    fn test_group_label() {
        assert_eq!(group_label("https://host:443/path/x"), "https://host:443");
        assert_eq!(group_label("udp://1.2.3.4:53"), "udp://1.2.3.4:53");
        assert_eq!(group_label("host/path"), "host");
        assert_eq!(group_label("host"), "host");
    }

    #[test]
    fn test_grouped_folds_paths() {
        let stats: PerTargetStats = [
            ("https://host/a", Stats::from([1, 1, 1, 10, 20])),
            ("https://host/b", Stats::from([2, 2, 2, 30, 40])),
            ("udp://other:53", Stats::from([5, 5, 5, 0, 0])),
        ]
        .into_iter()
        .collect();

        let grouped = stats.grouped();
        assert_eq!(grouped.len(), 2);
        assert_eq!(
            grouped.get("https://host"),
            Some(&Stats::from([3, 3, 3, 40, 60]))
        );
        assert_eq!(grouped.get("udp://other:53"), Some(&Stats::from([5, 5, 5, 0, 0])));
        // Grouping keeps the aggregate total intact.
        assert_eq!(grouped.total(), stats.total());
    }
}
