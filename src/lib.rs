//! # Loadgauge - Instrumentation for Load Generators
//!
//! A small concurrency-safe toolkit for traffic-generating tools: a per-key
//! mutual-exclusion primitive for serializing work against a dynamic set of
//! string-identified resources, and a counter-based metrics model that
//! accumulates per-target traffic statistics and periodically renders human-
//! and machine-readable summaries.
//!
//! ## Components
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`keyed_lock`] | One exclusive lock per string key, created lazily; distinct keys never contend |
//! | [`stats`] | The closed counter enumeration, the fixed counter vector, and the per-target map with its diff model |
//! | [`tracker`] | Live atomic counters plus the last-reported baseline that turns snapshots into interval deltas |
//! | [`reporters`] | The two summary renderings: a structured `tracing` event and an aligned console table |
//!
//! ## How it fits together
//!
//! Producers serialize per-target bursts with [`keyed_lock::KeyedLock`] and
//! record one increment per observed event on a shared
//! [`tracker::StatsTracker`]. Periodically, something on the reporting side
//! calls [`reporters::Reporter::write_summary`], which captures a consistent
//! snapshot, diffs it against the snapshot of the previous report, advances
//! that baseline, and renders both the lifetime totals and the fresh interval
//! deltas.
//!
//! ```text
//!  producers                 tracker                     reporters
//!  ─────────   add(t,s,v)   ┌──────────────┐  summary   ┌───────────────┐
//!  worker ──────────────►   │ per-target   │ ─────────► │ tracing event │
//!  worker ──────────────►   │ AtomicU64[5] │            ├───────────────┤
//!  worker ──────────────►   │ + baseline   │ ─────────► │ console table │
//!  ─────────                └──────────────┘            └───────────────┘
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use loadgauge::keyed_lock::KeyedLock;
//! use loadgauge::reporters::console::ConsoleReporter;
//! use loadgauge::reporters::Reporter;
//! use loadgauge::stats::Stat;
//! use loadgauge::tracker::StatsTracker;
//!
//! let locks = KeyedLock::new();
//! let tracker = StatsTracker::new();
//!
//! // A producer serializes one burst against its target, then records it.
//! {
//!     let _guard = locks.lock("https://example.com");
//!     tracker.add("https://example.com", Stat::RequestsAttempted, 1);
//!     tracker.add("https://example.com", Stat::RequestsSent, 1);
//!     tracker.add("https://example.com", Stat::BytesSent, 512);
//! }
//!
//! // The reporting path renders totals and since-last-report deltas.
//! let mut reporter = ConsoleReporter::new(std::io::stdout());
//! reporter.write_summary(&tracker).unwrap();
//! ```
//!
//! ## Thread safety
//!
//! Everything here is built for parallel producers. Counter increments are
//! relaxed atomic fetch-adds on cache-line-padded slots; the keyed-lock
//! registry holds its own lock only for the get-or-create step, so acquiring
//! one key never blocks callers of another; and the report baseline is
//! guarded by its own mutex, so concurrent summaries yield successive,
//! non-overlapping intervals.
//!
//! Counters are cumulative for the lifetime of the process. Neither tracked
//! targets nor lock registry entries are ever evicted; both grow with the
//! number of distinct names observed, which is the intended trade-off for
//! the small, bounded cardinalities of a load generator's target list.

pub mod keyed_lock;
pub mod reporters;
pub mod stats;
pub mod tracker;
