//! Demo: a handful of worker threads generate fake traffic against three
//! targets, serialized per target by a [`KeyedLock`], then both reporters
//! render the accumulated statistics.
//!
//! Run with:
//! ```bash
//! cargo run --example report
//! ```

use std::sync::Arc;
use std::thread;

use loadgauge::keyed_lock::KeyedLock;
use loadgauge::reporters::console::ConsoleReporter;
use loadgauge::reporters::log::TracingReporter;
use loadgauge::reporters::Reporter;
use loadgauge::stats::Stat;
use loadgauge::tracker::StatsTracker;

const TARGETS: [&str; 3] = [
    "https://alpha.example.com",
    "https://bravo.example.com/api",
    "udp://charlie.example.com:9000",
];

fn run_workers(locks: &Arc<KeyedLock>, tracker: &Arc<StatsTracker>, rounds: usize) {
    let mut handles = vec![];
    for worker in 0..4 {
        let locks = Arc::clone(locks);
        let tracker = Arc::clone(tracker);
        handles.push(thread::spawn(move || {
            for round in 0..rounds {
                let target = TARGETS[(worker + round) % TARGETS.len()];
                let _guard = locks.lock(target);

                let payload = 256 + (round as u64 % 64) * 16;
                tracker.add(target, Stat::RequestsAttempted, 1);
                tracker.add(target, Stat::RequestsSent, 1);
                tracker.add(target, Stat::BytesSent, payload);
                // Every seventh request goes unanswered.
                if round % 7 != 0 {
                    tracker.add(target, Stat::ResponsesReceived, 1);
                    tracker.add(target, Stat::BytesReceived, payload / 2);
                }
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}

fn main() {
    tracing_subscriber::fmt().init();

    let locks = Arc::new(KeyedLock::new());
    let tracker = Arc::new(StatsTracker::new());

    let mut console = ConsoleReporter::new(std::io::stdout());
    let mut log = TracingReporter::new().group_targets(true);

    // First burst, then a console report: the interval equals the lifetime
    // totals on the first report ever.
    run_workers(&locks, &tracker, 250);
    console.write_summary(&tracker).unwrap();

    // Second burst, then both renderings of the new interval.
    run_workers(&locks, &tracker, 100);
    console.write_summary(&tracker).unwrap();
    log.write_summary(&tracker).unwrap();
}
