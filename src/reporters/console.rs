//! Console reporter: a fixed-width aligned traffic table.
//!
//! Rows are written as tab-separated cells and pushed through an
//! elastic-tabstop writer, which pads every column to the width of its
//! widest cell. One row per target in lexicographic order, then a separator
//! row and a `Total` row with the aggregate vectors. Request counters render
//! as `interval/lifetime`; byte counters as `X.XX MB/Y.YY MB`.
//!
//! ```text
//!  --- Traffic stats ---
//! | Target | Requests attempted | Requests sent | Responses received | ...
//! |      A |               5/15 |          4/12 |               4/12 | ...
//! |    --- |                --- |           --- |                --- | ...
//! |  Total |               5/20 |          4/17 |               4/17 | ...
//! ```

use std::io::{BufWriter, Write};

use tabwriter::{Alignment, TabWriter};

use super::{Reporter, Result};
use crate::stats::{Stat, Stats};
use crate::tracker::{StatsTracker, Summary};

const BYTES_IN_MEGABYTE: f64 = (1024 * 1024) as f64;

/// A [`Reporter`] that renders summaries as an aligned table on a byte sink.
///
/// The sink is buffered internally; every `write_summary` call flushes all
/// the way through to the underlying writer before returning.
///
/// # Examples
///
/// ```rust
/// use loadgauge::reporters::console::ConsoleReporter;
/// use loadgauge::reporters::Reporter;
/// use loadgauge::stats::Stat;
/// use loadgauge::tracker::StatsTracker;
///
/// let tracker = StatsTracker::new();
/// tracker.add("https://example.com", Stat::RequestsAttempted, 1);
///
/// let mut reporter = ConsoleReporter::new(std::io::stdout());
/// reporter.write_summary(&tracker).unwrap();
/// ```
pub struct ConsoleReporter<W: Write> {
    sink: BufWriter<W>,
    group_targets: bool,
}

impl<W: Write> ConsoleReporter<W> {
    /// Creates a reporter writing to `sink`.
    pub fn new(sink: W) -> Self {
        Self {
            sink: BufWriter::new(sink),
            group_targets: false,
        }
    }

    /// Folds targets that share a group label into one row each.
    pub fn group_targets(mut self, enabled: bool) -> Self {
        self.group_targets = enabled;
        self
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn write_summary(&mut self, tracker: &StatsTracker) -> Result<()> {
        let summary = tracker.summary(self.group_targets);

        {
            let mut table = TabWriter::new(&mut self.sink)
                .minwidth(1)
                .padding(1)
                .alignment(Alignment::Right);
            write_table(&mut table, &summary)?;
            table.flush()?;
        }

        // Flush the remains of the buffered sink as well.
        self.sink.flush()?;
        Ok(())
    }
}

fn write_table(out: &mut impl Write, summary: &Summary) -> Result<()> {
    writeln!(out, "\n --- Traffic stats ---")?;
    writeln!(
        out,
        "|\tTarget\t|\tRequests attempted\t|\tRequests sent\t|\tResponses received\t|\tData sent\t|\tData received \t|"
    )?;

    for (target, stats) in summary.targets.iter() {
        let interval = summary
            .targets_interval
            .get(target)
            .copied()
            .unwrap_or_default();
        write_row(out, target, stats, &interval)?;
    }

    writeln!(out, "|\t---\t|\t---\t|\t---\t|\t---\t|\t---\t|\t--- \t|")?;
    write_row(out, "Total", &summary.total, &summary.total_interval)?;
    writeln!(out)?;
    Ok(())
}

fn write_row(out: &mut impl Write, name: &str, stats: &Stats, interval: &Stats) -> Result<()> {
    writeln!(
        out,
        "|\t{}\t|\t{}/{}\t|\t{}/{}\t|\t{}/{}\t|\t{:.2} MB/{:.2} MB\t|\t{:.2} MB/{:.2} MB \t|",
        name,
        interval[Stat::RequestsAttempted],
        stats[Stat::RequestsAttempted],
        interval[Stat::RequestsSent],
        stats[Stat::RequestsSent],
        interval[Stat::ResponsesReceived],
        stats[Stat::ResponsesReceived],
        interval[Stat::BytesSent] as f64 / BYTES_IN_MEGABYTE,
        stats[Stat::BytesSent] as f64 / BYTES_IN_MEGABYTE,
        interval[Stat::BytesReceived] as f64 / BYTES_IN_MEGABYTE,
        stats[Stat::BytesReceived] as f64 / BYTES_IN_MEGABYTE,
    )?;
    Ok(())
}
