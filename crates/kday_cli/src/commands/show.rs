//! Show command implementation.

use super::CliResult;
use kday_codec::{split_segments, Segment};
use kday_storage::{DayStore, Timestamp};
use std::io::Write;

/// Writes the day containing `time` to `out`.
///
/// With `list`, writes one line per segment instead: open time, host and
/// body line count.
pub fn run(store: &DayStore, time: &Timestamp, list: bool, out: &mut dyn Write) -> CliResult<()> {
    let day = store.read(time)?;
    if !list {
        out.write_all(&day)?;
        return Ok(());
    }

    for raw in split_segments(&day)? {
        let segment = Segment::parse(&raw)?;
        let lines = segment.body_text().lines().count();
        writeln!(
            out,
            "{:>8}  {}  ({} line{})",
            segment.header.time,
            segment.header.host,
            lines,
            if lines == 1 { "" } else { "s" }
        )?;
    }
    Ok(())
}
