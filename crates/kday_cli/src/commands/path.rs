//! Path command implementation.

use super::CliResult;
use kday_storage::{DayStore, Timestamp};
use std::path::PathBuf;

/// Returns the file holding the day containing `time`, creating its
/// directory if needed.
pub fn run(store: &DayStore, time: &Timestamp) -> CliResult<PathBuf> {
    Ok(store.day_file(time)?)
}
