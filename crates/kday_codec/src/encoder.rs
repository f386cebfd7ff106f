//! Header writer.

use crate::error::{CodecError, CodecResult};
use crate::header::{HEADER_INDICATOR, HEADER_TIME_FORMAT};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::io::Write;

/// Renders the header line for `time` and `host`, newline included.
///
/// # Errors
///
/// Returns [`CodecError::InvalidHost`] if `host` contains a line break.
pub fn format_header<Tz>(time: &DateTime<Tz>, host: &str) -> CodecResult<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if host.contains(|c: char| c == '\n' || c == '\r') {
        return Err(CodecError::InvalidHost {
            host: host.to_string(),
        });
    }
    Ok(format!(
        "{HEADER_INDICATOR} at {} on {host}\n",
        time.format(HEADER_TIME_FORMAT)
    ))
}

/// Writes one header line to `dst` and returns the number of bytes written.
///
/// Nothing is written if the host is rejected.
///
/// # Errors
///
/// Returns [`CodecError::InvalidHost`] for hosts with line breaks, or
/// [`CodecError::Io`] if the write fails.
pub fn write_header<W, Tz>(dst: &mut W, time: &DateTime<Tz>, host: &str) -> CodecResult<usize>
where
    W: Write + ?Sized,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let line = format_header(time, host)?;
    dst.write_all(line.as_bytes())?;
    Ok(line.len())
}
