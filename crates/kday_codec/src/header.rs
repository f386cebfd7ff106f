//! Header line format.
//!
//! Every segment opens with exactly one header line:
//!
//! ```text
//! #>> Note opened at 3:04 pm on laptop
//! ```
//!
//! The time is a 12-hour clock without a leading zero on the hour and a
//! lowercase meridiem. The host is written verbatim.

use crate::error::{CodecError, CodecResult};
use chrono::NaiveTime;

/// Marker that every segment, and therefore every valid day file, starts with.
pub const HEADER_INDICATOR: &str = "#>> Note opened";

/// `chrono` format string for the header time of day.
pub const HEADER_TIME_FORMAT: &str = "%-I:%M %P";

const TIME_PREFIX: &str = " at ";
const HOST_SEPARATOR: &str = " on ";

/// A parsed header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Time of day exactly as written, e.g. `3:04 pm`.
    pub time: String,
    /// Host that opened the note.
    pub host: String,
}

impl Header {
    /// Parses a header line, with or without its trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NotSegmentStart`] if the line does not begin
    /// with [`HEADER_INDICATOR`], or [`CodecError::InvalidHeader`] if the
    /// remainder is malformed.
    pub fn parse(line: &str) -> CodecResult<Self> {
        let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
        let rest = line
            .strip_prefix(HEADER_INDICATOR)
            .ok_or_else(|| CodecError::NotSegmentStart {
                found: line.bytes().take(HEADER_INDICATOR.len()).collect(),
            })?;
        let rest = rest
            .strip_prefix(TIME_PREFIX)
            .ok_or_else(|| CodecError::invalid_header("missing ` at `"))?;
        let (time, host) = rest
            .split_once(HOST_SEPARATOR)
            .ok_or_else(|| CodecError::invalid_header("missing ` on `"))?;

        if parse_clock(time).is_none() {
            return Err(CodecError::invalid_header(format!(
                "bad time of day `{time}`"
            )));
        }

        Ok(Self {
            time: time.to_string(),
            host: host.to_string(),
        })
    }

    /// Returns the header time as a [`NaiveTime`] (seconds are zero).
    pub fn time_of_day(&self) -> CodecResult<NaiveTime> {
        parse_clock(&self.time)
            .ok_or_else(|| CodecError::invalid_header(format!("bad time of day `{}`", self.time)))
    }
}

/// Parses `h:mm am|pm`.
fn parse_clock(s: &str) -> Option<NaiveTime> {
    let (clock, meridiem) = s.split_once(' ')?;
    let (hour, minute) = clock.split_once(':')?;
    if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
        return None;
    }
    if !hour.bytes().chain(minute.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    if !(1..=12).contains(&hour) {
        return None;
    }
    let hour = match meridiem {
        "am" => hour % 12,
        "pm" => hour % 12 + 12,
        _ => return None,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}
