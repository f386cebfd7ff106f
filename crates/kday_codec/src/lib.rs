//! # kday Codec
//!
//! The text format of kday day files and edit snapshots.
//!
//! A day file is a sequence of **segments**, newest first. Each segment is a
//! header line followed by free-form body lines:
//!
//! ```text
//! #>> Note opened at 3:04 pm on laptop
//! body text...
//! #>> Note opened at 9:12 am on laptop
//! older body text...
//! ```
//!
//! A stream that does not start with [`HEADER_INDICATOR`] is not a segment.
//!
//! ## Usage
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use kday_codec::{read_segment, write_header, Segment};
//!
//! let t = Utc.with_ymd_and_hms(2024, 3, 14, 15, 4, 0).unwrap();
//! let mut buf = Vec::new();
//! write_header(&mut buf, &t, "laptop").unwrap();
//! buf.extend_from_slice(b"hello\n");
//!
//! let segment = read_segment(&buf[..]).unwrap();
//! let parsed = Segment::parse(&segment).unwrap();
//! assert_eq!(parsed.header.host, "laptop");
//! assert_eq!(parsed.header.time, "3:04 pm");
//! assert_eq!(parsed.body_text(), "hello\n");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod header;

pub use decoder::{read_segment, split_segments, Segment, SegmentReader};
pub use encoder::{format_header, write_header};
pub use error::{CodecError, CodecResult};
pub use header::{Header, HEADER_INDICATOR, HEADER_TIME_FORMAT};
