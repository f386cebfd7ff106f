//! Segment reader.

use crate::error::{CodecError, CodecResult};
use crate::header::{Header, HEADER_INDICATOR};
use std::borrow::Cow;
use std::io::{BufRead, BufReader, Read};

/// Reads exactly one segment from the front of `src`.
///
/// The returned buffer holds the opening header line followed by every body
/// line up to, but not including, the next header line or end of stream.
///
/// # Errors
///
/// - [`CodecError::Io`] if fewer bytes than the indicator could be read
/// - [`CodecError::NotSegmentStart`] if the first bytes are not the indicator
pub fn read_segment<R: Read>(src: R) -> CodecResult<Vec<u8>> {
    let mut reader = SegmentReader::new(BufReader::new(src));
    Ok(reader.next_segment()?.unwrap_or_default())
}

/// Splits a whole day file into its segments, newest first.
///
/// An empty input has no segments.
pub fn split_segments(data: &[u8]) -> CodecResult<Vec<Vec<u8>>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    SegmentReader::new(data).collect()
}

/// Streaming reader yielding consecutive segments.
///
/// A header line that ends one segment is held back and becomes the start
/// of the next, so repeated calls never drop bytes.
///
/// # Example
///
/// ```
/// use kday_codec::SegmentReader;
///
/// let day = b"#>> Note opened at 9:00 pm on a\nlate\n#>> Note opened at 8:00 am on a\nearly\n";
/// let mut reader = SegmentReader::new(&day[..]);
///
/// let newest = reader.next_segment().unwrap().unwrap();
/// assert_eq!(newest, b"#>> Note opened at 9:00 pm on a\nlate\n");
/// let oldest = reader.next_segment().unwrap().unwrap();
/// assert_eq!(oldest, b"#>> Note opened at 8:00 am on a\nearly\n");
/// assert!(reader.next_segment().unwrap().is_none());
/// ```
#[derive(Debug)]
pub struct SegmentReader<R> {
    inner: R,
    /// Header line that terminated the previous segment.
    pending: Option<Vec<u8>>,
    started: bool,
}

impl<R: BufRead> SegmentReader<R> {
    /// Create a new reader over `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: None,
            started: false,
        }
    }

    /// Reads the next segment, or `None` once the stream is exhausted.
    ///
    /// # Errors
    ///
    /// The first call fails the same way [`read_segment`] does. Later calls
    /// only fail on I/O errors.
    pub fn next_segment(&mut self) -> CodecResult<Option<Vec<u8>>> {
        let mut segment = match self.pending.take() {
            Some(header_line) => header_line,
            None if self.started => return Ok(None),
            None => {
                self.started = true;
                self.read_first_header()?
            }
        };

        loop {
            let mut line = Vec::new();
            if self.inner.read_until(b'\n', &mut line)? == 0 {
                return Ok(Some(segment));
            }
            if line.starts_with(HEADER_INDICATOR.as_bytes()) {
                self.pending = Some(line);
                return Ok(Some(segment));
            }
            segment.extend_from_slice(&line);
        }
    }

    /// Returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn read_first_header(&mut self) -> CodecResult<Vec<u8>> {
        let mut peek = vec![0u8; HEADER_INDICATOR.len()];
        self.inner.read_exact(&mut peek)?;
        if peek != HEADER_INDICATOR.as_bytes() {
            return Err(CodecError::NotSegmentStart { found: peek });
        }
        // The rest of the header line belongs to this segment no matter
        // what it contains.
        self.inner.read_until(b'\n', &mut peek)?;
        Ok(peek)
    }
}

impl<R: BufRead> Iterator for SegmentReader<R> {
    type Item = CodecResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_segment().transpose()
    }
}

/// A segment split into its header and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Parsed header line.
    pub header: Header,
    /// Everything after the header line.
    pub body: Vec<u8>,
}

impl Segment {
    /// Parses a single segment buffer as produced by [`read_segment`].
    ///
    /// # Errors
    ///
    /// Returns a format error if the header line is missing or malformed.
    pub fn parse(data: &[u8]) -> CodecResult<Self> {
        let split = data
            .iter()
            .position(|&b| b == b'\n')
            .map_or(data.len(), |i| i + 1);
        let (line, body) = data.split_at(split);
        let line = std::str::from_utf8(line)
            .map_err(|_| CodecError::invalid_header("header is not UTF-8"))?;

        Ok(Self {
            header: Header::parse(line)?,
            body: body.to_vec(),
        })
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
