//! Error types for the codec crate.

use std::io;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while writing or reading segments.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The stream does not begin with the header indicator.
    ///
    /// `found` holds the bytes that were sampled in place of the indicator.
    #[error("`{}` not header", String::from_utf8_lossy(found))]
    NotSegmentStart {
        /// Bytes read where the indicator was expected.
        found: Vec<u8>,
    },

    /// A header line could not be parsed.
    #[error("invalid header line: {message}")]
    InvalidHeader {
        /// Description of what is wrong with the line.
        message: String,
    },

    /// A host name that would break the single-line header.
    #[error("host name must not contain line breaks: {host:?}")]
    InvalidHost {
        /// The rejected host name.
        host: String,
    },

    /// I/O error while reading or writing the stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Returns true if the stream was readable but not a segment.
    ///
    /// Short reads while sampling the indicator are I/O errors, not
    /// format errors.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            CodecError::NotSegmentStart { .. } | CodecError::InvalidHeader { .. }
        )
    }
}
