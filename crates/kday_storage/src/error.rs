//! Error types for storage operations.

use kday_codec::CodecError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A snapshot or segment does not have the expected format.
    #[error("format error: {0}")]
    Format(#[from] CodecError),

    /// The exclusive lock on a day file could not be acquired.
    #[error("lock {}: {source}", path.display())]
    Lock {
        /// Day file that was being locked.
        path: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },

    /// An I/O error occurred during the named phase.
    #[error("{phase}: {source}")]
    Io {
        /// Which step of the operation failed.
        phase: &'static str,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl StorageError {
    /// Returns a closure wrapping an I/O error with `phase`.
    ///
    /// Intended for `map_err`:
    ///
    /// ```ignore
    /// file.read_to_end(&mut buf).map_err(StorageError::io("read day file"))?;
    /// ```
    pub fn io(phase: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::Io { phase, source }
    }

    /// Returns true if this is a format error rather than an I/O failure.
    pub fn is_format_error(&self) -> bool {
        match self {
            StorageError::Format(e) => e.is_format_error(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_phase() {
        let err = StorageError::io("truncate day file")(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.to_string(), "truncate day file: denied");
    }

    #[test]
    fn format_classification() {
        let err = StorageError::from(CodecError::NotSegmentStart {
            found: b"xxxxxxxxxxxxxxx".to_vec(),
        });
        assert!(err.is_format_error());

        let err = StorageError::from(CodecError::Io(io::ErrorKind::UnexpectedEof.into()));
        assert!(!err.is_format_error());
    }
}
