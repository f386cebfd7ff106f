//! Exclusive day access.

use crate::error::{StorageError, StorageResult};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// An open day file held under an exclusive advisory lock.
///
/// The lock is released when the guard is dropped, on every exit path.
/// It serializes writers on this host only; other hosts touching a
/// replicated copy of the same path are not excluded.
///
/// # Example
///
/// ```no_run
/// use kday_storage::DayLock;
/// use std::io::Read;
/// use std::path::Path;
///
/// let mut day = DayLock::acquire(Path::new("/data/2024/11/0.k")).unwrap();
/// let mut content = Vec::new();
/// day.read_to_end(&mut content).unwrap();
/// // lock released here
/// ```
#[derive(Debug)]
pub struct DayLock {
    path: PathBuf,
    file: File,
}

impl DayLock {
    /// Opens `path`, creating an empty file if it is missing, and blocks
    /// until the exclusive lock is granted.
    ///
    /// Create-or-open is a single atomic open, so two first-time callers
    /// both end up with the same empty file.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Io`] if the file cannot be opened
    /// - [`StorageError::Lock`] if the lock call fails; no retry is made
    pub fn acquire(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(StorageError::io("open day file"))?;

        trace!(path = %path.display(), "waiting for day lock");
        FileExt::lock_exclusive(&file).map_err(|source| StorageError::Lock {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "day lock acquired");

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Returns the path of the locked day file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole file from the start.
    pub fn read_all(&mut self) -> io::Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut content = Vec::new();
        self.file.read_to_end(&mut content)?;
        Ok(content)
    }

    /// Empties the file and rewinds to the start.
    pub fn truncate(&mut self) -> io::Result<()> {
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Flushes file contents to disk.
    pub fn sync(&self) -> io::Result<()> {
        self.file.sync_all()
    }
}

impl Read for DayLock {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for DayLock {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Drop for DayLock {
    fn drop(&mut self) {
        // The handle closes right after, which releases the lock anyway.
        if let Err(e) = FileExt::unlock(&self.file) {
            debug!(path = %self.path.display(), error = %e, "day unlock failed");
        }
        trace!(path = %self.path.display(), "day lock released");
    }
}
