//! The day-file storage engine.

use crate::config::StorageConfig;
use crate::error::{StorageError, StorageResult};
use crate::layout::{DayAddress, DAY_FILE_EXTENSION};
use crate::lock::DayLock;
use chrono::{DateTime, FixedOffset, Local};
use kday_codec::{format_header, read_segment};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Point in time addressed by the engine.
///
/// Day, week and header clock are all taken in the timestamp's own offset.
pub type Timestamp = DateTime<FixedOffset>;

/// Returns the current local time as a [`Timestamp`].
#[must_use]
pub fn now() -> Timestamp {
    let now = Local::now();
    now.with_timezone(now.offset())
}

/// A store of day files under one root directory.
///
/// Every read or write of a day file happens while holding its
/// [`DayLock`], so concurrent callers on this host are serialized per day
/// while different days proceed in parallel.
///
/// # Example
///
/// ```no_run
/// use kday_storage::{now, DayStore, StorageConfig};
///
/// let store = DayStore::open(StorageConfig::new("/data/k").host("laptop")).unwrap();
/// let t = now();
///
/// let snapshot = store.new_segment_file(&t).unwrap();
/// // ... let the user edit snapshot.path ...
/// let segment = snapshot.read().unwrap();
/// store.write(&t, &segment[..], false).unwrap();
/// snapshot.remove().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DayStore {
    config: StorageConfig,
}

impl DayStore {
    /// Opens a store, creating the root and snapshot directories if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if either directory cannot be created.
    pub fn open(config: StorageConfig) -> StorageResult<Self> {
        fs::create_dir_all(&config.root).map_err(StorageError::io("create storage root"))?;
        fs::create_dir_all(&config.tmp_dir).map_err(StorageError::io("create temp dir"))?;

        info!(
            root = %config.root.display(),
            host = %config.host,
            "opened day store"
        );
        Ok(Self { config })
    }

    /// Returns the store configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Returns the local host name stamped into new headers.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Returns the storage root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Returns the day file path for `time`, creating its week directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn day_file(&self, time: &Timestamp) -> StorageResult<PathBuf> {
        let addr = DayAddress::of(time);
        addr.ensure_dir(self.root())
            .map_err(StorageError::io("create day dir"))?;
        Ok(addr.file_in(self.root()))
    }

    /// Acquires exclusive access to the day file for `time`.
    ///
    /// Blocks until any other holder on this host releases it. The file is
    /// created empty if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created, opened or locked.
    pub fn lock_day(&self, time: &Timestamp) -> StorageResult<DayLock> {
        let path = self.day_file(time)?;
        DayLock::acquire(&path)
    }

    /// Creates an edit snapshot for the day containing `time`.
    ///
    /// The snapshot is a new file in the temp directory holding a fresh
    /// header (stamped with `time` and the local host) followed by a
    /// verbatim copy of the day file. No lock is held once this returns.
    /// The caller owns the file and is responsible for removing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be created or written, or
    /// the day file cannot be locked or read. A partially written snapshot
    /// is removed.
    pub fn new_segment_file(&self, time: &Timestamp) -> StorageResult<SegmentFile> {
        let addr = DayAddress::of(time);
        addr.ensure_dir(self.root())
            .map_err(StorageError::io("create day dir"))?;

        let mut tmp = tempfile::Builder::new()
            .prefix(&addr.snapshot_prefix())
            .suffix(&format!(".{DAY_FILE_EXTENSION}"))
            .tempfile_in(&self.config.tmp_dir)
            .map_err(StorageError::io("create snapshot"))?;

        let header = format_header(time, &self.config.host)?;
        tmp.write_all(header.as_bytes())
            .map_err(StorageError::io("write header"))?;

        {
            let mut day = DayLock::acquire(&addr.file_in(self.root()))?;
            io::copy(&mut day, tmp.as_file_mut()).map_err(StorageError::io("copy day file"))?;
        }

        let (_, path) = tmp
            .keep()
            .map_err(|e| StorageError::io("keep snapshot")(e.error))?;

        debug!(path = %path.display(), "created snapshot");
        Ok(SegmentFile {
            time: *time,
            host: self.config.host.clone(),
            path,
        })
    }

    /// Returns the full current content of the day file for `time`.
    ///
    /// A day that was never written reads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the day file cannot be locked or read.
    pub fn read(&self, time: &Timestamp) -> StorageResult<Vec<u8>> {
        let mut day = self.lock_day(time)?;
        day.read_all().map_err(StorageError::io("read day file"))
    }

    /// Commits `data` to the day file for `time`.
    ///
    /// With `overwrite == false` the new data is placed ahead of everything
    /// currently stored, including segments other sessions wrote since a
    /// snapshot was taken. With `overwrite == true` the day file is replaced
    /// by `data`.
    ///
    /// The day file is truncated before being rewritten; a crash between the
    /// truncate and the final write loses data.
    ///
    /// # Errors
    ///
    /// Returns an error naming the failed phase. The lock is released on
    /// every path.
    pub fn write<R: Read>(&self, time: &Timestamp, mut data: R, overwrite: bool) -> StorageResult<()> {
        let mut day = self.lock_day(time)?;

        let old = if overwrite {
            Vec::new()
        } else {
            day.read_all().map_err(StorageError::io("read day file"))?
        };

        // The day is untouched until the new content is fully in memory.
        let mut new = Vec::new();
        data.read_to_end(&mut new)
            .map_err(StorageError::io("read new data"))?;

        day.truncate().map_err(StorageError::io("truncate day file"))?;
        day.write_all(&new)
            .map_err(StorageError::io("write new data"))?;
        day.write_all(&old)
            .map_err(StorageError::io("write old data"))?;
        day.flush().map_err(StorageError::io("flush day file"))?;
        day.sync().map_err(StorageError::io("sync day file"))?;

        debug!(
            path = %day.path().display(),
            new_bytes = new.len(),
            kept_bytes = old.len(),
            overwrite,
            "committed day file"
        );
        Ok(())
    }
}

/// An edit snapshot created by [`DayStore::new_segment_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentFile {
    /// Time stamped into the snapshot header.
    pub time: Timestamp,
    /// Host stamped into the snapshot header.
    pub host: String,
    /// Location of the snapshot file.
    pub path: PathBuf,
}

impl SegmentFile {
    /// Reads back the segment this session authored.
    ///
    /// Returns the snapshot's own header plus whatever was written after
    /// it, stopping at the copied day file's first header.
    ///
    /// # Errors
    ///
    /// Returns a format error if the header was removed from the file.
    pub fn read(&self) -> StorageResult<Vec<u8>> {
        let src = File::open(&self.path).map_err(StorageError::io("open snapshot"))?;
        Ok(read_segment(src)?)
    }

    /// Deletes the snapshot file.
    pub fn remove(self) -> StorageResult<()> {
        fs::remove_file(&self.path).map_err(StorageError::io("remove snapshot"))
    }
}
