//! # kday Storage
//!
//! The day-file storage engine behind the `k` journal.
//!
//! Notes are stored one file per calendar day, bucketed by ISO week:
//! `<root>/<iso_year>/<iso_week>/<weekday>.k` with Monday = 0. A day file
//! holds header-delimited segments, newest first (see `kday_codec`).
//!
//! ## Operations
//!
//! - [`DayStore::new_segment_file`] - snapshot a day into a temp file for
//!   offline editing, seeded with a fresh header
//! - [`SegmentFile::read`] - extract the segment an edit session produced
//! - [`DayStore::write`] - prepend new content (or overwrite) under lock
//! - [`DayStore::read`] - return a day's full content under lock
//!
//! ## Locking
//!
//! Each operation holds a [`DayLock`], a blocking exclusive advisory lock on
//! the day file, for the length of its read-modify-write. The lock is
//! host-local; cross-host consistency is left to the sync layer.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod layout;
mod lock;
mod store;

pub use config::{StorageConfig, DEFAULT_HOST};
pub use error::{StorageError, StorageResult};
pub use layout::{DayAddress, DAY_FILE_EXTENSION};
pub use lock::DayLock;
pub use store::{now, DayStore, SegmentFile, Timestamp};
