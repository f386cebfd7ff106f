//! Storage configuration.

use std::path::{Path, PathBuf};

/// Host name used when none is configured.
pub const DEFAULT_HOST: &str = "unknown";

/// Configuration for opening a [`crate::DayStore`].
///
/// Everything the engine needs from its environment is passed in here;
/// the engine never reads environment variables itself.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory holding `<iso_year>/<iso_week>/<weekday>.k` files.
    pub root: PathBuf,

    /// Directory where edit snapshots are created.
    pub tmp_dir: PathBuf,

    /// Host name stamped into new segment headers.
    pub host: String,
}

impl StorageConfig {
    /// Creates a configuration rooted at `root`.
    ///
    /// Snapshots go to the system temp directory and the host is
    /// [`DEFAULT_HOST`] until overridden.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tmp_dir: std::env::temp_dir(),
            host: DEFAULT_HOST.to_string(),
        }
    }

    /// Sets the snapshot directory.
    #[must_use]
    pub fn tmp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tmp_dir = dir.into();
        self
    }

    /// Sets the local host name.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Returns the storage root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}
