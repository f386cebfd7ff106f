//! User settings persisted as JSON.

use kday_storage::{StorageConfig, DEFAULT_HOST};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Name of the settings file inside the config directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Errors loading or creating settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// No config directory could be determined for this user.
    #[error("could not determine a config directory; pass --config")]
    NoConfigDir,

    /// The settings file could not be read or written.
    #[error("{}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The settings file is not valid JSON for [`UserSettings`].
    #[error("parse settings json {}: {source}", path.display())]
    Parse {
        /// Settings file.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// The settings could not be encoded as JSON.
    #[error("encode settings json {}: {source}", path.display())]
    Serialize {
        /// Settings file.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Per-user settings for the `k` command.
///
/// Field names are PascalCase on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserSettings {
    /// Root of the day files.
    pub data_dir: PathBuf,
    /// Where edit snapshots are created.
    pub tmp_dir: PathBuf,
    /// Host name stamped into new headers.
    pub name: String,
    /// Sync server address; empty for local-only use.
    #[serde(default)]
    pub server: String,
}

impl UserSettings {
    /// Default settings for a config directory.
    pub fn defaults(config_dir: &Path) -> Self {
        Self {
            data_dir: config_dir.join("data"),
            tmp_dir: config_dir.join(".tmp"),
            name: local_host_name(),
            server: String::new(),
        }
    }

    /// Loads `settings.json` from `config_dir`, writing defaults first if
    /// the file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> SettingsResult<Self> {
        fs::create_dir_all(config_dir).map_err(|source| SettingsError::Io {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let path = config_dir.join(SETTINGS_FILE);
        match fs::read(&path) {
            Ok(raw) => {
                serde_json::from_slice(&raw).map_err(|source| SettingsError::Parse { path, source })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let settings = Self::defaults(config_dir);
                settings.save(&path)?;
                info!(path = %path.display(), "created default settings");
                Ok(settings)
            }
            Err(source) => Err(SettingsError::Io { path, source }),
        }
    }

    /// Writes the settings to `path`.
    pub fn save(&self, path: &Path) -> SettingsResult<()> {
        let json = serde_json::to_vec_pretty(self).map_err(|source| SettingsError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The sync server, if one is configured.
    pub fn server(&self) -> Option<&str> {
        Some(self.server.trim()).filter(|s| !s.is_empty())
    }

    /// Storage configuration for these settings.
    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig::new(&self.data_dir)
            .tmp_dir(&self.tmp_dir)
            .host(&self.name)
    }
}

/// Default config directory, `<user config dir>/k`.
pub fn default_config_dir() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("k"))
        .ok_or(SettingsError::NoConfigDir)
}

fn local_host_name() -> String {
    host_name_or_default(system_host_name())
}

#[cfg(unix)]
fn system_host_name() -> Option<String> {
    nix::unistd::gethostname()
        .ok()
        .and_then(|name| name.into_string().ok())
}

#[cfg(not(unix))]
fn system_host_name() -> Option<String> {
    std::env::var("COMPUTERNAME").ok()
}

fn host_name_or_default(name: Option<String>) -> String {
    name.map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty() && !name.contains(|c: char| c == '\n' || c == '\r'))
        .unwrap_or_else(|| DEFAULT_HOST.to_string())
}
