//! Edit command implementation.
//!
//! Snapshots today's file, opens it in `$EDITOR`, and commits whatever the
//! user wrote under the fresh header, either to the server or locally.

use super::CliResult;
use crate::settings::UserSettings;
use kday_storage::{now, DayStore, Timestamp};
use kday_sync_client::{ClientConfig, HttpClient, SyncClient, UreqClient};
use std::io;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info, warn};

/// Editor used when `$EDITOR` is unset.
pub const FALLBACK_EDITOR: &str = "vi";

/// Runs the edit command.
pub fn run(settings: &UserSettings, offline: bool) -> CliResult<()> {
    let store = DayStore::open(settings.storage_config())?;
    let time = now();

    let client: Option<SyncClient<UreqClient>> = match settings.server() {
        Some(server) if !offline => Some(SyncClient::connect(
            &ClientConfig::new(server),
            store.clone(),
        )),
        _ => None,
    };
    if let Some(client) = &client {
        client
            .download_day(&time)
            .map_err(|e| format!("connect to server: {e}"))?;
    }

    let editor = editor_command();
    session(&store, client.as_ref(), &time, |path| run_editor(&editor, path))?;
    Ok(())
}

/// One edit session: snapshot, edit, read back, commit.
///
/// The snapshot is removed only once the segment is committed; on any later
/// failure the error names the file so the note is not lost.
pub fn session<C: HttpClient>(
    store: &DayStore,
    client: Option<&SyncClient<C>>,
    time: &Timestamp,
    edit: impl FnOnce(&Path) -> io::Result<()>,
) -> CliResult<Vec<u8>> {
    let snapshot = store.new_segment_file(time)?;
    debug!(path = %snapshot.path.display(), "created snapshot");

    let kept = |what: &str, e: &dyn std::fmt::Display| {
        format!("{what}: {e} (note kept at {})", snapshot.path.display())
    };

    edit(&snapshot.path).map_err(|e| kept("editor", &e))?;
    let segment = snapshot.read().map_err(|e| kept("read segment", &e))?;

    match client {
        Some(client) => {
            client
                .upload_segment(time, &segment)
                .map_err(|e| kept("upload segment", &e))?;
        }
        None => {
            store
                .write(time, &segment[..], false)
                .map_err(|e| kept("append segment", &e))?;
        }
    }
    info!(bytes = segment.len(), "committed segment");

    if let Err(e) = snapshot.remove() {
        warn!(error = %e, "failed to remove snapshot");
    }
    Ok(segment)
}

/// The editor command line from `$EDITOR`.
pub fn editor_command() -> String {
    std::env::var("EDITOR")
        .ok()
        .filter(|editor| !editor.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}

/// Runs `editor` on `path` with the terminal attached.
///
/// `editor` may carry arguments, e.g. `code --wait`.
pub fn run_editor(editor: &str, path: &Path) -> io::Result<()> {
    let mut words = editor.split_whitespace();
    let program = words
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty editor command"))?;

    let status = Command::new(program).args(words).arg(path).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("editor exited {status}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kday_codec::{split_segments, Segment};
    use chrono::{FixedOffset, TimeZone};
    use kday_storage::StorageConfig;
    use std::fs;

    fn noon() -> Timestamp {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 4, 2, 12, 0, 0)
            .unwrap()
    }

    fn store(temp: &tempfile::TempDir) -> DayStore {
        DayStore::open(
            StorageConfig::new(temp.path().join("data"))
                .tmp_dir(temp.path().join("tmp"))
                .host("desk"),
        )
        .unwrap()
    }

    /// Types `text` right below the header, like a user would.
    fn type_below_header(text: &'static str) -> impl FnOnce(&Path) -> io::Result<()> {
        move |path: &Path| {
            let mut content = fs::read(path)?;
            let end = content.iter().position(|&b| b == b'\n').map_or(0, |i| i + 1);
            content.splice(end..end, text.bytes());
            fs::write(path, content)
        }
    }

    #[test]
    fn local_session_prepends_note() {
        let temp = tempfile::tempdir().unwrap();
        let store = store(&temp);
        let t = noon();

        session::<UreqClient>(&store, None, &t, type_below_header("first\n")).unwrap();
        session::<UreqClient>(&store, None, &t, type_below_header("second\n")).unwrap();

        let day = store.read(&t).unwrap();
        let segments = split_segments(&day).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(Segment::parse(&segments[0]).unwrap().body, b"second\n");
        assert_eq!(Segment::parse(&segments[1]).unwrap().body, b"first\n");

        let leftovers = fs::read_dir(temp.path().join("tmp")).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn failed_edit_keeps_snapshot() {
        let temp = tempfile::tempdir().unwrap();
        let store = store(&temp);
        let t = noon();

        let err = session::<UreqClient>(&store, None, &t, |_| Err(io::Error::other("boom")))
            .unwrap_err()
            .to_string();
        assert!(err.contains("note kept at"), "{err}");
        assert_eq!(fs::read_dir(temp.path().join("tmp")).unwrap().count(), 1);
        assert!(store.read(&t).unwrap().is_empty());
    }

    #[test]
    fn stripped_header_is_not_committed() {
        let temp = tempfile::tempdir().unwrap();
        let store = store(&temp);
        let t = noon();

        let err = session::<UreqClient>(&store, None, &t, |path| fs::write(path, "no header\n"));
        assert!(err.is_err());
        assert!(store.read(&t).unwrap().is_empty());
    }

    #[test]
    fn editor_with_arguments() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("note.k");
        fs::write(&path, "x").unwrap();

        run_editor("true --ignored", &path).unwrap();
        assert!(run_editor("false", &path).is_err());
        assert!(run_editor("   ", &path).is_err());
    }
}
