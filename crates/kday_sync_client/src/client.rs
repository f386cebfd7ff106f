//! Day-file mirroring against a sync server.

use crate::config::ClientConfig;
use crate::error::SyncResult;
use crate::http::{HttpClient, UreqClient};
use kday_storage::{DayStore, Timestamp};
use tracing::{debug, info};

/// Mirrors local day files with a sync server.
///
/// The server holds the canonical copy of each day. Every successful call
/// that returns a day overwrites the local file with it, so after an upload
/// or download the local day matches the server byte for byte.
pub struct SyncClient<C: HttpClient> {
    client: C,
    base_url: String,
    store: DayStore,
}

impl SyncClient<UreqClient> {
    /// Creates a client that talks HTTP with `ureq`.
    pub fn connect(config: &ClientConfig, store: DayStore) -> Self {
        Self::new(UreqClient::new(config.timeout), config.base_url(), store)
    }
}

impl<C: HttpClient> SyncClient<C> {
    /// Creates a client over an arbitrary HTTP implementation.
    pub fn new(client: C, base_url: impl Into<String>, store: DayStore) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            store,
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the local store.
    pub fn store(&self) -> &DayStore {
        &self.store
    }

    /// Checks that the server is reachable.
    pub fn check(&self) -> SyncResult<()> {
        let url = format!("{}/ping", self.base_url);
        self.client.get(&url)?.into_body()?;
        debug!(server = %self.base_url, "server reachable");
        Ok(())
    }

    /// Fetches the server's copy of the day containing `time` and stores it
    /// locally, replacing whatever was there.
    pub fn download_day(&self, time: &Timestamp) -> SyncResult<Vec<u8>> {
        let day = self.client.get(&self.day_url(time))?.into_body()?;
        self.store.write(time, &day[..], true)?;
        info!(bytes = day.len(), "downloaded day");
        Ok(day)
    }

    /// Sends a freshly written segment to the server and stores the merged
    /// day it answers with.
    ///
    /// The local day file is not touched if the upload fails.
    pub fn upload_segment(&self, time: &Timestamp, segment: &[u8]) -> SyncResult<Vec<u8>> {
        let day = self
            .client
            .post(&self.day_url(time), segment)?
            .into_body()?;
        self.store.write(time, &day[..], true)?;
        info!(sent = segment.len(), bytes = day.len(), "uploaded segment");
        Ok(day)
    }

    fn day_url(&self, time: &Timestamp) -> String {
        format!("{}/day?t={}", self.base_url, time.timestamp())
    }
}
