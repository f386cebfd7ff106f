//! Request handling for the day endpoint.
//!
//! The handler is independent of the HTTP framework: it takes a method,
//! the raw query string and the body, and returns a status and body. The
//! axum glue in [`crate::SyncServer`] runs it on a blocking thread.

use crate::error::{ServerError, ServerResult};
use chrono::{Local, TimeZone};
use kday_storage::{DayStore, Timestamp};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Query parameter carrying the unix timestamp.
pub const TIME_PARAM: &str = "t";

/// Status and body produced for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl DayResponse {
    /// A 200 response.
    pub fn ok(body: Vec<u8>) -> Self {
        Self { status: 200, body }
    }
}

impl From<ServerError> for DayResponse {
    fn from(err: ServerError) -> Self {
        // Client errors carry a diagnostic; server errors are only logged.
        let body = if err.is_client_error() {
            err.to_string().into_bytes()
        } else {
            Vec::new()
        };
        Self {
            status: err.status_code(),
            body,
        }
    }
}

/// Handler for day requests.
pub struct RequestHandler {
    store: Arc<DayStore>,
}

impl RequestHandler {
    /// Creates a new request handler over `store`.
    pub fn new(store: Arc<DayStore>) -> Self {
        Self { store }
    }

    /// Returns the backing store.
    pub fn store(&self) -> &DayStore {
        &self.store
    }

    /// Handles one request to the day endpoint.
    ///
    /// The time parameter is checked before the method, so a request with
    /// both problems reports the time.
    pub fn handle(&self, method: &str, query: Option<&str>, body: &[u8]) -> DayResponse {
        match self.dispatch(method, query, body) {
            Ok(body) => DayResponse::ok(body),
            Err(err) => {
                if err.is_server_error() {
                    error!(method, error = %err, "day request failed");
                } else {
                    debug!(method, error = %err, "rejected day request");
                }
                err.into()
            }
        }
    }

    fn dispatch(&self, method: &str, query: Option<&str>, body: &[u8]) -> ServerResult<Vec<u8>> {
        let time = parse_time(query)?;
        match method {
            "GET" => self.download(&time),
            "POST" => self.append(&time, body),
            other => Err(ServerError::UnknownMethod(other.to_string())),
        }
    }

    /// Returns the full content of the day containing `time`.
    pub fn download(&self, time: &Timestamp) -> ServerResult<Vec<u8>> {
        info!(day = %time.format("%Y-%m-%d"), "handle request");
        Ok(self.store.read(time)?)
    }

    /// Prepends `segment` to the day and returns the resulting content.
    ///
    /// The uploaded bytes are stored as-is; the host field inside them is
    /// not checked.
    pub fn append(&self, time: &Timestamp, segment: &[u8]) -> ServerResult<Vec<u8>> {
        self.store.write(time, segment, false)?;
        debug!(bytes = segment.len(), "appended segment");
        self.download(time)
    }
}

/// Extracts the `t` parameter and converts it to local time.
pub fn parse_time(query: Option<&str>) -> ServerResult<Timestamp> {
    let raw = query
        .unwrap_or_default()
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == TIME_PARAM)
        .map(|(_, value)| value)
        .unwrap_or_default();

    let secs: i64 = raw
        .parse()
        .map_err(|e| ServerError::InvalidTime(format!("`{raw}`: {e}")))?;
    let local = Local
        .timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| ServerError::InvalidTime(format!("`{raw}`: out of range")))?;

    Ok(local.with_timezone(local.offset()))
}
