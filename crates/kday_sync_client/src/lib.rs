//! # kday Sync Client
//!
//! Blocking client for the kday sync server.
//!
//! A [`SyncClient`] pairs an HTTP transport with the local [`DayStore`]:
//!
//! - [`SyncClient::check`] pings the server
//! - [`SyncClient::download_day`] replaces the local day with the server's
//! - [`SyncClient::upload_segment`] posts a new segment and stores the
//!   merged day the server answers with
//!
//! The transport is abstracted by [`HttpClient`]. [`UreqClient`] is the
//! production implementation; [`LoopbackClient`] hands requests straight to
//! an in-process [`LoopbackServer`].
//!
//! [`DayStore`]: kday_storage::DayStore

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod error;
mod http;

pub use client::SyncClient;
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use error::{SyncError, SyncResult};
pub use http::{HttpClient, HttpResponse, LoopbackClient, LoopbackServer, UreqClient};
