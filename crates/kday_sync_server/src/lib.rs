//! # kday Sync Server
//!
//! HTTP server that hosts the canonical copy of every day file.
//!
//! Clients upload the segment they just wrote with `POST /day?t=<unix>`;
//! the server prepends it to its own day file under the day lock and
//! returns the merged day, which the client stores verbatim. `GET` returns
//! the day without modifying it.
//!
//! The request logic lives in [`RequestHandler`], which knows nothing
//! about HTTP framing; [`SyncServer`] wires it into an axum router.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod handler;
mod server;

pub use config::{ServerConfig, DEFAULT_MAX_BODY_BYTES};
pub use error::{ServerError, ServerResult};
pub use handler::{parse_time, DayResponse, RequestHandler, TIME_PARAM};
pub use server::SyncServer;
