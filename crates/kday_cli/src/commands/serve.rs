//! Serve command implementation.

use super::CliResult;
use kday_storage::{DayStore, StorageConfig};
use kday_sync_server::{ServerConfig, SyncServer};
use std::net::SocketAddr;
use std::path::Path;

/// Host name the server stamps into headers it creates.
pub const SERVER_HOST: &str = "server";

/// Port used when neither `--bind` nor `PORT` is given.
pub const DEFAULT_PORT: u16 = 8080;

/// Runs the sync server until Ctrl-C.
pub fn run(root: &Path, bind: Option<SocketAddr>, max_body_bytes: Option<usize>) -> CliResult<()> {
    let addr = bind_addr(bind, std::env::var("PORT").ok().as_deref())?;
    let store = DayStore::open(StorageConfig::new(root).host(SERVER_HOST))?;

    let mut config = ServerConfig::new(addr);
    if let Some(max) = max_body_bytes {
        config = config.with_max_body_bytes(max);
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(SyncServer::new(config, store).serve())?;
    Ok(())
}

/// Address to listen on: `--bind`, else every interface on `PORT`.
pub fn bind_addr(bind: Option<SocketAddr>, port: Option<&str>) -> CliResult<SocketAddr> {
    if let Some(addr) = bind {
        return Ok(addr);
    }
    let port = match port.map(str::trim).filter(|p| !p.is_empty()) {
        Some(port) => port
            .parse()
            .map_err(|e| format!("invalid PORT `{port}`: {e}"))?,
        None => DEFAULT_PORT,
    };
    Ok(SocketAddr::from(([0, 0, 0, 0], port)))
}
