//! HTTP front end for the request handler.

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::{DayResponse, RequestHandler};
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, RawQuery, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::Router;
use kday_storage::DayStore;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// The sync server.
///
/// Exposes one day store over HTTP:
///
/// - `GET /day?t=<unix>` returns the day containing `t`
/// - `POST /day?t=<unix>` prepends the body to that day and returns the result
/// - `GET /ping` answers `pong`
///
/// # Example
///
/// ```no_run
/// use kday_storage::{DayStore, StorageConfig};
/// use kday_sync_server::{ServerConfig, SyncServer};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let store = DayStore::open(StorageConfig::new(".").host("server"))?;
/// let server = SyncServer::new(ServerConfig::default(), store);
/// server.serve().await?;
/// # Ok(())
/// # }
/// ```
pub struct SyncServer {
    config: ServerConfig,
    handler: Arc<RequestHandler>,
}

impl SyncServer {
    /// Creates a new sync server over `store`.
    pub fn new(config: ServerConfig, store: DayStore) -> Self {
        let handler = Arc::new(RequestHandler::new(Arc::new(store)));
        Self { config, handler }
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the framework-independent request handler.
    pub fn handler(&self) -> Arc<RequestHandler> {
        Arc::clone(&self.handler)
    }

    /// Builds the axum router for this server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/day", any(day))
            .route("/ping", get(ping))
            .layer(DefaultBodyLimit::max(self.config.max_body_bytes))
            .with_state(Arc::clone(&self.handler))
    }

    /// Binds the configured address and serves until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve_on(listener, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!(addr = %listener.local_addr()?, "sync server listening");
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("sync server stopped");
        Ok(())
    }
}

async fn day(
    State(handler): State<Arc<RequestHandler>>,
    method: Method,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Response {
    let response = tokio::task::spawn_blocking(move || {
        handler.handle(method.as_str(), query.as_deref(), &body)
    })
    .await;

    match response {
        Ok(response) => response.into_response(),
        Err(e) => {
            error!(error = %e, "day handler panicked");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn ping() -> &'static str {
    "pong"
}

impl IntoResponse for DayResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.body,
        )
            .into_response()
    }
}
