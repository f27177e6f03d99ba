//! HTTP server implementation.
//!
//! The main HTTP server for Daedalus, built on Hyper and Tokio:
//!
//! - TCP listener bound to the configured address
//! - One spawned task per connection, tracked for graceful drain
//! - Request routing via the [`Router`](crate::Router)
//! - Upload body caps and request timeouts
//!
//! # Example
//!
//! ```rust,ignore
//! use daedalus_server::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::builder()
//!         .http_addr("0.0.0.0:8080")
//!         .build();
//!
//!     Server::new(config).run().await?;
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::net::TcpListener;

use daedalus_core::{ErrorEnvelope, ProjectStore};
use daedalus_engine::{ArtifactRetriever, IngestionPipeline};
use daedalus_parser::ParsingService;

use crate::config::ServerConfig;
use crate::router::{Operation, Router};
use crate::routes::{self, AppState, Body};
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Type alias for the HTTP response.
pub type HttpResponse = Response<Body>;

/// Errors raised while running the server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The listener could not be bound.
    #[error("failed to bind: {0}")]
    Bind(String),

    /// An I/O error occurred while accepting connections.
    #[error("server I/O error")]
    Io(#[from] std::io::Error),
}

/// The Daedalus HTTP server.
///
/// Routes incoming requests to the ingestion pipeline and artifact
/// retriever, and handles graceful shutdown.
pub struct Server {
    config: ServerConfig,
    router: Router,
    state: AppState,
}

impl Server {
    /// Creates a server with fresh shared state, extracting under the
    /// configured workspace directory.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let store = Arc::new(ProjectStore::new());
        let parser = Arc::new(ParsingService::new());
        let state = AppState {
            pipeline: IngestionPipeline::new(
                Arc::clone(&store),
                Arc::clone(&parser),
                config.workspace_dir().to_path_buf(),
            ),
            retriever: ArtifactRetriever::new(Arc::clone(&store), Arc::clone(&parser)),
            store,
        };
        Self::with_state(config, state)
    }

    /// Creates a server over existing shared state.
    #[must_use]
    pub fn with_state(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            router: Router::with_api_routes(),
            state,
        }
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the shared application state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Runs the server until SIGTERM or SIGINT.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot bind to the configured
    /// address or an I/O error occurs while accepting connections.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Runs the server with a custom shutdown signal.
    ///
    /// Useful for tests and programmatic shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot bind or accept.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self.config.socket_addr().map_err(|e| {
            ServerError::Bind(format!("invalid address '{}': {e}", self.config.http_addr()))
        })?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(format!("failed to bind to {addr}: {e}")))?;

        tracing::info!("server listening on {addr}");

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            let server = Arc::clone(&server);
                            let token = tracker.acquire();
                            let shutdown_clone = shutdown.clone();

                            tokio::spawn(async move {
                                if let Err(e) = server.handle_connection(stream, remote_addr, shutdown_clone).await {
                                    tracing::error!("connection error from {remote_addr}: {e}");
                                }
                                drop(token);
                            });
                        }
                        Err(e) => {
                            tracing::error!("failed to accept connection: {e}");
                        }
                    }
                }

                _ = shutdown.recv() => {
                    tracing::info!("shutdown signal received, stopping server");
                    break;
                }
            }
        }

        let shutdown_timeout = server.config.shutdown_timeout();
        tracing::info!(
            "waiting up to {:?} for {} connections to close",
            shutdown_timeout,
            tracker.active_connections()
        );

        tokio::select! {
            _ = tracker.wait_for_drain() => {
                tracing::info!("all connections closed");
            }
            _ = tokio::time::sleep(shutdown_timeout) => {
                tracing::warn!(
                    "shutdown timeout reached, {} connections still active",
                    tracker.active_connections()
                );
            }
        }

        tracing::info!("server stopped");
        Ok(())
    }

    /// Handles a single connection.
    async fn handle_connection(
        self: &Arc<Self>,
        stream: tokio::net::TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let server = Arc::clone(self);

        let service = service_fn(move |req: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { server.handle_request(req).await }
        });

        let conn = http1::Builder::new().serve_connection(io, service);

        tokio::select! {
            result = conn => result,
            _ = shutdown.recv() => {
                tracing::debug!("connection from {remote_addr} closed due to shutdown");
                Ok(())
            }
        }
    }

    /// Handles a single HTTP request: collect the body (bounded and
    /// timed), then dispatch to the matched operation.
    async fn handle_request<B>(self: &Arc<Self>, req: Request<B>) -> Result<HttpResponse, Infallible>
    where
        B: hyper::body::Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        tracing::debug!("{method} {path}");

        let max_upload = self.config.max_upload_bytes();

        // Fast reject on a declared oversized body.
        if declared_length(req.headers()) > Some(max_upload as u64) {
            return Ok(payload_too_large(max_upload));
        }

        let headers = req.headers().clone();
        let body_result =
            tokio::time::timeout(self.config.request_timeout(), collect_body(req, max_upload))
                .await;

        let body = match body_result {
            Ok(Ok(body)) => body,
            Ok(Err(CollectError::TooLarge)) => return Ok(payload_too_large(max_upload)),
            Ok(Err(CollectError::Read(e))) => {
                tracing::error!("failed to collect request body: {e}");
                return Ok(envelope_response(
                    StatusCode::BAD_REQUEST,
                    format!("failed to read request body: {e}"),
                ));
            }
            Err(_) => {
                tracing::warn!("request body collection timed out");
                return Ok(envelope_response(
                    StatusCode::REQUEST_TIMEOUT,
                    "request body collection timed out".to_string(),
                ));
            }
        };

        let response = tokio::time::timeout(
            self.config.request_timeout(),
            self.dispatch(&method, &path, &headers, body),
        )
        .await;

        match response {
            Ok(resp) => Ok(resp),
            Err(_) => {
                tracing::warn!("handler timed out for {method} {path}");
                Ok(envelope_response(
                    StatusCode::GATEWAY_TIMEOUT,
                    "request handling timed out".to_string(),
                ))
            }
        }
    }

    /// Routes one request to its operation handler.
    ///
    /// Exposed so integration tests can drive the full routing and
    /// handler stack without a TCP listener.
    pub async fn dispatch(
        &self,
        method: &Method,
        path: &str,
        headers: &HeaderMap,
        body: Bytes,
    ) -> HttpResponse {
        let Some(route) = self.router.match_route(method, path) else {
            return envelope_response(
                StatusCode::NOT_FOUND,
                format!("no route for {method} {path}"),
            );
        };

        let project_id = route.param("projectId").unwrap_or_default();
        match route.operation() {
            Operation::UploadProject => routes::upload_project(&self.state, headers, body).await,
            Operation::GetProject => routes::get_project(&self.state, project_id),
            Operation::GetUmlText => routes::get_uml_text(&self.state, project_id),
            Operation::GetUmlSvg => routes::get_uml_svg(&self.state, project_id),
            Operation::DeleteParsed => routes::delete_parsed(&self.state, project_id),
            Operation::Health => routes::health(),
        }
    }
}

/// Failure collecting a request body.
enum CollectError {
    /// The body grew past the upload cap while streaming.
    TooLarge,
    /// The connection failed mid-body.
    Read(Box<dyn std::error::Error + Send + Sync>),
}

/// Collects the request body into bytes, enforcing `max` while
/// streaming. A body with no declared length cannot buffer past the cap.
async fn collect_body<B>(req: Request<B>, max: usize) -> Result<Bytes, CollectError>
where
    B: hyper::body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(req.into_body(), max).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(CollectError::TooLarge),
        Err(e) => Err(CollectError::Read(e)),
    }
}

/// Parses the declared `Content-Length`, if any.
fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(http::header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

fn payload_too_large(max: usize) -> HttpResponse {
    envelope_response(
        StatusCode::PAYLOAD_TOO_LARGE,
        format!("upload exceeds maximum size of {max} bytes"),
    )
}

/// Renders a bare error envelope outside the service taxonomy.
fn envelope_response(status: StatusCode, message: String) -> HttpResponse {
    let envelope = ErrorEnvelope::new(status, vec![message]);
    let body = serde_json::to_vec(&envelope)
        .unwrap_or_else(|_| br#"{"errors":["internal error"]}"#.to_vec());

    Response::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(http_body_util::Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| Response::new(http_body_util::Full::new(Bytes::new())))
}
