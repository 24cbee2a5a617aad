//! # Web Server Module
//!
//! A hyper HTTP/1.1 server exposing the ciphers over JSON.
//!
//! ## Endpoints
//!
//! | Method | Path              | Body                                   |
//! |--------|-------------------|----------------------------------------|
//! | POST   | `/cipher/atbash/` | `{"text", "encrypt"}`                  |
//! | POST   | `/cipher/caesar/` | `{"text", "encrypt", "key"}`           |
//! | POST   | `/cipher/affine/` | `{"text", "encrypt", "keys": [a, b]}`  |
//! | GET    | `/health`         | (when enabled)                         |
//! | GET    | `/metrics`        | (when enabled)                         |
//!
//! Successful cipher requests answer `200 {"text": ...}`. Failures answer
//! `{"error": ...}` with the status and message chosen by
//! [`CipherWebError::status_code`] and [`CipherWebError::client_message`].

pub mod config;
pub mod handlers;
pub mod metrics;
pub mod middleware;

// Re-export commonly used types
pub use config::ServerConfig;
pub use handlers::CipherHandler;
pub use metrics::{MetricsSnapshot, ServerMetrics};

use crate::cipher::CipherKind;
use crate::error::{CipherWebError, Result};
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, CACHE_CONTROL, CONTENT_TYPE};
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use middleware::RequestMiddleware;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{debug, error, info, instrument, warn};

/// Main server instance managing HTTP connections and request routing
///
/// ## Thread Safety
/// Shared across connection tasks behind an `Arc`; the only mutable state
/// is the atomic request counters.
#[derive(Debug)]
pub struct CipherWebServer {
    /// Server configuration
    config: ServerConfig,
    /// Request counters shared with the handler
    metrics: Arc<ServerMetrics>,
    /// Cipher endpoint handler
    cipher_handler: CipherHandler,
}

impl CipherWebServer {
    /// Create a new cipher web server instance
    ///
    /// ## Errors
    /// - `CipherWebError::ConfigError`: If configuration is invalid
    #[instrument(level = "info", name = "server_new")]
    pub fn new(config: ServerConfig) -> Result<Self> {
        config.validate()?;

        let metrics = Arc::new(ServerMetrics::new());
        let cipher_handler = CipherHandler::new(Arc::clone(&metrics), config.max_payload_size);

        info!("Cipher web server initialized");

        Ok(Self {
            config,
            metrics,
            cipher_handler,
        })
    }

    /// The configuration this server was built with
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Current request counters
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Bind `config.bind_addr` and serve until the process stops
    ///
    /// ## Errors
    /// - `CipherWebError::ServerError`: If binding or accepting fails
    #[instrument(level = "info", name = "server_start", skip(self))]
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.bind_addr;

        let listener = TcpListener::bind(bind_addr).await.map_err(|e| {
            error!("Failed to bind to address {}: {}", bind_addr, e);
            CipherWebError::server_error(
                format!("Failed to bind to address {bind_addr}: {e}"),
                Some(Box::new(e)),
            )
        })?;

        self.serve(listener).await
    }

    /// Serve connections from an already bound listener
    ///
    /// Each connection gets its own task; requests on it are handled with
    /// HTTP/1.1 keep-alive.
    ///
    /// ## Errors
    /// - `CipherWebError::ServerError`: If accepting a connection fails
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        if let Ok(local_addr) = listener.local_addr() {
            info!("Server listening on {}", local_addr);
        }

        let server = Arc::new(self);

        loop {
            let (stream, remote_addr) = listener.accept().await.map_err(|e| {
                error!("Failed to accept connection: {}", e);
                CipherWebError::server_error(
                    format!("Failed to accept connection: {e}"),
                    Some(Box::new(e)),
                )
            })?;

            let server_clone = Arc::clone(&server);

            tokio::task::spawn(async move {
                if let Err(e) = hyper::server::conn::http1::Builder::new()
                    .serve_connection(
                        TokioIo::new(stream),
                        service_fn(move |req| {
                            let server = Arc::clone(&server_clone);
                            async move { server.handle_request(req, remote_addr).await }
                        }),
                    )
                    .await
                {
                    error!("Connection error from {}: {}", remote_addr, e);
                }
            });
        }
    }

    /// Handle one HTTP request: read the body, route it, time it, count it
    #[instrument(level = "debug", name = "handle_request", skip(self, request))]
    async fn handle_request(
        &self,
        request: Request<Incoming>,
        remote_addr: SocketAddr,
    ) -> std::result::Result<Response<Full<Bytes>>, Infallible> {
        let middleware = RequestMiddleware::started();
        let method = request.method().clone();
        let path = request.uri().path().to_owned();
        self.metrics.record_request();

        let timeout = Duration::from_millis(self.config.request_timeout_ms);
        let response = match tokio::time::timeout(timeout, self.read_and_route(request)).await {
            Ok(response) => response,
            Err(_) => self.error_response(&CipherWebError::internal_error(
                format!("Request timed out after {}ms", self.config.request_timeout_ms),
                None,
            )),
        };

        let status = response.status().as_u16();
        self.metrics.record_status(status);
        middleware.log_completion(status, &path, method.as_str());

        Ok(response)
    }

    async fn read_and_route(&self, request: Request<Incoming>) -> Response<Full<Bytes>> {
        let (parts, body) = request.into_parts();

        match Limited::new(body, self.cipher_handler.max_payload_size())
            .collect()
            .await
        {
            Ok(collected) => self.route(&parts.method, parts.uri.path(), &collected.to_bytes()),
            Err(e) => self.error_response(&CipherWebError::request_error(format!(
                "Failed to read request body: {e}"
            ))),
        }
    }

    /// Produce the response for a fully read request
    ///
    /// This is the whole HTTP contract without the network: tests and
    /// benchmarks drive it directly.
    #[must_use]
    pub fn route(&self, method: &Method, path: &str, body: &[u8]) -> Response<Full<Bytes>> {
        if let Some(kind) = CipherKind::from_path(path) {
            return if method == Method::POST {
                self.handle_cipher(kind, body)
            } else {
                json_response(
                    StatusCode::METHOD_NOT_ALLOWED,
                    &json!({ "error": "Method not allowed" }),
                )
            };
        }

        match (method, path) {
            (&Method::GET, "/health") if self.config.enable_health_check => {
                self.handle_health_check()
            }
            (&Method::GET, "/metrics") if self.config.enable_metrics => self.handle_metrics(),
            _ => self.not_found(method, path),
        }
    }

    fn handle_cipher(&self, kind: CipherKind, body: &[u8]) -> Response<Full<Bytes>> {
        match self.cipher_handler.handle_body(kind, body) {
            Ok(text) => json_response(StatusCode::OK, &json!({ "text": text })),
            Err(e) => {
                debug!(cipher = %kind, "cipher request failed");
                self.error_response(&e)
            }
        }
    }

    /// Server health including request counters
    fn handle_health_check(&self) -> Response<Full<Bytes>> {
        let snapshot = self.metrics.snapshot();

        json_response(
            StatusCode::OK,
            &json!({
                "status": "healthy",
                "version": crate::VERSION,
                "requests": {
                    "total": snapshot.requests,
                    "encodes": snapshot.encodes,
                    "decodes": snapshot.decodes,
                    "error_rate": snapshot.error_rate_percent(),
                }
            }),
        )
    }

    /// Prometheus-formatted counters
    fn handle_metrics(&self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(Bytes::from(
            self.metrics.snapshot().to_prometheus(),
        )));
        let headers = response.headers_mut();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; version=0.0.4"),
        );
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        response
    }

    fn not_found(&self, method: &Method, path: &str) -> Response<Full<Bytes>> {
        warn!("Unknown endpoint: {} {}", method, path);
        json_response(StatusCode::NOT_FOUND, &json!({ "error": "Not found" }))
    }

    /// Log an error and turn it into its client-facing response
    fn error_response(&self, e: &CipherWebError) -> Response<Full<Bytes>> {
        if e.is_critical() {
            error!("Critical error handling request: {}", e.internal_message());
        } else {
            warn!("Request error: {}", e.internal_message());
        }

        let status =
            StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        json_response(status, &json!({ "error": e.client_message() }))
    }
}

/// Build a JSON response with no-cache headers
fn json_response(status: StatusCode, body: &Value) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}

/// Convenience function to start a cipher web server
///
/// ## Example
/// ```rust,no_run
/// use cipher_web::{start_server, ServerConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ServerConfig {
///         bind_addr: "127.0.0.1:5000".parse()?,
///         ..ServerConfig::default()
///     };
///
///     start_server(config).await?;
///     Ok(())
/// }
/// ```
#[instrument(level = "info", name = "start_server")]
pub async fn start_server(config: ServerConfig) -> Result<()> {
    CipherWebServer::new(config)?.start().await
}
