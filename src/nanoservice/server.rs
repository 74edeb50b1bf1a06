//! Echo/chain node HTTP server.
//!
//! # Endpoints
//! ```text
//! GET /        → "{message} [ID: {id}]"
//! GET /id      → id
//! GET /ready   → "ready" after readiness_check_delay_secs
//! GET /health  → "Healthy" after health_check_delay_secs
//! GET /file    → file content, or a not-found message
//! GET /next    → "Received a message: {body of next_service_url}"
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{HeaderMap, Request, StatusCode, Uri},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::{AppConfig, NanoserviceConfig};
use crate::error::ChainError;
use crate::forward::{DownstreamClient, HyperClient, TRACE_HEADER};
use crate::lifecycle::shutdown;

#[derive(Clone)]
struct NanoState {
    id: Arc<str>,
    app: Arc<AppConfig>,
    client: Arc<dyn DownstreamClient>,
}

/// HTTP server for the echo/chain node.
pub struct NanoService {
    router: Router,
    id: Arc<str>,
}

/// The configured id, or a fresh random one when blank.
pub fn resolve_id(configured: Option<&str>) -> String {
    match configured.map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => Uuid::new_v4().simple().to_string(),
    }
}

impl NanoService {
    pub fn new(config: NanoserviceConfig) -> Self {
        Self::with_client(config, Arc::new(HyperClient::new()))
    }

    /// Create a node whose `/next` calls go through `client`.
    pub fn with_client(config: NanoserviceConfig, client: Arc<dyn DownstreamClient>) -> Self {
        let id: Arc<str> = resolve_id(config.app.id.as_deref()).into();
        tracing::info!(id = %id, "Nanoservice ID");

        let state = NanoState {
            id: id.clone(),
            app: Arc::new(config.app.clone()),
            client,
        };

        let mut router = Router::new()
            .route("/", get(message_handler))
            .route("/id", get(id_handler))
            .route("/ready", get(ready_handler))
            .route("/health", get(health_handler))
            .route("/file", get(file_handler))
            .route("/next", get(next_handler))
            .with_state(state);

        if config.app.log_request_headers {
            tracing::info!("Logging request headers enabled");
            router = router.layer(middleware::from_fn(log_request_headers));
        }

        Self {
            router: router.layer(TraceLayer::new_for_http()),
            id,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, id = %self.id, "Nanoservice listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("Nanoservice stopped");
        Ok(())
    }
}

async fn message_handler(State(state): State<NanoState>) -> String {
    format!("{} [ID: {}]", state.app.message, state.id)
}

async fn id_handler(State(state): State<NanoState>) -> String {
    state.id.to_string()
}

async fn ready_handler(State(state): State<NanoState>) -> &'static str {
    tokio::time::sleep(Duration::from_secs(state.app.readiness_check_delay_secs)).await;
    "ready"
}

async fn health_handler(State(state): State<NanoState>) -> &'static str {
    tokio::time::sleep(Duration::from_secs(state.app.health_check_delay_secs)).await;
    "Healthy"
}

async fn file_handler(State(state): State<NanoState>) -> Result<String, (StatusCode, String)> {
    let path = &state.app.file;
    let not_found = || format!("File: '{}' was not found.", path);
    // Directories and unreadable paths count as missing.
    let is_file = tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false);
    if path.is_empty() || !is_file {
        return Ok(not_found());
    }

    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(not_found()),
        Err(e) => {
            tracing::error!(file = %path, error = %e, "Failed to read file");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// Call the next hop and relay its body. A caller-supplied `Trace` header
/// is passed along so the chain shares one trace identifier.
async fn next_handler(
    State(state): State<NanoState>,
    headers: HeaderMap,
) -> Result<String, ChainError> {
    let url = &state.app.next_service_url;
    if url.is_empty() {
        return Err(ChainError::NotConfigured);
    }
    let uri: Uri = url.parse().map_err(|_| ChainError::InvalidUrl(url.clone()))?;

    let mut request = Request::new(Body::empty());
    *request.uri_mut() = uri;
    if let Some(trace_id) = headers.get(TRACE_HEADER) {
        request.headers_mut().insert(TRACE_HEADER, trace_id.clone());
    }

    let response = state.client.send(request).await.map_err(|e| {
        tracing::warn!(url = %url, error = %e, "Next service unreachable");
        ChainError::Unreachable(e)
    })?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(url = %url, status = %status, "Next service returned an error status");
        return Err(ChainError::Status(status));
    }

    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .map_err(|e| ChainError::Body(e.into()))?;

    Ok(format!("Received a message: {}", String::from_utf8_lossy(&body)))
}

async fn log_request_headers(request: Request<Body>, next: Next) -> Response {
    let headers = request
        .headers()
        .iter()
        .map(|(name, value)| format!("{}:{}", name, value.to_str().unwrap_or("<binary>")))
        .collect::<Vec<_>>()
        .join("\n");

    tracing::info!(
        method = %request.method(),
        path = %request.uri().path(),
        headers = %headers,
        "Request headers"
    );
    next.run(request).await
}
