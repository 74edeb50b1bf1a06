//! Sidecar HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum Router (dispatch table) with all handlers
//! - Wire up middleware (tracing, trace id assignment)
//! - Answer the reserved status path locally
//! - Hand every other GET/POST/PUT/DELETE to the forwarding core
//!
//! # Dispatch Table
//! ```text
//! GET                  /_sidecar   → status_handler
//! GET|POST|PUT|DELETE  /           → forward_handler
//! GET|POST|PUT|DELETE  /{*path}    → forward_handler   (catch-all, matched last)
//! HEAD                 /, /{*path} → reject_method     (405, never forwarded)
//! anything else                    → 405 from the method router
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, Response, StatusCode},
    routing::{get, MethodRouter},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::Span;
use uuid::Uuid;

use crate::config::SidecarConfig;
use crate::error::ForwardError;
use crate::forward::{
    trace::trace_id_layer, DownstreamClient, Forwarder, HyperClient, InboundRequest, TRACE_HEADER,
};
use crate::lifecycle::shutdown;

/// Reserved path answered by the sidecar itself, never forwarded.
pub const STATUS_PATH: &str = "/_sidecar";

/// Methods the forwarding routes accept, advertised on 405.
const FORWARDED_METHODS: &str = "GET,POST,PUT,DELETE";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
    /// Generated once per process.
    pub instance_id: Arc<str>,
}

/// HTTP server for the sidecar proxy.
pub struct HttpServer {
    router: Router,
    config: SidecarConfig,
    instance_id: Arc<str>,
}

impl HttpServer {
    /// Create a server forwarding through a hyper client.
    pub fn new(config: SidecarConfig) -> Result<Self, ForwardError> {
        Self::with_client(config, Arc::new(HyperClient::new()))
    }

    /// Create a server forwarding through the given client.
    pub fn with_client(
        config: SidecarConfig,
        client: Arc<dyn DownstreamClient>,
    ) -> Result<Self, ForwardError> {
        let forwarder = Arc::new(Forwarder::new(&config.forwarding, client)?);
        let instance_id: Arc<str> = Uuid::new_v4().simple().to_string().into();

        let state = AppState {
            forwarder,
            instance_id: instance_id.clone(),
        };

        Ok(Self {
            router: Self::build_router(state),
            config,
            instance_id,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let forward: MethodRouter<AppState> = get(forward_handler)
            .post(forward_handler)
            .put(forward_handler)
            .delete(forward_handler)
            .head(reject_method);

        Router::new()
            .route(STATUS_PATH, get(status_handler))
            .route("/", forward.clone())
            .route("/{*path}", forward)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(trace_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(request_span)),
            )
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            downstream = %self.config.forwarding.downstream_base_url,
            instance_id = %self.instance_id,
            "Sidecar listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("Sidecar stopped");
        Ok(())
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }
}

/// Identity of this sidecar process.
async fn status_handler(State(state): State<AppState>) -> String {
    format!("sidecar [ID: {}]", state.instance_id)
}

/// Span for one inbound call. Runs after trace id assignment, so the
/// `trace` field is always populated.
pub(crate) fn request_span(request: &Request<Body>) -> Span {
    let trace = request
        .headers()
        .get(TRACE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        trace = %trace,
    )
}

/// HEAD would otherwise be served by the GET route.
async fn reject_method() -> (StatusCode, [(header::HeaderName, &'static str); 1]) {
    (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, FORWARDED_METHODS)])
}

/// Forward the call downstream; errors become 5xx via `IntoResponse`.
async fn forward_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<Response<Body>, ForwardError> {
    let inbound = InboundRequest::from_request(request);
    let method = inbound.method.clone();
    let path = inbound.path.clone();

    state.forwarder.forward(inbound).await.map_err(|e| {
        tracing::error!(method = %method, path = %path, error = %e, "Forwarding failed");
        e
    })
}
