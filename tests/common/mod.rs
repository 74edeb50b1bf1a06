//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{Request, Response, StatusCode},
    Router,
};
use nanomesh::config::{NanoserviceConfig, SidecarConfig};
use nanomesh::{HttpServer, NanoService, Shutdown};
use tokio::net::TcpListener;

/// Counts requests reaching the mock downstream.
#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Start a mock downstream that describes what it received.
///
/// Body: `"{METHOD} {path?query}\n{request body}"`. Headers `x-seen-*` echo
/// the request's `trace`, `x-env` and `authorization` headers ("none" when
/// absent). A path of `/status/{code}` answers with that status; `/seen-trace`
/// answers with just the received `trace` value.
pub async fn start_echo_backend() -> (SocketAddr, Hits) {
    let hits = Hits::default();
    let app = Router::new().fallback(echo).with_state(hits.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, hits)
}

async fn echo(State(hits): State<Hits>, request: Request<Body>) -> Response<Body> {
    hits.0.fetch_add(1, Ordering::SeqCst);

    let (parts, body) = request.into_parts();
    let path = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();
    let status = path
        .strip_prefix("/status/")
        .and_then(|code| code.parse::<u16>().ok())
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::OK);
    let body = to_bytes(body, usize::MAX).await.unwrap();

    let seen = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("none")
            .to_string()
    };

    if path == "/seen-trace" {
        return Response::new(Body::from(seen("trace")));
    }

    Response::builder()
        .status(status)
        .header("x-seen-trace", seen("trace"))
        .header("x-seen-env", seen("x-env"))
        .header("x-seen-authorization", seen("authorization"))
        .body(Body::from(format!(
            "{} {}\n{}",
            parts.method,
            path,
            String::from_utf8_lossy(&body)
        )))
        .unwrap()
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Run a sidecar on an ephemeral port.
pub async fn start_sidecar(config: SidecarConfig) -> (SocketAddr, Shutdown) {
    spawn_sidecar(HttpServer::new(config).unwrap()).await
}

/// Run an already built sidecar on an ephemeral port.
pub async fn spawn_sidecar(server: HttpServer) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}

/// Run a nanoservice on an ephemeral port.
pub async fn start_nanoservice(config: NanoserviceConfig) -> (SocketAddr, Shutdown) {
    spawn_nanoservice(NanoService::new(config)).await
}

/// Run an already built nanoservice on an ephemeral port.
pub async fn spawn_nanoservice(service: NanoService) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = service.run(listener, rx).await;
    });

    (addr, shutdown)
}

/// Sidecar config forwarding to `downstream`.
pub fn sidecar_config(downstream: SocketAddr) -> SidecarConfig {
    let mut config = SidecarConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.forwarding.downstream_base_url = format!("http://{}", downstream);
    config
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
