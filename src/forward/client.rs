//! Outbound HTTP client capability.
//!
//! The forwarding core only needs "send one request, get one response".
//! Production uses a hyper client; tests substitute a recording fake.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::BoxError;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

/// Sends exactly one request to the downstream service.
///
/// A returned `Ok` means the transport worked, whatever the status code.
/// `Err` is reserved for failures to reach the downstream at all.
#[async_trait]
pub trait DownstreamClient: Send + Sync {
    async fn send(&self, request: Request<Body>) -> Result<Response<Body>, BoxError>;
}

/// Hyper-backed client using the runtime's default connection handling.
#[derive(Clone)]
pub struct HyperClient {
    inner: Client<HttpConnector, Body>,
}

impl HyperClient {
    pub fn new() -> Self {
        let inner = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { inner }
    }
}

impl Default for HyperClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DownstreamClient for HyperClient {
    async fn send(&self, request: Request<Body>) -> Result<Response<Body>, BoxError> {
        let response = self.inner.request(request).await?;
        Ok(response.map(Body::new))
    }
}
