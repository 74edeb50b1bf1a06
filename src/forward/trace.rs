//! Trace identifier assignment.
//!
//! Every inbound call carries a trace identifier in the `Trace` header. A
//! caller-supplied value is kept as-is so the identifier survives chained
//! hops; otherwise `MakeTraceId` mints `<process-prefix>:<sequence>`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId, SetRequestIdLayer};
use uuid::Uuid;

/// Name of the header carrying the trace identifier across hops.
pub const TRACE_HEADER: &str = "trace";

/// Generates trace identifiers unique within this process.
#[derive(Debug, Clone)]
pub struct MakeTraceId {
    prefix: Arc<str>,
    sequence: Arc<AtomicU64>,
}

impl MakeTraceId {
    /// Create a generator with a random per-process prefix.
    pub fn new() -> Self {
        let simple = Uuid::new_v4().simple().to_string();
        Self::with_prefix(simple[..13].to_uppercase())
    }

    /// Create a generator with a fixed prefix.
    pub fn with_prefix(prefix: impl Into<Arc<str>>) -> Self {
        Self {
            prefix: prefix.into(),
            sequence: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Produce the next identifier.
    pub fn next_id(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{}:{:08X}", self.prefix, seq)
    }
}

impl Default for MakeTraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl MakeRequestId for MakeTraceId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::try_from(self.next_id()).ok().map(RequestId::new)
    }
}

/// Layer that fills in the `Trace` header when the caller did not send one.
pub fn trace_id_layer() -> SetRequestIdLayer<MakeTraceId> {
    SetRequestIdLayer::new(HeaderName::from_static(TRACE_HEADER), MakeTraceId::new())
}
