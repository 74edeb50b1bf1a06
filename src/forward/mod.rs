//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (any path, GET/POST/PUT/DELETE)
//!     → trace.rs (Trace header kept or assigned by the transport layer)
//!     → forwarder.rs (target = base URL + path, body for POST/PUT only)
//!     → headers.rs (trace + configured request headers, existing wins)
//!     → client.rs (exactly one outbound call)
//!     → forwarder.rs (status copied, hop-by-hop stripped, Trace re-asserted,
//!                     configured response headers merged, body streamed back)
//! ```
//!
//! # Design Decisions
//! - No retries, no load balancing: one call to one static target
//! - Bodies stream in both directions, never buffered
//! - Existing headers always win over configured ones

pub mod client;
pub mod forwarder;
pub mod headers;
pub mod trace;

pub use client::{DownstreamClient, HyperClient};
pub use forwarder::{Forwarder, InboundRequest};
pub use trace::{MakeTraceId, TRACE_HEADER};
