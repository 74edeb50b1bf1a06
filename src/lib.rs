//! Nanomesh: HTTP test fixtures for service-to-service networking.
//!
//! - `sidecar`: a forwarding proxy that relays every call to one configured
//!   downstream, propagating a `Trace` header and fixed header sets.
//! - `nanoservice`: an echo/chain node with delayed health and readiness probes.

pub mod config;
pub mod error;
pub mod forward;
pub mod http;
pub mod lifecycle;
pub mod nanoservice;
pub mod observability;

pub use config::{NanoserviceConfig, SidecarConfig};
pub use error::{ChainError, ForwardError};
pub use forward::Forwarder;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use nanoservice::NanoService;
