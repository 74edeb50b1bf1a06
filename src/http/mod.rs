//! Sidecar HTTP protocol handling.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, TraceLayer, Trace id assignment)
//!     → /_sidecar answered locally
//!     → everything else handed to the forwarding core
//!     → response streamed back to the client
//! ```

pub mod server;

pub use server::{AppState, HttpServer, STATUS_PATH};
