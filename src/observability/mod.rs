//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (request_id, method, url, status)
//!     → tower-http TraceLayer spans around every request
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, pretty or JSON)
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level
//! - JSON format for machine parsing, pretty format for development

pub mod logging;

#[cfg(test)]
pub(crate) mod capture;

pub use logging::init_logging;
