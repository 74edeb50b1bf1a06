//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (binaries):
//!     Load config → Validate → Init logging → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight calls → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Servers receive an already bound listener and a shutdown receiver,
//!   so tests can run them on ephemeral ports

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
