//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, then <PREFIX>_<OPTION> env overrides)
//!     → validation.rs (semantic checks)
//!     → SidecarConfig / NanoserviceConfig (validated, immutable)
//!     → shared via Arc to all request handlers
//! ```
//!
//! # Design Decisions
//! - Config is loaded once at startup and never changes afterwards
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_nanoservice_config, load_sidecar_config, ConfigError};
pub use schema::{
    AppConfig, ForwardingConfig, ListenerConfig, LogFormat, NanoserviceConfig,
    ObservabilityConfig, SidecarConfig,
};
pub use validation::ValidationError;
