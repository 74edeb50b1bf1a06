//! Configuration schema definitions.
//!
//! This module defines the configuration structures for both binaries.
//! All types derive Serde traits for deserialization from config files.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the sidecar proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SidecarConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Downstream target and header policy.
    pub forwarding: ForwardingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Root configuration for the nanoservice (echo/chain node).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NanoserviceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Endpoint behavior.
    pub app: AppConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for NanoserviceConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig {
                bind_address: "0.0.0.0:5000".to_string(),
            },
            app: AppConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Forwarding configuration, immutable once loaded.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Base URL every inbound path is appended to (e.g., "http://backend:9000").
    pub downstream_base_url: String,

    /// Headers merged into every outbound request.
    pub request_headers: HashMap<String, String>,

    /// Headers merged into every response relayed to the caller.
    pub response_headers: HashMap<String, String>,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            downstream_base_url: "http://127.0.0.1:5000".to_string(),
            request_headers: HashMap::new(),
            response_headers: HashMap::new(),
        }
    }
}

/// Nanoservice endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Instance identifier. Blank means one is generated at startup.
    pub id: Option<String>,

    /// Message returned by `/`.
    pub message: String,

    /// File served by `/file`.
    pub file: String,

    /// URL called by `/next`.
    pub next_service_url: String,

    /// Delay before `/health` answers, in seconds.
    pub health_check_delay_secs: u64,

    /// Delay before `/ready` answers, in seconds.
    pub readiness_check_delay_secs: u64,

    /// Log every request's headers.
    pub log_request_headers: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            id: None,
            message: "Hello".to_string(),
            file: String::new(),
            next_service_url: String::new(),
            health_check_delay_secs: 0,
            readiness_check_delay_secs: 0,
            log_request_headers: false,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: SidecarConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.forwarding.downstream_base_url, "http://127.0.0.1:5000");
        assert!(config.forwarding.request_headers.is_empty());
        assert_eq!(config.observability.log_format, LogFormat::Pretty);

        let nano: NanoserviceConfig = toml::from_str("").unwrap();
        assert_eq!(nano.listener.bind_address, "0.0.0.0:5000");
        assert_eq!(nano.app.message, "Hello");
    }

    #[test]
    fn header_tables_deserialize() {
        let config: SidecarConfig = toml::from_str(
            r#"
            [forwarding]
            downstream_base_url = "http://backend:9000"

            [forwarding.request_headers]
            X-Env = "staging"

            [forwarding.response_headers]
            X-Served-By = "sidecar"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.forwarding.downstream_base_url, "http://backend:9000");
        assert_eq!(config.forwarding.request_headers["X-Env"], "staging");
        assert_eq!(config.forwarding.response_headers["X-Served-By"], "sidecar");
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }
}
