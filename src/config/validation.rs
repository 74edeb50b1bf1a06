//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that targets are absolute `http` URLs
//! - Check that configured header sets are representable on the wire
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: config → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashMap;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::{NanoserviceConfig, SidecarConfig};
use crate::forward::headers::compile_headers;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending option.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate the sidecar configuration.
pub fn validate_sidecar(config: &SidecarConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_bind_address(&config.listener.bind_address, &mut errors);
    check_http_url(
        "forwarding.downstream_base_url",
        &config.forwarding.downstream_base_url,
        &mut errors,
    );
    check_headers(
        "forwarding.request_headers",
        &config.forwarding.request_headers,
        &mut errors,
    );
    check_headers(
        "forwarding.response_headers",
        &config.forwarding.response_headers,
        &mut errors,
    );

    finish(errors)
}

/// Validate the nanoservice configuration.
pub fn validate_nanoservice(config: &NanoserviceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_bind_address(&config.listener.bind_address, &mut errors);
    if !config.app.next_service_url.is_empty() {
        check_http_url("app.next_service_url", &config.app.next_service_url, &mut errors);
    }

    finish(errors)
}

fn finish(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_bind_address(address: &str, errors: &mut Vec<ValidationError>) {
    if let Err(e) = address.parse::<SocketAddr>() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address ({})", address, e),
        ));
    }
}

fn check_http_url(field: &str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.is_empty() {
        errors.push(ValidationError::new(field, "must not be empty"));
        return;
    }

    match Url::parse(value) {
        Ok(url) if url.scheme() != "http" => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}', only http is forwarded", url.scheme()),
        )),
        Ok(url) if url.host().is_none() => {
            errors.push(ValidationError::new(field, format!("'{}' has no host", value)))
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new(
            field,
            format!("'{}' is not an absolute URL ({})", value, e),
        )),
    }
}

fn check_headers(field: &str, headers: &HashMap<String, String>, errors: &mut Vec<ValidationError>) {
    if let Err(e) = compile_headers(headers) {
        errors.push(ValidationError::new(field, e.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configs_are_valid() {
        assert!(validate_sidecar(&SidecarConfig::default()).is_ok());
        assert!(validate_nanoservice(&NanoserviceConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = SidecarConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.forwarding.downstream_base_url = "backend:9000/api".into();
        config
            .forwarding
            .request_headers
            .insert("bad header".into(), "v".into());

        let errors = validate_sidecar(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "forwarding.downstream_base_url",
                "forwarding.request_headers",
            ]
        );
    }

    #[test]
    fn rejects_missing_or_relative_target() {
        let mut config = SidecarConfig::default();
        config.forwarding.downstream_base_url = String::new();
        assert!(validate_sidecar(&config).is_err());

        config.forwarding.downstream_base_url = "/widgets".into();
        assert!(validate_sidecar(&config).is_err());

        config.forwarding.downstream_base_url = "https://backend:9000".into();
        assert!(validate_sidecar(&config).is_err());

        config.forwarding.downstream_base_url = "http://backend:9000".into();
        assert!(validate_sidecar(&config).is_ok());
    }

    #[test]
    fn next_service_url_is_optional() {
        let mut config = NanoserviceConfig::default();
        config.app.next_service_url = "http://next:5000/id".into();
        assert!(validate_nanoservice(&config).is_ok());

        config.app.next_service_url = "next".into();
        let errors = validate_nanoservice(&config).unwrap_err();
        assert_eq!(errors[0].field, "app.next_service_url");
    }
}
