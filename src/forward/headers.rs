//! Header policy for forwarded requests and relayed responses.
//!
//! # Responsibilities
//! - Turn configured string maps into a typed `HeaderMap` once, at startup
//! - Merge configured headers without replacing ones already present
//! - Strip hop-by-hop headers from relayed responses

use std::collections::HashMap;

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};

/// A configured header that cannot be put on the wire.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidHeader {
    #[error("invalid header name '{0}'")]
    Name(String),
    #[error("invalid value for header '{0}'")]
    Value(String),
}

/// Headers that describe a single connection and are never relayed.
const HOP_BY_HOP: [&str; 7] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Compile a configured name/value map into a `HeaderMap`.
///
/// Names differing only by case collapse to one entry; the first one
/// encountered is kept, the same rule `merge_absent` applies.
pub fn compile_headers(source: &HashMap<String, String>) -> Result<HeaderMap, InvalidHeader> {
    let mut compiled = HeaderMap::with_capacity(source.len());
    for (name, value) in source {
        let name = HeaderName::try_from(name.as_str())
            .map_err(|_| InvalidHeader::Name(name.clone()))?;
        let value = HeaderValue::try_from(value.as_str())
            .map_err(|_| InvalidHeader::Value(name.to_string()))?;
        if !compiled.contains_key(&name) {
            compiled.insert(name, value);
        }
    }
    Ok(compiled)
}

/// Add every header of `extra` to `target` unless `target` already has that name.
///
/// Existing values always win; colliding configured values are dropped.
pub fn merge_absent(target: &mut HeaderMap, extra: &HeaderMap) {
    for (name, value) in extra {
        if !target.contains_key(name) {
            target.insert(name.clone(), value.clone());
        }
    }
}

/// Remove hop-by-hop headers, plus any header named in `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|token| HeaderName::try_from(token.trim()).ok())
        .collect();

    for name in &listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}
