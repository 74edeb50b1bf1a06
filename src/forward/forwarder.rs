//! The forwarding core: one inbound call in, one downstream call out.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, HeaderValue, Method, Request, Response, Uri};
use uuid::Uuid;

use crate::config::ForwardingConfig;
use crate::error::ForwardError;
use crate::forward::client::DownstreamClient;
use crate::forward::headers::{compile_headers, merge_absent, strip_hop_by_hop};
use crate::forward::trace::TRACE_HEADER;

/// The parts of an inbound call the forwarder consumes.
///
/// Caller headers other than the trace identifier are deliberately absent:
/// they are never copied downstream.
#[derive(Debug)]
pub struct InboundRequest {
    pub method: Method,
    /// Path including the query string.
    pub path: String,
    pub body: Body,
    pub trace_id: Option<HeaderValue>,
}

impl InboundRequest {
    /// Take apart a request received by the server.
    pub fn from_request(request: Request<Body>) -> Self {
        let (parts, body) = request.into_parts();
        let path = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        Self {
            method: parts.method,
            path,
            body,
            trace_id: parts.headers.get(TRACE_HEADER).cloned(),
        }
    }
}

/// Builds, dispatches and relays one proxied request/response pair.
///
/// Holds only read-only state, so a single instance serves every
/// concurrent call.
pub struct Forwarder {
    downstream_base_url: String,
    request_headers: HeaderMap,
    response_headers: HeaderMap,
    client: Arc<dyn DownstreamClient>,
}

impl Forwarder {
    /// Create a forwarder from configuration.
    ///
    /// Header sets must be representable on the wire; the base URL is
    /// checked per call.
    pub fn new(
        config: &ForwardingConfig,
        client: Arc<dyn DownstreamClient>,
    ) -> Result<Self, ForwardError> {
        let compile = |headers: &HashMap<String, String>| {
            compile_headers(headers).map_err(|e| ForwardError::Configuration {
                target: config.downstream_base_url.clone(),
                reason: e.to_string(),
            })
        };

        Ok(Self {
            downstream_base_url: config.downstream_base_url.clone(),
            request_headers: compile(&config.request_headers)?,
            response_headers: compile(&config.response_headers)?,
            client,
        })
    }

    /// Concatenate the base URL and the inbound path, without normalization.
    fn target_uri(&self, path: &str) -> Result<Uri, ForwardError> {
        let target = format!("{}{}", self.downstream_base_url, path);
        let misconfigured = |reason: String| ForwardError::Configuration {
            target: target.clone(),
            reason,
        };

        let uri: Uri = target.parse().map_err(|e| misconfigured(format!("{}", e)))?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(misconfigured("not an absolute URL".to_string()));
        }
        Ok(uri)
    }

    /// Forward `inbound` and relay the downstream response.
    pub async fn forward(&self, inbound: InboundRequest) -> Result<Response<Body>, ForwardError> {
        let uri = self.target_uri(&inbound.path)?;
        let request_id = Uuid::new_v4();
        let method = inbound.method;

        let body = if carries_body(&method) {
            inbound.body
        } else {
            Body::empty()
        };

        let mut request = Request::new(body);
        *request.method_mut() = method.clone();
        *request.uri_mut() = uri.clone();
        if let Some(trace_id) = &inbound.trace_id {
            request.headers_mut().append(TRACE_HEADER, trace_id.clone());
        }
        merge_absent(request.headers_mut(), &self.request_headers);

        tracing::info!(
            request_id = %request_id,
            method = %method,
            url = %uri,
            "Forwarding request"
        );

        let response = self.client.send(request).await.map_err(|source| {
            ForwardError::DownstreamUnreachable {
                url: uri.to_string(),
                source,
            }
        })?;

        tracing::info!(
            request_id = %request_id,
            status = %response.status(),
            "Received downstream response"
        );

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        if let Some(trace_id) = inbound.trace_id {
            parts.headers.insert(TRACE_HEADER, trace_id);
        }
        merge_absent(&mut parts.headers, &self.response_headers);

        Ok(Response::from_parts(parts, body))
    }
}

/// Only write methods stream a body downstream.
fn carries_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT
}
