//! Passthrough forwarding to the content backend.
//!
//! Plain requests are relayed once. A request asking for a protocol switch
//! (for example the backend's livereload WebSocket) keeps its handshake
//! headers; when the backend answers 101 the two upgraded connections are
//! joined and bytes are copied both ways until either side closes.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    http::{
        header,
        uri::{Authority, PathAndQuery, Scheme},
        HeaderValue, StatusCode, Uri, Version,
    },
    response::Response,
};
use hyper::upgrade::OnUpgrade;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::{TokioExecutor, TokioIo},
};
use thiserror::Error;

use crate::error::ApiError;
use crate::http::request::request_id;
use crate::http::response::{append_forwarded_for, strip_hop_by_hop_keeping_upgrade, upgrade_protocol};

#[derive(Debug, Error)]
pub enum BackendAddressError {
    #[error("backend address '{0}' is not a valid URI")]
    Invalid(String),

    #[error("backend address '{0}' must use http://")]
    Scheme(String),

    #[error("backend address '{0}' has no host")]
    MissingHost(String),

    #[error("backend address '{0}' must not carry a path or query")]
    HasPath(String),
}

/// Forwards requests to one fixed backend, relaying the response verbatim.
///
/// The target is parsed once at construction and never re-resolved.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    authority: Authority,
    host: HeaderValue,
}

impl Forwarder {
    pub fn new(address: &str) -> Result<Self, BackendAddressError> {
        let uri: Uri = address
            .parse()
            .map_err(|_| BackendAddressError::Invalid(address.to_string()))?;

        if uri.scheme() != Some(&Scheme::HTTP) {
            return Err(BackendAddressError::Scheme(address.to_string()));
        }
        let authority = uri
            .authority()
            .cloned()
            .ok_or_else(|| BackendAddressError::MissingHost(address.to_string()))?;
        if uri.path_and_query().is_some_and(|pq| pq.as_str() != "/") {
            return Err(BackendAddressError::HasPath(address.to_string()));
        }
        let host = HeaderValue::from_str(authority.as_str())
            .map_err(|_| BackendAddressError::Invalid(address.to_string()))?;

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            client,
            authority,
            host,
        })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Send `request` to the backend. Method, path, query, end-to-end
    /// headers and body are kept; only the target and `Host` change.
    pub async fn forward(&self, mut request: Request<Body>) -> Result<Response, ApiError> {
        let client_addr = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        let protocol = upgrade_protocol(request.headers());
        let client_upgrade = protocol.as_ref().map(|_| hyper::upgrade::on(&mut request));

        let (mut parts, body) = request.into_parts();
        let request_id = request_id(&parts.headers).to_string();

        let mut uri_parts = parts.uri.into_parts();
        uri_parts.scheme = Some(Scheme::HTTP);
        uri_parts.authority = Some(self.authority.clone());
        if uri_parts.path_and_query.is_none() {
            uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        parts.uri = Uri::from_parts(uri_parts)
            .map_err(|e| ApiError::Internal(format!("backend URI rewrite failed: {e}")))?;
        parts.version = Version::HTTP_11;

        strip_hop_by_hop_keeping_upgrade(&mut parts.headers, protocol);
        parts.headers.insert(header::HOST, self.host.clone());
        if let Some(ip) = client_addr {
            append_forwarded_for(&mut parts.headers, ip);
        }

        tracing::debug!(
            request_id = %request_id,
            method = %parts.method,
            uri = %parts.uri,
            "Forwarding to backend"
        );

        let mut response = self
            .client
            .request(Request::from_parts(parts, body))
            .await
            .map_err(|e| {
                tracing::error!(
                    request_id = %request_id,
                    backend = %self.authority,
                    error = %e,
                    "Backend request failed"
                );
                ApiError::Backend(e.to_string())
            })?;

        let switched = match client_upgrade {
            Some(client_upgrade) if response.status() == StatusCode::SWITCHING_PROTOCOLS => {
                let backend_upgrade = hyper::upgrade::on(&mut response);
                tokio::spawn(tunnel(client_upgrade, backend_upgrade, request_id));
                upgrade_protocol(response.headers())
            }
            _ => None,
        };

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop_keeping_upgrade(&mut parts.headers, switched);
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

/// Join the client and backend sides of a switched connection.
async fn tunnel(client: OnUpgrade, backend: OnUpgrade, request_id: String) {
    let (client, backend) = match tokio::try_join!(client, backend) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Upgrade handshake failed");
            return;
        }
    };

    let mut client = TokioIo::new(client);
    let mut backend = TokioIo::new(backend);
    match tokio::io::copy_bidirectional(&mut client, &mut backend).await {
        Ok((to_backend, to_client)) => tracing::debug!(
            request_id = %request_id,
            to_backend,
            to_client,
            "Upgraded connection closed"
        ),
        Err(e) => tracing::debug!(request_id = %request_id, error = %e, "Upgraded connection ended"),
    }
}
