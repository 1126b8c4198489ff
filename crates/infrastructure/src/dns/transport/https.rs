//! Domain-fronted DNS-over-HTTPS transport
//!
//! Questions are sent as JSON-API style GET requests whose response body is a
//! raw DNS message:
//!
//! ```text
//! GET /resolve?name=example.com.&type=1&ct=application%2Fdns-message HTTP/1.1
//! Host: dns.google.com
//! ```
//!
//! The TCP connection, TLS SNI and certificate validation all use the front
//! domain from the URL, while the `Host` header names the DoH provider. The
//! connection is pinned to HTTP/1.1: over HTTP/2 the `:authority`
//! pseudo-header is derived from the URL and the `Host` override would be lost.

use super::DohUpstream;
use async_trait::async_trait;
use bytes::Bytes;
use frontdoh_domain::config::UpstreamConfig;
use frontdoh_domain::{DnsQuestion, DomainError};
use reqwest::header::{HeaderValue, HOST};
use reqwest::{StatusCode, Url};
use tracing::debug;

/// Response content type requested through the `ct` parameter
const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

/// Longest non-OK body kept for diagnostics
const MAX_LOGGED_BODY: usize = 256;

pub struct FrontedDohTransport {
    client: reqwest::Client,
    endpoint: Url,
    host_header: HeaderValue,
    server_name: String,
}

impl FrontedDohTransport {
    pub fn new(config: &UpstreamConfig) -> Result<Self, DomainError> {
        let endpoint = Url::parse(&format!(
            "https://{}{}",
            config.tls_server_name, config.resolve_path
        ))
        .map_err(|e| {
            DomainError::InvalidRequest(format!(
                "Invalid DoH endpoint for {}: {}",
                config.tls_server_name, e
            ))
        })?;

        let host_header = HeaderValue::from_str(&config.host_header).map_err(|e| {
            DomainError::InvalidRequest(format!(
                "Invalid Host header {:?}: {}",
                config.host_header, e
            ))
        })?;

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .http1_only()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| {
                DomainError::InvalidRequest(format!("Failed to build HTTPS client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint,
            host_header,
            server_name: config.tls_server_name.clone(),
        })
    }

    /// Build the fronted GET request for one question without sending it.
    pub fn build_request(&self, question: &DnsQuestion) -> Result<reqwest::Request, DomainError> {
        let record_type = question.record_type.to_string();

        self.client
            .get(self.endpoint.clone())
            .query(&[
                ("name", question.name.as_ref()),
                ("type", record_type.as_str()),
                ("ct", DNS_MESSAGE_CONTENT_TYPE),
            ])
            .header(HOST, self.host_header.clone())
            .build()
            .map_err(|e| DomainError::InvalidRequest(e.to_string()))
    }

    fn transport_error(&self, error: reqwest::Error) -> DomainError {
        if error.is_timeout() {
            DomainError::UpstreamTimeout {
                server: self.server_name.clone(),
            }
        } else {
            DomainError::UpstreamTransport {
                server: self.server_name.clone(),
                reason: error.to_string(),
            }
        }
    }
}

/// Apply the acceptance rules to a received response: only `200 OK` with a
/// non-empty body is usable.
pub fn accept_response(status: StatusCode, body: Bytes) -> Result<Bytes, DomainError> {
    if status != StatusCode::OK {
        let body = (!body.is_empty()).then(|| {
            let shown = &body[..body.len().min(MAX_LOGGED_BODY)];
            String::from_utf8_lossy(shown).into_owned()
        });
        return Err(DomainError::UpstreamStatus {
            status: status.as_u16(),
            body,
        });
    }

    if body.is_empty() {
        return Err(DomainError::EmptyUpstreamBody);
    }

    Ok(body)
}

#[async_trait]
impl DohUpstream for FrontedDohTransport {
    async fn fetch(&self, question: &DnsQuestion) -> Result<Bytes, DomainError> {
        let request = self.build_request(question)?;

        debug!(
            url = %request.url(),
            host = ?self.host_header,
            "Sending DoH query"
        );

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;

        debug!(
            server = %self.server_name,
            status = status.as_u16(),
            response_len = body.len(),
            "DoH response received"
        );

        accept_response(status, body)
    }

    fn server_name(&self) -> &str {
        &self.server_name
    }
}
