use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Front domain: presented as TLS SNI, validated against the certificate
    /// and used as the URL host.
    #[serde(default = "default_tls_server_name")]
    pub tls_server_name: String,

    /// HTTP `Host` header sent inside the TLS session, naming the DoH provider.
    #[serde(default = "default_host_header")]
    pub host_header: String,

    #[serde(default = "default_resolve_path")]
    pub resolve_path: String,

    /// Seconds allowed for one whole DoH round-trip, body included.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl UpstreamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            tls_server_name: default_tls_server_name(),
            host_header: default_host_header(),
            resolve_path: default_resolve_path(),
            request_timeout: default_request_timeout(),
        }
    }
}

fn default_tls_server_name() -> String {
    "youtube.com".to_string()
}

fn default_host_header() -> String {
    "dns.google.com".to_string()
}

fn default_resolve_path() -> String {
    "/resolve".to_string()
}

fn default_request_timeout() -> u64 {
    10
}
