pub mod https;

use async_trait::async_trait;
use bytes::Bytes;
use frontdoh_domain::{DnsQuestion, DomainError};

/// Upstream that answers one DNS question with a wire-format DNS message.
///
/// Implementations return the raw response body only after it has passed the
/// HTTP acceptance rules (status 200, non-empty body); decoding is left to
/// the caller.
#[async_trait]
pub trait DohUpstream: Send + Sync {
    async fn fetch(&self, question: &DnsQuestion) -> Result<Bytes, DomainError>;

    /// Name of the server the connection is made to, for log lines.
    fn server_name(&self) -> &str;
}
