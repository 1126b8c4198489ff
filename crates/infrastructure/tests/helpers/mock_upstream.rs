use async_trait::async_trait;
use bytes::Bytes;
use frontdoh_domain::{DnsQuestion, DomainError};
use frontdoh_infrastructure::dns::DohUpstream;
use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::time::Duration;

use super::builders::answer_a;

type Responder = Box<dyn Fn(&DnsQuestion) -> Result<Bytes, DomainError> + Send + Sync>;

/// Scripted DoH upstream that records every question it is asked.
pub struct MockDohUpstream {
    responder: Responder,
    calls: Mutex<Vec<DnsQuestion>>,
    max_jitter_ms: u64,
}

impl MockDohUpstream {
    pub fn new(
        responder: impl Fn(&DnsQuestion) -> Result<Bytes, DomainError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
            max_jitter_ms: 0,
        }
    }

    /// Answers every question with one A record, stamped with `upstream_id`.
    pub fn answering(ip: Ipv4Addr, upstream_id: u16) -> Self {
        Self::new(move |question| Ok(Bytes::from(answer_a(question, upstream_id, ip))))
    }

    pub fn failing(error: DomainError) -> Self {
        Self::new(move |_| Err(error.clone()))
    }

    /// Delay each fetch by a random 0..=`max_ms` milliseconds.
    pub fn with_jitter(mut self, max_ms: u64) -> Self {
        self.max_jitter_ms = max_ms;
        self
    }

    pub fn calls(&self) -> Vec<DnsQuestion> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl DohUpstream for MockDohUpstream {
    async fn fetch(&self, question: &DnsQuestion) -> Result<Bytes, DomainError> {
        self.calls.lock().unwrap().push(question.clone());

        if self.max_jitter_ms > 0 {
            let delay = fastrand::u64(0..=self.max_jitter_ms);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        (self.responder)(question)
    }

    fn server_name(&self) -> &str {
        "mock.front.test"
    }
}
