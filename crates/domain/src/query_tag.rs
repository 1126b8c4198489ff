use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

/// Correlates every log line emitted for one query.
///
/// Starts out as the peer address alone and is refined with the client's
/// transaction ID, question name and type mnemonic once the datagram has been
/// decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTag {
    pub peer: SocketAddr,
    pub id: Option<u16>,
    pub question: Option<(Arc<str>, Arc<str>)>,
}

impl QueryTag {
    pub fn new(peer: SocketAddr) -> Self {
        Self {
            peer,
            id: None,
            question: None,
        }
    }

    pub fn with_question(
        mut self,
        id: u16,
        name: impl Into<Arc<str>>,
        record_type: impl Into<Arc<str>>,
    ) -> Self {
        self.id = Some(id);
        self.question = Some((name.into(), record_type.into()));
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.question.as_ref().map(|(name, _)| name.as_ref())
    }

    pub fn record_type(&self) -> Option<&str> {
        self.question.as_ref().map(|(_, record_type)| record_type.as_ref())
    }
}

impl fmt::Display for QueryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.question {
            Some((name, record_type)) => write!(f, "{}-{}/{}", self.peer, name, record_type),
            None => write!(f, "{}", self.peer),
        }
    }
}
