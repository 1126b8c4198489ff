use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Malformed DNS message: {0}")]
    MalformedMessage(String),

    #[error("No questions in query")]
    NoQuestion,

    #[error("Got {0} questions in query, but only 1 question is supported")]
    UnsupportedMultiQuestion(usize),

    #[error("Failed to encode DNS message: {0}")]
    EncodeFailure(String),

    #[error("Invalid DoH request: {0}")]
    InvalidRequest(String),

    #[error("DoH request to {server} failed: {reason}")]
    UpstreamTransport { server: String, reason: String },

    #[error("Timeout waiting for DoH response from {server}")]
    UpstreamTimeout { server: String },

    #[error("Non-OK HTTP response: {status}")]
    UpstreamStatus { status: u16, body: Option<String> },

    #[error("Empty HTTPS response body")]
    EmptyUpstreamBody,

    #[error("Failed to send response: {0}")]
    ReplyFailed(String),

    #[error("Unable to listen on {addr}: {reason}")]
    Bind { addr: String, reason: String },

    #[error("Error getting UDP query: {0}")]
    SocketRead(String),
}
