use frontdoh_domain::{DomainError, QueryTag};
use std::fmt;
use tracing::{debug, warn};

/// Step of the per-query pipeline at which a query was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    DecodeQuery,
    ValidateQuestion,
    Upstream,
    DecodeResponse,
    EncodeResponse,
    Reply,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DecodeQuery => "decode_query",
            Self::ValidateQuestion => "validate_question",
            Self::Upstream => "upstream",
            Self::DecodeResponse => "decode_response",
            Self::EncodeResponse => "encode_response",
            Self::Reply => "reply",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dropped query: where it stopped, why, and which client it belonged to.
#[derive(Debug, Clone)]
pub struct QueryFailure {
    pub tag: QueryTag,
    pub stage: PipelineStage,
    pub error: DomainError,
}

impl QueryFailure {
    /// The single place per-query failures are reported. The client gets no
    /// reply and will time out.
    pub fn log(&self) {
        let name = self.tag.name().unwrap_or("-");
        let record_type = self.tag.record_type().unwrap_or("-");
        let id = self.tag.id;

        match (&self.stage, &self.error) {
            // Scanners and stray packets; keep them out of the default log.
            (PipelineStage::DecodeQuery, _) => debug!(
                peer = %self.tag.peer,
                stage = %self.stage,
                error = %self.error,
                "Invalid query"
            ),
            (_, DomainError::UpstreamStatus { status, body: Some(body) }) => warn!(
                peer = %self.tag.peer,
                name,
                record_type,
                id,
                status,
                body = %body,
                "Non-OK HTTP response"
            ),
            _ => warn!(
                peer = %self.tag.peer,
                name,
                record_type,
                id,
                stage = %self.stage,
                error = %self.error,
                "Query dropped"
            ),
        }
    }
}

/// Attaches the pipeline position to a stage result.
pub(crate) trait AtStage<T> {
    fn at(self, stage: PipelineStage, tag: &QueryTag) -> Result<T, QueryFailure>;
}

impl<T> AtStage<T> for Result<T, DomainError> {
    fn at(self, stage: PipelineStage, tag: &QueryTag) -> Result<T, QueryFailure> {
        self.map_err(|error| QueryFailure {
            tag: tag.clone(),
            stage,
            error,
        })
    }
}
