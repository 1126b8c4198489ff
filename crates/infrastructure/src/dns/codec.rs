//! DNS wire codec
//!
//! Thin layer over `hickory-proto` that turns datagrams into messages and back,
//! enforces the one-question rule and rewrites transaction IDs.

use frontdoh_domain::{DnsQuestion, DomainError};
use hickory_proto::op::Message;
use hickory_proto::rr::RecordType;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};

/// Typical upper bound for a UDP DNS answer; avoids regrowth in the common case.
const ENCODE_CAPACITY: usize = 512;

pub struct QueryCodec;

impl QueryCodec {
    /// Parse raw wire bytes into a message.
    pub fn decode(bytes: &[u8]) -> Result<Message, DomainError> {
        Message::from_vec(bytes).map_err(|e| DomainError::MalformedMessage(e.to_string()))
    }

    /// Require exactly one question and return it.
    pub fn validate_single_question(message: &Message) -> Result<DnsQuestion, DomainError> {
        match message.queries() {
            [] => Err(DomainError::NoQuestion),
            // Punycode labels stay as they were on the wire.
            [query] => Ok(DnsQuestion::new(
                query.name().to_ascii(),
                u16::from(query.query_type()),
            )),
            queries => Err(DomainError::UnsupportedMultiQuestion(queries.len())),
        }
    }

    pub fn set_transaction_id(message: &mut Message, id: u16) {
        let mut header = *message.header();
        header.set_id(id);
        message.set_header(header);
    }

    /// Serialize a message to wire format bytes
    pub fn encode(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(ENCODE_CAPACITY);
        let mut encoder = BinEncoder::new(&mut buf);

        message
            .emit(&mut encoder)
            .map_err(|e| DomainError::EncodeFailure(e.to_string()))?;

        Ok(buf)
    }

    /// Mnemonic for a numeric QTYPE (`1` -> `A`), used in log tags.
    pub fn type_mnemonic(record_type: u16) -> String {
        RecordType::from(record_type).to_string()
    }
}
