use frontdoh_domain::DnsQuestion;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use hickory_proto::serialize::binary::BinEncodable;
use std::net::Ipv4Addr;
use std::str::FromStr;

pub struct QueryBuilder {
    id: u16,
    questions: Vec<(String, RecordType)>,
}

impl QueryBuilder {
    pub fn new(id: u16) -> Self {
        Self {
            id,
            questions: Vec::new(),
        }
    }

    pub fn question(mut self, name: &str, record_type: RecordType) -> Self {
        self.questions.push((name.to_string(), record_type));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut message = Message::new(self.id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        for (name, record_type) in self.questions {
            let mut query = Query::new();
            query.set_name(Name::from_str(&name).unwrap());
            query.set_query_type(record_type);
            query.set_query_class(DNSClass::IN);
            message.add_query(query);
        }
        message.to_vec().unwrap()
    }
}

/// A well-formed upstream answer carrying one A record and its own `id`.
pub fn answer_a(question: &DnsQuestion, id: u16, ip: Ipv4Addr) -> Vec<u8> {
    let name = Name::from_str(&question.name).unwrap();

    let mut query = Query::new();
    query.set_name(name.clone());
    query.set_query_type(RecordType::from(question.record_type));
    query.set_query_class(DNSClass::IN);

    let mut message = Message::new(id, MessageType::Response, OpCode::Query);
    message.set_recursion_desired(true);
    message.set_recursion_available(true);
    message.add_query(query);
    message.add_answer(Record::from_rdata(name, 300, RData::A(A(ip))));
    message.to_vec().unwrap()
}

pub fn first_a_record(message: &Message) -> Option<Ipv4Addr> {
    message.answers().iter().find_map(|record| match record.data() {
        RData::A(a) => Some(a.0),
        _ => None,
    })
}
