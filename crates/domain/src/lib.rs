//! Frontdoh Domain Layer
pub mod config;
pub mod dns_question;
pub mod errors;
pub mod query_tag;

pub use config::{CliOverrides, Config};
pub use dns_question::DnsQuestion;
pub use errors::DomainError;
pub use query_tag::QueryTag;
