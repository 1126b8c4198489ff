//! Frontdoh Infrastructure Layer
//!
//! Wire codec, domain-fronted DoH transport and the UDP query dispatcher.
pub mod dns;
