use std::fmt;
use std::sync::Arc;

/// The single question carried by a forwarded query.
///
/// `name` is kept exactly as decoded from the wire (fully qualified, with the
/// trailing dot) and `record_type` is the numeric QTYPE, so both can be copied
/// verbatim into the DoH request parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DnsQuestion {
    pub name: Arc<str>,
    pub record_type: u16,
}

impl DnsQuestion {
    pub fn new(name: impl Into<Arc<str>>, record_type: u16) -> Self {
        Self {
            name: name.into(),
            record_type,
        }
    }
}

impl fmt::Display for DnsQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.record_type)
    }
}
