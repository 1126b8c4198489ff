#![allow(dead_code)]
mod builders;
mod harness;
mod mock_upstream;

pub use builders::{answer_a, first_a_record, QueryBuilder};
pub use harness::{exchange, expect_no_reply, DispatcherHarness};
pub use mock_upstream::MockDohUpstream;
