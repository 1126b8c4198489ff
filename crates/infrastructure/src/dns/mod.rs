pub mod buffer_pool;
pub mod codec;
pub mod dispatcher;
pub mod listener;
pub mod query_failure;
pub mod transport;

pub use buffer_pool::{BufferPool, BufferPoolStats, PooledBuffer};
pub use codec::QueryCodec;
pub use dispatcher::QueryDispatcher;
pub use query_failure::{PipelineStage, QueryFailure};
pub use transport::{https::FrontedDohTransport, DohUpstream};
