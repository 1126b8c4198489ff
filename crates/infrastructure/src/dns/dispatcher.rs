//! UDP query dispatcher
//!
//! One listener socket, one spawned task per datagram. Each task owns the
//! datagram's pooled buffer for its whole life and runs:
//!
//! decode -> single question -> DoH fetch -> decode -> restore ID -> encode -> reply
//!
//! Any failing step drops the query; the client sees a timeout.

use super::buffer_pool::{BufferPool, PooledBuffer};
use super::codec::QueryCodec;
use super::listener::bind_listener;
use super::query_failure::{AtStage, PipelineStage, QueryFailure};
use super::transport::DohUpstream;
use frontdoh_domain::config::ServerConfig;
use frontdoh_domain::{DomainError, QueryTag};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::Semaphore;
use tracing::{debug, error};

pub struct QueryDispatcher {
    socket: Arc<UdpSocket>,
    upstream: Arc<dyn DohUpstream>,
    pool: Arc<BufferPool>,
    /// `None` when in-flight queries are unbounded
    in_flight: Option<Arc<Semaphore>>,
}

impl QueryDispatcher {
    /// Bind the listener described by `config`.
    pub async fn bind(
        config: &ServerConfig,
        upstream: Arc<dyn DohUpstream>,
        pool: Arc<BufferPool>,
    ) -> Result<Self, DomainError> {
        let socket = bind_listener(&config.listen_address).await?;
        Ok(Self::new(socket, upstream, pool, config.max_in_flight))
    }

    /// Wrap an already bound socket. `max_in_flight == 0` means unbounded.
    pub fn new(
        socket: UdpSocket,
        upstream: Arc<dyn DohUpstream>,
        pool: Arc<BufferPool>,
        max_in_flight: usize,
    ) -> Self {
        let in_flight = (max_in_flight > 0).then(|| Arc::new(Semaphore::new(max_in_flight)));

        Self {
            socket: Arc::new(socket),
            upstream,
            pool,
            in_flight,
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Serve queries until the socket fails.
    ///
    /// Reads are strictly serial; each datagram is handed to its own task
    /// before the next read. Only an unrecoverable socket error returns.
    pub async fn run(self) -> Result<(), DomainError> {
        debug!(
            upstream = %self.upstream.server_name(),
            max_in_flight = self.in_flight.as_ref().map(|s| s.available_permits()),
            buffer_size = self.pool.buffer_size(),
            pool = ?self.pool.stats(),
            "Query dispatcher started"
        );

        loop {
            let permit = match &self.in_flight {
                Some(limit) => limit.clone().acquire_owned().await.ok(),
                None => None,
            };

            let mut buffer = self.pool.checkout();

            let (len, peer) = match self.socket.recv_from(buffer.spare_mut()).await {
                Ok(received) => received,
                Err(e) if is_transient(&e) => {
                    debug!(error = %e, "Transient UDP receive error");
                    continue;
                }
                Err(e) => {
                    error!(error = %e, "Error getting UDP query");
                    return Err(DomainError::SocketRead(e.to_string()));
                }
            };
            buffer.set_len(len);

            let socket = Arc::clone(&self.socket);
            let upstream = Arc::clone(&self.upstream);
            tokio::spawn(async move {
                handle_datagram(&socket, upstream.as_ref(), buffer, peer).await;
                drop(permit);
            });
        }
    }
}

/// Run one datagram through the pipeline, then give its buffer back.
pub async fn handle_datagram(
    socket: &UdpSocket,
    upstream: &dyn DohUpstream,
    datagram: PooledBuffer,
    peer: SocketAddr,
) {
    match process_query(socket, upstream, datagram.filled(), peer).await {
        Ok(tag) => debug!(peer = %tag.peer, query = %tag, "Answered query"),
        Err(failure) => failure.log(),
    }
    drop(datagram);
}

/// The per-query pipeline. Returns the final log tag on success.
pub async fn process_query(
    socket: &UdpSocket,
    upstream: &dyn DohUpstream,
    datagram: &[u8],
    peer: SocketAddr,
) -> Result<QueryTag, QueryFailure> {
    let tag = QueryTag::new(peer);

    let query = QueryCodec::decode(datagram).at(PipelineStage::DecodeQuery, &tag)?;
    let question =
        QueryCodec::validate_single_question(&query).at(PipelineStage::ValidateQuestion, &tag)?;
    let id = query.id();

    let tag = tag.with_question(
        id,
        question.name.clone(),
        QueryCodec::type_mnemonic(question.record_type),
    );

    let body = upstream
        .fetch(&question)
        .await
        .at(PipelineStage::Upstream, &tag)?;

    let mut response = QueryCodec::decode(&body).at(PipelineStage::DecodeResponse, &tag)?;
    QueryCodec::set_transaction_id(&mut response, id);
    let reply = QueryCodec::encode(&response).at(PipelineStage::EncodeResponse, &tag)?;

    socket
        .send_to(&reply, peer)
        .await
        .map_err(|e| DomainError::ReplyFailed(e.to_string()))
        .at(PipelineStage::Reply, &tag)?;

    Ok(tag)
}

/// Receive errors that leave the socket usable.
///
/// `ConnectionReset`/`ConnectionRefused` are ICMP port-unreachable reports for
/// an earlier reply surfacing on the next read.
fn is_transient(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionRefused
    )
}
