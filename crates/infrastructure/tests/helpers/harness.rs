use frontdoh_domain::DomainError;
use frontdoh_infrastructure::dns::{BufferPool, DohUpstream, QueryDispatcher};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

const REPLY_TIMEOUT: Duration = Duration::from_secs(2);
const SILENCE_WINDOW: Duration = Duration::from_millis(300);

/// A dispatcher serving on an ephemeral loopback port.
pub struct DispatcherHarness {
    pub addr: SocketAddr,
    pub pool: Arc<BufferPool>,
    task: JoinHandle<Result<(), DomainError>>,
}

impl DispatcherHarness {
    pub async fn start(upstream: Arc<dyn DohUpstream>, max_in_flight: usize) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let pool = Arc::new(BufferPool::new(2048, 64));
        let dispatcher = QueryDispatcher::new(socket, upstream, pool.clone(), max_in_flight);
        let addr = dispatcher.local_addr().unwrap();

        let task = tokio::spawn(dispatcher.run());

        Self { addr, pool, task }
    }

    /// Stop the listener and wait until every query task has handed its
    /// buffer back.
    pub async fn shutdown(self) -> Arc<BufferPool> {
        self.task.abort();
        let _ = self.task.await;

        tokio::time::timeout(REPLY_TIMEOUT, async {
            while self.pool.stats().checked_out > 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("buffers still checked out after shutdown");

        self.pool
    }
}

/// Send `query` from `client` and wait for a reply.
pub async fn exchange(
    client: &UdpSocket,
    server: SocketAddr,
    query: &[u8],
) -> Option<(Vec<u8>, SocketAddr)> {
    client.send_to(query, server).await.unwrap();
    receive(client, REPLY_TIMEOUT).await
}

/// Send `query` from `client` and assert nothing comes back.
pub async fn expect_no_reply(client: &UdpSocket, server: SocketAddr, query: &[u8]) {
    client.send_to(query, server).await.unwrap();
    let reply = receive(client, SILENCE_WINDOW).await;
    assert!(reply.is_none(), "expected no reply, got {:?}", reply);
}

async fn receive(client: &UdpSocket, wait: Duration) -> Option<(Vec<u8>, SocketAddr)> {
    let mut buf = vec![0u8; 4096];
    match tokio::time::timeout(wait, client.recv_from(&mut buf)).await {
        Ok(Ok((len, from))) => {
            buf.truncate(len);
            Some((buf, from))
        }
        _ => None,
    }
}
