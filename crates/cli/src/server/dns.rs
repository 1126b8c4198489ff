use frontdoh_domain::Config;
use frontdoh_infrastructure::dns::{BufferPool, FrontedDohTransport, QueryDispatcher};
use std::sync::Arc;
use tracing::info;

/// Wire the DoH upstream, buffer pool and dispatcher, then serve until the
/// listener fails.
pub async fn start_dns_server(config: &Config) -> anyhow::Result<()> {
    let upstream = Arc::new(FrontedDohTransport::new(&config.upstream)?);

    info!(
        tls_server_name = %config.upstream.tls_server_name,
        host_header = %config.upstream.host_header,
        resolve_path = %config.upstream.resolve_path,
        timeout_secs = config.upstream.request_timeout,
        "Using domain-fronted DoH upstream"
    );

    let pool = Arc::new(BufferPool::new(
        config.server.max_datagram_size,
        config.server.max_idle_buffers,
    ));

    let dispatcher = QueryDispatcher::bind(&config.server, upstream, pool).await?;

    info!(
        bind_address = %dispatcher.local_addr()?,
        max_in_flight = config.server.max_in_flight,
        "DNS proxy ready"
    );

    dispatcher.run().await?;
    Ok(())
}
