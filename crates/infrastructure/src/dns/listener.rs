use frontdoh_domain::DomainError;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tracing::info;

const SOCKET_BUFFER_SIZE: usize = 512 * 1024;

/// Resolve `listen_address` and bind the query listener to the first address.
///
/// `SO_REUSEADDR` stays off: binding a port another socket holds must fail.
pub async fn bind_listener(listen_address: &str) -> Result<UdpSocket, DomainError> {
    let socket_addr = tokio::net::lookup_host(listen_address)
        .await
        .map_err(|e| DomainError::Bind {
            addr: listen_address.to_string(),
            reason: format!("Unable to resolve UDP address: {}", e),
        })?
        .next()
        .ok_or_else(|| DomainError::Bind {
            addr: listen_address.to_string(),
            reason: "address resolved to nothing".to_string(),
        })?;

    let socket = create_udp_socket(socket_addr).map_err(|e| DomainError::Bind {
        addr: socket_addr.to_string(),
        reason: e.to_string(),
    })?;

    info!(bind_address = %socket_addr, "Listening for DNS queries");
    Ok(socket)
}

fn create_udp_socket(socket_addr: SocketAddr) -> io::Result<UdpSocket> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_recv_buffer_size(SOCKET_BUFFER_SIZE)?;
    socket.set_send_buffer_size(SOCKET_BUFFER_SIZE)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;

    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket)
}
