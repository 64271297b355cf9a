// Listener construction module

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Bind a nonblocking TCP listener on `addr`.
///
/// `SO_REUSEADDR` is enabled so a restart can rebind a port whose previous
/// socket is still in `TIME_WAIT`. `SO_REUSEPORT` is not set: a second
/// instance started on the same port must fail at bind time rather than
/// silently share the socket.
pub fn bind(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;

    // Non-blocking mode for async compatibility
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn second_bind_on_same_port_fails() {
        let first = bind("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = first.local_addr().unwrap();

        let second = bind(addr);
        assert!(second.is_err());
    }
}
