use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use socket2::{Domain, Protocol, Socket, Type};

/// A non-loopback IPv4 interface address.
#[derive(Debug, Clone)]
pub struct IfaceV4 {
    pub addr: Ipv4Addr,
}

/// Enumerate non-loopback IPv4 interfaces using the `getifaddrs` crate.
/// Returns empty Vec if enumeration fails; callers only use it for display.
pub fn list_non_loopback_v4() -> Vec<IfaceV4> {
    use getifaddrs::{Address, InterfaceFlags};

    let Ok(ifaces) = getifaddrs::getifaddrs() else {
        return vec![];
    };
    ifaces
        .filter(|i| !i.flags.contains(InterfaceFlags::LOOPBACK))
        .filter_map(|i| match &i.address {
            Address::V4(net_addr) => Some(IfaceV4 { addr: net_addr.address }),
            _ => None,
        })
        .collect()
}

/// The address remote clients on the LAN should use, for the startup banner.
/// Falls back to loopback when no other interface is up.
pub fn lan_address() -> IpAddr {
    list_non_loopback_v4()
        .first()
        .map(|i| IpAddr::V4(i.addr))
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Bind an IPv6 TCP listener with IPV6_V6ONLY set, so it can coexist with a
/// separate 0.0.0.0 listener on the same port. Linux defaults to a shared
/// stack, which makes the second bind fail with "Address already in use".
pub fn bind_ipv6_only(port: u16) -> std::io::Result<std::net::TcpListener> {
    let addr = SocketAddr::from((std::net::Ipv6Addr::UNSPECIFIED, port));
    let socket = Socket::new(Domain::IPV6, Type::STREAM, Some(Protocol::TCP))?;
    if let Err(e) = socket.set_only_v6(true) {
        tracing::warn!("Could not set IPV6_V6ONLY: {} -- dual-bind may fail on Linux", e);
    }
    if let Err(e) = socket.set_reuse_address(true) {
        tracing::warn!("Could not set SO_REUSEADDR on IPv6 socket: {}", e);
    }
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(1024)?;
    Ok(socket.into())
}
