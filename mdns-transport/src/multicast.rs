//! Setting up sockets joined to the mDNS multicast group.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};

use log::*;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

use mdns::MAXIMUM_PACKET_SIZE;


/// The port all mDNS traffic uses (RFC 6762 §3).
pub const MDNS_PORT: u16 = 5353;

/// The IPv4 mDNS group address.
pub const GROUP_V4: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 251);

/// The IPv6 mDNS group address.
pub const GROUP_V6: Ipv6Addr = Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 0, 0xfb);


/// Which IP version a query runs over, and which interface it uses. IPv4
/// interfaces are named by address, IPv6 interfaces by index; leaving the
/// interface out lets the operating system pick one.
#[derive(PartialEq, Debug, Copy, Clone)]
pub enum Network {

    /// Query over IPv4.
    V4 {

        /// The address of the interface to join the group on.
        interface: Option<Ipv4Addr>,
    },

    /// Query over IPv6.
    V6 {

        /// The index of the interface to join the group on.
        interface: Option<u32>,
    },
}

impl Default for Network {
    fn default() -> Self {
        Self::V4 { interface: None }
    }
}

impl Network {

    /// The group address and port queried over this network.
    pub(crate) fn group(self) -> SocketAddr {
        match self {
            Self::V4 { .. }  => SocketAddr::V4(SocketAddrV4::new(GROUP_V4, MDNS_PORT)),
            Self::V6 { .. }  => SocketAddr::V6(SocketAddrV6::new(GROUP_V6, MDNS_PORT, 0, 0)),
        }
    }

    /// Opens a datagram socket bound to the mDNS port and joined to the
    /// group, so it hears the multicast responses other responders send,
    /// then hands it to tokio.
    pub(crate) fn bind(self) -> io::Result<UdpSocket> {
        let socket = match self {
            Self::V4 { interface } => {
                debug!("Opening IPv4 multicast socket");
                let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
                socket.set_reuse_address(true)?;
                socket.bind(&SocketAddr::from((Ipv4Addr::UNSPECIFIED, MDNS_PORT)).into())?;
                socket.join_multicast_v4(&GROUP_V4, &interface.unwrap_or(Ipv4Addr::UNSPECIFIED))?;
                socket
            }

            Self::V6 { interface } => {
                debug!("Opening IPv6 multicast socket");
                let socket = Socket::new(Domain::IPV6, Type::DGRAM, Some(Protocol::UDP))?;
                socket.set_reuse_address(true)?;
                socket.set_only_v6(true)?;
                socket.bind(&SocketAddr::from((Ipv6Addr::UNSPECIFIED, MDNS_PORT)).into())?;
                socket.join_multicast_v6(&GROUP_V6, interface.unwrap_or(0))?;
                socket
            }
        };

        // responders may send datagrams up to the RFC 6762 §17 ceiling
        socket.set_recv_buffer_size(MAXIMUM_PACKET_SIZE)?;

        socket.set_nonblocking(true)?;
        UdpSocket::from_std(socket.into())
    }
}
