/*!
The one concrete [`super::Transport`] this crate ships: a pair of
[`std::net::UdpSocket`]s, one joined to the multicast group for receiving requests
and advertisements, one bound to an ephemeral port for sending and for unicast
replies. Interface enumeration is done with `pnet`'s `datalink` module; subnet
containment with `ipnetwork`.
*/

use crate::syntax::{MULTICAST_GROUP, SSDP_PORT};
use crate::transport::{Received, Transport};
use crate::{Error, Result};
use ipnetwork::Ipv4Network;
use pnet::datalink;
use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};

/// A `Transport` backed by real sockets on the host's network interfaces.
#[derive(Debug)]
pub struct UdpTransport {
    multicast_socket: UdpSocket,
    unicast_socket: UdpSocket,
    network_interface: Option<String>,
}

impl UdpTransport {
    /// Open a transport bound to `network_interface` (or all interfaces, if
    /// `None`). Joins the SSDP multicast group on `SSDP_PORT` and binds a second,
    /// ephemeral-port socket for unicast traffic.
    pub fn open(network_interface: Option<String>) -> Result<Self> {
        let bind_addr = local_address_for(&network_interface).unwrap_or(Ipv4Addr::UNSPECIFIED);

        let multicast_socket =
            UdpSocket::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, SSDP_PORT))?;
        let group: Ipv4Addr = MULTICAST_GROUP.parse().expect("MULTICAST_GROUP is valid");
        multicast_socket.join_multicast_v4(&group, &bind_addr)?;
        multicast_socket.set_nonblocking(true)?;
        debug!(
            "UdpTransport::open - joined {} on {} via {:?}",
            group, bind_addr, network_interface
        );

        let unicast_socket = UdpSocket::bind(SocketAddrV4::new(bind_addr, 0))?;
        unicast_socket.set_nonblocking(true)?;
        trace!(
            "UdpTransport::open - unicast socket bound to {:?}",
            unicast_socket.local_addr()
        );

        Ok(UdpTransport {
            multicast_socket,
            unicast_socket,
            network_interface,
        })
    }

    fn recv_nonblocking(socket: &UdpSocket, buf: &mut [u8]) -> Result<Option<Received>> {
        match socket.recv_from(buf) {
            Ok((len, SocketAddr::V4(peer))) => Ok(Some(Received { len, peer })),
            Ok((_, SocketAddr::V6(_))) => Ok(None),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(Error::TransportSend(e)),
        }
    }
}

impl Transport for UdpTransport {
    fn send_multicast(&self, bytes: &[u8]) -> Result<()> {
        let target = SocketAddrV4::new(
            MULTICAST_GROUP.parse().expect("MULTICAST_GROUP is valid"),
            SSDP_PORT,
        );
        self.unicast_socket
            .send_to(bytes, target)
            .map(|_| ())
            .map_err(Error::TransportSend)
    }

    fn send_unicast(&self, peer: SocketAddrV4, bytes: &[u8]) -> Result<()> {
        self.unicast_socket
            .send_to(bytes, peer)
            .map(|_| ())
            .map_err(Error::TransportSend)
    }

    fn recv_multicast(&self, buf: &mut [u8]) -> Result<Option<Received>> {
        Self::recv_nonblocking(&self.multicast_socket, buf)
    }

    fn recv_unicast(&self, buf: &mut [u8]) -> Result<Option<Received>> {
        Self::recv_nonblocking(&self.unicast_socket, buf)
    }

    fn local_port(&self) -> u16 {
        self.unicast_socket
            .local_addr()
            .map(|a| a.port())
            .unwrap_or(0)
    }

    fn local_ip(&self) -> Option<Ipv4Addr> {
        interface_addresses(&self.network_interface).into_iter().next()
    }

    fn soft_ap_ip(&self) -> Option<Ipv4Addr> {
        interface_addresses(&self.network_interface).into_iter().nth(1)
    }

    fn subnet_mask(&self, iface_addr: Ipv4Addr) -> Option<Ipv4Addr> {
        for interface in datalink::interfaces() {
            for ip in interface.ips {
                if let ipnetwork::IpNetwork::V4(net) = ip {
                    if net.ip() == iface_addr {
                        return Some(net.mask());
                    }
                }
            }
        }
        None
    }

    fn interface_of(&self, peer: Ipv4Addr) -> Ipv4Addr {
        for interface in datalink::interfaces() {
            if interface.is_loopback() {
                continue;
            }
            for ip in &interface.ips {
                if let ipnetwork::IpNetwork::V4(net) = ip {
                    if subnet_contains(net, peer) {
                        return net.ip();
                    }
                }
            }
        }
        Ipv4Addr::UNSPECIFIED
    }
}

fn subnet_contains(net: &Ipv4Network, peer: Ipv4Addr) -> bool {
    Ipv4Network::new(net.ip(), net.prefix())
        .map(|n| n.contains(peer))
        .unwrap_or(false)
}

fn local_address_for(network_interface: &Option<String>) -> Option<Ipv4Addr> {
    match network_interface {
        None => interface_addresses(&None).into_iter().next(),
        Some(_) => interface_addresses(network_interface).into_iter().next(),
    }
}

/// All non-loopback IPv4 addresses on `interface_name` (or, if `None`, on the first
/// non-loopback interface with an IPv4 address), in the order `pnet` reports
/// interfaces — which is the fixed infrastructure-before-soft-AP priority this
/// crate documents for `interface_of`.
fn interface_addresses(interface_name: &Option<String>) -> Vec<Ipv4Addr> {
    let interfaces = datalink::interfaces();
    let matching: Vec<_> = match interface_name {
        Some(name) => interfaces.into_iter().filter(|ni| &ni.name == name).collect(),
        None => interfaces
            .into_iter()
            .filter(|ni| !ni.is_loopback())
            .collect(),
    };
    matching
        .iter()
        .flat_map(|ni| ni.ips.iter())
        .filter_map(|ip| match ip {
            ipnetwork::IpNetwork::V4(net) => Some(net.ip()),
            ipnetwork::IpNetwork::V6(_) => None,
        })
        .collect()
}
