/*!
The socket primitives the rest of the crate is built against.

[`Transport`] is deliberately narrow: open a multicast listener, open a unicast
socket, send, receive-without-blocking, and answer a couple of small questions about
local interfaces. Everything above this layer — framing, classification, dispatch —
is written against the trait, not against `std::net` directly, so it can be tested
without a real network (see the mock transport in `ssdp::dispatch`'s and
`ssdp::query`'s test modules).

[`udp::UdpTransport`] is the one concrete implementation this crate ships, built on
`std::net::UdpSocket` with interface enumeration from `pnet` and subnet matching
from `ipnetwork`.
*/

use crate::Result;
use std::net::{Ipv4Addr, SocketAddrV4};

/// A received datagram: its length, and the peer it came from.
#[derive(Clone, Copy, Debug)]
pub struct Received {
    /// Number of bytes written into the caller's buffer.
    pub len: usize,
    /// The address and port the datagram came from.
    pub peer: SocketAddrV4,
}

/// The capability set the rest of this crate needs from the network layer.
///
/// Implementations must not block beyond the duration of a single `send`; `recv_*`
/// must be non-blocking, returning `Ok(None)` when nothing is pending rather than
/// waiting.
pub trait Transport {
    /// Send `bytes` to the configured multicast group and port.
    fn send_multicast(&self, bytes: &[u8]) -> Result<()>;

    /// Send `bytes` as a unicast datagram to `peer`.
    fn send_unicast(&self, peer: SocketAddrV4, bytes: &[u8]) -> Result<()>;

    /// Non-blocking receive on the multicast socket. `Ok(None)` means no datagram
    /// was pending.
    fn recv_multicast(&self, buf: &mut [u8]) -> Result<Option<Received>>;

    /// Non-blocking receive on the unicast socket. `Ok(None)` means no datagram
    /// was pending.
    fn recv_unicast(&self, buf: &mut [u8]) -> Result<Option<Received>>;

    /// The local port the unicast socket is bound to (informational; used by
    /// callers that want to report or log where replies will be sent from).
    fn local_port(&self) -> u16;

    /// The address of the primary ("infrastructure") interface, if any.
    fn local_ip(&self) -> Option<Ipv4Addr>;

    /// The address of the secondary ("soft access point") interface, if this host
    /// has one. This engine supports at most two interfaces per host.
    fn soft_ap_ip(&self) -> Option<Ipv4Addr>;

    /// The subnet mask of the interface bound to `iface_addr`, if that address is
    /// one of this host's own interface addresses.
    fn subnet_mask(&self, iface_addr: Ipv4Addr) -> Option<Ipv4Addr>;

    /// Which local interface address `peer` is reachable through, matched by
    /// subnet containment. When both `local_ip` and `soft_ap_ip` subnets contain
    /// `peer`, `local_ip` (infrastructure) wins; when neither matches, returns
    /// `0.0.0.0`.
    fn interface_of(&self, peer: Ipv4Addr) -> Ipv4Addr;
}

pub mod udp;
