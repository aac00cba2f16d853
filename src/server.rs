/*!
A small cooperative tick loop tying [`transport`](crate::transport) and
[`ssdp::dispatch`](crate::ssdp::dispatch) together.

There is a single entry point, [`Server::tick`]; the caller decides how often to
invoke it (a `loop` with a sleep, a timer callback, whatever fits the embedding
application's own scheduling). A tick never blocks longer than the dispatcher's
configured inter-response delay.
*/

use crate::ssdp::classify::classify;
use crate::ssdp::dispatch::SearchDispatcher;
use crate::ssdp::header::HeaderParser;
use crate::transport::Transport;
use crate::tree::RootNode;
use crate::{Config, Result};

/// Drains the multicast and unicast sockets, at most one packet each per tick, and
/// dispatches any recognized search request against a device tree.
#[derive(Debug)]
pub struct Server<'a> {
    config: &'a Config,
}

impl<'a> Server<'a> {
    /// Build a server against the given policy. The same `Config` should be
    /// passed to any [`crate::ssdp::query::QueryClient`] sharing this transport,
    /// so buffer sizes and delays agree.
    pub fn new(config: &'a Config) -> Self {
        Server { config }
    }

    /// Run one tick: check the multicast socket, then the unicast socket, each for
    /// at most one pending packet, classifying and dispatching anything recognized.
    /// Returns the total number of response datagrams emitted this tick.
    pub fn tick(&self, root: &dyn RootNode, transport: &dyn Transport) -> Result<usize> {
        let mut buf = vec![0u8; self.config.packet_buffer_bytes];
        let mut emitted = 0;

        emitted += self.drain_one(root, transport, &mut buf, true)?;
        emitted += self.drain_one(root, transport, &mut buf, false)?;

        Ok(emitted)
    }

    fn drain_one(
        &self,
        root: &dyn RootNode,
        transport: &dyn Transport,
        buf: &mut [u8],
        multicast: bool,
    ) -> Result<usize> {
        let received = if multicast {
            transport.recv_multicast(buf)?
        } else {
            transport.recv_unicast(buf)?
        };

        let received = match received {
            Some(r) => r,
            None => return Ok(0),
        };

        let parser = HeaderParser::new(&buf[..received.len]);
        if parser.exceeds_budget(self.config.packet_buffer_bytes) {
            warn!(
                "Server::drain_one - dropping packet from {} that exceeds the {}-byte budget",
                received.peer, self.config.packet_buffer_bytes
            );
            return Ok(0);
        }

        let request = match classify(&parser) {
            Some(r) => r,
            None => {
                trace!("Server::drain_one - dropping unrecognized packet from {}", received.peer);
                return Ok(0);
            }
        };

        let dispatcher = SearchDispatcher::new(self.config);
        dispatcher.dispatch(&request, root, received.peer, transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Received;
    use crate::tree::simple::Root;
    use std::cell::RefCell;
    use std::net::{Ipv4Addr, SocketAddrV4};

    #[derive(Debug)]
    struct SingleShotTransport {
        pending: RefCell<Option<Vec<u8>>>,
        sent: RefCell<Vec<Vec<u8>>>,
    }

    impl Transport for SingleShotTransport {
        fn send_multicast(&self, bytes: &[u8]) -> Result<()> {
            self.sent.borrow_mut().push(bytes.to_vec());
            Ok(())
        }
        fn send_unicast(&self, _peer: SocketAddrV4, bytes: &[u8]) -> Result<()> {
            self.sent.borrow_mut().push(bytes.to_vec());
            Ok(())
        }
        fn recv_multicast(&self, buf: &mut [u8]) -> Result<Option<Received>> {
            match self.pending.borrow_mut().take() {
                Some(packet) => {
                    // Mirror a real UDP socket: a datagram larger than the receive
                    // buffer is truncated to the buffer's capacity, not rejected.
                    let len = packet.len().min(buf.len());
                    buf[..len].copy_from_slice(&packet[..len]);
                    Ok(Some(Received {
                        len,
                        peer: "192.168.1.50:52000".parse().unwrap(),
                    }))
                }
                None => Ok(None),
            }
        }
        fn recv_unicast(&self, _buf: &mut [u8]) -> Result<Option<Received>> {
            Ok(None)
        }
        fn local_port(&self) -> u16 {
            1900
        }
        fn local_ip(&self) -> Option<Ipv4Addr> {
            Some(Ipv4Addr::new(192, 168, 1, 2))
        }
        fn soft_ap_ip(&self) -> Option<Ipv4Addr> {
            None
        }
        fn subnet_mask(&self, _iface_addr: Ipv4Addr) -> Option<Ipv4Addr> {
            None
        }
        fn interface_of(&self, _peer: Ipv4Addr) -> Ipv4Addr {
            Ipv4Addr::new(192, 168, 1, 2)
        }
    }

    #[test]
    fn tick_dispatches_a_recognized_request_once() {
        let root = Root::new("R", "upnp:rootdevice", "R", 8080);
        let request = b"M-SEARCH * HTTP/1.1\r\nST: upnp:rootdevice\r\nST.LEELANAUSOFTWARE.COM: \r\n\r\n".to_vec();
        let transport = SingleShotTransport {
            pending: RefCell::new(Some(request)),
            sent: RefCell::new(Vec::new()),
        };
        let config = Config {
            response_delay: std::time::Duration::from_millis(0),
            ..Config::default()
        };
        let server = Server::new(&config);

        let emitted = server.tick(&root, &transport).unwrap();
        assert_eq!(emitted, 1);
        assert_eq!(transport.sent.borrow().len(), 1);

        // a second tick sees no new packet pending
        let emitted = server.tick(&root, &transport).unwrap();
        assert_eq!(emitted, 0);
    }

    #[test]
    fn tick_drops_a_packet_that_exceeds_the_configured_budget() {
        let root = Root::new("R", "upnp:rootdevice", "R", 8080);
        let request = b"M-SEARCH * HTTP/1.1\r\nST: upnp:rootdevice\r\nST.LEELANAUSOFTWARE.COM: \r\n\r\n".to_vec();
        let transport = SingleShotTransport {
            pending: RefCell::new(Some(request)),
            sent: RefCell::new(Vec::new()),
        };
        let config = Config {
            response_delay: std::time::Duration::from_millis(0),
            packet_buffer_bytes: 16,
            ..Config::default()
        };
        let server = Server::new(&config);

        let emitted = server.tick(&root, &transport).unwrap();
        assert_eq!(emitted, 0);
        assert!(transport.sent.borrow().is_empty());
    }
}
