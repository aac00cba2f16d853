/*!
The client side: build an `M-SEARCH`, multicast it, and collect filtered replies
within a time budget.
*/

use crate::error::SearchTargetShape;
use crate::ssdp::header::HeaderParser;
use crate::syntax::{gate_header, CRLF, GATE_ALL, HEAD_HOST, HEAD_ST, MULTICAST_ADDRESS, REQUEST_LINE, ST_ROOT_DEVICE, ST_URN_PREFIX, ST_UUID_PREFIX};
use crate::transport::Transport;
use crate::{Config, Error, Result};
use std::thread;
use std::time::{Duration, Instant};

/// A parsed, filtered search response handed to the caller's handler.
#[derive(Clone, Debug)]
pub struct SearchResponse {
    /// The `ST` header, guaranteed equal to the request's `ST`.
    pub st: String,
    /// The `DESC.<vendor>` name field, guaranteed non-empty.
    pub display_name: String,
    /// The raw `LOCATION` header, if present.
    pub location: Option<String>,
    /// The raw `USN` header, if present.
    pub usn: Option<String>,
}

/// Multicasts an `M-SEARCH` and collects matching replies.
#[derive(Debug)]
pub struct QueryClient<'a> {
    config: &'a Config,
}

impl<'a> QueryClient<'a> {
    /// Build a client against the given policy.
    pub fn new(config: &'a Config) -> Self {
        QueryClient { config }
    }

    /// Search for `st` (one of `upnp:rootdevice`, `uuid:…`, `urn:…`), invoking
    /// `handler` for each reply whose `ST` matches byte-for-byte and whose
    /// `DESC.name` is non-empty.
    ///
    /// For a `uuid:` search the loop exits as soon as one matching reply has been
    /// dispatched; otherwise it runs for the full (possibly deadline-extended)
    /// timeout. Returns the number of replies dispatched to `handler`.
    pub fn search<F>(
        &self,
        st: &str,
        all: bool,
        timeout: Option<Duration>,
        transport: &dyn Transport,
        mut handler: F,
    ) -> Result<usize>
    where
        F: FnMut(SearchResponse),
    {
        validate_search_target(st)?;
        let datagram = self.build_request(st, all);
        transport.send_multicast(datagram.as_bytes())?;

        let is_uuid_search = st.starts_with(ST_UUID_PREFIX);
        let timeout = timeout.unwrap_or(self.config.default_query_timeout);
        let mut deadline = Instant::now() + timeout;
        let mut buf = vec![0u8; self.config.packet_buffer_bytes];
        let mut dispatched = 0;

        while Instant::now() < deadline {
            match transport.recv_unicast(&mut buf)? {
                Some(received) => {
                    if let Some(response) =
                        parse_and_filter(&buf[..received.len], st, self.config.packet_buffer_bytes)
                    {
                        dispatched += 1;
                        deadline = Instant::now() + timeout;
                        handler(response);
                        if is_uuid_search {
                            return Ok(dispatched);
                        }
                    }
                }
                None => thread::sleep(self.config.query_poll_interval),
            }
        }

        Ok(dispatched)
    }

    fn build_request(&self, st: &str, all: bool) -> String {
        let mut buf = String::new();
        buf.push_str(REQUEST_LINE);
        buf.push_str(CRLF);
        buf.push_str(HEAD_HOST);
        buf.push_str(": ");
        buf.push_str(MULTICAST_ADDRESS);
        buf.push_str(CRLF);
        buf.push_str(HEAD_ST);
        buf.push_str(": ");
        buf.push_str(st);
        buf.push_str(CRLF);
        buf.push_str(&gate_header());
        buf.push_str(": ");
        if all {
            buf.push_str(GATE_ALL);
        }
        buf.push_str(CRLF);
        buf.push_str(CRLF);
        buf
    }
}

fn parse_and_filter(bytes: &[u8], requested_st: &str, packet_buffer_bytes: usize) -> Option<SearchResponse> {
    let parser = HeaderParser::new(bytes);
    if parser.exceeds_budget(packet_buffer_bytes) {
        warn!(
            "QueryClient::search - dropping reply that exceeds the {}-byte budget",
            packet_buffer_bytes
        );
        return None;
    }
    if !parser.is_search_response() {
        return None;
    }
    let st = parser.header_value(HEAD_ST)?;
    if st != requested_st {
        return None;
    }
    let display_name = parser.display_name()?;
    if display_name.is_empty() {
        return None;
    }
    Some(SearchResponse {
        st: st.to_string(),
        display_name: display_name.to_string(),
        location: parser.header_value("LOCATION").map(str::to_string),
        usn: parser.header_value("USN").map(str::to_string),
    })
}

fn validate_search_target(st: &str) -> Result<()> {
    if st == ST_ROOT_DEVICE || st.starts_with(ST_UUID_PREFIX) || st.starts_with(ST_URN_PREFIX) {
        Ok(())
    } else {
        debug!(
            "QueryClient::search - rejecting '{}', expected one of {}, {}, {}",
            st,
            SearchTargetShape::RootDevice,
            SearchTargetShape::Uuid,
            SearchTargetShape::Urn
        );
        Err(Error::InvalidSearchTarget(st.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssdp::response::ResponseBuilder;
    use crate::tree::simple::Root;
    use crate::transport::Received;
    use std::cell::RefCell;
    use std::net::{Ipv4Addr, SocketAddrV4};
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct ScriptedTransport {
        sent: RefCell<Vec<Vec<u8>>>,
        replies: RefCell<Vec<Vec<u8>>>,
    }

    impl Transport for ScriptedTransport {
        fn send_multicast(&self, bytes: &[u8]) -> Result<()> {
            self.sent.borrow_mut().push(bytes.to_vec());
            Ok(())
        }
        fn send_unicast(&self, _peer: SocketAddrV4, bytes: &[u8]) -> Result<()> {
            self.sent.borrow_mut().push(bytes.to_vec());
            Ok(())
        }
        fn recv_multicast(&self, _buf: &mut [u8]) -> Result<Option<Received>> {
            Ok(None)
        }
        fn recv_unicast(&self, buf: &mut [u8]) -> Result<Option<Received>> {
            let mut replies = self.replies.borrow_mut();
            if replies.is_empty() {
                return Ok(None);
            }
            let reply = replies.remove(0);
            // Mirror a real UDP socket: a datagram larger than the receive buffer
            // is truncated to the buffer's capacity, not rejected.
            let len = reply.len().min(buf.len());
            buf[..len].copy_from_slice(&reply[..len]);
            Ok(Some(Received {
                len,
                peer: "192.168.1.9:1900".parse().unwrap(),
            }))
        }
        fn local_port(&self) -> u16 {
            54321
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

    fn response_bytes(st: &str, name: &str) -> Vec<u8> {
        let root = Root::new("R", "upnp:rootdevice", name, 8080);
        let mut builder = ResponseBuilder::new(1536);
        builder
            .build_root(&root, st, Ipv4Addr::new(192, 168, 1, 2))
            .unwrap()
            .to_vec()
    }

    #[test]
    fn invalid_search_target_sends_nothing() {
        let config = Config::default();
        let client = QueryClient::new(&config);
        let transport = ScriptedTransport {
            sent: RefCell::new(Vec::new()),
            replies: RefCell::new(Vec::new()),
        };
        let err = client
            .search("garbage", false, Some(Duration::from_millis(1)), &transport, |_| {})
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSearchTarget(_)));
        assert!(transport.sent.borrow().is_empty());
    }

    #[test]
    fn client_filters_by_st_and_desc_name() {
        let config = Config {
            query_poll_interval: Duration::from_millis(1),
            ..Config::default()
        };
        let client = QueryClient::new(&config);
        let matching = response_bytes("upnp:rootdevice", "A");
        let mismatching = response_bytes("urn:x-com:device:Other:1", "B");
        let transport = ScriptedTransport {
            sent: RefCell::new(Vec::new()),
            replies: RefCell::new(vec![mismatching, matching]),
        };

        let mut seen = Vec::new();
        client
            .search(
                "upnp:rootdevice",
                false,
                Some(Duration::from_millis(50)),
                &transport,
                |r| seen.push(r.display_name),
            )
            .unwrap();

        assert_eq!(seen, vec!["A".to_string()]);
    }

    #[test]
    fn reply_exceeding_the_configured_budget_is_dropped() {
        let config = Config {
            query_poll_interval: Duration::from_millis(1),
            packet_buffer_bytes: 16,
            ..Config::default()
        };
        let client = QueryClient::new(&config);
        let oversize = response_bytes("upnp:rootdevice", "A");
        let transport = ScriptedTransport {
            sent: RefCell::new(Vec::new()),
            replies: RefCell::new(vec![oversize]),
        };

        let mut seen = Vec::new();
        client
            .search(
                "upnp:rootdevice",
                false,
                Some(Duration::from_millis(20)),
                &transport,
                |r| seen.push(r.display_name),
            )
            .unwrap();

        assert!(seen.is_empty());
    }
}
