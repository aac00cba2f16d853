/*!
Formatting the three response templates — root, embedded-device, service — into a
reusable output buffer.

Each is an independent UDP datagram. The builder owns a single `String` buffer it
clears and refills for each response, mirroring the source's fixed-size output
region; in safe Rust this is simply a `String` whose capacity is reserved once and
whose contents are replaced rather than reallocated on the common path.
*/

use crate::ssdp::desc;
use crate::syntax::{desc_header, CRLF, HEAD_CACHE_CONTROL, HEAD_LOCATION, HEAD_ST, HEAD_USN, STATUS_LINE};
use crate::tree::{DeviceNode, Node, RootNode, ServiceNode};
use crate::{Error, Result};
use std::net::Ipv4Addr;

/// Builds response datagrams into a single reused buffer.
#[derive(Debug)]
pub struct ResponseBuilder {
    buf: String,
    limit: usize,
}

impl ResponseBuilder {
    /// A builder whose output buffer is never allowed to grow past `limit` bytes;
    /// callers exceeding it get [`Error::PacketTooLarge`] rather than a silent
    /// truncation or an unbounded allocation.
    pub fn new(limit: usize) -> Self {
        ResponseBuilder {
            buf: String::with_capacity(limit),
            limit,
        }
    }

    /// The most recently built datagram's bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    fn finish(&mut self) -> Result<&[u8]> {
        if self.buf.len() > self.limit {
            let actual = self.buf.len();
            self.buf.clear();
            return Err(Error::PacketTooLarge {
                actual,
                limit: self.limit,
            });
        }
        Ok(self.buf.as_bytes())
    }

    /// Build a response for the root device.
    pub fn build_root(
        &mut self,
        root: &dyn RootNode,
        st_literal: &str,
        iface_addr: Ipv4Addr,
    ) -> Result<&[u8]> {
        let desc_value = desc::format_root(root.display_name(), root.num_devices(), root.num_services());
        self.build(root, st_literal, &desc_value, iface_addr);
        self.finish()
    }

    /// Build a response for an embedded device.
    pub fn build_device(
        &mut self,
        device: &dyn DeviceNode,
        st_literal: &str,
        iface_addr: Ipv4Addr,
    ) -> Result<&[u8]> {
        let desc_value = desc::format_device(device.display_name(), device.num_services(), device.parent_uuid());
        self.build(device, st_literal, &desc_value, iface_addr);
        self.finish()
    }

    /// Build a response for a service.
    pub fn build_service(
        &mut self,
        service: &dyn ServiceNode,
        st_literal: &str,
        iface_addr: Ipv4Addr,
    ) -> Result<&[u8]> {
        let desc_value = desc::format_service(service.display_name(), service.parent_uuid());
        self.build(service, st_literal, &desc_value, iface_addr);
        self.finish()
    }

    fn build(&mut self, node: &dyn Node, st_literal: &str, desc_value: &str, iface_addr: Ipv4Addr) {
        self.buf.clear();
        self.buf.push_str(STATUS_LINE);
        self.buf.push_str(CRLF);
        self.buf.push_str(HEAD_CACHE_CONTROL);
        self.buf.push_str(": max-age = 1800");
        self.buf.push_str(CRLF);
        self.buf.push_str(HEAD_LOCATION);
        self.buf.push_str(": ");
        self.buf.push_str(&node.location(iface_addr));
        self.buf.push_str(CRLF);
        self.buf.push_str(HEAD_ST);
        self.buf.push_str(": ");
        self.buf.push_str(st_literal);
        self.buf.push_str(CRLF);
        self.buf.push_str(HEAD_USN);
        self.buf.push_str(": uuid:");
        self.buf.push_str(node.uuid());
        self.buf.push_str("::");
        self.buf.push_str(node.node_type());
        self.buf.push_str(CRLF);
        self.buf.push_str(&desc_header());
        self.buf.push_str(": ");
        self.buf.push_str(desc_value);
        self.buf.push_str(CRLF);
        self.buf.push_str(CRLF);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssdp::header::HeaderParser;
    use crate::tree::simple::{Device, Root};
    use pretty_assertions::assert_eq;

    fn sample_root() -> Root {
        Root::new("R", "upnp:rootdevice", "R", 8080)
            .add_service("S1", "urn:x-com:service:Ping:1", "Ping")
            .add_device(
                Device::new("D1", "urn:x-com:device:Clock:1", "Clock")
                    .add_service("S2", "urn:x-com:service:Time:1", "Time"),
            )
    }

    #[test]
    fn root_response_round_trips() {
        let root = sample_root();
        let mut builder = ResponseBuilder::new(1536);
        let bytes = builder
            .build_root(&root, "upnp:rootdevice", Ipv4Addr::new(192, 168, 1, 2))
            .unwrap()
            .to_vec();

        let parser = HeaderParser::new(&bytes);
        assert!(parser.is_search_response());
        assert_eq!(parser.header_value("ST"), Some("upnp:rootdevice"));
        assert_eq!(parser.header_value("USN"), Some("uuid:R::upnp:rootdevice"));
        assert_eq!(parser.display_name(), Some("R"));
        assert_eq!(
            parser.header_value("LOCATION"),
            Some(root.location(Ipv4Addr::new(192, 168, 1, 2)).as_str())
        );
    }

    #[test]
    fn device_response_has_puuid_not_devices_count() {
        let root = sample_root();
        let device = &root.devices()[0];
        let mut builder = ResponseBuilder::new(1536);
        let bytes = builder
            .build_device(*device, "upnp:rootdevice", Ipv4Addr::new(192, 168, 1, 2))
            .unwrap()
            .to_vec();
        let parser = HeaderParser::new(&bytes);
        let desc_value = parser.header_value(&desc_header()).unwrap();
        assert!(desc_value.contains("puuid:R"));
        assert!(!desc_value.contains("devices:"));
    }

    #[test]
    fn oversize_response_is_rejected_not_truncated() {
        let root = sample_root();
        let mut builder = ResponseBuilder::new(8);
        let err = builder
            .build_root(&root, "upnp:rootdevice", Ipv4Addr::new(192, 168, 1, 2))
            .unwrap_err();
        assert!(matches!(err, Error::PacketTooLarge { .. }));
    }
}
