/*!
Walking the device tree and emitting the correct set of responses, in the correct
order, for a classified request.

The three search forms (root, uuid, type) each have their own traversal; all three
share the same per-response emission path so the inter-response delay and error
handling live in one place.
*/

use crate::ssdp::classify::ClassifiedRequest;
use crate::ssdp::response::ResponseBuilder;
use crate::transport::Transport;
use crate::tree::{DeviceNode, Node, RootNode, ServiceNode};
use crate::{Config, Result};
use std::net::{Ipv4Addr, SocketAddrV4};
use std::thread;

/// Walks a device tree against a classified request and emits matching responses
/// over a transport.
#[derive(Debug)]
pub struct SearchDispatcher<'a> {
    config: &'a Config,
}

impl<'a> SearchDispatcher<'a> {
    /// Build a dispatcher against the given policy.
    pub fn new(config: &'a Config) -> Self {
        SearchDispatcher { config }
    }

    /// Dispatch `request`, found on the tree rooted at `root`, to `peer` via
    /// `transport`. Emits every applicable response in tree order, sleeping
    /// [`Config::response_delay`] between them.
    pub fn dispatch(
        &self,
        request: &ClassifiedRequest,
        root: &dyn RootNode,
        peer: SocketAddrV4,
        transport: &dyn Transport,
    ) -> Result<usize> {
        let iface_addr = transport.interface_of(*peer.ip());
        let mut builder = ResponseBuilder::new(self.config.packet_buffer_bytes);
        let mut count = 0;

        match request {
            ClassifiedRequest::RootSearch { st_literal, all } => {
                self.send_root_subtree(&mut builder, root, st_literal, *all, iface_addr, peer, transport, &mut count)?;
            }
            ClassifiedRequest::UuidSearch { st_literal, uuid, all } => {
                if root.uuid() == uuid {
                    self.send_root_subtree(&mut builder, root, st_literal, *all, iface_addr, peer, transport, &mut count)?;
                } else if let Some(device) = root.devices().into_iter().find(|d| d.uuid() == uuid) {
                    self.emit(&mut builder, peer, transport, &mut count, |b| {
                        b.build_device(device, st_literal, iface_addr)
                    })?;
                    if *all {
                        self.send_device_services(&mut builder, device, st_literal, iface_addr, peer, transport, &mut count)?;
                    }
                }
            }
            ClassifiedRequest::TypeSearch { urn_literal } => {
                if root.is_type(urn_literal) {
                    self.emit(&mut builder, peer, transport, &mut count, |b| {
                        b.build_root(root, urn_literal, iface_addr)
                    })?;
                }
                for service in RootNode::services(root) {
                    if service.is_type(urn_literal) {
                        self.emit(&mut builder, peer, transport, &mut count, |b| {
                            b.build_service(service, urn_literal, iface_addr)
                        })?;
                    }
                }
                for device in root.devices() {
                    if device.is_type(urn_literal) {
                        self.emit(&mut builder, peer, transport, &mut count, |b| {
                            b.build_device(device, urn_literal, iface_addr)
                        })?;
                    }
                    for service in device.services() {
                        if service.is_type(urn_literal) {
                            self.emit(&mut builder, peer, transport, &mut count, |b| {
                                b.build_service(service, urn_literal, iface_addr)
                            })?;
                        }
                    }
                }
            }
        }

        Ok(count)
    }

    #[allow(clippy::too_many_arguments)]
    fn send_root_subtree(
        &self,
        builder: &mut ResponseBuilder,
        root: &dyn RootNode,
        st_literal: &str,
        all: bool,
        iface_addr: Ipv4Addr,
        peer: SocketAddrV4,
        transport: &dyn Transport,
        count: &mut usize,
    ) -> Result<()> {
        self.emit(builder, peer, transport, count, |b| b.build_root(root, st_literal, iface_addr))?;

        if !all {
            return Ok(());
        }

        for service in RootNode::services(root) {
            self.emit(builder, peer, transport, count, |b| {
                b.build_service(service, st_literal, iface_addr)
            })?;
        }

        for device in root.devices() {
            self.emit(builder, peer, transport, count, |b| {
                b.build_device(device, st_literal, iface_addr)
            })?;
            self.send_device_services(builder, device, st_literal, iface_addr, peer, transport, count)?;
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn send_device_services(
        &self,
        builder: &mut ResponseBuilder,
        device: &dyn DeviceNode,
        st_literal: &str,
        iface_addr: Ipv4Addr,
        peer: SocketAddrV4,
        transport: &dyn Transport,
        count: &mut usize,
    ) -> Result<()> {
        for service in device.services() {
            self.emit(builder, peer, transport, count, |b| {
                b.build_service(service, st_literal, iface_addr)
            })?;
        }
        Ok(())
    }

    fn emit<'b, F>(
        &self,
        builder: &'b mut ResponseBuilder,
        peer: SocketAddrV4,
        transport: &dyn Transport,
        count: &mut usize,
        build: F,
    ) -> Result<()>
    where
        F: FnOnce(&'b mut ResponseBuilder) -> Result<&'b [u8]>,
    {
        match build(builder) {
            Ok(bytes) => {
                transport.send_unicast(peer, bytes)?;
                *count += 1;
            }
            Err(e) => {
                warn!("SearchDispatcher::emit - dropping oversize response: {}", e);
            }
        }
        if *count > 0 {
            thread::sleep(self.config.response_delay);
        }
        Ok(())
    }
}
