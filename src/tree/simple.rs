/*!
A small owned, in-memory implementation of the [`super::Node`] contract.

This is the tree this crate's own tests and `ssdp-tool` CLI exercise against; it is
not part of the protocol core. An embedder with its own device/service model
implements [`super::RootNode`] / [`super::DeviceNode`] / [`super::ServiceNode`]
directly and never needs this module.
*/

use crate::tree::{DeviceNode, Kind, Node, RootNode, ServiceNode};
use std::net::Ipv4Addr;

/// The cardinality bound this reference tree enforces on every node's children,
/// matching [`crate::Config::default`]'s `max_children`. A root may own at most
/// this many services and at most this many embedded devices; an embedded device
/// may own at most this many services.
const MAX_CHILDREN: usize = 8;

/// A leaf service, owned by a [`Root`] or a [`Device`].
#[derive(Clone, Debug)]
pub struct Service {
    uuid: String,
    service_type: String,
    display_name: String,
    parent_uuid: String,
    path: String,
}

/// An embedded device, owned by a [`Root`].
#[derive(Clone, Debug)]
pub struct Device {
    uuid: String,
    device_type: String,
    display_name: String,
    parent_uuid: String,
    path: String,
    services: Vec<Service>,
}

/// The root of a tree, and the entry point callers pass to the dispatcher.
#[derive(Clone, Debug)]
pub struct Root {
    uuid: String,
    device_type: String,
    display_name: String,
    port: u16,
    services: Vec<Service>,
    devices: Vec<Device>,
}

impl Service {
    fn new(uuid: &str, service_type: &str, display_name: &str, parent_uuid: &str, path: String) -> Self {
        Service {
            uuid: uuid.to_string(),
            service_type: service_type.to_string(),
            display_name: display_name.to_string(),
            parent_uuid: parent_uuid.to_string(),
            path,
        }
    }
}

impl Node for Service {
    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn node_type(&self) -> &str {
        &self.service_type
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn kind(&self) -> Kind {
        Kind::Service
    }

    fn location(&self, iface_addr: Ipv4Addr) -> String {
        format!("http://{}{}", iface_addr, self.path)
    }
}

impl ServiceNode for Service {
    fn parent_uuid(&self) -> &str {
        &self.parent_uuid
    }
}

impl Device {
    /// Start building an embedded device. Call [`Device::add_service`] to attach
    /// services before handing it to [`Root::add_device`].
    pub fn new(uuid: &str, device_type: &str, display_name: &str) -> Self {
        Device {
            uuid: uuid.to_string(),
            device_type: device_type.to_string(),
            display_name: display_name.to_string(),
            parent_uuid: String::new(),
            path: String::new(),
            services: Vec::new(),
        }
    }

    /// Attach a service to this device, consuming and returning `self` for chaining.
    ///
    /// # Panics
    ///
    /// Panics if this device already owns `MAX_CHILDREN` services.
    pub fn add_service(mut self, uuid: &str, service_type: &str, display_name: &str) -> Self {
        assert!(
            self.services.len() < MAX_CHILDREN,
            "device '{}' already owns {} services, the maximum this tree allows",
            self.uuid,
            MAX_CHILDREN
        );
        self.services.push(Service {
            uuid: uuid.to_string(),
            service_type: service_type.to_string(),
            display_name: display_name.to_string(),
            parent_uuid: String::new(),
            path: String::new(),
        });
        self
    }

    fn finish(mut self, root_uuid: &str, root_path: &str) -> Self {
        self.parent_uuid = root_uuid.to_string();
        self.path = format!("{}/{}", root_path, self.uuid);
        for service in &mut self.services {
            service.parent_uuid = self.uuid.clone();
            service.path = format!("{}/{}", self.path, service.uuid);
        }
        self
    }
}

impl Node for Device {
    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn node_type(&self) -> &str {
        &self.device_type
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn kind(&self) -> Kind {
        Kind::Device
    }

    fn location(&self, iface_addr: Ipv4Addr) -> String {
        format!("http://{}{}", iface_addr, self.path)
    }
}

impl DeviceNode for Device {
    fn parent_uuid(&self) -> &str {
        &self.parent_uuid
    }

    fn services(&self) -> Vec<&dyn ServiceNode> {
        self.services.iter().map(|s| s as &dyn ServiceNode).collect()
    }
}

impl Root {
    /// Start building a root device. The `port` is used only by this reference
    /// tree's own `location()` rendering; it has no protocol meaning.
    pub fn new(uuid: &str, device_type: &str, display_name: &str, port: u16) -> Self {
        Root {
            uuid: uuid.to_string(),
            device_type: device_type.to_string(),
            display_name: display_name.to_string(),
            port,
            services: Vec::new(),
            devices: Vec::new(),
        }
    }

    /// Attach a service owned directly by the root.
    ///
    /// # Panics
    ///
    /// Panics if the root already owns `MAX_CHILDREN` services.
    pub fn add_service(mut self, uuid: &str, service_type: &str, display_name: &str) -> Self {
        assert!(
            self.services.len() < MAX_CHILDREN,
            "root '{}' already owns {} services, the maximum this tree allows",
            self.uuid,
            MAX_CHILDREN
        );
        let path = format!(":{}/{}", self.port, uuid);
        self.services
            .push(Service::new(uuid, service_type, display_name, &self.uuid, path));
        self
    }

    /// Attach an embedded device, finishing its path/parent wiring against this root.
    ///
    /// # Panics
    ///
    /// Panics if the root already owns `MAX_CHILDREN` embedded devices.
    pub fn add_device(mut self, device: Device) -> Self {
        assert!(
            self.devices.len() < MAX_CHILDREN,
            "root '{}' already owns {} devices, the maximum this tree allows",
            self.uuid,
            MAX_CHILDREN
        );
        let root_path = format!(":{}", self.port);
        self.devices.push(device.finish(&self.uuid, &root_path));
        self
    }
}

impl Node for Root {
    fn uuid(&self) -> &str {
        &self.uuid
    }

    fn node_type(&self) -> &str {
        &self.device_type
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn kind(&self) -> Kind {
        Kind::Root
    }

    fn location(&self, iface_addr: Ipv4Addr) -> String {
        format!("http://{}:{}", iface_addr, self.port)
    }
}

impl RootNode for Root {
    fn services(&self) -> Vec<&dyn ServiceNode> {
        self.services.iter().map(|s| s as &dyn ServiceNode).collect()
    }

    fn devices(&self) -> Vec<&dyn DeviceNode> {
        self.devices.iter().map(|d| d as &dyn DeviceNode).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_root() -> Root {
        Root::new("R", "upnp:rootdevice", "R", 8080)
            .add_service("S1", "urn:x-com:service:Ping:1", "Ping")
            .add_device(
                Device::new("D1", "urn:x-com:device:Clock:1", "Clock")
                    .add_service("S2", "urn:x-com:service:Time:1", "Time"),
            )
    }

    #[test]
    fn root_exposes_direct_children() {
        let root = sample_root();
        assert_eq!(root.uuid(), "R");
        assert_eq!(RootNode::services(&root).len(), 1);
        assert_eq!(root.devices().len(), 1);
    }

    #[test]
    fn device_paths_nest_under_root() {
        let root = sample_root();
        let device = &root.devices()[0];
        assert_eq!(device.parent_uuid(), "R");
        assert_eq!(device.services().len(), 1);
        let service = &device.services()[0];
        assert_eq!(service.parent_uuid(), "D1");
        assert!(service.location(Ipv4Addr::new(192, 168, 1, 2)).ends_with("/D1/S2"));
    }

    #[test]
    fn root_service_parent_is_root() {
        let root = sample_root();
        let service = &RootNode::services(&root)[0];
        assert_eq!(service.parent_uuid(), "R");
    }

    #[test]
    #[should_panic(expected = "maximum this tree allows")]
    fn root_rejects_a_ninth_service() {
        let mut root = Root::new("R", "upnp:rootdevice", "R", 8080);
        for i in 0..MAX_CHILDREN {
            root = root.add_service(&format!("S{}", i), "urn:x-com:service:Ping:1", "Ping");
        }
        root.add_service("S9", "urn:x-com:service:Ping:1", "Ping");
    }

    #[test]
    #[should_panic(expected = "maximum this tree allows")]
    fn device_rejects_a_ninth_service() {
        let mut device = Device::new("D1", "urn:x-com:device:Clock:1", "Clock");
        for i in 0..MAX_CHILDREN {
            device = device.add_service(&format!("S{}", i), "urn:x-com:service:Time:1", "Time");
        }
        device.add_service("S9", "urn:x-com:service:Time:1", "Time");
    }
}
