/*!
The device-tree contract the dispatcher walks.

This crate never owns or mutates the tree it serves: an embedder's own device-tree
data structure — however it chooses to represent ownership, web-UI URLs, or
persistence — implements [`Node`] and the per-kind traits below, and the dispatcher
in [`crate::ssdp::dispatch`] borrows it for the duration of a single search.

A root owns 0..=`Config::max_children` embedded devices and 0..=`Config::max_children`
services; an embedded device owns 0..=`Config::max_children` services. Services are
always leaves. The dispatcher never needs to mutate, clone, or outlive the borrow it
is given.

[`tree::simple`](simple) ships a small owned reference implementation of this
contract, used by this crate's own tests and CLI; it is not part of the protocol
core and an embedder is free to replace it entirely.
*/

use std::net::Ipv4Addr;

/// Which of the three node kinds a [`Node`] is. Mirrors the `DESC` key-presence
/// rule: a root has `devices` and `services`, an embedded device has `services`
/// and `puuid`, a service has only `puuid`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// The single root device of a tree.
    Root,
    /// An embedded device, owned by the root.
    Device,
    /// A service, owned by either the root or an embedded device.
    Service,
}

/// Capabilities common to every node in the tree.
pub trait Node: std::fmt::Debug {
    /// The node's UUID, printed in canonical 36-character form.
    fn uuid(&self) -> &str;

    /// The node's type URN, e.g. `urn:x-com:service:Clock:1`. For the root this
    /// is conventionally `upnp:rootdevice`-adjacent but is compared byte-exact
    /// against whatever search targets name it; this engine does not interpret it.
    fn node_type(&self) -> &str;

    /// A human-readable name, carried in the `DESC.<vendor>` response header.
    fn display_name(&self) -> &str;

    /// Which kind of node this is.
    fn kind(&self) -> Kind;

    /// The URL of this node's description, rendered against the interface address
    /// the inbound request arrived on. Entirely owned by the tree: this engine
    /// never constructs a URL itself, only asks the tree for one.
    fn location(&self, iface_addr: Ipv4Addr) -> String;

    /// Byte-exact comparison against `type_str`. The default implementation is
    /// exactly `self.node_type() == type_str`; a tree is free to override this
    /// if it has a cheaper representation to compare against; it must not weaken
    /// the comparison (e.g. case-fold it).
    fn is_type(&self, type_str: &str) -> bool {
        self.node_type() == type_str
    }
}

/// A service: a leaf node, owned by either the root or one of its embedded devices.
pub trait ServiceNode: Node {
    /// The UUID of the node that owns this service (the root, or an embedded device).
    fn parent_uuid(&self) -> &str;
}

/// An embedded device, owned by the root.
pub trait DeviceNode: Node {
    /// The UUID of the root that owns this device.
    fn parent_uuid(&self) -> &str;

    /// The services this device owns, in registration order.
    fn services(&self) -> Vec<&dyn ServiceNode>;

    /// Number of services this device owns; equal to `self.services().len()`
    /// but does not require materializing the list.
    fn num_services(&self) -> usize {
        self.services().len()
    }
}

/// The root of a tree.
pub trait RootNode: Node {
    /// The services the root itself owns directly, in registration order.
    fn services(&self) -> Vec<&dyn ServiceNode>;

    /// The embedded devices the root owns, in registration order.
    fn devices(&self) -> Vec<&dyn DeviceNode>;

    /// Number of services the root owns directly.
    fn num_services(&self) -> usize {
        RootNode::services(self).len()
    }

    /// Number of embedded devices the root owns.
    fn num_devices(&self) -> usize {
        self.devices().len()
    }
}

pub mod simple;
