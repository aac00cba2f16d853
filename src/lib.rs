/*!
A compact discovery-protocol engine modeled on, but not identical to, UPnP SSDP.

It lets small networked nodes advertise a shallow hierarchy of logical devices and
services on a local IP segment, and lets peers locate those entities by multicast
query, without the chattiness of full SSDP: no startup/shutdown announcements, and
no responses to unrecognized queries.

The crate is organized leaf-first:

* [`ssdp::header`] — zero-copy line iteration and header lookup over a single packet.
* [`ssdp::desc`] — the `DESC.<vendor>` compound header value.
* [`ssdp::classify`] — turning a parsed packet into a [`ssdp::classify::ClassifiedRequest`].
* [`ssdp::response`] — formatting the three response templates.
* [`ssdp::dispatch`] — walking the device tree and emitting responses in order.
* [`ssdp::query`] — the client side: multicast a search, collect filtered replies.
* [`transport`] — the socket primitives the rest of the crate is built against.
* [`tree`] — the device-tree contract the dispatcher walks.
* [`server`] — a small cooperative tick loop tying transport and dispatch together.

Device trees, their web-UI URLs, and the underlying socket primitives are external
collaborators with narrow contracts (see [`tree`] and [`transport`]); this crate does
not mutate a device tree, and performs no retransmission or reliability layer above UDP.
*/

#![warn(
    missing_debug_implementations,
    missing_docs,
    unused_extern_crates,
    rust_2018_idioms
)]

#[macro_use]
extern crate tracing;

pub use error::{Error, Result};

pub use config::Config;

mod error;

mod config;

pub mod syntax;

pub mod tree;

pub mod transport;

pub mod ssdp;

pub mod server;
