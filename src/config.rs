/*!
Policy knobs for the engine: delays, timeouts, and buffer sizes that a caller may
reasonably want to tune without forking the crate. Protocol facts that peers must
agree on — the multicast address, the vendor suffix — stay as `const`s in
[`crate::syntax`] instead.
*/

use std::time::Duration;

/// Tunable policy for the engine. All entry points (`SearchDispatcher`, `QueryClient`,
/// `Server`) take a `&Config` rather than hardcoding these values.
#[derive(Clone, Debug)]
pub struct Config {
    /// Delay the [`crate::ssdp::dispatch::SearchDispatcher`] waits between emitting
    /// successive response datagrams, to avoid overrunning small receiver queues.
    pub response_delay: Duration,
    /// Interval the [`crate::ssdp::query::QueryClient`] sleeps between non-blocking
    /// polls of the receive socket.
    pub query_poll_interval: Duration,
    /// Default time budget for a query when the caller does not override it.
    pub default_query_timeout: Duration,
    /// Maximum embedded devices or services a single node may own. The reference
    /// tree in [`crate::tree::simple`] enforces this; an embedder's own tree may
    /// choose not to, though peers are not required to handle larger trees.
    pub max_children: u8,
    /// Size of the packet buffer used to receive a single datagram. A datagram
    /// larger than this is rejected with [`crate::Error::PacketTooLarge`] rather
    /// than silently truncated.
    pub packet_buffer_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            response_delay: Duration::from_millis(500),
            query_poll_interval: Duration::from_millis(100),
            default_query_timeout: Duration::from_millis(2000),
            max_children: 8,
            packet_buffer_bytes: 1536,
        }
    }
}
