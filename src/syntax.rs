/*!
Wire-protocol constants.

These are protocol facts, not policy: the multicast group and port, the method and
status-line tokens, the header names, and the vendor suffix are part of the contract
with peer implementations and must not vary at runtime. Anything a caller may
reasonably want to tune (delays, timeouts, buffer sizes) lives in [`crate::Config`]
instead.
*/

/// Multicast channel and port this engine listens on and searches against. Unlike
/// full SSDP this is not configurable per host at the protocol level — both sides
/// of a conversation must agree on it.
pub const MULTICAST_ADDRESS: &str = "239.255.255.250:1900";

/// The multicast group alone, without a port.
pub const MULTICAST_GROUP: &str = "239.255.255.250";

/// The UDP port reserved for this protocol.
pub const SSDP_PORT: u16 = 1900;

// ------------------------------------------------------------------------------------------------
// HTTP-like framing
// ------------------------------------------------------------------------------------------------

/// The request method used for a search.
pub const METHOD_SEARCH: &str = "M-SEARCH";

/// The first 8 bytes of a search request; used for cheap classification without a
/// full parse.
pub const METHOD_SEARCH_PREFIX: &[u8; 8] = b"M-SEARCH";

/// The first 8 bytes of a search response's status line.
pub const RESPONSE_PREFIX: &[u8; 8] = b"HTTP/1.1";

/// The request line emitted for a search, e.g. `M-SEARCH * HTTP/1.1`.
pub const REQUEST_LINE: &str = "M-SEARCH * HTTP/1.1";

/// The status line emitted for a response. Note the trailing space before the line
/// terminator: some SSDP implementations are sensitive to its presence, so it is
/// preserved exactly even though it reads oddly.
pub const STATUS_LINE: &str = "HTTP/1.1 200 OK ";

/// Line terminator used throughout the wire protocol.
pub const CRLF: &str = "\r\n";

// ------------------------------------------------------------------------------------------------
// Headers
// ------------------------------------------------------------------------------------------------

/// `HOST` — the multicast group and port, echoed in outbound search requests.
pub const HEAD_HOST: &str = "HOST";

/// `ST` — the search target, both in requests (what is being sought) and in
/// responses (echoed verbatim from the request that elicited them).
pub const HEAD_ST: &str = "ST";

/// `CACHE-CONTROL` — carries the `max-age` directive on responses.
pub const HEAD_CACHE_CONTROL: &str = "CACHE-CONTROL";

/// `LOCATION` — the URL of the matched node's description, on responses.
pub const HEAD_LOCATION: &str = "LOCATION";

/// `USN` — `uuid:<device-uuid>::<type>`, the unique identifier of the matched node.
pub const HEAD_USN: &str = "USN";

/// The vendor suffix used to namespace the gate header and description header.
/// This is a wire-contract constant: changing it breaks interop with any peer
/// built against the same protocol.
pub const VENDOR_SUFFIX: &str = "LEELANAUSOFTWARE.COM";

/// The gate header name, `ST.<VENDOR>`. Its presence (any value, including empty)
/// is mandatory on inbound requests; its absence causes a silent drop.
pub fn gate_header() -> String {
    format!("ST.{}", VENDOR_SUFFIX)
}

/// The description header name, `DESC.<VENDOR>`, carried on responses.
pub fn desc_header() -> String {
    format!("DESC.{}", VENDOR_SUFFIX)
}

/// The gate header value that requests expansion to embedded devices and services.
pub const GATE_ALL: &str = "ssdp:all";

// ------------------------------------------------------------------------------------------------
// Search targets
// ------------------------------------------------------------------------------------------------

/// The literal `ST` value that searches for (and is matched by) the root device only.
pub const ST_ROOT_DEVICE: &str = "upnp:rootdevice";

/// Prefix for a uuid-form search target, `uuid:<device-uuid>`.
pub const ST_UUID_PREFIX: &str = "uuid:";

/// Prefix for a type-form search target, `urn:<domain>:device|service:<type>:<ver>`.
pub const ST_URN_PREFIX: &str = "urn:";
