/*!
The crate's single error type.

Most of this engine never raises on bad input: a malformed inbound request is a
silent drop, and a malformed query response is simply ignored. `Error` exists for
the handful of conditions that really are failures — the local transport could not
be set up, a send failed, or the caller asked for something the wire protocol has
no shape for.
*/

use std::fmt;
use thiserror::Error as ThisError;

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// The crate's error type.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The underlying transport could not be opened: a bind failed, or a multicast
    /// group could not be joined.
    #[error("transport setup failed: {0}")]
    TransportSetup(#[source] std::io::Error),

    /// A send on an already-open socket failed.
    #[error("transport send failed: {0}")]
    TransportSend(#[source] std::io::Error),

    /// The caller supplied a search target that is not `upnp:rootdevice`, `uuid:…`,
    /// or `urn:…:device:…:…` / `urn:…:service:…:…`.
    #[error("'{0}' is not a valid search target")]
    InvalidSearchTarget(String),

    /// An inbound datagram was larger than the configured packet buffer and was
    /// rejected rather than silently truncated.
    #[error("packet of {actual} bytes exceeds the configured buffer of {limit} bytes")]
    PacketTooLarge {
        /// The size of the packet that was rejected.
        actual: usize,
        /// The configured buffer size it did not fit in.
        limit: usize,
    },
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::TransportSetup(e)
    }
}

/// The three shapes a search target is allowed to take; used in [`Error::InvalidSearchTarget`]
/// messages and by the classifier to describe what it expected.
#[derive(Clone, Copy, Debug)]
pub enum SearchTargetShape {
    /// `upnp:rootdevice`
    RootDevice,
    /// `uuid:<device-uuid>`
    Uuid,
    /// `urn:<domain>:device|service:<type>:<ver>`
    Urn,
}

impl fmt::Display for SearchTargetShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SearchTargetShape::RootDevice => "upnp:rootdevice",
            SearchTargetShape::Uuid => "uuid:<device-uuid>",
            SearchTargetShape::Urn => "urn:<domain>:device|service:<type>:<ver>",
        })
    }
}
