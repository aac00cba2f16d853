/*!
Turning a parsed inbound packet into a [`ClassifiedRequest`], or silently dropping
it.

A request is rejected — with no response, and no error surfaced — unless it is an
`M-SEARCH`, carries the gate header, and carries an `ST` header in one of the three
recognized shapes. This is the engine's one enforced quiet spot: unrecognized
traffic produces nothing, by design (see the crate's module docs on chatter).
*/

use crate::ssdp::header::HeaderParser;
use crate::syntax::{gate_header, GATE_ALL, HEAD_ST, ST_ROOT_DEVICE, ST_URN_PREFIX, ST_UUID_PREFIX};

/// A search request, classified by the shape of its `ST` header.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClassifiedRequest {
    /// `ST: upnp:rootdevice`.
    RootSearch {
        /// The literal `ST` value from the request, echoed verbatim in responses.
        st_literal: String,
        /// Whether the gate header requested expansion to embedded devices/services.
        all: bool,
    },
    /// `ST: uuid:<device-uuid>`.
    UuidSearch {
        /// The literal `ST` value from the request (`uuid:<device-uuid>`), echoed
        /// verbatim in responses regardless of which node matches.
        st_literal: String,
        /// The uuid being searched for (the part after `uuid:`, spaces trimmed),
        /// used to locate the node in the tree.
        uuid: String,
        /// Whether the gate header requested expansion.
        all: bool,
    },
    /// `ST: urn:<domain>:device|service:<type>:<ver>`.
    TypeSearch {
        /// The literal `ST` value, compared byte-exact against each node's type.
        urn_literal: String,
    },
}

/// Classify a single inbound packet. Returns `None` if the packet should be
/// silently dropped: not an `M-SEARCH`, missing the gate header, missing `ST`, or
/// `ST` not in one of the three recognized shapes.
pub fn classify(parser: &HeaderParser<'_>) -> Option<ClassifiedRequest> {
    if !parser.is_search_request() {
        return None;
    }
    let gate = parser.header_value(&gate_header())?;
    let all = gate.starts_with(GATE_ALL);

    let st = parser.header_value(HEAD_ST)?;

    if st == ST_ROOT_DEVICE {
        Some(ClassifiedRequest::RootSearch {
            st_literal: st.to_string(),
            all,
        })
    } else if let Some(rest) = st.strip_prefix(ST_UUID_PREFIX) {
        Some(ClassifiedRequest::UuidSearch {
            st_literal: st.to_string(),
            uuid: rest.trim_start().to_string(),
            all,
        })
    } else if st.starts_with(ST_URN_PREFIX) {
        Some(ClassifiedRequest::TypeSearch {
            urn_literal: st.to_string(),
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classify_bytes(buf: &[u8]) -> Option<ClassifiedRequest> {
        classify(&HeaderParser::new(buf))
    }

    #[test]
    fn silent_gate_drops_request_without_gate_header() {
        let buf = b"M-SEARCH * HTTP/1.1\r\nHOST: 239.255.255.250:1900\r\nST: upnp:rootdevice\r\n\r\n";
        assert_eq!(classify_bytes(buf), None);
    }

    #[test]
    fn root_search_without_all() {
        let buf = b"M-SEARCH * HTTP/1.1\r\nST: upnp:rootdevice\r\nST.LEELANAUSOFTWARE.COM: \r\n\r\n";
        assert_eq!(
            classify_bytes(buf),
            Some(ClassifiedRequest::RootSearch {
                st_literal: "upnp:rootdevice".to_string(),
                all: false,
            })
        );
    }

    #[test]
    fn root_search_with_all() {
        let buf = b"M-SEARCH * HTTP/1.1\r\nST: upnp:rootdevice\r\nST.LEELANAUSOFTWARE.COM: ssdp:all\r\n\r\n";
        assert_eq!(
            classify_bytes(buf),
            Some(ClassifiedRequest::RootSearch {
                st_literal: "upnp:rootdevice".to_string(),
                all: true,
            })
        );
    }

    #[test]
    fn uuid_search_trims_leading_space() {
        let buf = b"M-SEARCH * HTTP/1.1\r\nST: uuid: ZZZZ-unknown\r\nST.LEELANAUSOFTWARE.COM: \r\n\r\n";
        assert_eq!(
            classify_bytes(buf),
            Some(ClassifiedRequest::UuidSearch {
                st_literal: "uuid: ZZZZ-unknown".to_string(),
                uuid: "ZZZZ-unknown".to_string(),
                all: false,
            })
        );
    }

    #[test]
    fn type_search() {
        let buf = b"M-SEARCH * HTTP/1.1\r\nST: urn:x-com:device:Clock:1\r\nST.LEELANAUSOFTWARE.COM: ssdp:all\r\n\r\n";
        assert_eq!(
            classify_bytes(buf),
            Some(ClassifiedRequest::TypeSearch {
                urn_literal: "urn:x-com:device:Clock:1".to_string(),
            })
        );
    }

    #[test]
    fn unrecognized_st_shape_is_dropped() {
        let buf = b"M-SEARCH * HTTP/1.1\r\nST: garbage\r\nST.LEELANAUSOFTWARE.COM: \r\n\r\n";
        assert_eq!(classify_bytes(buf), None);
    }

    #[test]
    fn non_search_method_is_dropped() {
        let buf = b"HTTP/1.1 200 OK \r\nST: upnp:rootdevice\r\n\r\n";
        assert_eq!(classify_bytes(buf), None);
    }
}
