/*!
Zero-copy line iteration and header lookup over a single packet buffer.

Everything here borrows from the caller's buffer; nothing is copied or allocated.
This is the Rust-shaped replacement for the source's cursor/out-parameter API: a
`&str` slice carries both the data and its bound, so there is no `out_len` to manage
and no risk of reading past the buffer's end.
*/

use crate::syntax::{METHOD_SEARCH_PREFIX, RESPONSE_PREFIX};

/// A borrowed view over one packet's worth of header lines.
///
/// Construction never fails and never copies: `HeaderParser::new` only trims
/// leading spaces and finds the first line boundary. All further work — lookups,
/// classification — walks the borrowed text directly.
#[derive(Clone, Copy, Debug)]
pub struct HeaderParser<'a> {
    text: &'a str,
}

impl<'a> HeaderParser<'a> {
    /// Wrap a raw packet buffer. Leading spaces before the first line are skipped,
    /// matching the source's construction-time trim.
    pub fn new(buf: &'a [u8]) -> Self {
        let text = std::str::from_utf8(buf).unwrap_or("");
        HeaderParser {
            text: text.trim_start_matches(' '),
        }
    }

    /// True iff the packet's first 8 bytes are `M-SEARCH`.
    pub fn is_search_request(&self) -> bool {
        self.text.as_bytes().starts_with(METHOD_SEARCH_PREFIX)
    }

    /// True iff the packet's first 8 bytes are `HTTP/1.1`. The reason phrase and
    /// status code are not otherwise validated here; that is a classifier concern.
    pub fn is_search_response(&self) -> bool {
        self.text.as_bytes().starts_with(RESPONSE_PREFIX)
    }

    /// The non-empty lines of this packet, in order, with their CRLF terminators
    /// stripped. The request/status line is included as the first item.
    pub fn lines(&self) -> impl Iterator<Item = &'a str> {
        self.text.split("\r\n").filter(|l| !l.is_empty())
    }

    /// Look up header `name`, returning its trimmed value.
    ///
    /// A line matches iff it begins with `name` and the next byte is `:` or a
    /// space; the value is everything after the first `:` on that line, trimmed of
    /// leading and trailing spaces. If more than one line matches, the **last**
    /// one wins — this mirrors the source's non-short-circuiting scan and is
    /// preserved deliberately (see `crate::ssdp` module docs).
    pub fn header_value(&self, name: &str) -> Option<&'a str> {
        let mut found = None;
        for line in self.lines() {
            if line_matches_header(line, name) {
                if let Some(colon) = line.find(':') {
                    found = Some(line[colon + 1..].trim());
                }
            }
        }
        found
    }

    /// The `:name:` value out of the `DESC.<vendor>` header, if both the header
    /// and the `:name:` key are present.
    pub fn display_name(&self) -> Option<&'a str> {
        let desc = self.header_value(&crate::syntax::desc_header())?;
        crate::ssdp::desc::field(desc, "name")
    }

    /// Largest length, in bytes, of any line in this packet (terminator excluded).
    /// Exposed so a caller sizing a fixed-size response buffer can validate it is
    /// at least as large as the largest inbound line it needs to echo.
    pub fn max_line_len(&self) -> usize {
        self.lines().map(|l| l.len()).max().unwrap_or(0)
    }

    /// True iff this packet's longest line is at least `budget` bytes. A line can
    /// only reach the full size of the receive buffer if that buffer's capacity cut
    /// it off before a terminating CRLF was seen, so this is the signal a receiver
    /// uses to tell a genuinely packet-sized line apart from one truncated by
    /// `Config::packet_buffer_bytes`.
    pub fn exceeds_budget(&self, budget: usize) -> bool {
        self.max_line_len() >= budget
    }
}

fn line_matches_header(line: &str, name: &str) -> bool {
    line.as_bytes()
        .get(name.len())
        .map(|&b| b == b':' || b == b' ')
        .unwrap_or(false)
        && line.starts_with(name)
}
