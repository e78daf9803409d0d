//! Header sanitization across the trust boundary
//!
//! Pure transforms over an immutable header collection: the input map is
//! never mutated, a filtered copy is returned. Header names in hyper's
//! `HeaderMap` are always lowercase, which gives case-insensitive matching
//! for free.

use hyper::HeaderMap;

/// Removed from the outbound (gateway -> backend) leg: browser-session
/// artifacts plus hop-by-hop headers that must not cross a proxy boundary.
const OUTBOUND_STRIP: &[&str] = &[
    "cookie",
    "set-cookie",
    "set-cookie2",
    "host",
    "transfer-encoding",
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "upgrade",
];

/// Removed from the backend response before it is relayed to the caller:
/// backends must not set cookies in the trusted front-channel, and
/// hop-by-hop headers belong to the backend leg only.
const INBOUND_STRIP: &[&str] = &[
    "set-cookie",
    "set-cookie2",
    "transfer-encoding",
    "connection",
    "keep-alive",
    "trailers",
    "upgrade",
];

/// Filter headers for the request sent to a backend
pub fn filter_outbound(headers: &HeaderMap) -> HeaderMap {
    filtered(headers, OUTBOUND_STRIP)
}

/// Filter backend response headers before returning them to the caller
pub fn filter_inbound(headers: &HeaderMap) -> HeaderMap {
    filtered(headers, INBOUND_STRIP)
}

fn filtered(headers: &HeaderMap, deny: &[&str]) -> HeaderMap {
    let mut result = HeaderMap::with_capacity(headers.len());

    // append keeps repeated values of allowed headers intact
    for (name, value) in headers.iter() {
        if !deny.contains(&name.as_str()) {
            result.append(name.clone(), value.clone());
        }
    }

    result
}
