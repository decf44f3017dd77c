//! Host-identity extraction from an incoming request.

use std::io;
use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use bytes::Bytes;

use crate::types::Host;

/// The inbound representation of the request being matched, one per match
/// call.
///
/// The surrounding service adapts whatever HTTP stack it runs on to this
/// seam; the core never touches the transport directly. The body stream is
/// consumed exactly once, by [`MatchContext`](crate::engine::MatchContext)
/// construction.
#[async_trait]
pub trait IncomingRequest: Send {
    /// Target host string (authority/Host header), verbatim.
    fn host(&self) -> &str;

    /// Transport-level remote address, typically `ip:port`.
    fn remote_addr(&self) -> &str;

    /// Case-insensitive header lookup; `None` when absent.
    fn header(&self, name: &str) -> Option<&str>;

    /// HTTP method string.
    fn method(&self) -> &str;

    /// Protocol/version string, e.g. `HTTP/1.1`.
    fn protocol(&self) -> &str;

    /// Percent-escaped URL path.
    fn path(&self) -> &str;

    /// URL port, or "" when the URL carries none.
    fn port(&self) -> &str;

    /// Consume the request body. May suspend; the only blocking point in the
    /// core.
    async fn read_body(&mut self) -> io::Result<Bytes>;
}

/// Extract the [`Host`] identity of `req`.
///
/// `value` is the target host verbatim. `ip` prefers a non-empty
/// `forwarded_header` value (taken verbatim), falling back to the transport
/// remote address with any port suffix stripped. Never fails; fields the
/// request cannot supply come back empty.
pub fn resolve_host<R: IncomingRequest + ?Sized>(req: &R, forwarded_header: &str) -> Host {
    let ip = match req.header(forwarded_header) {
        Some(forwarded) if !forwarded.is_empty() => forwarded.to_string(),
        _ => strip_port(req.remote_addr()),
    };
    Host {
        value: req.host().to_string(),
        ip,
    }
}

/// Drop a trailing `:port` from `addr` without corrupting IPv6 literals.
///
/// Handles `ip:port`, `[v6]:port`, bracketed and bare IPv6, and plain
/// hostnames. Anything unrecognized is returned unchanged.
fn strip_port(addr: &str) -> String {
    if let Ok(sock) = addr.parse::<SocketAddr>() {
        return sock.ip().to_string();
    }
    if addr.parse::<IpAddr>().is_ok() {
        return addr.to_string();
    }
    if let Some(inner) = addr.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
        return inner.to_string();
    }
    if let Some((head, tail)) = addr.rsplit_once(':') {
        if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) {
            return head.to_string();
        }
    }
    addr.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeRequest;

    #[test]
    fn forwarded_header_wins_over_remote_addr() {
        let req = FakeRequest::new("backend.test", "GET", "/a")
            .remote_addr("10.0.0.9:41234")
            .header("x-forwarded-for", "203.0.113.7");
        let host = resolve_host(&req, "x-forwarded-for");
        assert_eq!(host.value, "backend.test");
        assert_eq!(host.ip, "203.0.113.7");
    }

    #[test]
    fn empty_forwarded_header_falls_back() {
        let req = FakeRequest::new("backend.test", "GET", "/a")
            .remote_addr("10.0.0.9:41234")
            .header("x-forwarded-for", "");
        let host = resolve_host(&req, "x-forwarded-for");
        assert_eq!(host.ip, "10.0.0.9");
    }

    #[test]
    fn strip_port_handles_ipv4_and_ipv6() {
        assert_eq!(strip_port("10.0.0.9:41234"), "10.0.0.9");
        assert_eq!(strip_port("10.0.0.9"), "10.0.0.9");
        assert_eq!(strip_port("[2001:db8::1]:8080"), "2001:db8::1");
        assert_eq!(strip_port("[2001:db8::1]"), "2001:db8::1");
        // A bare IPv6 literal must not be truncated at a colon.
        assert_eq!(strip_port("2001:db8::1"), "2001:db8::1");
    }

    #[test]
    fn strip_port_handles_hostnames() {
        assert_eq!(strip_port("proxy.internal:3128"), "proxy.internal");
        assert_eq!(strip_port("proxy.internal"), "proxy.internal");
        assert_eq!(strip_port(""), "");
    }

    #[test]
    fn unresolvable_request_yields_empty_fields() {
        let req = FakeRequest::new("", "GET", "/a");
        let host = resolve_host(&req, "x-forwarded-for");
        assert!(host.is_empty());
    }
}
