//! Shared builders for unit tests.

use std::collections::HashMap;
use std::io;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;

use crate::resolver::IncomingRequest;
use crate::types::{Host, Item};

/// Recorded item with sensible defaults for fields a test does not care
/// about.
pub(crate) fn item(host_value: &str, ip: &str, method: &str, path: &str, body: &[u8]) -> Item {
    Item {
        host: Host::new(host_value, ip),
        port: String::new(),
        protocol: "HTTP/1.1".to_string(),
        method: method.to_string(),
        path: path.to_string(),
        request: Bytes::copy_from_slice(body),
        response: Bytes::from_static(b"recorded response"),
        recorded_at: Utc::now(),
    }
}

/// Scripted [`IncomingRequest`] with a single-shot body stream.
pub(crate) struct FakeRequest {
    host: String,
    remote_addr: String,
    headers: HashMap<String, String>,
    method: String,
    protocol: String,
    path: String,
    port: String,
    body: Option<Bytes>,
    fail_body: bool,
}

impl FakeRequest {
    pub(crate) fn new(host: &str, method: &str, path: &str) -> Self {
        Self {
            host: host.to_string(),
            remote_addr: String::new(),
            headers: HashMap::new(),
            method: method.to_string(),
            protocol: "HTTP/1.1".to_string(),
            path: path.to_string(),
            port: String::new(),
            body: Some(Bytes::new()),
            fail_body: false,
        }
    }

    pub(crate) fn remote_addr(mut self, addr: &str) -> Self {
        self.remote_addr = addr.to_string();
        self
    }

    pub(crate) fn header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub(crate) fn body(mut self, body: &[u8]) -> Self {
        self.body = Some(Bytes::copy_from_slice(body));
        self
    }

    /// Script a transient stream error on the body read.
    pub(crate) fn failing_body(mut self) -> Self {
        self.fail_body = true;
        self
    }
}

#[async_trait]
impl IncomingRequest for FakeRequest {
    fn host(&self) -> &str {
        &self.host
    }

    fn remote_addr(&self) -> &str {
        &self.remote_addr
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn protocol(&self) -> &str {
        &self.protocol
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn port(&self) -> &str {
        &self.port
    }

    async fn read_body(&mut self) -> io::Result<Bytes> {
        if self.fail_body {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "body stream aborted",
            ));
        }
        self.body
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "body already consumed"))
    }
}
