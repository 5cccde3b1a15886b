//! Liveness and readiness sensing for the managed server.
//!
//! The controller never watches the OS process it spawned; everything it
//! knows comes from these two probes. Both treat any failure as a plain
//! "no", since a refused connection is the normal "not running" signal, not
//! an error worth surfacing.

use serde_json::Value;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::debug;

/// TCP connect budget for a single listen check
const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

/// HTTP budget for a single status request
const STATUS_TIMEOUT: Duration = Duration::from_secs(1);

/// Check whether a TCP port on the local host accepts connections.
///
/// Refused, timed out, or unresolvable all report `false`.
pub fn port_is_listening(host: &str, port: u16) -> bool {
    let addrs = match (host, port).to_socket_addrs() {
        Ok(addrs) => addrs,
        Err(_) => return false,
    };

    for addr in addrs {
        if TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).is_ok() {
            return true;
        }
    }
    false
}

/// Client for the server's `/wd/hub/status` endpoint.
pub struct StatusClient {
    host: String,
    port: u16,
}

impl StatusClient {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    fn status_url(&self) -> String {
        format!("http://{}:{}/wd/hub/status", self.host, self.port)
    }

    /// Fetch the raw status document, or `None` if the server is unreachable
    /// or the body is not JSON.
    pub async fn status_info(&self) -> Option<Value> {
        let response = reqwest::Client::new()
            .get(self.status_url())
            .timeout(STATUS_TIMEOUT)
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            debug!("status endpoint returned {}", response.status());
            return None;
        }

        response.json::<Value>().await.ok()
    }

    /// Whether the server reports it is ready to accept commands.
    ///
    /// Expects `{ "value": { "ready": bool } }`; a missing field, malformed
    /// body, or transport error all read as not ready.
    pub async fn fetch_ready(&self) -> bool {
        match self.status_info().await {
            Some(body) => body
                .get("value")
                .and_then(|v| v.get("ready"))
                .and_then(|r| r.as_bool())
                .unwrap_or(false),
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "probe_test.rs"]
mod probe_test;
