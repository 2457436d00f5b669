//! Blocking transports that execute an [`HttpRequest`].
//!
//! # Design
//! `Transport` is the only I/O seam in the crate. `UreqTransport` is the
//! default: one plain HTTP POST per call, non-2xx statuses returned as data,
//! no retries, optional overall timeout. Tests substitute a fake that records
//! requests and replies with canned bodies.

use std::fmt;
use std::time::Duration;

use crate::config::Config;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one request/response exchange.
///
/// Implementations are shared by reference across concurrent calls, so they
/// must not serialize requests behind a lock of their own.
pub trait Transport: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, Self::Error>;
}

/// [`Transport`] backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Transport honouring `config.timeout()`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.timeout())
    }
}

impl Transport for UreqTransport {
    type Error = ureq::Error;

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, Self::Error> {
        let url = request.url();
        let builder = request
            .headers
            .iter()
            .fold(self.agent.post(&url), |builder, (name, value)| {
                builder.header(name.as_str(), value.as_str())
            });
        let mut response = builder.send(request.body.as_bytes())?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string()?;
        tracing::trace!(%url, status, "akismet response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
