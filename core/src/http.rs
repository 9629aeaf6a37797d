//! HTTP transport abstraction.
//!
//! # Design
//! `Client` depends on the minimal `Transport` capability ("GET this URL,
//! give me status and a body stream") instead of a concrete HTTP stack. A
//! non-2xx status is a normal response here; only failures to obtain any
//! response at all (DNS, connect, TLS, timeout) are errors. Status
//! classification belongs to the client.
//!
//! `UreqTransport` is the default. Callers that need credentials wrap or
//! replace it and inject it with `ClientOption::transport`.

use std::fmt;
use std::io::Read;
use std::time::Duration;

use url::Url;

use crate::client::DEFAULT_TIMEOUT;
use crate::error::BoxError;

/// Capability to issue an HTTP GET.
///
/// Implementations must be safe to call from several threads at once.
pub trait Transport: Send + Sync {
    fn get(&self, url: &Url) -> Result<TransportResponse, BoxError>;
}

/// Status and body stream of one GET.
///
/// The body is released when the value is dropped.
pub struct TransportResponse {
    pub status: u16,
    /// Status line as `"<code> <reason>"`, e.g. `404 Not Found`.
    pub status_text: String,
    pub body: Box<dyn Read>,
}

impl TransportResponse {
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Read + 'static) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: Box::new(body),
        }
    }
}

impl fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .finish_non_exhaustive()
    }
}

/// Blocking transport backed by a `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    bearer_token: Option<String>,
}

impl UreqTransport {
    /// Transport whose requests give up after `timeout` in total.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self {
            agent,
            bearer_token: None,
        }
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &Url) -> Result<TransportResponse, BoxError> {
        let mut request = self.agent.get(url.as_str());
        if let Some(token) = &self.bearer_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        let response = request.call()?;

        let status = response.status();
        let status_text = match status.canonical_reason() {
            Some(reason) => format!("{} {reason}", status.as_u16()),
            None => status.as_u16().to_string(),
        };
        Ok(TransportResponse {
            status: status.as_u16(),
            status_text,
            body: Box::new(response.into_body().into_reader()),
        })
    }
}
