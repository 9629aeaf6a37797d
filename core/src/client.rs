//! Realtime API client.
//!
//! # Design
//! `Client` holds a shared `Transport` and the base URL and carries no
//! mutable state between calls, so it is `Clone + Send + Sync` and concurrent
//! calls never observe each other. A realtime call is three steps:
//! `build_realtime_url` (pure), `Transport::get`, and `parse_realtime`
//! (pure). The transport response owns the body stream, so it is released
//! exactly once whichever branch returns.

use std::fmt;
use std::io::Read;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::RealtimeError;
use crate::http::{Transport, TransportResponse, UreqTransport};
use crate::query::add_options;
use crate::types::{Options, Response};

/// Request timeout of the default transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Collection URL every resource path is resolved against.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/analytics/v3/data/";

const REALTIME_RESOURCE: &str = "realtime";
const STATUS_OK: u16 = 200;
const MAX_ERR_MSG_LEN: usize = 256;
const ELIDED_MARKER: &str = "... (elided)";

static BASE_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is an absolute URL")
});

/// Modifier applied by `Client::new`, in order.
///
/// No modifier can change the base URL.
pub enum ClientOption {
    /// Use this transport, e.g. one that attaches credentials.
    Transport(Arc<dyn Transport>),
    /// Use a default `UreqTransport` with this request timeout.
    Timeout(Duration),
}

impl ClientOption {
    pub fn transport(transport: impl Transport + 'static) -> Self {
        ClientOption::Transport(Arc::new(transport))
    }

    pub fn timeout(timeout: Duration) -> Self {
        ClientOption::Timeout(timeout)
    }
}

impl fmt::Debug for ClientOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientOption::Transport(_) => f.write_str("Transport(..)"),
            ClientOption::Timeout(timeout) => f.debug_tuple("Timeout").field(timeout).finish(),
        }
    }
}

/// Synchronous, stateless client for the realtime API.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    base_url: Url,
}

impl Client {
    pub fn new(options: impl IntoIterator<Item = ClientOption>) -> Self {
        let mut client = Self {
            transport: Arc::new(UreqTransport::default()),
            base_url: BASE_URL.clone(),
        };
        for option in options {
            match option {
                ClientOption::Transport(transport) => client.transport = transport,
                ClientOption::Timeout(timeout) => {
                    client.transport = Arc::new(UreqTransport::new(timeout));
                }
            }
        }
        client
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a relative reference against the base URL (RFC 3986).
    pub fn resolve(&self, relative: &str) -> Result<Url, RealtimeError> {
        self.base_url
            .join(relative)
            .map_err(|source| RealtimeError::MalformedResource {
                resource: relative.to_string(),
                source,
            })
    }

    /// Absolute URL of the realtime resource for `options`.
    pub fn build_realtime_url(&self, options: Option<&Options>) -> Result<Url, RealtimeError> {
        let resource = add_options(REALTIME_RESOURCE, options)?;
        self.resolve(&resource)
    }

    /// Classify and decode an executed realtime response.
    pub fn parse_realtime(&self, response: TransportResponse) -> Result<Response, RealtimeError> {
        read_response(response, decode_json)
    }

    /// Fetch current realtime totals.
    ///
    /// See <https://developers.google.com/analytics/devguides/reporting/realtime/v3/reference/data/realtime/get>.
    pub fn get_realtime(&self, options: Option<&Options>) -> Result<Response, RealtimeError> {
        let resource = add_options(REALTIME_RESOURCE, options)?;
        self.get_resource(&resource, decode_json)
    }

    /// GET a resource relative to the base URL and decode its 200 OK body.
    pub fn get_resource<T, F>(&self, resource: &str, decode: F) -> Result<T, RealtimeError>
    where
        F: FnOnce(&mut dyn Read) -> Result<T, RealtimeError>,
    {
        let url = self.resolve(resource)?;
        self.get_url(&url, decode)
    }

    /// GET an absolute URL and decode its 200 OK body.
    pub fn get_url<T, F>(&self, url: &Url, decode: F) -> Result<T, RealtimeError>
    where
        F: FnOnce(&mut dyn Read) -> Result<T, RealtimeError>,
    {
        debug!(%url, "requesting realtime resource");
        let response = self.transport.get(url).map_err(RealtimeError::Transport)?;
        read_response(response, decode)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new([])
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Decode a JSON body into `T`.
pub fn decode_json<T: DeserializeOwned>(body: &mut dyn Read) -> Result<T, RealtimeError> {
    Ok(serde_json::from_reader(body)?)
}

/// Hand a 200 OK body to `decode`; turn anything else into an error.
fn read_response<T, F>(mut response: TransportResponse, decode: F) -> Result<T, RealtimeError>
where
    F: FnOnce(&mut dyn Read) -> Result<T, RealtimeError>,
{
    if response.status != STATUS_OK {
        return Err(unexpected_status(&mut response));
    }
    decode(&mut *response.body)
}

/// Build an `UnexpectedStatus` error from at most `MAX_ERR_MSG_LEN` body bytes.
fn unexpected_status(response: &mut TransportResponse) -> RealtimeError {
    let mut excerpt = Vec::with_capacity(MAX_ERR_MSG_LEN + 1);
    // One byte past the cap tells whether the body was cut.
    if let Err(err) = response
        .body
        .by_ref()
        .take(MAX_ERR_MSG_LEN as u64 + 1)
        .read_to_end(&mut excerpt)
    {
        return RealtimeError::ErrorBody(err);
    }

    let message = if excerpt.len() > MAX_ERR_MSG_LEN {
        let mut message = String::from_utf8_lossy(&excerpt[..MAX_ERR_MSG_LEN]).into_owned();
        message.push_str(ELIDED_MARKER);
        message
    } else if excerpt.is_empty() {
        response.status_text.clone()
    } else {
        String::from_utf8_lossy(&excerpt).into_owned()
    };

    warn!(status = response.status, "unexpected realtime API response");
    RealtimeError::UnexpectedStatus {
        status: response.status,
        message,
    }
}
