//! Synchronous client for the Google Analytics realtime API.
//!
//! # Overview
//! Builds a query URL from typed `Options`, issues a blocking GET through a
//! pluggable `Transport`, and decodes the small JSON payload into `Response`.
//!
//! # Design
//! - `Client` is stateless: it holds only a shared transport and the base URL,
//!   so one instance can serve concurrent callers.
//! - The realtime call is split into `build_realtime_url` (pure),
//!   the transport round-trip, and `parse_realtime` (pure), which keeps the
//!   I/O boundary explicit and testable with stub transports.
//! - Credentials are the transport's concern. Inject an authenticated
//!   transport with `ClientOption::transport`.

pub mod client;
pub mod error;
pub mod http;
pub mod query;
pub mod types;

pub use client::{decode_json, Client, ClientOption, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{BoxError, RealtimeError};
pub use http::{Transport, TransportResponse, UreqTransport};
pub use query::{add_options, QueryParams};
pub use types::{Options, Response, ResponseTotals};
