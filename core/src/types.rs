//! Wire types for the realtime API.
//!
//! # Design
//! Every response field is optional on the wire. Absent keys decode to
//! `None`, never to an error or a zero value, and are skipped again on
//! serialization so a decoded response re-encodes to the same shape.

use serde::{Deserialize, Serialize};

/// Query parameters for one realtime request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Options {
    /// Analytics view identifier, e.g. `ga:56576851`.
    pub ids: String,
    /// Comma separated metric names, e.g. `rt:activeUsers`.
    pub metrics: String,
}

impl Options {
    pub fn new(ids: impl Into<String>, metrics: impl Into<String>) -> Self {
        Self {
            ids: ids.into(),
            metrics: metrics.into(),
        }
    }
}

/// Decoded realtime API response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(
        rename = "totalsForAllResults",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub totals_for_all_results: Option<ResponseTotals>,
}

impl Response {
    /// The `rt:activeUsers` total, if the payload carried one.
    pub fn active_users(&self) -> Option<&str> {
        self.totals_for_all_results
            .as_ref()
            .and_then(|totals| totals.rt_active_users.as_deref())
    }
}

/// Totals across all results. The count arrives string-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponseTotals {
    #[serde(
        rename = "rt:activeUsers",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub rt_active_users: Option<String>,
}
