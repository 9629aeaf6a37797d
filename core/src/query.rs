//! Query string construction for resource paths.

use url::{form_urlencoded, Url};

use crate::error::RealtimeError;
use crate::types::Options;

/// Base used only to check that a relative resource parses as a URL reference.
const PLACEHOLDER_BASE: &str = "http://resource.invalid/";

/// A parameter object with a fixed field to query-key table.
pub trait QueryParams {
    /// `(query key, value)` pairs, one per declared field.
    fn query_pairs(&self) -> Vec<(&'static str, &str)>;
}

impl QueryParams for Options {
    fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        vec![("ids", self.ids.as_str()), ("metrics", self.metrics.as_str())]
    }
}

/// Append `options` to `resource` as an URL-encoded query string.
///
/// Keys are sorted so identical input always yields identical output. Any
/// query already on `resource` is replaced; a fragment is kept. With `None`
/// the resource is returned unchanged.
pub fn add_options<T>(resource: &str, options: Option<&T>) -> Result<String, RealtimeError>
where
    T: QueryParams + ?Sized,
{
    let Some(options) = options else {
        return Ok(resource.to_string());
    };
    check_reference(resource)?;

    let (head, fragment) = match resource.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (resource, None),
    };
    let path = head.split_once('?').map_or(head, |(path, _)| path);

    let mut pairs = options.query_pairs();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();

    let mut out = path.to_string();
    if !query.is_empty() {
        out.push('?');
        out.push_str(&query);
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    Ok(out)
}

fn check_reference(resource: &str) -> Result<(), RealtimeError> {
    Url::parse(PLACEHOLDER_BASE)
        .and_then(|base| base.join(resource))
        .map(drop)
        .map_err(|source| RealtimeError::MalformedResource {
            resource: resource.to_string(),
            source,
        })
}
