//! Drives one invocation: path resolution, argument classification, payload
//! formatting and testing, then query string rendering.
//!
//! Nothing here suspends or touches shared state; the same segments and
//! arguments against the same `Config` always produce the same outcome.

use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::payload::{classify, prepare, select};
use crate::query::to_query_string;
use crate::resolve::resolve_path;
use crate::types::{Role, Segment};

/// A fully resolved and validated invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Head, segments, tail and query string.
    pub url: String,
    pub query: Option<Value>,
    pub body: Option<Value>,
}

/// Resolve `segments` against `config` for `method` (`None` in URL-only
/// mode) and validate the two positional arguments.
pub fn resolve(
    config: &Config,
    segments: &[Segment],
    method: Option<HttpMethod>,
    first: Option<Value>,
    second: Option<Value>,
) -> Result<Resolution> {
    let path = resolve_path(config, segments)?;
    let selection = select(path.node, method, &path.url)?;
    let (query, body) = classify(&selection, first, second);
    let query = prepare(config, &selection, Role::Query, query, &path.url)?;
    let body = prepare(config, &selection, Role::Body, body, &path.url)?;

    let url = format!("{}{}", path.url, to_query_string(query.as_ref()));
    debug!(%url, has_body = body.is_some(), "resolved");
    Ok(Resolution { url, query, body })
}
