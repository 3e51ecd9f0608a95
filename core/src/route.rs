//! Chainable route accumulation and the URL-only builder.
//!
//! # Design
//! A route is an immutable value: `path` and `param` return a new route with
//! one more segment and leave the receiver untouched, so a partially built
//! route can be stored and reused as a prefix. Nothing is checked while
//! chaining; every error surfaces from the terminal call.

use std::fmt::{self, Display};
use std::sync::Arc;

use tracing::info;

use crate::config::{Config, LogContext};
use crate::engine::resolve;
use crate::error::Result;
use crate::types::{Args, Segment};

/// Ordered segments gathered by chained access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments(Vec<Segment>);

impl Segments {
    pub(crate) fn appended(&self, segment: Segment) -> Self {
        let mut next = self.0.clone();
        next.push(segment);
        Segments(next)
    }

    pub fn as_slice(&self) -> &[Segment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Builds URL strings from a schema without performing any I/O.
///
/// Any client a caller may hold is irrelevant here: the URL-only builder
/// has no way to issue a request.
#[derive(Debug, Clone)]
pub struct UrlMaker {
    config: Arc<Config>,
}

impl UrlMaker {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// The empty route, resolving to the head and tail alone.
    pub fn root(&self) -> UrlRoute {
        UrlRoute {
            config: Arc::clone(&self.config),
            segments: Segments::default(),
        }
    }

    pub fn path(&self, name: impl Into<String>) -> UrlRoute {
        self.root().path(name)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// A route under construction for the URL-only builder.
#[derive(Debug, Clone)]
pub struct UrlRoute {
    config: Arc<Config>,
    segments: Segments,
}

impl UrlRoute {
    /// Append a route name.
    pub fn path(&self, name: impl Into<String>) -> Self {
        Self {
            config: Arc::clone(&self.config),
            segments: self.segments.appended(Segment::Name(name.into())),
        }
    }

    /// Append a parameter value such as an id.
    pub fn param(&self, value: impl Display) -> Self {
        Self {
            config: Arc::clone(&self.config),
            segments: self.segments.appended(Segment::Value(value.to_string())),
        }
    }

    pub fn segments(&self) -> &Segments {
        &self.segments
    }

    /// Resolve and validate, returning the final URL.
    pub fn build(&self, args: impl Into<Args>) -> Result<String> {
        let args = args.into();
        let resolution = resolve(&self.config, self.segments.as_slice(), None, args.first, args.second)?;
        let ctx = LogContext {
            url: &resolution.url,
            method: None,
            body: None,
            extra: &args.extra,
        };
        if let Some(line) = self.config.log().render(&ctx) {
            info!(target: "routemap_core::url", "{line}");
        }
        Ok(resolution.url)
    }

    /// `build` with no payload.
    pub fn url(&self) -> Result<String> {
        self.build(Args::none())
    }
}

impl fmt::Display for Segments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "/{}", segment.as_str())?;
        }
        Ok(())
    }
}
