//! The request-issuing builder and the seam to the injected HTTP client.
//!
//! # Design
//! `ReqMaker` never does I/O itself. Each terminal call resolves the route
//! into an `HttpRequest` (same engine as `UrlMaker`, plus a leading method
//! segment) and then hands `(url, body?, ...extra)` to the client's
//! method-named operation. Whatever the client returns, be it a value or a
//! future, is passed back untouched unless a response formatter is
//! configured. The engine never awaits it.

use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::config::{Config, LogContext};
use crate::engine::resolve;
use crate::error::{Result, UrlValidationError};
use crate::http::{HttpMethod, HttpRequest};
use crate::route::Segments;
use crate::types::{Args, Segment};

/// An HTTP client with one operation per supported method.
///
/// `args` holds the body first when one was supplied, followed by any
/// pass-through arguments. A missing body is left out rather than passed as
/// `null`.
pub trait HttpClient: Send + Sync {
    type Response;

    fn get(&self, url: &str, args: Vec<Value>) -> Self::Response;
    fn put(&self, url: &str, args: Vec<Value>) -> Self::Response;
    fn post(&self, url: &str, args: Vec<Value>) -> Self::Response;
    fn delete(&self, url: &str, args: Vec<Value>) -> Self::Response;

    /// Dispatch to the operation named by `method`.
    fn call(&self, method: HttpMethod, url: &str, args: Vec<Value>) -> Self::Response {
        match method {
            HttpMethod::Get => self.get(url, args),
            HttpMethod::Put => self.put(url, args),
            HttpMethod::Post => self.post(url, args),
            HttpMethod::Delete => self.delete(url, args),
        }
    }
}

/// Post-processes a client response.
pub type ResponseFormatter<R> = Arc<dyn Fn(R) -> R + Send + Sync>;

struct Shared<C: HttpClient> {
    config: Config,
    client: C,
    response_format: Option<ResponseFormatter<C::Response>>,
}

/// Issues validated requests through an injected `HttpClient`.
pub struct ReqMaker<C: HttpClient> {
    shared: Arc<Shared<C>>,
}

impl<C: HttpClient> Clone for ReqMaker<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<C: HttpClient> fmt::Debug for ReqMaker<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqMaker")
            .field("config", &self.shared.config)
            .field("response_format", &self.shared.response_format.is_some())
            .finish_non_exhaustive()
    }
}

impl<C: HttpClient> ReqMaker<C> {
    pub fn builder(config: Config) -> ReqMakerBuilder<C> {
        ReqMakerBuilder {
            config,
            client: None,
            response_format: None,
        }
    }

    /// The empty route. Its first segment must name the method.
    pub fn root(&self) -> RequestRoute<C> {
        RequestRoute {
            shared: Arc::clone(&self.shared),
            segments: Segments::default(),
        }
    }

    /// Append a segment; the first one is read as the method, case-insensitively.
    pub fn path(&self, name: impl Into<String>) -> RequestRoute<C> {
        self.root().path(name)
    }

    pub fn method(&self, method: HttpMethod) -> RequestRoute<C> {
        self.path(method.to_string())
    }

    pub fn get(&self) -> RequestRoute<C> {
        self.method(HttpMethod::Get)
    }

    pub fn put(&self) -> RequestRoute<C> {
        self.method(HttpMethod::Put)
    }

    pub fn post(&self) -> RequestRoute<C> {
        self.method(HttpMethod::Post)
    }

    pub fn delete(&self) -> RequestRoute<C> {
        self.method(HttpMethod::Delete)
    }

    pub fn client(&self) -> &C {
        &self.shared.client
    }
}

/// Builder for `ReqMaker`.
pub struct ReqMakerBuilder<C: HttpClient> {
    config: Config,
    client: Option<C>,
    response_format: Option<ResponseFormatter<C::Response>>,
}

impl<C: HttpClient> ReqMakerBuilder<C> {
    pub fn client(mut self, client: C) -> Self {
        self.client = Some(client);
        self
    }

    pub fn response_format(mut self, f: impl Fn(C::Response) -> C::Response + Send + Sync + 'static) -> Self {
        self.response_format = Some(Arc::new(f));
        self
    }

    /// Fails with `NoClient` when no client was supplied.
    pub fn build(self) -> Result<ReqMaker<C>> {
        let client = self.client.ok_or(UrlValidationError::NoClient)?;
        Ok(ReqMaker {
            shared: Arc::new(Shared {
                config: self.config,
                client,
                response_format: self.response_format,
            }),
        })
    }
}

/// A route under construction for the request builder.
pub struct RequestRoute<C: HttpClient> {
    shared: Arc<Shared<C>>,
    segments: Segments,
}

impl<C: HttpClient> Clone for RequestRoute<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            segments: self.segments.clone(),
        }
    }
}

impl<C: HttpClient> fmt::Debug for RequestRoute<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestRoute")
            .field("segments", &self.segments)
            .finish_non_exhaustive()
    }
}

impl<C: HttpClient> RequestRoute<C> {
    /// Append a route name.
    pub fn path(&self, name: impl Into<String>) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            segments: self.segments.appended(Segment::Name(name.into())),
        }
    }

    /// Append a parameter value such as an id.
    pub fn param(&self, value: impl Display) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            segments: self.segments.appended(Segment::Value(value.to_string())),
        }
    }

    pub fn segments(&self) -> &Segments {
        &self.segments
    }

    /// Resolve and validate without calling the client.
    pub fn prepare(&self, args: impl Into<Args>) -> Result<HttpRequest> {
        let args = args.into();
        let (method, rest) = split_method(self.segments.as_slice())?;
        let resolution = resolve(&self.shared.config, rest, Some(method), args.first, args.second)?;
        Ok(HttpRequest {
            method,
            url: resolution.url,
            body: resolution.body,
            extra: args.extra,
        })
    }

    /// Resolve, validate, log, and call the client.
    pub fn send(&self, args: impl Into<Args>) -> Result<C::Response> {
        let request = self.prepare(args)?;
        let ctx = LogContext {
            url: &request.url,
            method: Some(request.method),
            body: request.body.as_ref(),
            extra: &request.extra,
        };
        if let Some(line) = self.shared.config.log().render(&ctx) {
            info!(target: "routemap_core::request", "{line}");
        }

        let response = self
            .shared
            .client
            .call(request.method, &request.url, request.client_args());
        Ok(match &self.shared.response_format {
            Some(format) => format(response),
            None => response,
        })
    }
}

fn split_method(segments: &[Segment]) -> Result<(HttpMethod, &[Segment])> {
    let Some((first, rest)) = segments.split_first() else {
        return Err(UrlValidationError::MissingMethod {
            method: "(none)".to_string(),
        });
    };
    let method = match first {
        Segment::Name(name) => HttpMethod::from_str(name).ok(),
        Segment::Value(_) => None,
    };
    match method {
        Some(method) => Ok((method, rest)),
        None => Err(UrlValidationError::MissingMethod {
            method: first.as_str().to_string(),
        }),
    }
}
