//! HTTP method tags and the plain-data request handed to a client.
//!
//! # Design
//! The supported methods are a closed set. Case normalization happens once,
//! when the leading route segment is parsed into an `HttpMethod`; everything
//! downstream matches on the enum. `MethodTag` adds the method-agnostic `End`
//! tag used by the URL-only builder and by schema rules that apply to any
//! method.
//!
//! `HttpRequest` describes a resolved, validated call as data. The request
//! builder produces one and then hands its parts to the injected client, so
//! the engine never performs I/O itself.

use serde_json::Value;
use strum::{Display, EnumString};

use crate::types::Role;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
}

/// Key under which a schema node declares a payload rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum MethodTag {
    /// Method-agnostic endpoint rule.
    End,
    Get,
    Put,
    Post,
    Delete,
}

impl MethodTag {
    /// The role that receives the bare rule for this tag.
    pub fn default_role(self) -> Role {
        match self {
            MethodTag::Put | MethodTag::Post => Role::Body,
            MethodTag::End | MethodTag::Get | MethodTag::Delete => Role::Query,
        }
    }
}

impl From<HttpMethod> for MethodTag {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => MethodTag::Get,
            HttpMethod::Put => MethodTag::Put,
            HttpMethod::Post => MethodTag::Post,
            HttpMethod::Delete => MethodTag::Delete,
        }
    }
}

/// A resolved request described as plain data.
///
/// `url` already carries the serialized query string. `body` is `None` when
/// the caller supplied no body, in which case it is left out of the client
/// arguments entirely rather than passed as an empty value.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Value>,
    pub extra: Vec<Value>,
}

impl HttpRequest {
    /// Client arguments after the URL: the body first when present, then the
    /// pass-through tail.
    pub fn client_args(&self) -> Vec<Value> {
        let mut args = Vec::with_capacity(self.extra.len() + 1);
        if let Some(body) = &self.body {
            args.push(body.clone());
        }
        args.extend(self.extra.iter().cloned());
        args
    }
}
