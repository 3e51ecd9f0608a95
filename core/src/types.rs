//! Plain data carried through a single invocation.
//!
//! # Design
//! A `Segment` is one step of chained route access, an `Args` value is what
//! the caller hands to the terminal call, and a `Role` names which slot a
//! payload ends up in. None of these hold references into the schema, so an
//! invocation can be built, cloned and replayed independently of the
//! builder that produced it.

use serde_json::Value;
use strum::Display;

use crate::http::MethodTag;

/// One route token contributed by one chained access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A route name, matched against literal children first.
    Name(String),
    /// An explicit parameter value, e.g. an id.
    Value(String),
}

impl Segment {
    pub fn as_str(&self) -> &str {
        match self {
            Segment::Name(s) | Segment::Value(s) => s,
        }
    }

    /// Explicit values and all-digit names are parameter values: when no
    /// literal child matches they can only ever land on a parameter node.
    pub fn is_param_value(&self) -> bool {
        match self {
            Segment::Value(_) => true,
            Segment::Name(s) => !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()),
        }
    }
}

/// The payload slot a positional argument is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Query,
    Body,
}

impl Role {
    pub fn other(self) -> Role {
        match self {
            Role::Query => Role::Body,
            Role::Body => Role::Query,
        }
    }

    /// Whether `tag` is one of this role's default methods: GET, DELETE and
    /// END default to query; PUT and POST default to body.
    pub fn is_default_for(self, tag: MethodTag) -> bool {
        tag.default_role() == self
    }
}

/// Arguments to a terminal call: up to two payload-bearing values plus a
/// pass-through tail handed to the client after the body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    pub first: Option<Value>,
    pub second: Option<Value>,
    pub extra: Vec<Value>,
}

impl Args {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn one(first: Value) -> Self {
        Self {
            first: Some(first),
            ..Self::default()
        }
    }

    pub fn two(first: Option<Value>, second: Option<Value>) -> Self {
        Self {
            first,
            second,
            extra: Vec::new(),
        }
    }

    /// Append a pass-through argument.
    pub fn with_extra(mut self, value: Value) -> Self {
        self.extra.push(value);
        self
    }
}

impl From<Value> for Args {
    fn from(value: Value) -> Self {
        Args::one(value)
    }
}

impl From<Option<Value>> for Args {
    fn from(value: Option<Value>) -> Self {
        Args::two(value, None)
    }
}
