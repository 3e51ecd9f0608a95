//! Schema-driven URL building and request validation.
//!
//! # Overview
//! A `SchemaNode` tree describes an HTTP API: literal route names, parameter
//! fallbacks, per-segment formatting, and per-method payload rules. From it
//! two builders are derived:
//! - `UrlMaker` turns chained route access plus a query into a URL string;
//! - `ReqMaker` does the same with a leading method segment, validates the
//!   query and body, and calls an injected `HttpClient`.
//!
//! # Design
//! - Chaining only records segments; resolution happens at the terminal call.
//! - The engine is synchronous and holds no mutable state. `Config` is frozen
//!   at construction and shared behind an `Arc`.
//! - The client seam is a trait. Whatever it returns (a value or a future)
//!   is passed through; the engine never performs I/O.
//!
//! ```
//! use routemap_core::{Config, SchemaNode, UrlMaker, Validator};
//! use serde_json::json;
//!
//! let api = UrlMaker::new(
//!     Config::builder()
//!         .head("/api")
//!         .schema(SchemaNode::new().child(
//!             "customers",
//!             SchemaNode::new().param(SchemaNode::endpoint(Validator::keys(["fields"]))),
//!         ))
//!         .build(),
//! );
//! let url = api.path("customers").param(42).build(json!({"fields": "a"})).unwrap();
//! assert_eq!(url, "/api/customers/42?fields=a");
//! ```

pub mod client;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod http;
pub mod payload;
pub mod query;
pub mod resolve;
pub mod route;
pub mod schema;
pub mod types;
pub mod validate;

pub use client::{HttpClient, ReqMaker, ReqMakerBuilder, RequestRoute};
pub use config::{Config, ConfigBuilder, LogContext, LogHook};
pub use engine::Resolution;
pub use error::{Result, SchemaLoadError, UrlValidationError};
pub use http::{HttpMethod, HttpRequest, MethodTag};
pub use route::{Segments, UrlMaker, UrlRoute};
pub use schema::{KeyedRules, Predicate, SchemaNode, SegmentFormat, Validator, ValueRule};
pub use types::{Args, Role, Segment};
