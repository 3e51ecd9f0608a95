//! Builder configuration.
//!
//! # Design
//! `Config` is assembled once through `ConfigBuilder` and is read-only from
//! then on: `UrlMaker` and `ReqMaker` take it by value and share it behind an
//! `Arc`, so nothing a caller does after construction can leak into a
//! builder. Every option is optional; an empty config produces
//! `/a/b/c?k=v` style URLs with no validation at all.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::document::{self, ConfigDocument};
use crate::error::SchemaLoadError;
use crate::http::HttpMethod;
use crate::schema::{PayloadFormatter, RouteFormatter, SchemaNode};
use crate::types::Role;

/// What a log hook sees about the call being made.
#[derive(Debug, Clone, Copy)]
pub struct LogContext<'a> {
    pub url: &'a str,
    /// `None` in URL-only mode.
    pub method: Option<HttpMethod>,
    pub body: Option<&'a Value>,
    pub extra: &'a [Value],
}

/// Produces a log line from a `LogContext`.
pub type LogFormatter = Arc<dyn Fn(&LogContext<'_>) -> String + Send + Sync>;

/// The `log` option.
#[derive(Clone, Default)]
pub enum LogHook {
    #[default]
    Off,
    /// Emit the built-in templated line.
    Default,
    /// Emit whatever the formatter returns.
    Custom(LogFormatter),
}

impl LogHook {
    pub fn custom(f: impl Fn(&LogContext<'_>) -> String + Send + Sync + 'static) -> Self {
        LogHook::Custom(Arc::new(f))
    }

    /// The line to log for `ctx`, or `None` when logging is off.
    pub fn render(&self, ctx: &LogContext<'_>) -> Option<String> {
        match self {
            LogHook::Off => None,
            LogHook::Default => Some(match ctx.method {
                Some(method) => format!("OUTGOING REQUEST: {method} {}", ctx.url),
                None => format!("URL BUILT: {}", ctx.url),
            }),
            LogHook::Custom(f) => Some(f(ctx)),
        }
    }
}

impl From<bool> for LogHook {
    fn from(enabled: bool) -> Self {
        if enabled {
            LogHook::Default
        } else {
            LogHook::Off
        }
    }
}

impl fmt::Debug for LogHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogHook::Off => f.write_str("Off"),
            LogHook::Default => f.write_str("Default"),
            LogHook::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

/// Immutable settings shared by every route derived from one builder.
#[derive(Clone, Default)]
pub struct Config {
    head: String,
    tail: String,
    schema: Option<SchemaNode>,
    route_format: Option<RouteFormatter>,
    query_format: Option<PayloadFormatter>,
    body_format: Option<PayloadFormatter>,
    log: LogHook,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Start a builder from a JSON config document (`head`, `tail`,
    /// `schema`). Formatters, predicates and the log hook are added on the
    /// returned builder.
    pub fn builder_from_json(json: &str) -> Result<ConfigBuilder, SchemaLoadError> {
        let doc: ConfigDocument = serde_json::from_str(json)?;
        let schema = doc.schema.map(|node| document::build_node(node, "$")).transpose()?;
        Ok(ConfigBuilder {
            config: Config {
                head: doc.head.unwrap_or_default(),
                tail: doc.tail.unwrap_or_default(),
                schema,
                ..Config::default()
            },
        })
    }

    pub fn head(&self) -> &str {
        &self.head
    }

    pub fn tail(&self) -> &str {
        &self.tail
    }

    pub fn schema(&self) -> Option<&SchemaNode> {
        self.schema.as_ref()
    }

    pub fn route_format(&self) -> Option<&RouteFormatter> {
        self.route_format.as_ref()
    }

    /// The global formatter for payloads in `role`.
    pub fn payload_format(&self, role: Role) -> Option<&PayloadFormatter> {
        match role {
            Role::Query => self.query_format.as_ref(),
            Role::Body => self.body_format.as_ref(),
        }
    }

    pub fn log(&self) -> &LogHook {
        &self.log
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("schema", &self.schema)
            .field("route_format", &self.route_format.is_some())
            .field("query_format", &self.query_format.is_some())
            .field("body_format", &self.body_format.is_some())
            .field("log", &self.log)
            .finish()
    }
}

/// Consuming builder for `Config`.
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn head(mut self, head: impl Into<String>) -> Self {
        self.config.head = head.into();
        self
    }

    pub fn tail(mut self, tail: impl Into<String>) -> Self {
        self.config.tail = tail.into();
        self
    }

    pub fn schema(mut self, schema: SchemaNode) -> Self {
        self.config.schema = Some(schema);
        self
    }

    /// Mutable access to the schema, e.g. to attach predicates to a tree
    /// loaded from a document.
    pub fn schema_mut(&mut self) -> Option<&mut SchemaNode> {
        self.config.schema.as_mut()
    }

    pub fn route_format(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.config.route_format = Some(Arc::new(f));
        self
    }

    pub fn query_format(mut self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.config.query_format = Some(Arc::new(f));
        self
    }

    pub fn body_format(mut self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.config.body_format = Some(Arc::new(f));
        self
    }

    pub fn log(mut self, log: impl Into<LogHook>) -> Self {
        self.config.log = log.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
