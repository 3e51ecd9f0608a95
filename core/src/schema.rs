//! The declarative API tree and the payload rules attached to it.
//!
//! # Design
//! A `SchemaNode` keeps literal children, the parameter fallback, the segment
//! formatter and the per-method rules in separate named fields, so a route
//! called `format` or `get` can never collide with a reserved position.
//!
//! `Validator` is a closed set of rule shapes. Consumers match on it
//! exhaustively; there is no runtime probing of what a rule "looks like".
//!
//! The tree is assembled once (in Rust or from a document, see
//! `document.rs`) and then shared read-only by every builder derived from
//! the same configuration.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::http::{HttpMethod, MethodTag};
use crate::types::Role;

/// Formats a literal route name into the URL fragment emitted for it.
pub type RouteFormatter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Rewrites a payload before it is tested and serialized.
pub type PayloadFormatter = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Per-node override for how a literal segment name is written.
#[derive(Clone)]
pub enum SegmentFormat {
    /// Emit this string instead of the segment name.
    Fixed(String),
    /// Emit the result of calling this with the segment name.
    With(RouteFormatter),
}

impl SegmentFormat {
    pub fn apply(&self, segment: &str) -> String {
        match self {
            SegmentFormat::Fixed(s) => s.clone(),
            SegmentFormat::With(f) => f(segment),
        }
    }
}

impl fmt::Debug for SegmentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentFormat::Fixed(s) => f.debug_tuple("Fixed").field(s).finish(),
            SegmentFormat::With(_) => f.write_str("With(<fn>)"),
        }
    }
}

/// A named boolean test over a JSON value.
///
/// The name shows up in `CustomValidatorFailed` messages.
#[derive(Clone)]
pub struct Predicate {
    name: String,
    test: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Predicate {
    pub fn new(name: impl Into<String>, test: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            test: Arc::new(test),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, value: &Value) -> bool {
        (self.test)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("name", &self.name).finish()
    }
}

/// Rule for the value of one permitted key.
#[derive(Debug, Clone)]
pub enum ValueRule {
    /// Any value is accepted.
    Any,
    /// The value must equal one of these.
    OneOf(Vec<Value>),
    /// The predicate must not return `false` for the value.
    Check(Predicate),
}

/// Permitted keys with a rule per key, plus an optional payload formatter
/// that takes precedence over the configuration's role formatter.
#[derive(Clone, Default)]
pub struct KeyedRules {
    rules: HashMap<String, ValueRule>,
    format: Option<PayloadFormatter>,
}

impl KeyedRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, key: impl Into<String>, rule: ValueRule) -> Self {
        self.rules.insert(key.into(), rule);
        self
    }

    /// Permit `key` with any value.
    pub fn any(self, key: impl Into<String>) -> Self {
        self.rule(key, ValueRule::Any)
    }

    /// Permit `key` when its value is one of `values`.
    pub fn one_of(self, key: impl Into<String>, values: impl IntoIterator<Item = Value>) -> Self {
        self.rule(key, ValueRule::OneOf(values.into_iter().collect()))
    }

    /// Permit `key` when `predicate` accepts its value.
    pub fn check(self, key: impl Into<String>, predicate: Predicate) -> Self {
        self.rule(key, ValueRule::Check(predicate))
    }

    pub fn format(mut self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.format = Some(Arc::new(f));
        self
    }

    pub fn get(&self, key: &str) -> Option<&ValueRule> {
        self.rules.get(key)
    }

    pub fn formatter(&self) -> Option<&PayloadFormatter> {
        self.format.as_ref()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for KeyedRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedRules")
            .field("rules", &self.rules)
            .field("format", &self.format.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// What payload is acceptable for a role at a terminal node.
#[derive(Debug, Clone)]
pub enum Validator {
    /// Any payload, including an empty one.
    AcceptAll,
    /// Only an empty or absent payload.
    RejectAll,
    /// A test over the whole payload.
    Predicate(Predicate),
    /// Every payload key must be one of these.
    KeySet(Vec<String>),
    /// Every payload key must have a rule, and its value must satisfy it.
    Keyed(KeyedRules),
    /// Separate rules for the query and body of the same method.
    RoleSplit {
        query: Box<Validator>,
        body: Box<Validator>,
    },
}

impl Validator {
    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Validator::KeySet(keys.into_iter().map(Into::into).collect())
    }

    pub fn predicate(name: impl Into<String>, test: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Validator::Predicate(Predicate::new(name, test))
    }

    pub fn split(query: impl Into<Validator>, body: impl Into<Validator>) -> Self {
        Validator::RoleSplit {
            query: Box::new(query.into()),
            body: Box::new(body.into()),
        }
    }

    pub fn is_reject_all(&self) -> bool {
        matches!(self, Validator::RejectAll)
    }

    /// The sub-rule for `role` when this is a split rule.
    pub fn split_part(&self, role: Role) -> Option<&Validator> {
        match (self, role) {
            (Validator::RoleSplit { query, .. }, Role::Query) => Some(query),
            (Validator::RoleSplit { body, .. }, Role::Body) => Some(body),
            _ => None,
        }
    }

    /// Formatter carried by the rule itself, if any.
    pub fn formatter(&self) -> Option<&PayloadFormatter> {
        match self {
            Validator::Keyed(rules) => rules.formatter(),
            _ => None,
        }
    }
}

impl From<bool> for Validator {
    fn from(accept: bool) -> Self {
        if accept {
            Validator::AcceptAll
        } else {
            Validator::RejectAll
        }
    }
}

impl From<KeyedRules> for Validator {
    fn from(rules: KeyedRules) -> Self {
        Validator::Keyed(rules)
    }
}

impl From<Predicate> for Validator {
    fn from(predicate: Predicate) -> Self {
        Validator::Predicate(predicate)
    }
}

/// One point in the API tree.
#[derive(Debug, Clone, Default)]
pub struct SchemaNode {
    children: HashMap<String, SchemaNode>,
    param: Option<Box<SchemaNode>>,
    format: Option<SegmentFormat>,
    rules: HashMap<MethodTag, Validator>,
}

impl SchemaNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// A leaf whose only content is a method-agnostic endpoint rule.
    pub fn endpoint(validator: impl Into<Validator>) -> Self {
        Self::new().end(validator)
    }

    pub fn child(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.children.insert(name.into(), node);
        self
    }

    /// Set the wildcard child reached by any unmatched segment.
    pub fn param(mut self, node: SchemaNode) -> Self {
        self.param = Some(Box::new(node));
        self
    }

    /// Emit `replacement` instead of this node's segment name.
    pub fn format(mut self, replacement: impl Into<String>) -> Self {
        self.format = Some(SegmentFormat::Fixed(replacement.into()));
        self
    }

    pub fn format_with(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.format = Some(SegmentFormat::With(Arc::new(f)));
        self
    }

    pub fn on(mut self, tag: MethodTag, validator: impl Into<Validator>) -> Self {
        self.rules.insert(tag, validator.into());
        self
    }

    pub fn end(self, validator: impl Into<Validator>) -> Self {
        self.on(MethodTag::End, validator)
    }

    pub fn get(self, validator: impl Into<Validator>) -> Self {
        self.on(MethodTag::Get, validator)
    }

    pub fn put(self, validator: impl Into<Validator>) -> Self {
        self.on(MethodTag::Put, validator)
    }

    pub fn post(self, validator: impl Into<Validator>) -> Self {
        self.on(MethodTag::Post, validator)
    }

    pub fn delete(self, validator: impl Into<Validator>) -> Self {
        self.on(MethodTag::Delete, validator)
    }

    pub fn literal(&self, name: &str) -> Option<&SchemaNode> {
        self.children.get(name)
    }

    pub fn param_child(&self) -> Option<&SchemaNode> {
        self.param.as_deref()
    }

    pub fn segment_format(&self) -> Option<&SegmentFormat> {
        self.format.as_ref()
    }

    /// The rule declared for exactly `tag`.
    pub fn rule(&self, tag: MethodTag) -> Option<&Validator> {
        self.rules.get(&tag)
    }

    pub fn declares(&self, tag: MethodTag) -> bool {
        self.rules.contains_key(&tag)
    }

    /// The rule governing `method` here, and the tag whose default role it
    /// belongs to.
    ///
    /// Without a rule of its own, a method falls back to the `End` rule. On a
    /// terminal node the `End` rule stands in for every method and goes to
    /// the invoked method's default role. On a branching node it only stands
    /// in for the query methods (GET, DELETE).
    pub fn rule_for_method(&self, method: HttpMethod) -> Option<(MethodTag, &Validator)> {
        let tag = MethodTag::from(method);
        if let Some(rule) = self.rule(tag) {
            return Some((tag, rule));
        }
        let end = self.rule(MethodTag::End)?;
        if self.is_terminal() {
            Some((tag, end))
        } else if tag.default_role() == Role::Query {
            Some((MethodTag::End, end))
        } else {
            None
        }
    }

    /// No literal children and no parameter: nothing can follow this node.
    pub fn is_terminal(&self) -> bool {
        self.children.is_empty() && self.param.is_none()
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut SchemaNode> {
        self.children.get_mut(name)
    }

    pub fn param_mut(&mut self) -> Option<&mut SchemaNode> {
        self.param.as_deref_mut()
    }

    /// Replace the rule for `tag`, e.g. to attach a predicate to a node
    /// loaded from a document.
    pub fn set_rule(&mut self, tag: MethodTag, validator: impl Into<Validator>) {
        self.rules.insert(tag, validator.into());
    }

    pub fn set_format(&mut self, format: SegmentFormat) {
        self.format = Some(format);
    }
}
