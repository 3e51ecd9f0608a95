//! JSON documents describing a schema.
//!
//! A node document mirrors `SchemaNode` field by field:
//!
//! ```json
//! {
//!   "children": { "customers": { "end": { "limit": true } } },
//!   "param": { "methods": { "GET": ["fields"], "DELETE": false } },
//!   "format": "search",
//!   "end": true
//! }
//! ```
//!
//! A child (or `param`) that is an object is always a node document. A
//! child that is `true`, `false` or an array of keys is a leaf with that
//! `end` rule. Object-shaped rules go under `end` or `methods`, so a leaf
//! that permits a query key called `end` is written `{"end": {"end": true}}`.
//!
//! Validator documents are `true`, `false`, an array of permitted keys, an
//! object of per-key rules (`true`/`false` for any value, or an array of
//! permitted values), or `{"query": .., "body": ..}` for a split rule.
//! Predicates and function formatters have no document form; attach them
//! through `ConfigBuilder::schema_mut` after loading.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::SchemaLoadError;
use crate::http::{HttpMethod, MethodTag};
use crate::schema::{KeyedRules, SchemaNode, Validator, ValueRule};

#[derive(Debug, Deserialize)]
pub(crate) struct ConfigDocument {
    pub head: Option<String>,
    pub tail: Option<String>,
    pub schema: Option<NodeDocument>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct NodeDocument {
    #[serde(default)]
    children: BTreeMap<String, Value>,
    param: Option<Value>,
    format: Option<String>,
    end: Option<Value>,
    #[serde(default)]
    methods: BTreeMap<String, Value>,
}

impl SchemaNode {
    /// Parse a node document.
    pub fn from_json(json: &str) -> Result<SchemaNode, SchemaLoadError> {
        let doc: NodeDocument = serde_json::from_str(json)?;
        build_node(doc, "$")
    }
}

pub(crate) fn build_node(doc: NodeDocument, path: &str) -> Result<SchemaNode, SchemaLoadError> {
    let mut node = SchemaNode::new();
    for (name, child) in doc.children {
        let child_path = format!("{path}.{name}");
        node = node.child(name, build_child(child, &child_path)?);
    }
    if let Some(param) = doc.param {
        node = node.param(build_child(param, &format!("{path}.param"))?);
    }
    if let Some(format) = doc.format {
        node = node.format(format);
    }
    if let Some(end) = doc.end {
        node = node.end(build_validator(&end, &format!("{path}.end"))?);
    }
    for (method, rule) in doc.methods {
        let tag = parse_tag(&method).ok_or_else(|| SchemaLoadError::InvalidValidator {
            path: format!("{path}.methods"),
            reason: format!("unknown method {method}"),
        })?;
        node = node.on(tag, build_validator(&rule, &format!("{path}.methods.{method}"))?);
    }
    Ok(node)
}

/// Objects are node documents; every other shape is a leaf rule.
fn build_child(doc: Value, path: &str) -> Result<SchemaNode, SchemaLoadError> {
    if !doc.is_object() {
        return Ok(SchemaNode::endpoint(build_validator(&doc, path)?));
    }
    let node = NodeDocument::deserialize(doc).map_err(|err| SchemaLoadError::InvalidValidator {
        path: path.to_string(),
        reason: format!("not a node document ({err}); wrap object rules in \"end\""),
    })?;
    build_node(node, path)
}

fn parse_tag(method: &str) -> Option<MethodTag> {
    if method.eq_ignore_ascii_case("end") {
        return Some(MethodTag::End);
    }
    HttpMethod::from_str(method).ok().map(MethodTag::from)
}

pub(crate) fn build_validator(doc: &Value, path: &str) -> Result<Validator, SchemaLoadError> {
    let invalid = |reason: &str| SchemaLoadError::InvalidValidator {
        path: path.to_string(),
        reason: reason.to_string(),
    };
    match doc {
        Value::Bool(accept) => Ok(Validator::from(*accept)),
        Value::Array(keys) => keys
            .iter()
            .map(|k| k.as_str().map(str::to_string).ok_or_else(|| invalid("key set entries must be strings")))
            .collect::<Result<Vec<_>, _>>()
            .map(Validator::KeySet),
        Value::Object(map) if is_split(map) => Ok(Validator::split(
            build_validator(&map["query"], &format!("{path}.query"))?,
            build_validator(&map["body"], &format!("{path}.body"))?,
        )),
        Value::Object(map) => {
            let mut rules = KeyedRules::new();
            for (key, rule) in map {
                let rule = match rule {
                    Value::Bool(_) => ValueRule::Any,
                    Value::Array(values) => ValueRule::OneOf(values.clone()),
                    _ => return Err(invalid(&format!("rule for key {key} must be a boolean or an array"))),
                };
                rules = rules.rule(key.clone(), rule);
            }
            Ok(Validator::Keyed(rules))
        }
        _ => Err(invalid("expected a boolean, an array or an object")),
    }
}

fn is_split(map: &Map<String, Value>) -> bool {
    map.len() == 2 && map.contains_key("query") && map.contains_key("body")
}
