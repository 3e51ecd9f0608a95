//! Decides which positional argument is the query and which is the body,
//! then formats and tests each one.
//!
//! # Design
//! Rule selection per role:
//! - a split rule hands each role its own part;
//! - otherwise the bare rule goes to the role that the rule's tag defaults
//!   to (GET, DELETE, END: query; PUT, POST: body);
//! - the other role is undeclared, and a non-empty payload for it is a
//!   `BadMethod` for the resolved method at this URL.
//!
//! A terminal node's `End` rule counts as the invoked method's own rule, so
//! `post(x)` against a leaf tests `x` as the body.
//!
//! Argument assignment follows the invoked method's default (query first for
//! GET/DELETE/END, body first for PUT/POST) and is swapped when the role in
//! the first slot is declared `false` while the other role is declared and
//! not `false`. That is how `post(x)` against a node whose body is forbidden
//! reads `x` as query. An undeclared role never takes part in the swap.
//! Without a schema node there is nothing to prefer, and the first argument
//! is the query.

use serde_json::Value;
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{Result, UrlValidationError};
use crate::http::{HttpMethod, MethodTag};
use crate::schema::{SchemaNode, Validator};
use crate::types::Role;
use crate::validate::{is_empty_payload, test_payload};

/// The rule that applies to one role at the residual node.
#[derive(Debug, Clone, Copy)]
pub enum RoleRule<'a> {
    /// No schema node: anything goes.
    Open,
    Declared(&'a Validator),
    /// The node's rule belongs to the other role.
    Undeclared,
}

impl RoleRule<'_> {
    /// Declared `false`: any payload is forbidden.
    pub fn rejects_all(&self) -> bool {
        matches!(self, RoleRule::Declared(v) if v.is_reject_all())
    }

    fn is_declared(&self) -> bool {
        matches!(self, RoleRule::Declared(_))
    }

    fn formatter<'c>(&'c self, config: &'c Config, role: Role) -> Option<&'c crate::schema::PayloadFormatter> {
        match self {
            RoleRule::Declared(v) => v.formatter().or_else(|| config.payload_format(role)),
            RoleRule::Open | RoleRule::Undeclared => config.payload_format(role),
        }
    }
}

/// Query and body rules for one invocation.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    /// The method as invoked; `End` in URL-only mode.
    pub invoked: MethodTag,
    pub query: RoleRule<'a>,
    pub body: RoleRule<'a>,
}

impl<'a> Selection<'a> {
    pub fn rule(&self, role: Role) -> RoleRule<'a> {
        match role {
            Role::Query => self.query,
            Role::Body => self.body,
        }
    }
}

/// Pick the query and body rules at `node` for `method` (`None` in URL-only
/// mode). Fails with `BadMethod` when the node has no rule for the method.
pub fn select<'a>(node: Option<&'a SchemaNode>, method: Option<HttpMethod>, url: &str) -> Result<Selection<'a>> {
    let invoked = method.map_or(MethodTag::End, MethodTag::from);
    let Some(node) = node else {
        return Ok(Selection {
            invoked,
            query: RoleRule::Open,
            body: RoleRule::Open,
        });
    };

    let found = match method {
        Some(method) => node.rule_for_method(method),
        None => node.rule(MethodTag::End).map(|v| (MethodTag::End, v)),
    };
    let Some((tag, rule)) = found else {
        debug!(%url, method = %invoked, "no rule for method");
        return Err(UrlValidationError::BadMethod {
            method: invoked.to_string(),
            url: url.to_string(),
        });
    };

    let for_role = |role: Role| match rule.split_part(role) {
        Some(part) => RoleRule::Declared(part),
        None if role.is_default_for(tag) => RoleRule::Declared(rule),
        None => RoleRule::Undeclared,
    };
    Ok(Selection {
        invoked,
        query: for_role(Role::Query),
        body: for_role(Role::Body),
    })
}

/// Assign the two raw arguments to `(query, body)`.
pub fn classify(selection: &Selection<'_>, first: Option<Value>, second: Option<Value>) -> (Option<Value>, Option<Value>) {
    if matches!(selection.query, RoleRule::Open) {
        return (first, second);
    }
    let first_role = selection.invoked.default_role();
    let other = selection.rule(first_role.other());
    let swap = selection.rule(first_role).rejects_all() && other.is_declared() && !other.rejects_all();
    let first_role = if swap { first_role.other() } else { first_role };
    trace!(invoked = %selection.invoked, first = %first_role, swap, "classified arguments");
    match first_role {
        Role::Query => (first, second),
        Role::Body => (second, first),
    }
}

/// Format and test one payload. `None` stays `None` and is never tested.
pub fn prepare(
    config: &Config,
    selection: &Selection<'_>,
    role: Role,
    raw: Option<Value>,
    url: &str,
) -> Result<Option<Value>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let rule = selection.rule(role);
    let payload = match rule.formatter(config, role) {
        Some(format) => format(raw),
        None => raw,
    };

    let outcome = match rule {
        RoleRule::Open => Ok(()),
        RoleRule::Declared(validator) => test_payload(validator, role, &payload, url),
        RoleRule::Undeclared if is_empty_payload(&payload) => Ok(()),
        RoleRule::Undeclared => Err(UrlValidationError::BadMethod {
            method: selection.invoked.to_string(),
            url: url.to_string(),
        }),
    };
    if let Err(err) = &outcome {
        debug!(%role, %url, error = %err, "payload rejected");
    }
    outcome.map(|()| Some(payload))
}
