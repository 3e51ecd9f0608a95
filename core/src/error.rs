//! Error types for route resolution and payload validation.
//!
//! # Design
//! Every failure the engine can produce is a single kind,
//! `UrlValidationError`, whose rendered message always starts with
//! `URL validation error:`. The variants exist so callers can match on the
//! cause structurally; the fields carry the segment, URL, key or value that
//! triggered it. All of them abort the current call before any client
//! invocation happens.
//!
//! Schema documents are parsed at configuration time, so their failures live
//! in the separate `SchemaLoadError`.

use thiserror::Error;

use crate::types::Role;

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, UrlValidationError>;

/// Errors returned when a route cannot be resolved or a payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlValidationError {
    /// Request mode only: the first segment does not name a supported method.
    #[error("URL validation error: {method} is not a supported method")]
    MissingMethod { method: String },

    /// A segment matched neither a literal child nor a parameter fallback.
    #[error("URL validation error: Branch {segment} not defined for {url}")]
    NoBranch { segment: String, url: String },

    /// A request builder was constructed without a client.
    #[error("URL validation error: No client provided")]
    NoClient,

    /// A parameter value was supplied at a node that declares no parameter.
    #[error("URL validation error: Parameter {segment} not permitted at {url}")]
    NoParam { segment: String, url: String },

    /// The role's rule is `RejectAll` but the payload carries keys.
    #[error("URL validation error: No {role} permitted at {url}")]
    NoPayload { role: Role, url: String },

    /// The resolved method has no applicable rule at the residual node.
    #[error("URL validation error: Method {method} not supported at {url}")]
    BadMethod { method: String, url: String },

    /// A payload key is absent from the permitted key set or keyed rules.
    #[error("URL validation error: {role} key '{key}' not permitted for endpoint {url}")]
    BadKey { role: Role, key: String, url: String },

    /// A payload key is permitted but its value fails the per-key rule.
    #[error("URL validation error: Value '{value}' not permitted for {role} key '{key}' at endpoint {url}")]
    BadValue {
        role: Role,
        key: String,
        value: String,
        url: String,
    },

    /// A whole-payload predicate returned `false`.
    #[error("URL validation error: Validator {name} rejected {role} at {url}")]
    CustomValidatorFailed { role: Role, name: String, url: String },

    /// Segments continue past a terminal endpoint with no further structure.
    #[error("URL validation error: URL goes beyond obligatory endpoint {url} (segment {segment})")]
    TooFar { segment: String, url: String },
}

impl UrlValidationError {
    /// Returns `true` for failures raised while walking the route segments.
    pub fn is_route_error(&self) -> bool {
        matches!(
            self,
            Self::MissingMethod { .. }
                | Self::NoBranch { .. }
                | Self::NoParam { .. }
                | Self::TooFar { .. }
        )
    }

    /// Returns `true` for failures raised while testing a query or body.
    pub fn is_payload_error(&self) -> bool {
        matches!(
            self,
            Self::NoPayload { .. }
                | Self::BadKey { .. }
                | Self::BadValue { .. }
                | Self::CustomValidatorFailed { .. }
        )
    }
}

/// Errors raised while loading a schema document.
#[derive(Debug, Error)]
pub enum SchemaLoadError {
    /// The document is not valid JSON or does not match the document shape.
    #[error("schema document parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A validator document could not be interpreted.
    #[error("invalid validator at {path}: {reason}")]
    InvalidValidator { path: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_common_prefix() {
        let errors = [
            UrlValidationError::NoClient,
            UrlValidationError::MissingMethod {
                method: "patch".to_string(),
            },
            UrlValidationError::NoPayload {
                role: Role::Query,
                url: "/api/customers/count".to_string(),
            },
        ];
        for err in errors {
            assert!(err.to_string().starts_with("URL validation error: "), "{err}");
        }
    }

    #[test]
    fn bad_value_names_key_and_value() {
        let err = UrlValidationError::BadValue {
            role: Role::Query,
            key: "limit".to_string(),
            value: "999".to_string(),
            url: "/api/customers".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "URL validation error: Value '999' not permitted for query key 'limit' at endpoint /api/customers"
        );
        assert!(err.is_payload_error());
        assert!(!err.is_route_error());
    }

    #[test]
    fn no_branch_is_a_route_error() {
        let err = UrlValidationError::NoBranch {
            segment: "orderz".to_string(),
            url: "/api/customers".to_string(),
        };
        assert!(err.is_route_error());
        assert_eq!(
            err.to_string(),
            "URL validation error: Branch orderz not defined for /api/customers"
        );
    }
}
