//! Tests a formatted payload against a single `Validator`.
//!
//! Keys are visited in payload insertion order and the first violation is
//! returned; nothing is batched.

use serde_json::Value;

use crate::error::{Result, UrlValidationError};
use crate::query::render_value;
use crate::schema::{Validator, ValueRule};
use crate::types::Role;

/// `null`, `{}`, `[]` and `""` carry nothing.
pub fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Keyed entries of a payload: object fields, or array elements by index.
/// Scalars have none.
fn entries(payload: &Value) -> Vec<(String, &Value)> {
    match payload {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(items) => items.iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect(),
        _ => Vec::new(),
    }
}

pub fn test_payload(validator: &Validator, role: Role, payload: &Value, url: &str) -> Result<()> {
    match validator {
        Validator::AcceptAll => Ok(()),
        Validator::RejectAll => {
            if is_empty_payload(payload) {
                Ok(())
            } else {
                Err(UrlValidationError::NoPayload {
                    role,
                    url: url.to_string(),
                })
            }
        }
        Validator::Predicate(predicate) => {
            if predicate.check(payload) {
                Ok(())
            } else {
                Err(UrlValidationError::CustomValidatorFailed {
                    role,
                    name: predicate.name().to_string(),
                    url: url.to_string(),
                })
            }
        }
        Validator::KeySet(keys) => {
            match entries(payload).into_iter().find(|(k, _)| !keys.contains(k)) {
                Some((key, _)) => Err(bad_key(role, key, url)),
                None => Ok(()),
            }
        }
        Validator::Keyed(rules) => {
            let entries = entries(payload);
            if let Some((key, _)) = entries.iter().find(|(k, _)| rules.get(k).is_none()) {
                return Err(bad_key(role, key.clone(), url));
            }
            for (key, value) in entries {
                let accepted = match rules.get(&key) {
                    Some(ValueRule::OneOf(values)) => values.contains(value),
                    Some(ValueRule::Check(predicate)) => predicate.check(value),
                    Some(ValueRule::Any) | None => true,
                };
                if !accepted {
                    return Err(UrlValidationError::BadValue {
                        role,
                        key,
                        value: render_value(value),
                        url: url.to_string(),
                    });
                }
            }
            Ok(())
        }
        Validator::RoleSplit { query, body } => {
            let part = match role {
                Role::Query => query,
                Role::Body => body,
            };
            test_payload(part, role, payload, url)
        }
    }
}

fn bad_key(role: Role, key: String, url: &str) -> UrlValidationError {
    UrlValidationError::BadKey {
        role,
        key,
        url: url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::KeyedRules;
    use serde_json::json;

    const URL: &str = "/api/customers";

    fn is_limit(value: &Value) -> bool {
        value.as_u64().is_some_and(|n| n > 0 && n <= 250)
    }

    fn keyed() -> Validator {
        KeyedRules::new()
            .check("limit", crate::schema::Predicate::new("is_limit", is_limit))
            .one_of("status", [json!("open"), json!("closed")])
            .any("fields")
            .into()
    }

    #[test]
    fn accept_all_takes_anything() {
        assert!(test_payload(&Validator::AcceptAll, Role::Body, &json!({"x": 1}), URL).is_ok());
    }

    #[test]
    fn reject_all_only_takes_empty() {
        assert!(test_payload(&Validator::RejectAll, Role::Query, &json!({}), URL).is_ok());
        let err = test_payload(&Validator::RejectAll, Role::Query, &json!({"query": 46}), URL).unwrap_err();
        assert_eq!(
            err.to_string(),
            "URL validation error: No query permitted at /api/customers"
        );
    }

    #[test]
    fn predicate_failure_names_the_predicate() {
        let v = Validator::predicate("has_name", |p| p.get("name").is_some());
        assert!(test_payload(&v, Role::Body, &json!({"name": "x"}), URL).is_ok());
        let err = test_payload(&v, Role::Body, &json!({"nom": "x"}), URL).unwrap_err();
        assert!(matches!(err, UrlValidationError::CustomValidatorFailed { ref name, .. } if name == "has_name"));
    }

    #[test]
    fn key_set_reports_first_foreign_key() {
        let v = Validator::keys(["fields"]);
        assert!(test_payload(&v, Role::Query, &json!({"fields": "a"}), URL).is_ok());
        let err = test_payload(&v, Role::Query, &json!({"other": "a", "another": "b"}), URL).unwrap_err();
        assert!(matches!(err, UrlValidationError::BadKey { ref key, .. } if key == "other"));
    }

    #[test]
    fn keyed_checks_keys_before_values() {
        let err = test_payload(&keyed(), Role::Query, &json!({"limit": 999, "bogus": 1}), URL).unwrap_err();
        assert!(matches!(err, UrlValidationError::BadKey { ref key, .. } if key == "bogus"));
    }

    #[test]
    fn keyed_reports_first_bad_value() {
        assert!(test_payload(&keyed(), Role::Query, &json!({"limit": 27, "status": "open"}), URL).is_ok());
        let err = test_payload(&keyed(), Role::Query, &json!({"status": "gone", "limit": 999}), URL).unwrap_err();
        assert_eq!(
            err,
            UrlValidationError::BadValue {
                role: Role::Query,
                key: "status".to_string(),
                value: "gone".to_string(),
                url: URL.to_string(),
            }
        );
        let err = test_payload(&keyed(), Role::Query, &json!({"limit": 999}), URL).unwrap_err();
        assert!(matches!(err, UrlValidationError::BadValue { ref key, ref value, .. } if key == "limit" && value == "999"));
    }

    #[test]
    fn split_rule_tests_the_matching_part() {
        let v = Validator::split(Validator::keys(["since_id"]), false);
        assert!(test_payload(&v, Role::Query, &json!({"since_id": 47}), URL).is_ok());
        assert!(test_payload(&v, Role::Body, &json!({"since_id": 47}), URL).is_err());
    }

    #[test]
    fn emptiness() {
        assert!(is_empty_payload(&json!(null)));
        assert!(is_empty_payload(&json!("")));
        assert!(!is_empty_payload(&json!(0)));
        assert!(!is_empty_payload(&json!(["a"])));
    }
}
