//! Query string rendering.
//!
//! Keys keep payload insertion order. Values are written as-is: no
//! percent-encoding happens here, a configured query formatter does that if
//! an API needs it.

use serde_json::Value;

/// Render a single value the way it appears after `key=`.
///
/// Arrays are joined with `,`, nested objects become compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(render_value).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Serialize a query payload into `?k1=v1&k2=v2`, or an empty string when
/// nothing is left to emit. `null` values are skipped; non-object payloads
/// contribute nothing.
pub fn to_query_string(query: Option<&Value>) -> String {
    let Some(Value::Object(map)) = query else {
        return String::new();
    };
    let pairs: Vec<String> = map
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| format!("{k}={}", render_value(v)))
        .collect();
    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_insertion_order() {
        let q = json!({"since_id": 120938498207u64, "limit": 27});
        assert_eq!(to_query_string(Some(&q)), "?since_id=120938498207&limit=27");
        let q = json!({"hey": "hi", "yeah": "sup"});
        assert_eq!(to_query_string(Some(&q)), "?hey=hi&yeah=sup");
    }

    #[test]
    fn arrays_join_with_commas() {
        let q = json!({"ids": [120938498207u64, 109283098126u64, 701923098166u64]});
        assert_eq!(
            to_query_string(Some(&q)),
            "?ids=120938498207,109283098126,701923098166"
        );
    }

    #[test]
    fn null_values_are_omitted() {
        let q = json!({"a": null, "b": 1});
        assert_eq!(to_query_string(Some(&q)), "?b=1");
        assert_eq!(to_query_string(Some(&json!({"a": null}))), "");
    }

    #[test]
    fn empty_and_missing_payloads_render_nothing() {
        assert_eq!(to_query_string(None), "");
        assert_eq!(to_query_string(Some(&json!({}))), "");
        assert_eq!(to_query_string(Some(&json!("text"))), "");
    }

    #[test]
    fn no_percent_encoding() {
        let q = json!({"query": "John Hodgeman", "ok": true});
        assert_eq!(to_query_string(Some(&q)), "?query=John Hodgeman&ok=true");
    }
}
