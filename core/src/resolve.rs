//! Walks route segments down the schema tree and builds the URL path.
//!
//! The walk is strictly left to right and never backtracks. At every node a
//! literal child wins over the parameter fallback. Once the configuration
//! has no schema at all, segments are appended verbatim.

use tracing::trace;

use crate::config::Config;
use crate::error::{Result, UrlValidationError};
use crate::schema::SchemaNode;
use crate::types::Segment;

/// The path part of a URL (head, segments, tail) and the node it ended on.
#[derive(Debug, Clone)]
pub struct ResolvedPath<'a> {
    pub url: String,
    /// `None` when the configuration carries no schema.
    pub node: Option<&'a SchemaNode>,
}

pub fn resolve_path<'a>(config: &'a Config, segments: &[Segment]) -> Result<ResolvedPath<'a>> {
    let mut url = config.head().to_string();
    let mut node = config.schema();

    for segment in segments {
        let name = segment.as_str();
        let Some(current) = node else {
            url.push('/');
            url.push_str(name);
            continue;
        };

        if let Some(child) = current.literal(name) {
            let fragment = match (child.segment_format(), config.route_format()) {
                (Some(format), _) => format.apply(name),
                (None, Some(route_format)) => route_format(name),
                (None, None) => name.to_string(),
            };
            trace!(segment = name, fragment = %fragment, "literal segment");
            url.push('/');
            url.push_str(&fragment);
            node = Some(child);
        } else if let Some(param) = current.param_child() {
            trace!(segment = name, "parameter segment");
            url.push('/');
            url.push_str(name);
            node = Some(param);
        } else {
            return Err(unmatched(current, segment, url));
        }
    }

    url.push_str(config.tail());
    Ok(ResolvedPath { url, node })
}

fn unmatched(node: &SchemaNode, segment: &Segment, url: String) -> UrlValidationError {
    let is_value = segment.is_param_value();
    let segment = segment.as_str().to_string();
    if node.is_terminal() {
        UrlValidationError::TooFar { segment, url }
    } else if is_value {
        UrlValidationError::NoParam { segment, url }
    } else {
        UrlValidationError::NoBranch { segment, url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MethodTag;
    use crate::schema::Validator;

    fn seg(names: &[&str]) -> Vec<Segment> {
        names.iter().map(|n| Segment::Name(n.to_string())).collect()
    }

    fn config() -> Config {
        Config::builder()
            .head("/api")
            .tail(".json")
            .route_format(|s| s.replace('_', "-"))
            .schema(
                SchemaNode::new().child(
                    "customers",
                    SchemaNode::new()
                        .end(true)
                        .child("find", SchemaNode::endpoint(Validator::keys(["query"])).format("search"))
                        .child("count", SchemaNode::endpoint(false))
                        .child("send_invite", SchemaNode::endpoint(true))
                        .param(
                            SchemaNode::new()
                                .end(true)
                                .child("orders", SchemaNode::endpoint(true)),
                        ),
                ),
            )
            .build()
    }

    #[test]
    fn literal_param_and_tail() {
        let config = config();
        let path = resolve_path(&config, &seg(&["customers", "42", "orders"])).unwrap();
        assert_eq!(path.url, "/api/customers/42/orders.json");
        assert!(path.node.unwrap().is_terminal());
    }

    #[test]
    fn literal_wins_over_param() {
        let config = config();
        let path = resolve_path(&config, &seg(&["customers", "count"])).unwrap();
        assert_eq!(path.url, "/api/customers/count.json");
        assert!(path.node.unwrap().rule(MethodTag::End).unwrap().is_reject_all());
    }

    #[test]
    fn node_format_beats_route_format() {
        let config = config();
        let path = resolve_path(&config, &seg(&["customers", "find"])).unwrap();
        assert_eq!(path.url, "/api/customers/search.json");
        let path = resolve_path(&config, &seg(&["customers", "send_invite"])).unwrap();
        assert_eq!(path.url, "/api/customers/send-invite.json");
    }

    #[test]
    fn param_values_are_never_formatted() {
        let config = config();
        let path = resolve_path(&config, &seg(&["customers", "a_b"])).unwrap();
        assert_eq!(path.url, "/api/customers/a_b.json");
    }

    #[test]
    fn no_branch_reports_url_so_far() {
        let config = config();
        let err = resolve_path(&config, &seg(&["vendors"])).unwrap_err();
        assert_eq!(
            err,
            UrlValidationError::NoBranch {
                segment: "vendors".to_string(),
                url: "/api".to_string()
            }
        );
    }

    #[test]
    fn numeric_segment_without_param_is_no_param() {
        let config = config();
        let err = resolve_path(&config, &seg(&["7"])).unwrap_err();
        assert!(matches!(err, UrlValidationError::NoParam { ref segment, .. } if segment == "7"));
    }

    #[test]
    fn continuing_past_a_leaf_is_too_far() {
        let config = config();
        let err = resolve_path(&config, &seg(&["customers", "count", "more"])).unwrap_err();
        assert_eq!(
            err,
            UrlValidationError::TooFar {
                segment: "more".to_string(),
                url: "/api/customers/count".to_string()
            }
        );
    }

    #[test]
    fn without_schema_segments_pass_through() {
        let config = Config::builder().build();
        let path = resolve_path(&config, &seg(&["one", "two", "three"])).unwrap();
        assert_eq!(path.url, "/one/two/three");
        assert!(path.node.is_none());
    }
}
