//! Evaluation of parsed expressions against observed documents.
//!
//! Matching is a pure function over an in-memory document: segments resolve
//! to a node set (wildcards fan out across sequence elements), then the
//! expression's value clause decides between an existence check and a
//! disjunctive scalar comparison.

use crate::document::Document;
use crate::error::EvalError;

use super::parser::Parsed;
use super::selector::Segment;

/// The outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Whether the condition is satisfied by the current document.
    pub matched: bool,
    /// Human-readable description of the matched node, empty when nothing
    /// matched.
    pub found: String,
}

impl MatchResult {
    fn no_match() -> Self {
        Self {
            matched: false,
            found: String::new(),
        }
    }

    fn matched(found: String) -> Self {
        Self {
            matched: true,
            found,
        }
    }
}

impl Parsed {
    /// Evaluates this expression against a document.
    ///
    /// A path resolving to zero nodes is not an error: the target may simply
    /// not exist yet. With no value clause, any resolved node satisfies the
    /// condition regardless of its value, null included. With a value clause,
    /// the condition is satisfied if any resolved node's scalar form equals
    /// the expected value; the first matching node is the one reported.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::NonPrimitiveValue`] when a value comparison is
    /// required and resolved nodes are sequences or mappings. Existence
    /// checks never fail on non-primitive nodes.
    pub fn matches(&self, doc: &Document) -> Result<MatchResult, EvalError> {
        let nodes = resolve(self.segments(), doc);
        if nodes.is_empty() {
            return Ok(MatchResult::no_match());
        }

        let Some(want) = self.value() else {
            return Ok(MatchResult::matched(nodes[0].found_string()));
        };

        let mut saw_non_primitive = false;
        for node in &nodes {
            match node.scalar_string() {
                Some(have) if have == want => return Ok(MatchResult::matched(have)),
                Some(_) => {}
                None => saw_non_primitive = true,
            }
        }

        if saw_non_primitive {
            return Err(EvalError::NonPrimitiveValue {
                path: self.path().to_string(),
            });
        }
        Ok(MatchResult::no_match())
    }
}

/// Resolves the segment chain to the set of reached nodes, in document order.
fn resolve<'a>(segments: &[Segment], doc: &'a Document) -> Vec<&'a Document> {
    let mut nodes = vec![doc];
    for segment in segments {
        let mut next = Vec::new();
        for node in nodes {
            step(segment, node, &mut next);
        }
        if next.is_empty() {
            return next;
        }
        nodes = next;
    }
    nodes
}

fn step<'a>(segment: &Segment, node: &'a Document, out: &mut Vec<&'a Document>) {
    match segment {
        Segment::Field(name) => {
            if let Some(child) = node.get(name) {
                out.push(child);
            }
        }
        Segment::Index(i) => {
            if let Some(child) = node.as_sequence().and_then(|items| items.get(*i)) {
                out.push(child);
            }
        }
        Segment::Wildcard => {
            if let Some(items) = node.as_sequence() {
                out.extend(items.iter());
            }
        }
        Segment::Filter { field, literal } => {
            let Some(items) = node.as_sequence() else {
                return;
            };
            for item in items {
                let mut target = Some(item);
                for name in field {
                    target = target.and_then(|t| t.get(name));
                }
                let selected = target
                    .and_then(Document::scalar_string)
                    .is_some_and(|s| s == *literal);
                if selected {
                    out.push(item);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::parse;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        Document::from(value)
    }

    fn eval(expr: &str, value: serde_json::Value) -> Result<MatchResult, EvalError> {
        parse(expr).unwrap().matches(&doc(value))
    }

    #[test]
    fn test_no_match_is_not_an_error() {
        let result = eval("jsonpath={.foo}", json!({})).unwrap();
        assert!(!result.matched);
        assert_eq!(result.found, "");
    }

    #[test]
    fn test_key_exists() {
        let result = eval("jsonpath={ .foo }", json!({"foo": null})).unwrap();
        assert!(result.matched);
        assert_eq!(result.found, "null");
    }

    #[test]
    fn test_key_exists_with_non_primitive_value() {
        // Existence checks never fail on non-primitive nodes.
        let result = eval("jsonpath={.foo}", json!({"foo": ["boo"]})).unwrap();
        assert!(result.matched);
        assert_eq!(result.found, r#"["boo"]"#);
    }

    #[test]
    fn test_value_matches() {
        let result = eval("jsonpath={.foo}=bar", json!({"foo": "bar"})).unwrap();
        assert!(result.matched);
        assert_eq!(result.found, "bar");
    }

    #[test]
    fn test_value_does_not_match() {
        let result = eval("jsonpath={.foo}=bar", json!({"foo": "baz"})).unwrap();
        assert!(!result.matched);
        assert_eq!(result.found, "");
    }

    #[test]
    fn test_wildcard_disjunction() {
        let result = eval(
            "jsonpath={.foo[*].bar}=baz",
            json!({"foo": [{"bar": "x"}, {"bar": "baz"}]}),
        )
        .unwrap();
        assert!(result.matched);
        assert_eq!(result.found, "baz");
    }

    #[test]
    fn test_empty_index_wildcard() {
        let result = eval(
            "jsonpath={ .webhooks[].clientConfig.caBundle }",
            json!({"webhooks": [{"clientConfig": {"caBundle": "Zm9v"}}]}),
        )
        .unwrap();
        assert!(result.matched);
        assert_eq!(result.found, "Zm9v");
    }

    #[test]
    fn test_integer_index() {
        let result = eval("jsonpath={.items[1]}=b", json!({"items": ["a", "b"]})).unwrap();
        assert!(result.matched);

        let result = eval("jsonpath={.items[5]}=b", json!({"items": ["a", "b"]})).unwrap();
        assert!(!result.matched);
    }

    #[test]
    fn test_filter_predicate_selects_element() {
        let pod_status = json!({
            "status": {
                "containerStatuses": [
                    {"name": "sidecar", "ready": false},
                    {"name": "foobar", "ready": true},
                ],
            },
        });
        let result = eval(
            r#"jsonpath={.status.containerStatuses[?(@.name=="foobar")].ready}=true"#,
            pod_status.clone(),
        )
        .unwrap();
        assert!(result.matched);
        assert_eq!(result.found, "true");

        let result = eval(
            r#"jsonpath={.status.containerStatuses[?(@.name=="absent")].ready}=true"#,
            pod_status,
        )
        .unwrap();
        assert!(!result.matched);
    }

    #[test]
    fn test_non_primitive_value_comparison_fails() {
        let err = eval("jsonpath={.foo}=bar", json!({"foo": ["bar"]})).unwrap_err();
        assert!(err.to_string().contains("non-primitive value"));
    }

    #[test]
    fn test_scalar_match_beats_non_primitive_sibling() {
        // Disjunction is existential: one scalar match satisfies even when
        // another resolved node is composite.
        let result = eval(
            "jsonpath={.foo[*].bar}=baz",
            json!({"foo": [{"bar": {"deep": true}}, {"bar": "baz"}]}),
        )
        .unwrap();
        assert!(result.matched);
        assert_eq!(result.found, "baz");
    }

    #[test]
    fn test_all_non_primitive_without_match_fails() {
        let err = eval(
            "jsonpath={.foo[*].bar}=baz",
            json!({"foo": [{"bar": {"deep": true}}]}),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EvalError::NonPrimitiveValue {
                path: "{.foo[*].bar}".to_string()
            }
        );
    }

    #[test]
    fn test_existence_of_null_matches() {
        let result = eval("jsonpath={.spec.paused}", json!({"spec": {"paused": null}})).unwrap();
        assert!(result.matched);
    }

    #[test]
    fn test_numeric_comparison_uses_display_form() {
        let result = eval("jsonpath={.status.replicas}=3", json!({"status": {"replicas": 3}}))
            .unwrap();
        assert!(result.matched);
        assert_eq!(result.found, "3");

        let result = eval(
            "jsonpath={.status.replicas}=3",
            json!({"status": {"replicas": 2}}),
        )
        .unwrap();
        assert!(!result.matched);
    }

    #[test]
    fn test_path_through_scalar_resolves_nothing() {
        let result = eval("jsonpath={.foo.bar}", json!({"foo": "scalar"})).unwrap();
        assert!(!result.matched);
    }
}
