//! Surface-syntax parsing for readiness expressions.
//!
//! The surface form is `jsonpath={<path-expr>}[=<value>]`, case-sensitive.
//! Parsing is all-or-nothing: a rejected expression produces no `Parsed`
//! value, and each rejection category gets its own diagnostic since most of
//! them are common copy-paste mistakes from command-line usage.

use std::fmt;

use crate::error::{ParseError, ReadyResult};

use super::selector::{parse_selector, Segment};

/// The required prefix of every surface expression.
pub const EXPRESSION_PREFIX: &str = "jsonpath=";

/// A parsed readiness expression.
///
/// `path` is kept verbatim, braces and any author-supplied padding included,
/// so rendering the expression back reproduces the input. The compiled
/// segments drive evaluation.
///
/// # Examples
///
/// ```
/// use readypath::path::parse;
///
/// let parsed = parse("jsonpath={.status.phase}=Running").unwrap();
/// assert_eq!(parsed.path(), "{.status.phase}");
/// assert_eq!(parsed.value(), Some("Running"));
/// assert_eq!(parsed.to_string(), "{.status.phase}=Running");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    path: String,
    value: Option<String>,
    segments: Vec<Segment>,
}

impl Parsed {
    /// The brace-delimited path, verbatim. Never empty.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The expected value, if the expression carries one. Never empty when
    /// present.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for Parsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={value}", self.path),
            None => write!(f, "{}", self.path),
        }
    }
}

/// Parses a surface expression into a [`Parsed`] readiness expression.
///
/// # Errors
///
/// Returns a [`ParseError`] for every malformed input: empty expressions,
/// a missing `jsonpath=` prefix, shell-quoting artifacts, unbalanced braces,
/// a trailing `=` with no value, more than one top-level `=`, and selector
/// constructs outside the supported subset.
pub fn parse(expr: &str) -> ReadyResult<Parsed> {
    if expr.is_empty() {
        return Err(ParseError::Empty.into());
    }

    let rest = expr
        .strip_prefix(EXPRESSION_PREFIX)
        .ok_or(ParseError::MissingPrefix)?;

    if rest.starts_with('\'') || rest.starts_with('"') {
        return Err(ParseError::ShellQuotes.into());
    }

    if !rest.starts_with('{') {
        return Err(ParseError::AmbiguousSeparator.into());
    }

    let close = matching_brace(rest).ok_or_else(|| ParseError::UnbalancedBraces {
        expr: rest.to_string(),
    })?;
    let path = &rest[..=close];
    let remainder = &rest[close + 1..];

    let value = match remainder.strip_prefix('=') {
        None if remainder.is_empty() => None,
        None => {
            // Trailing garbage directly after the closing brace. Positions
            // are byte offsets into the original expression.
            let ch = remainder.chars().next().unwrap_or('}');
            return Err(ParseError::UnrecognizedCharacter {
                ch,
                pos: EXPRESSION_PREFIX.len() + close + 1,
            }
            .into());
        }
        Some("") => {
            return Err(ParseError::MissingValue {
                path: path.to_string(),
            }
            .into())
        }
        Some(value) => {
            // Only the first `=` after the closing brace splits path from
            // value; a second one is ambiguous.
            if value.contains('=') {
                return Err(ParseError::AmbiguousSeparator.into());
            }
            Some(value.to_string())
        }
    };

    let inner = &path[1..path.len() - 1];
    let segments = parse_selector(inner, EXPRESSION_PREFIX.len() + 1)?;

    Ok(Parsed {
        path: path.to_string(),
        value,
        segments,
    })
}

/// Finds the index of the brace closing the path opened at index 0.
///
/// Quote-aware: a `}` inside a filter's string literal does not close the
/// path.
fn matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_expression() {
        let err = parse("").unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn test_missing_prefix() {
        let err = parse("{.foo}").unwrap_err();
        assert!(err.to_string().contains("jsonpath="));
    }

    #[test]
    fn test_shell_quotes() {
        let err = parse("jsonpath='{.status.phase}'=Running").unwrap_err();
        assert!(err.to_string().contains("omit shell quotes"));
    }

    #[test]
    fn test_missing_value() {
        let err = parse("jsonpath={.metadata.name}=").unwrap_err();
        assert!(err
            .to_string()
            .contains("{.metadata.name}= requires a value"));
    }

    #[test]
    fn test_repeated_separator() {
        let err = parse("jsonpath={.metadata.name}='test=wrong'").unwrap_err();
        assert!(err
            .to_string()
            .contains("format should be {.path}=value or {.path}"));
    }

    #[test]
    fn test_boolean_filter_unsupported() {
        let err = parse(
            "jsonpath={.status.conditions[?(@.type==\"Failed\"||@.type==\"Complete\")].status}=True",
        )
        .unwrap_err();
        assert!(err.to_string().contains("unrecognized character"));
    }

    #[test]
    fn test_key_with_any_value() {
        let parsed = parse("jsonpath={.foo}").unwrap();
        assert_eq!(parsed.path(), "{.foo}");
        assert_eq!(parsed.value(), None);
    }

    #[test]
    fn test_key_with_value() {
        let parsed = parse("jsonpath={.foo}=bar").unwrap();
        assert_eq!(parsed.path(), "{.foo}");
        assert_eq!(parsed.value(), Some("bar"));
    }

    #[test]
    fn test_preserves_double_equals_inside_filter() {
        let parsed =
            parse(r#"jsonpath={.status.containerStatuses[?(@.name=="foobar")].ready}=True"#)
                .unwrap();
        assert_eq!(
            parsed.path(),
            r#"{.status.containerStatuses[?(@.name=="foobar")].ready}"#
        );
        assert_eq!(parsed.value(), Some("True"));
    }

    #[test]
    fn test_padded_brackets_preserved() {
        let parsed = parse("jsonpath={ .webhooks[].clientConfig.caBundle }").unwrap();
        assert_eq!(parsed.path(), "{ .webhooks[].clientConfig.caBundle }");
        assert_eq!(parsed.value(), None);
    }

    #[test]
    fn test_unbalanced_braces() {
        let err = parse("jsonpath={.foo").unwrap_err();
        assert!(err.to_string().contains("unbalanced braces"));
    }

    #[test]
    fn test_missing_braces() {
        let err = parse("jsonpath=.foo").unwrap_err();
        assert!(err
            .to_string()
            .contains("format should be {.path}=value or {.path}"));
    }

    #[test]
    fn test_garbage_after_path() {
        let err = parse("jsonpath={.foo}bar").unwrap_err();
        assert!(err.to_string().contains("unrecognized character"));
    }

    #[test]
    fn test_error_positions_index_the_original_expression() {
        // Trailing garbage after the path.
        let err = parse("jsonpath={.foo}bar").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnrecognizedCharacter { ch: 'b', pos: 15 }.into()
        );

        // A selector error inside the braces uses the same coordinates.
        let err = parse("jsonpath={.foo||}").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnrecognizedCharacter { ch: '|', pos: 14 }.into()
        );
    }

    #[test]
    fn test_round_trip_rendering() {
        for expr in [
            "jsonpath={.foo}",
            "jsonpath={.foo}=bar",
            "jsonpath={ .webhooks[].clientConfig.caBundle }",
            r#"jsonpath={.status.containerStatuses[?(@.name=="foobar")].ready}=True"#,
        ] {
            let parsed = parse(expr).unwrap();
            let rendered = parsed.to_string();
            assert_eq!(format!("jsonpath={rendered}"), expr);

            let reparsed = parse(&format!("jsonpath={rendered}")).unwrap();
            assert_eq!(reparsed, parsed);
        }
    }

    #[test]
    fn test_value_is_never_empty_when_present() {
        let parsed = parse("jsonpath={.foo}=bar").unwrap();
        assert!(parsed.value().is_some_and(|v| !v.is_empty()));
    }
}
