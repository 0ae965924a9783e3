//! The compiled form of the restricted selector grammar.
//!
//! The inner text of a brace-delimited path compiles to a flat segment list.
//! Only the subset needed for single-condition readiness checks is accepted:
//! field selectors, integer or wildcard array indices, and at most one
//! equality filter predicate per segment. Everything else is rejected at
//! parse time rather than silently mis-evaluated.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::ParseError;

/// One step of a compiled path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Field selector `.name`.
    Field(String),
    /// Integer array index `[3]`.
    Index(usize),
    /// Wildcard array index `[*]` or `[]`: every element of the sequence.
    Wildcard,
    /// Equality filter predicate `[?(@.a.b=="literal")]`: sequence elements
    /// whose `field` path resolves to a scalar equal to `literal`.
    Filter {
        field: Vec<String>,
        literal: String,
    },
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

struct Scanner<'a> {
    chars: Peekable<CharIndices<'a>>,
    len: usize,
    /// Byte offset of the scanned text within the original expression, so
    /// every reported position shares one coordinate space.
    base: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str, base: usize) -> Self {
        Self {
            chars: input.char_indices().peekable(),
            len: input.len(),
            base,
        }
    }

    fn peek(&mut self) -> Option<(usize, char)> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        self.chars.next()
    }

    fn at(&self, local: usize) -> usize {
        self.base + local
    }

    fn end(&self) -> usize {
        self.base + self.len
    }

    /// Consumes `want` or fails with the character actually present.
    fn expect(&mut self, want: char) -> Result<(), ParseError> {
        match self.bump() {
            Some((_, c)) if c == want => Ok(()),
            Some((pos, c)) => Err(ParseError::UnrecognizedCharacter {
                ch: c,
                pos: self.at(pos),
            }),
            None => Err(ParseError::UnrecognizedCharacter {
                ch: '}',
                pos: self.end(),
            }),
        }
    }

    /// Reads a non-empty identifier.
    fn ident(&mut self) -> Result<String, ParseError> {
        let mut out = String::new();
        while let Some((_, c)) = self.peek() {
            if is_ident_char(c) {
                out.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if out.is_empty() {
            let (pos, ch) = self.peek().unwrap_or((self.len, '}'));
            return Err(ParseError::UnrecognizedCharacter {
                ch,
                pos: self.at(pos),
            });
        }
        Ok(out)
    }

    /// Reads a quoted string literal (single or double quotes, no escapes).
    fn quoted_literal(&mut self) -> Result<String, ParseError> {
        let quote = match self.bump() {
            Some((_, c @ ('"' | '\''))) => c,
            Some((pos, c)) => {
                return Err(ParseError::UnrecognizedCharacter {
                    ch: c,
                    pos: self.at(pos),
                })
            }
            None => {
                return Err(ParseError::UnrecognizedCharacter {
                    ch: '}',
                    pos: self.end(),
                })
            }
        };
        let mut out = String::new();
        loop {
            match self.bump() {
                Some((_, c)) if c == quote => return Ok(out),
                Some((_, c)) => out.push(c),
                None => {
                    return Err(ParseError::UnrecognizedCharacter {
                        ch: quote,
                        pos: self.end(),
                    })
                }
            }
        }
    }
}

/// Compiles the inner text of a brace-delimited path.
///
/// Surrounding whitespace is ignored (authors pad braces); an optional
/// leading `$` root marker is accepted. `base` is the byte offset of `inner`
/// within the original expression, so error positions point into it.
pub(crate) fn parse_selector(inner: &str, base: usize) -> Result<Vec<Segment>, ParseError> {
    let trimmed = inner.trim();
    let leading = inner.len() - inner.trim_start().len();
    let mut scanner = Scanner::new(trimmed, base + leading);
    let mut segments = Vec::new();

    if let Some((_, '$')) = scanner.peek() {
        scanner.bump();
    }

    while let Some((pos, c)) = scanner.peek() {
        match c {
            '.' => {
                scanner.bump();
                segments.push(Segment::Field(scanner.ident()?));
            }
            '[' => {
                scanner.bump();
                segments.push(bracket(&mut scanner)?);
            }
            _ => {
                return Err(ParseError::UnrecognizedCharacter {
                    ch: c,
                    pos: scanner.at(pos),
                })
            }
        }
    }

    Ok(segments)
}

fn bracket(scanner: &mut Scanner<'_>) -> Result<Segment, ParseError> {
    match scanner.peek() {
        Some((_, ']')) => {
            scanner.bump();
            Ok(Segment::Wildcard)
        }
        Some((_, '*')) => {
            scanner.bump();
            scanner.expect(']')?;
            Ok(Segment::Wildcard)
        }
        Some((start, c)) if c.is_ascii_digit() => {
            let mut digits = String::new();
            while let Some((_, d)) = scanner.peek() {
                if d.is_ascii_digit() {
                    digits.push(d);
                    scanner.bump();
                } else {
                    break;
                }
            }
            scanner.expect(']')?;
            let index = digits.parse().map_err(|_| ParseError::UnrecognizedCharacter {
                ch: c,
                pos: scanner.at(start),
            })?;
            Ok(Segment::Index(index))
        }
        Some((_, '?')) => {
            scanner.bump();
            filter(scanner)
        }
        Some((pos, c)) => Err(ParseError::UnrecognizedCharacter {
            ch: c,
            pos: scanner.at(pos),
        }),
        None => Err(ParseError::UnrecognizedCharacter {
            ch: '[',
            pos: scanner.end(),
        }),
    }
}

/// Parses the remainder of `[?(@.field=="literal")]` after the `?`.
///
/// Exactly one equality predicate is supported; `||`/`&&` composition fails
/// on the first character outside the subset.
fn filter(scanner: &mut Scanner<'_>) -> Result<Segment, ParseError> {
    scanner.expect('(')?;
    scanner.expect('@')?;

    let mut field = Vec::new();
    loop {
        scanner.expect('.')?;
        field.push(scanner.ident()?);
        if !matches!(scanner.peek(), Some((_, '.'))) {
            break;
        }
    }

    scanner.expect('=')?;
    scanner.expect('=')?;
    let literal = scanner.quoted_literal()?;
    scanner.expect(')')?;
    scanner.expect(']')?;

    Ok(Segment::Filter { field, literal })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_chain() {
        let segments = parse_selector(".status.phase", 0).unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Field("status".into()),
                Segment::Field("phase".into())
            ]
        );
    }

    #[test]
    fn test_padded_and_rooted() {
        assert_eq!(
            parse_selector(" .foo ", 0).unwrap(),
            vec![Segment::Field("foo".into())]
        );
        assert_eq!(
            parse_selector("$.foo", 0).unwrap(),
            vec![Segment::Field("foo".into())]
        );
    }

    #[test]
    fn test_array_indices() {
        assert_eq!(
            parse_selector(".items[0].name", 0).unwrap(),
            vec![
                Segment::Field("items".into()),
                Segment::Index(0),
                Segment::Field("name".into())
            ]
        );
        assert_eq!(
            parse_selector(".items[*]", 0).unwrap(),
            vec![Segment::Field("items".into()), Segment::Wildcard]
        );
        assert_eq!(
            parse_selector(".webhooks[].clientConfig.caBundle", 0).unwrap(),
            vec![
                Segment::Field("webhooks".into()),
                Segment::Wildcard,
                Segment::Field("clientConfig".into()),
                Segment::Field("caBundle".into())
            ]
        );
    }

    #[test]
    fn test_filter_predicate() {
        let segments =
            parse_selector(r#".status.containerStatuses[?(@.name=="foobar")].ready"#, 0).unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Field("status".into()),
                Segment::Field("containerStatuses".into()),
                Segment::Filter {
                    field: vec!["name".into()],
                    literal: "foobar".into()
                },
                Segment::Field("ready".into())
            ]
        );
    }

    #[test]
    fn test_filter_dotted_field_and_single_quotes() {
        let segments = parse_selector(".items[?(@.meta.kind=='Job')]", 0).unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Field("items".into()),
                Segment::Filter {
                    field: vec!["meta".into(), "kind".into()],
                    literal: "Job".into()
                }
            ]
        );
    }

    #[test]
    fn test_boolean_composition_rejected() {
        let err =
            parse_selector(r#".status.conditions[?(@.type=="Failed"||@.type=="Complete")].status"#, 0)
                .unwrap_err();
        assert!(err.to_string().contains("unrecognized character"));
        assert!(matches!(
            err,
            ParseError::UnrecognizedCharacter { ch: '|', .. }
        ));
    }

    #[test]
    fn test_unsupported_constructs_rejected() {
        for expr in ["..name", ".items[1:2]", ".items[?(@.a>1)]", "@.foo", ".foo."] {
            let err = parse_selector(expr, 0).unwrap_err();
            assert!(
                matches!(err, ParseError::UnrecognizedCharacter { .. }),
                "{expr} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn test_error_position_honors_base_offset() {
        let err = parse_selector(" .foo|", 10).unwrap_err();
        // Base 10, one byte of leading padding, then `.foo` before the `|`.
        assert_eq!(err, ParseError::UnrecognizedCharacter { ch: '|', pos: 15 });
    }

    #[test]
    fn test_empty_selector_is_root() {
        assert!(parse_selector("", 0).unwrap().is_empty());
        assert!(parse_selector("$", 0).unwrap().is_empty());
    }
}
