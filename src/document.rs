//! Document values observed for a tracked object.
//!
//! A [`Document`] is a dynamically-shaped, JSON-like value: the last known
//! state of a watched object. Path expressions traverse documents and compare
//! scalar leaves against expected literals.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A dynamically-shaped, JSON-like value.
///
/// This enum covers every shape an observed object can take, so traversal and
/// scalar comparison are handled exhaustively rather than through runtime type
/// inspection.
///
/// # Examples
///
/// ```
/// use readypath::Document;
///
/// let doc = Document::from(serde_json::json!({"status": {"phase": "Running"}}));
/// assert!(doc.is_mapping());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Document {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Document>),
    Mapping(BTreeMap<String, Document>),
}

impl Document {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    pub const fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    pub const fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    /// Returns true for values eligible for value-clause comparison.
    ///
    /// Scalars are `Null`, `Bool`, `Int`, `Float`, and `String`; sequences
    /// and mappings are not.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Self::Sequence(_) | Self::Mapping(_))
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Document]> {
        match self {
            Self::Sequence(v) => Some(v),
            _ => None,
        }
    }

    pub const fn as_mapping(&self) -> Option<&BTreeMap<String, Document>> {
        match self {
            Self::Mapping(v) => Some(v),
            _ => None,
        }
    }

    /// Looks up a key on a mapping; `None` for any other shape.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Returns a human-readable type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    /// The canonical comparison form of a scalar.
    ///
    /// Strings are returned raw (no quotes), so `{.foo}=bar` matches
    /// `{"foo": "bar"}`. Returns `None` for sequences and mappings.
    #[must_use]
    pub fn scalar_string(&self) -> Option<String> {
        match self {
            Self::Null => Some("null".to_string()),
            Self::Bool(v) => Some(v.to_string()),
            Self::Int(v) => Some(v.to_string()),
            Self::Float(v) => Some(v.to_string()),
            Self::String(v) => Some(v.clone()),
            Self::Sequence(_) | Self::Mapping(_) => None,
        }
    }

    /// The display form used when reporting a found node.
    ///
    /// Scalars use their comparison form; composites render as compact JSON.
    #[must_use]
    pub fn found_string(&self) -> String {
        match self.scalar_string() {
            Some(s) => s,
            None => serde_json::Value::from(self.clone()).to_string(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::Null
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.found_string())
    }
}

impl From<serde_json::Value> for Document {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else {
                    // u64 beyond i64::MAX or a true float.
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(entries) => Self::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Document> for serde_json::Value {
    fn from(doc: Document) -> Self {
        match doc {
            Document::Null => Self::Null,
            Document::Bool(b) => Self::Bool(b),
            Document::Int(i) => Self::Number(i.into()),
            Document::Float(f) => serde_json::Number::from_f64(f).map_or(Self::Null, Self::Number),
            Document::String(s) => Self::String(s),
            Document::Sequence(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Document::Mapping(entries) => Self::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Document {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Document {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Document {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Document {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Document {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}
