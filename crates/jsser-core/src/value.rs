//! `JsonValue` — the parsed, typed representation of a JSON document.
//!
//! Built once by the parser and consumed by the decoder, or built by the
//! encoder and rendered to text. The tree owns all of its data and has no
//! back-references, so it can never be cyclic.

use crate::error::Result;
use std::fmt;
use std::str::FromStr;

/// A JSON value. Mirrors the JSON grammar, with two deliberate choices:
///
/// - `Number` keeps the original text so the decoder decides precision.
/// - `Object` is a `Vec` of pairs to keep insertion order without a map type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JsonValue {
    #[default]
    Null,
    Bool(bool),
    Number(String),
    String(String),
    Array(Vec<JsonValue>),
    /// Key-value pairs in insertion order.
    Object(Vec<(String, JsonValue)>),
}

impl JsonValue {
    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, JsonValue::Bool(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, JsonValue::Number(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, JsonValue::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, JsonValue::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, JsonValue::Object(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Raw numeric text.
    pub fn as_number(&self) -> Option<&str> {
        match self {
            JsonValue::Number(raw) => Some(raw),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            JsonValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(String, JsonValue)]> {
        match self {
            JsonValue::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up an object member by exact key. `None` for non-objects.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.as_object()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "bool",
            JsonValue::Number(_) => "number",
            JsonValue::String(_) => "string",
            JsonValue::Array(_) => "array",
            JsonValue::Object(_) => "object",
        }
    }

    fn write_compact(&self, out: &mut impl fmt::Write) -> fmt::Result {
        match self {
            JsonValue::Array(items) => {
                out.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.write_char(',')?;
                    }
                    item.write_compact(out)?;
                }
                out.write_char(']')
            }
            JsonValue::Object(entries) => {
                out.write_char('{')?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.write_char(',')?;
                    }
                    write_quoted(key, out)?;
                    out.write_char(':')?;
                    value.write_compact(out)?;
                }
                out.write_char('}')
            }
            _ => self.write_scalar(out),
        }
    }

    /// Two-space indented rendering. Empty containers stay on one line.
    fn write_pretty(&self, depth: usize, out: &mut impl fmt::Write) -> fmt::Result {
        match self {
            JsonValue::Array(items) if !items.is_empty() => {
                out.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.write_char(',')?;
                    }
                    newline(depth + 1, out)?;
                    item.write_pretty(depth + 1, out)?;
                }
                newline(depth, out)?;
                out.write_char(']')
            }
            JsonValue::Object(entries) if !entries.is_empty() => {
                out.write_char('{')?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.write_char(',')?;
                    }
                    newline(depth + 1, out)?;
                    write_quoted(key, out)?;
                    out.write_str(": ")?;
                    value.write_pretty(depth + 1, out)?;
                }
                newline(depth, out)?;
                out.write_char('}')
            }
            _ => self.write_compact(out),
        }
    }

    fn write_scalar(&self, out: &mut impl fmt::Write) -> fmt::Result {
        match self {
            JsonValue::Null => out.write_str("null"),
            JsonValue::Bool(true) => out.write_str("true"),
            JsonValue::Bool(false) => out.write_str("false"),
            JsonValue::Number(raw) => out.write_str(raw),
            JsonValue::String(s) => write_quoted(s, out),
            JsonValue::Array(_) => out.write_str("[]"),
            JsonValue::Object(_) => out.write_str("{}"),
        }
    }
}

fn newline(depth: usize, out: &mut impl fmt::Write) -> fmt::Result {
    out.write_char('\n')?;
    for _ in 0..depth {
        out.write_str("  ")?;
    }
    Ok(())
}

/// Quote `s`, escaping `"` as `\"`. No other character is escaped.
pub(crate) fn write_quoted(s: &str, out: &mut impl fmt::Write) -> fmt::Result {
    out.write_char('"')?;
    let mut rest = s;
    while let Some(idx) = rest.find('"') {
        out.write_str(&rest[..idx])?;
        out.write_str("\\\"")?;
        rest = &rest[idx + 1..];
    }
    out.write_str(rest)?;
    out.write_char('"')
}

/// Compact text. The alternate flag (`{:#}`) pretty-prints.
impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            self.write_pretty(0, f)
        } else {
            self.write_compact(f)
        }
    }
}

impl FromStr for JsonValue {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        crate::parser::parse(s)
    }
}

impl From<bool> for JsonValue {
    fn from(b: bool) -> Self {
        JsonValue::Bool(b)
    }
}

impl From<&str> for JsonValue {
    fn from(s: &str) -> Self {
        JsonValue::String(s.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(s: String) -> Self {
        JsonValue::String(s)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(items: Vec<JsonValue>) -> Self {
        JsonValue::Array(items)
    }
}
