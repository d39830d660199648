//! Scalar coercion shared by the metadata and data blocks.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("Invalid integer regex"));

static FLOAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+$").expect("Invalid float regex"));

/// A metadata value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Integer(n) => write!(f, "{n}"),
            Scalar::Float(n) => f.write_str(&format_float(*n)),
            Scalar::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

/// Coerce a raw metadata value.
///
/// Quotes are stripped first, so `"42"` still becomes an integer. `1.0.0`
/// matches neither number pattern and stays a string.
pub fn coerce_metadata_value(raw: &str) -> Scalar {
    let value = unquote(raw.trim());

    if let Some(number) = parse_number(value) {
        return number;
    }

    match value {
        "true" => Scalar::Boolean(true),
        "false" => Scalar::Boolean(false),
        _ => Scalar::String(value.to_string()),
    }
}

/// Coerce a raw data value.
///
/// Unlike metadata, keywords and numbers are checked before quotes are
/// stripped, so a quoted `"42"` stays the string `42`. Double-quoted values
/// have their escapes decoded.
pub fn coerce_data_value(raw: &str) -> Value {
    let value = raw.trim();

    match value {
        "" => return Value::String(String::new()),
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }

    match parse_number(value) {
        Some(Scalar::Integer(n)) => Value::from(n),
        Some(Scalar::Float(n)) => Value::from(n),
        _ if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') => {
            Value::String(unescape_data_string(&value[1..value.len() - 1]))
        }
        _ => Value::String(unquote(value).to_string()),
    }
}

/// Escape a data string so it fits on one line between double quotes.
pub fn escape_data_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str(r"\\"),
            '"' => out.push_str(r#"\""#),
            '\n' => out.push_str(r"\n"),
            '\r' => out.push_str(r"\r"),
            _ => out.push(ch),
        }
    }
    out
}

/// Inverse of [`escape_data_string`]. Unknown escapes are kept as written.
pub fn unescape_data_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(escaped @ ('"' | '\\')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

/// Render a float so that it reads back as a float (`2.0`, not `2`).
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Render a prop number the way it was most likely written (`3`, `0.5`).
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn parse_number(value: &str) -> Option<Scalar> {
    if INTEGER_RE.is_match(value) {
        // Digits beyond i64 still read as a number, just a lossy one.
        return Some(match value.parse::<i64>() {
            Ok(n) => Scalar::Integer(n),
            Err(_) => Scalar::Float(value.parse().ok()?),
        });
    }
    if FLOAT_RE.is_match(value) {
        return value.parse().ok().map(Scalar::Float);
    }
    None
}

/// Strip one pair of matching single or double quotes.
pub fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}
