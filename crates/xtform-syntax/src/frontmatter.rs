//! Splitting a document into its metadata, body, and data regions.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::ast::{Data, Metadata};
use crate::diagnostic::Diagnostic;
use crate::scalar::{coerce_data_value, coerce_metadata_value, escape_data_string};

static FRONTMATTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^---\s*[\r\n]+([\s\S]*?)[\r\n]+---\s*[\r\n]+([\s\S]*)$")
        .expect("Invalid frontmatter regex")
});

static DATA_SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<body>[\s\S]*?)[\r\n]+)?---[\r\n]+(?P<marker>data:)(?P<content>[\s\S]*?)(?P<close>[\r\n]+---\s*)?$",
    )
    .expect("Invalid data section regex")
});

static METADATA_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_]+):\s*(.+)$").expect("Invalid metadata line regex")
});

static DATA_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s{2}([A-Za-z0-9_]+):\s*(.*)$").expect("Invalid data line regex")
});

/// The three regions of a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Split {
    pub metadata: Metadata,

    /// Body text, trimmed when a frontmatter block was present.
    pub body: String,

    pub data: Data,

    pub diagnostics: Vec<Diagnostic>,
}

/// Split raw document text into metadata, body, and data.
///
/// Text without a leading `---` block is all body. That is not an error.
pub fn split(source: &str) -> Split {
    let Some(caps) = FRONTMATTER_RE.captures(source) else {
        return Split {
            body: source.to_string(),
            ..Split::default()
        };
    };

    let mut diagnostics = Vec::new();

    let (Some(yaml), Some(rest)) = (caps.get(1), caps.get(2)) else {
        return Split {
            body: source.to_string(),
            ..Split::default()
        };
    };

    let metadata = parse_metadata(yaml.as_str(), line_at(source, yaml.start()), &mut diagnostics);

    let Some(data_caps) = DATA_SECTION_RE.captures(rest.as_str()) else {
        return Split {
            metadata,
            body: rest.as_str().trim().to_string(),
            data: Data::new(),
            diagnostics,
        };
    };

    let body = data_caps
        .name("body")
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    let content = data_caps.name("content").map_or("", |m| m.as_str());

    if data_caps.name("close").is_none() {
        let marker = data_caps.name("marker").map_or(0, |m| m.start());
        diagnostics.push(
            Diagnostic::warning("Data section is missing its closing delimiter")
                .at_line(line_at(source, rest.start() + marker)),
        );
    }

    Split {
        metadata,
        body,
        data: parse_data(content),
        diagnostics,
    }
}

/// Parse `key: value` metadata lines.
///
/// `first_line` is the document line number of the first metadata line.
fn parse_metadata(content: &str, first_line: usize, diagnostics: &mut Vec<Diagnostic>) -> Metadata {
    let mut metadata = Metadata::new();

    for (index, line) in content.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match METADATA_LINE_RE.captures(line) {
            Some(caps) => {
                metadata.insert(caps[1].to_string(), coerce_metadata_value(&caps[2]));
            }
            None => diagnostics.push(
                Diagnostic::warning(format!("Invalid metadata line: {line}"))
                    .at_line(first_line + index),
            ),
        }
    }

    metadata
}

/// Parse the indented `  key: value` lines of a data section.
///
/// Lines that do not fit the pattern are skipped.
fn parse_data(content: &str) -> Data {
    let mut data = Data::new();

    for line in content.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(caps) = DATA_LINE_RE.captures(line) {
            data.insert(caps[1].to_string(), coerce_data_value(&caps[2]));
        }
    }

    data
}

/// Render the metadata block, or nothing when there is no metadata.
pub fn serialize_metadata(metadata: &Metadata) -> String {
    if metadata.is_empty() {
        return String::new();
    }

    let mut yaml = String::from("---\n");
    for (key, value) in metadata {
        match value.as_str() {
            Some(s) if s.contains(':') || s.contains('#') => {
                yaml.push_str(&format!("{key}: \"{s}\"\n"));
            }
            _ => yaml.push_str(&format!("{key}: {value}\n")),
        }
    }
    yaml.push_str("---\n");
    yaml
}

/// Render the data block, or nothing when there is no data.
pub fn serialize_data(data: &Data) -> String {
    if data.is_empty() {
        return String::new();
    }

    let mut yaml = String::from("---\ndata:\n");
    for (key, value) in data {
        yaml.push_str(&format!("  {key}: {}\n", serialize_data_value(value)));
    }
    yaml.push_str("---\n");
    yaml
}

fn serialize_data_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{}\"", escape_data_string(s)),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// 1-based line number of a byte offset.
fn line_at(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::Scalar;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn splits_all_three_regions() {
        let source = r#"---
title: Intake
version: 2
---
# Patient

Name: [% TextInput name="patient" /%]

---
data:
  patient: "Ada"
  age: 36
  consent: true
  notes: null
---
"#;

        let split = split(source);

        assert_eq!(split.metadata["title"], Scalar::from("Intake"));
        assert_eq!(split.metadata["version"], Scalar::Integer(2));
        assert_eq!(
            split.body,
            "# Patient\n\nName: [% TextInput name=\"patient\" /%]"
        );
        assert_eq!(split.data["patient"], json!("Ada"));
        assert_eq!(split.data["age"], json!(36));
        assert_eq!(split.data["consent"], json!(true));
        assert_eq!(split.data["notes"], json!(null));
        assert!(split.diagnostics.is_empty());
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just a form\n\nNo frontmatter here.";

        let split = split(source);

        assert!(split.metadata.is_empty());
        assert!(split.data.is_empty());
        assert_eq!(split.body, source);
        assert!(split.diagnostics.is_empty());
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let source = "---\r\ntitle: Windows\r\n---\r\nBody\r\n---\r\ndata:\r\n  a: 1\r\n---\r\n";

        let split = split(source);

        assert_eq!(split.metadata["title"], Scalar::from("Windows"));
        assert_eq!(split.body, "Body");
        assert_eq!(split.data["a"], json!(1));
    }

    #[test]
    fn body_without_data_is_trimmed() {
        let split = split("---\ntitle: T\n---\n\n  Hello\n\n");
        assert_eq!(split.body, "Hello");
        assert!(split.data.is_empty());
    }

    #[test]
    fn warns_on_invalid_metadata_line() {
        let source = "---\ntitle: Ok\nnot a valid line\nversion: 1.0.0\n---\nBody";

        let split = split(source);

        assert_eq!(split.diagnostics.len(), 1);
        let diag = &split.diagnostics[0];
        assert!(!diag.is_error());
        assert_eq!(diag.line, Some(3));
        assert!(diag.message.contains("not a valid line"));

        assert_eq!(split.metadata["title"], Scalar::from("Ok"));
        assert_eq!(split.metadata["version"], Scalar::from("1.0.0"));
    }

    #[test]
    fn skips_comments_and_blank_metadata_lines() {
        let split = split("---\n# comment\n\nauthor: \"A: B\"\n---\nBody");
        assert!(split.diagnostics.is_empty());
        assert_eq!(split.metadata["author"], Scalar::from("A: B"));
    }

    #[test]
    fn data_directly_after_frontmatter() {
        let split = split("---\ntitle: T\n---\n---\ndata:\n  a: \"x\"\n---\n");
        assert_eq!(split.body, "");
        assert_eq!(split.data["a"], json!("x"));
    }

    #[test]
    fn flags_unclosed_data_section() {
        let source = "---\ntitle: T\n---\nBody\n---\ndata:\n  a: 1\n  b: two";

        let split = split(source);

        assert_eq!(split.body, "Body");
        assert_eq!(split.data["a"], json!(1));
        assert_eq!(split.data["b"], json!("two"));
        assert_eq!(split.diagnostics.len(), 1);
        assert_eq!(split.diagnostics[0].line, Some(6));
        assert!(split.diagnostics[0].message.contains("closing delimiter"));
    }

    #[test]
    fn ignores_badly_indented_data_lines() {
        let split = split("---\nt: x\n---\nB\n---\ndata:\n  ok: 1\nflush: 2\n    deep: 3\n---\n");
        assert_eq!(split.data.len(), 1);
        assert_eq!(split.data["ok"], json!(1));
    }

    #[test]
    fn serializes_metadata() {
        let mut metadata = Metadata::new();
        metadata.insert("title".into(), Scalar::from("Form: Intake"));
        metadata.insert("version".into(), Scalar::Integer(3));
        metadata.insert("draft".into(), Scalar::Boolean(false));
        metadata.insert("ratio".into(), Scalar::Float(2.0));

        assert_eq!(
            serialize_metadata(&metadata),
            "---\ntitle: \"Form: Intake\"\nversion: 3\ndraft: false\nratio: 2.0\n---\n"
        );
        assert_eq!(serialize_metadata(&Metadata::new()), "");
    }

    #[test]
    fn serializes_data() {
        let mut data = Data::new();
        data.insert("name".into(), json!("Ada"));
        data.insert("time".into(), json!("10:30"));
        data.insert("count".into(), json!(4));
        data.insert("empty".into(), json!(null));
        data.insert("tags".into(), json!(["a", "b"]));

        assert_eq!(
            serialize_data(&data),
            "---\ndata:\n  name: \"Ada\"\n  time: \"10:30\"\n  count: 4\n  empty: null\n  tags: [\"a\",\"b\"]\n---\n"
        );
        assert_eq!(serialize_data(&Data::new()), "");
    }

    #[test]
    fn awkward_data_strings_read_back_unchanged() {
        let mut data = Data::new();
        data.insert("quote".into(), json!("He said: \"hi\""));
        data.insert("lines".into(), json!("line1\nline2"));
        data.insert("path".into(), json!("C:\\forms\\"));
        data.insert("fence".into(), json!("---"));

        let mut text = format!("---\ntitle: T\n---\nBody\n\n{}", serialize_data(&data));
        for _ in 0..3 {
            let reparsed = split(&text);
            assert_eq!(reparsed.data, data);
            text = format!("---\ntitle: T\n---\nBody\n\n{}", serialize_data(&reparsed.data));
        }

        assert!(text.contains(r#"  quote: "He said: \"hi\"""#));
        assert!(text.contains(r#"  lines: "line1\nline2""#));
    }
}
