//! Component manifest files.
//!
//! A manifest is a flat list of `key: value` lines:
//!
//! ```text
//! id: TextInput
//! label: Text Input
//! icon: "\U0001F4DD"
//! template: [% TextInput name="field" label="Label" /%]
//! ```
//!
//! Templates are not valid YAML, so manifests are read line by line.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;
use xtform_syntax::scalar::unquote;

static LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_]+):\s*(.+)$").expect("Invalid manifest line regex"));

static LONG_ESCAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\U([0-9A-Fa-f]{8})").expect("Invalid long escape regex"));

static SHORT_ESCAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\u([0-9A-Fa-f]{4})").expect("Invalid short escape regex"));

/// A component that can be inserted from the palette.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentManifest {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Text inserted into the document, usually a `[% ... /%]` tag.
    pub template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Errors that make a manifest unusable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ManifestError {
    #[error("Component manifest missing \"{0}\" field")]
    MissingField(&'static str),
}

/// Parse manifest text.
pub fn parse_manifest(content: &str) -> Result<ComponentManifest, ManifestError> {
    let mut fields: HashMap<String, String> = HashMap::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(caps) = LINE_RE.captures(line) {
            let key = caps[1].to_string();
            let mut value = unquote(caps[2].trim()).to_string();
            if key == "icon" {
                value = decode_escapes(&value);
            }
            fields.insert(key, value);
        }
    }

    let mut take = |key: &'static str| fields.remove(key);

    let id = take("id").ok_or(ManifestError::MissingField("id"))?;
    let label = take("label").ok_or(ManifestError::MissingField("label"))?;
    let template = take("template").ok_or(ManifestError::MissingField("template"))?;

    Ok(ComponentManifest {
        id,
        label,
        icon: take("icon"),
        template,
        description: take("description"),
    })
}

/// Decode `\UXXXXXXXX` and `\uXXXX` sequences. Invalid code points are left as written.
fn decode_escapes(value: &str) -> String {
    let replace = |caps: &Captures<'_>| {
        u32::from_str_radix(&caps[1], 16)
            .ok()
            .and_then(char::from_u32)
            .map_or_else(|| caps[0].to_string(), String::from)
    };

    let value = LONG_ESCAPE_RE.replace_all(value, replace);
    SHORT_ESCAPE_RE.replace_all(&value, replace).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_manifest() {
        let manifest = parse_manifest(
            r#"# Text input
id: TextInput
label: "Text Input"
icon: "\U0001F4DD"
template: [% TextInput name="field" label="Label" /%]
description: Single line of text
"#,
        )
        .unwrap();

        assert_eq!(
            manifest,
            ComponentManifest {
                id: "TextInput".into(),
                label: "Text Input".into(),
                icon: Some("\u{1F4DD}".into()),
                template: r#"[% TextInput name="field" label="Label" /%]"#.into(),
                description: Some("Single line of text".into()),
            }
        );
    }

    #[test]
    fn decodes_short_escapes_and_keeps_invalid_ones() {
        assert_eq!(decode_escapes(r"\u2611 done"), "\u{2611} done");
        assert_eq!(decode_escapes(r"\UFFFFFFFF"), r"\UFFFFFFFF");
        assert_eq!(decode_escapes("plain"), "plain");
    }

    #[test]
    fn requires_id_label_and_template() {
        assert_eq!(
            parse_manifest("label: X\ntemplate: [% X /%]"),
            Err(ManifestError::MissingField("id"))
        );
        assert_eq!(
            parse_manifest("id: X\ntemplate: [% X /%]"),
            Err(ManifestError::MissingField("label"))
        );
        assert_eq!(
            parse_manifest("id: X\nlabel: X"),
            Err(ManifestError::MissingField("template"))
        );
    }

    #[test]
    fn strips_quotes_only_in_matching_pairs() {
        let manifest =
            parse_manifest("id: 'Quoted'\nlabel: \"Half\ntemplate: \"[% Q /%]\"").unwrap();

        assert_eq!(manifest.id, "Quoted");
        assert_eq!(manifest.label, "\"Half");
        assert_eq!(manifest.template, "[% Q /%]");
    }

    #[test]
    fn optional_fields_default_to_none() {
        let manifest = parse_manifest("id: Divider\nlabel: Divider\ntemplate: [% Divider /%]").unwrap();
        assert!(manifest.icon.is_none());
        assert!(manifest.description.is_none());
    }
}
