//! Builds the document tree from body tokens.

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::{Block, Component, Document, Heading, Inline, Paragraph, Position, Props, Text};
use crate::diagnostic::Diagnostic;
use crate::tokenizer::{Token, TokenKind};

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("Invalid heading regex"));

static PROP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([A-Za-z0-9_]+)=(?:"([^"]*)"|'([^']*)'|(\S+))$"#).expect("Invalid prop regex")
});

/// Consumes a token slice and produces a [`Document`].
pub struct AstBuilder<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'t, 'a> AstBuilder<'t, 'a> {
    pub fn new(tokens: &'t [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Build the document, returning it with any diagnostics.
    pub fn build(mut self) -> (Document, Vec<Diagnostic>) {
        let mut children = Vec::new();
        let tokens = self.tokens;

        while let Some(token) = tokens.get(self.pos) {
            match token.kind {
                TokenKind::Text => children.extend(parse_markdown(token)),
                TokenKind::ComponentSelfClosing => {
                    if let Some(component) = self.parse_component(token) {
                        children.push(Block::Component(component));
                    }
                }
                TokenKind::Eof => {}
            }
            self.pos += 1;
        }

        (Document { children }, self.diagnostics)
    }

    /// Parse `Name key="v" key='v' key=v`.
    ///
    /// Segments that are not `key=value` are dropped without a diagnostic.
    fn parse_component(&mut self, token: &Token<'_>) -> Option<Component> {
        let content = token.value.trim();
        if content.is_empty() {
            self.diagnostics
                .push(Diagnostic::error("Empty component reference").at(token.position));
            return None;
        }

        let mut parts = content.split_whitespace();
        let name = parts.next()?;

        let mut props = Props::new();
        for part in parts {
            let Some(caps) = PROP_RE.captures(part) else {
                continue;
            };
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            props.insert(caps[1].to_string(), value.into());
        }

        Some(Component::new(name, Some(props), token.position))
    }
}

/// Build a document from tokens.
pub fn build(tokens: &[Token<'_>]) -> (Document, Vec<Diagnostic>) {
    AstBuilder::new(tokens).build()
}

/// Split a text token into headings and paragraphs, line by line.
fn parse_markdown(token: &Token<'_>) -> Vec<Block> {
    let mut blocks = Vec::new();
    let lines: Vec<&str> = token.value.split('\n').collect();
    let last = lines.len() - 1;

    let mut paragraph: Vec<Inline> = Vec::new();
    let mut paragraph_start = token.position;

    for (index, line) in lines.iter().enumerate() {
        let position = line_position(token.position, index);
        let trimmed = line.trim();

        if trimmed.is_empty() {
            flush_paragraph(&mut blocks, &mut paragraph, paragraph_start);
            continue;
        }

        if let Some(caps) = HEADING_RE.captures(trimmed) {
            flush_paragraph(&mut blocks, &mut paragraph, paragraph_start);
            blocks.push(Block::Heading(Heading {
                level: caps[1].len() as u8,
                children: vec![Inline::Text(Text::new(&caps[2], position))],
                position,
            }));
            continue;
        }

        if paragraph.is_empty() {
            paragraph_start = position;
        }

        let value = if index < last {
            format!("{line}\n")
        } else {
            (*line).to_string()
        };
        paragraph.push(Inline::Text(Text::new(value, position)));
    }

    flush_paragraph(&mut blocks, &mut paragraph, paragraph_start);
    blocks
}

fn flush_paragraph(blocks: &mut Vec<Block>, paragraph: &mut Vec<Inline>, start: Position) {
    if !paragraph.is_empty() {
        blocks.push(Block::Paragraph(Paragraph {
            children: std::mem::take(paragraph),
            position: start,
        }));
    }
}

/// Position of the `offset`-th line inside a token. Only the first line
/// can start mid-line.
fn line_position(start: Position, offset: usize) -> Position {
    if offset == 0 {
        start
    } else {
        Position::new(start.line + offset, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::PropValue;
    use crate::tokenizer::tokenize;
    use pretty_assertions::assert_eq;

    fn build_body(body: &str) -> (Document, Vec<Diagnostic>) {
        build(&tokenize(body))
    }

    fn text(value: &str, line: usize) -> Inline {
        Inline::Text(Text::new(value, Position::new(line, 1)))
    }

    #[test]
    fn heading_then_paragraph() {
        let (doc, diagnostics) = build_body("# Title\n\nSome text");

        assert!(diagnostics.is_empty());
        assert_eq!(
            doc.children,
            vec![
                Block::Heading(Heading {
                    level: 1,
                    children: vec![text("Title", 1)],
                    position: Position::new(1, 1),
                }),
                Block::Paragraph(Paragraph {
                    children: vec![text("Some text", 3)],
                    position: Position::new(3, 1),
                }),
            ]
        );
    }

    #[test]
    fn multi_line_paragraph_keeps_newlines() {
        let (doc, _) = build_body("first line\nsecond line\n\nnext");

        let Block::Paragraph(paragraph) = &doc.children[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(
            paragraph.children,
            vec![text("first line\n", 1), text("second line\n", 2)]
        );
        assert_eq!(doc.children.len(), 2);
    }

    #[test]
    fn heading_levels() {
        let (doc, _) = build_body("###### Six\n####### Seven");

        let Block::Heading(heading) = &doc.children[0] else {
            panic!("expected heading");
        };
        assert_eq!(heading.level, 6);

        // Seven hashes is not a heading.
        assert!(matches!(doc.children[1], Block::Paragraph(_)));
    }

    #[test]
    fn heading_flushes_open_paragraph() {
        let (doc, _) = build_body("intro\n## Section\nbody");

        assert_eq!(doc.children.len(), 3);
        assert!(matches!(doc.children[0], Block::Paragraph(_)));
        let Block::Heading(heading) = &doc.children[1] else {
            panic!("expected heading");
        };
        assert_eq!(heading.level, 2);
        assert_eq!(heading.position.line, 2);
        assert!(matches!(doc.children[2], Block::Paragraph(_)));
    }

    #[test]
    fn parses_component_props() {
        let (doc, _) =
            build_body(r#"[% Select name="color" label='Favourite' size=3 broken flag=" /%]"#);

        let Block::Component(component) = &doc.children[0] else {
            panic!("expected component");
        };
        assert_eq!(component.name, "Select");
        assert_eq!(component.position, Position::new(1, 1));

        let props = component.props.as_ref().unwrap();
        assert_eq!(props.len(), 4);
        assert_eq!(props["name"], PropValue::from("color"));
        assert_eq!(props["label"], PropValue::from("Favourite"));
        assert_eq!(props["size"], PropValue::from("3"));
        assert_eq!(props["flag"], PropValue::from("\""));
    }

    #[test]
    fn empty_quoted_prop_is_empty_string() {
        let (doc, _) = build_body(r#"[% TextInput placeholder="" /%]"#);

        let Block::Component(component) = &doc.children[0] else {
            panic!("expected component");
        };
        assert_eq!(component.prop("placeholder"), Some(&PropValue::from("")));
    }

    #[test]
    fn component_without_props_has_none() {
        let (doc, _) = build_body("[% Divider stray /%]");

        let Block::Component(component) = &doc.children[0] else {
            panic!("expected component");
        };
        assert_eq!(component.name, "Divider");
        assert!(component.props.is_none());
    }

    #[test]
    fn empty_component_reports_error() {
        let (doc, diagnostics) = build_body("[%   /%]");

        assert!(doc.children.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].is_error());
        assert!(diagnostics[0].message.contains("Empty component reference"));
        assert_eq!(diagnostics[0].line, Some(1));
        assert_eq!(diagnostics[0].column, Some(1));
    }

    #[test]
    fn text_after_component_keeps_column() {
        let (doc, _) = build_body("[% A /%] trailing\nmore");

        let Block::Paragraph(paragraph) = &doc.children[1] else {
            panic!("expected paragraph");
        };
        assert_eq!(paragraph.position, Position::new(1, 9));
        assert_eq!(
            paragraph.children,
            vec![
                Inline::Text(Text::new(" trailing\n", Position::new(1, 9))),
                text("more", 2),
            ]
        );
    }

    #[test]
    fn top_level_never_holds_bare_text() {
        let (doc, _) = build_body("a [% X /%] b\n\n# H\n[% Y k=v /%]\n");

        for block in &doc.children {
            assert!(matches!(
                block,
                Block::Heading(_) | Block::Paragraph(_) | Block::Component(_)
            ));
        }
        assert_eq!(doc.components().count(), 2);
    }
}
