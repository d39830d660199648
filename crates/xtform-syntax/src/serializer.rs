//! Rendering a document tree back to `.xtform` text.
//!
//! Body output is a best-effort reconstruction. Whitespace details such as
//! the number of blank lines between blocks are not preserved.

use crate::ast::{Block, Component, Document, Inline, NodeRef, PropValue, XtformAst};
use crate::frontmatter::{serialize_data, serialize_metadata};
use crate::scalar::format_number;

/// Render a whole document: metadata block, body, then data block.
pub fn serialize(ast: &XtformAst) -> String {
    let mut out = serialize_metadata(&ast.metadata);

    let body = serialize_body(&ast.body);
    if !body.is_empty() {
        out.push_str(&body);
        out.push('\n');
    }

    let data = serialize_data(&ast.data);
    if !data.is_empty() {
        if !body.is_empty() {
            out.push('\n');
        }
        out.push_str(&data);
    }

    out
}

/// Render any node as body text.
pub fn serialize_body<'a>(node: impl Into<NodeRef<'a>>) -> String {
    let mut out = String::new();
    write_node(&mut out, node.into());
    out
}

fn write_node(out: &mut String, node: NodeRef<'_>) {
    match node {
        NodeRef::Document(document) => write_document(out, document),
        NodeRef::Heading(heading) => {
            out.push_str(&"#".repeat(usize::from(heading.level)));
            out.push(' ');
            write_inlines(out, &heading.children);
        }
        NodeRef::Paragraph(paragraph) => write_inlines(out, &paragraph.children),
        NodeRef::Text(text) => out.push_str(&text.value),
        NodeRef::Component(component) => write_component(out, component),
    }
}

fn write_document(out: &mut String, document: &Document) {
    for (index, block) in document.children.iter().enumerate() {
        if index > 0 {
            out.push_str("\n\n");
        }
        write_node(out, NodeRef::from(block));
    }
}

fn write_inlines(out: &mut String, children: &[Inline]) {
    for child in children {
        write_node(out, NodeRef::from(child));
    }
}

fn write_component(out: &mut String, component: &Component) {
    out.push_str("[% ");
    out.push_str(&component.name);

    for (key, value) in component.props.iter().flatten() {
        match value {
            PropValue::String(s) => out.push_str(&format!(" {key}=\"{s}\"")),
            PropValue::Number(n) => out.push_str(&format!(" {key}={{{}}}", format_number(*n))),
            PropValue::Boolean(true) => out.push_str(&format!(" {key}")),
            PropValue::Boolean(false) => {}
        }
    }

    out.push_str(" /%]");
}

impl Block {
    /// Body text of this block.
    pub fn to_source(&self) -> String {
        serialize_body(self)
    }
}
