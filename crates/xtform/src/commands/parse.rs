//! Parse command.

use std::path::Path;

use anyhow::Result;
use xtform_syntax::{parse, Block, Inline, PropValue};

use super::{read_document, report};

/// Run the parse command.
pub async fn run(file: &Path, json: bool) -> Result<()> {
    let source = read_document(file).await?;
    let result = parse(&source);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    for (key, value) in &result.ast.metadata {
        println!("{key}: {value}");
    }
    if !result.ast.metadata.is_empty() {
        println!();
    }

    for block in &result.ast.body.children {
        println!("{}", describe(block));
    }

    if !result.ast.data.is_empty() {
        println!();
        for (key, value) in &result.ast.data {
            println!("  {key} = {value}");
        }
    }

    report(file, &result.diagnostics);
    Ok(())
}

/// One-line outline of a block.
fn describe(block: &Block) -> String {
    match block {
        Block::Heading(heading) => format!(
            "{:>4}  Heading h{} {:?}",
            heading.position.line,
            heading.level,
            inline_text(&heading.children)
        ),
        Block::Paragraph(paragraph) => format!(
            "{:>4}  Paragraph {:?}",
            paragraph.position.line,
            inline_text(&paragraph.children)
        ),
        Block::Component(component) => {
            let props: Vec<String> = component
                .props
                .iter()
                .flatten()
                .map(|(key, value)| match value {
                    PropValue::String(s) => format!("{key}={s:?}"),
                    PropValue::Number(n) => format!("{key}={n}"),
                    PropValue::Boolean(b) => format!("{key}={b}"),
                })
                .collect();
            format!(
                "{:>4}  Component {} {}",
                component.position.line,
                component.name,
                props.join(" ")
            )
        }
    }
}

fn inline_text(children: &[Inline]) -> String {
    children
        .iter()
        .map(|child| match child {
            Inline::Text(text) => text.value.trim_end().to_string(),
            Inline::Component(component) => format!("[{}]", component.name),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
