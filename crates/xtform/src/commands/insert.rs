//! Insert command.

use std::path::Path;

use anyhow::{Context, Result};
use xtform_registry::RegistryLoader;
use xtform_syntax::insert_component;

use super::{read_document, write_document};

/// Run the insert command.
pub async fn run(file: &Path, component_id: &str, registry_root: &Path) -> Result<()> {
    let loaded = RegistryLoader::new(registry_root)
        .load()
        .context("Failed to load component registry")?;

    let manifest = loaded
        .registry
        .get(component_id)
        .with_context(|| format!("Unknown component: {component_id}"))?;

    let source = read_document(file).await?;
    write_document(file, &insert_component(&source, &manifest.template)).await?;

    tracing::info!("Inserted {} into {}", manifest.label, file.display());
    Ok(())
}
