//! Palette command.

use std::path::Path;

use anyhow::{Context, Result};
use xtform_registry::RegistryLoader;

/// Run the palette command.
pub fn run(registry_root: &Path, json: bool) -> Result<()> {
    let loaded = RegistryLoader::new(registry_root)
        .load()
        .context("Failed to load component registry")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&loaded.registry)?);
        return Ok(());
    }

    for tab in &loaded.registry.tabs {
        match &tab.description {
            Some(description) => println!("{} - {}", tab.name, description),
            None => println!("{}", tab.name),
        }
        for component in &tab.components {
            let icon = component.icon.as_deref().unwrap_or(" ");
            println!("  {icon} {:<20} {}", component.id, component.label);
        }
    }

    Ok(())
}
