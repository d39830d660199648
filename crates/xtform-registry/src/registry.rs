//! Loading the component palette from a workspace.
//!
//! The registry file lives at `components/registry.yml`:
//!
//! ```yaml
//! palette:
//!   - tab: Inputs
//!     description: Basic input fields
//!     components:
//!       - inputs/text-input.xtcomp
//! ```
//!
//! Component paths are relative to the `components` directory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use xtform_syntax::Severity;

use crate::manifest::{parse_manifest, ComponentManifest};

const COMPONENTS_DIR: &str = "components";
const REGISTRY_FILE: &str = "registry.yml";

/// Raw `registry.yml` contents.
#[derive(Debug, Deserialize)]
struct RegistryConfig {
    #[serde(default)]
    palette: Vec<PaletteTabConfig>,
}

#[derive(Debug, Deserialize)]
struct PaletteTabConfig {
    tab: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    components: Vec<String>,
}

/// A named group of components in the palette.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteTab {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub components: Vec<ComponentManifest>,
}

/// Loaded palette tabs with lookup by component id.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComponentRegistry {
    pub tabs: Vec<PaletteTab>,

    /// Component id -> (tab index, component index). First definition wins.
    #[serde(skip)]
    by_id: HashMap<String, (usize, usize)>,
}

impl ComponentRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a component by id.
    pub fn get(&self, id: &str) -> Option<&ComponentManifest> {
        let &(tab, index) = self.by_id.get(id)?;
        self.tabs.get(tab)?.components.get(index)
    }

    /// Check if a component id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// All registered component ids, in palette order.
    pub fn ids(&self) -> Vec<&str> {
        self.tabs
            .iter()
            .enumerate()
            .flat_map(|(t, tab)| {
                tab.components
                    .iter()
                    .enumerate()
                    .map(move |(i, component)| ((t, i), component))
            })
            .filter(|(slot, component)| self.by_id.get(&component.id) == Some(slot))
            .map(|(_, component)| component.id.as_str())
            .collect()
    }

    /// Number of registered (uniquely identified) components.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Add a tab, indexing components whose id is not taken yet.
    ///
    /// Returns the positions within the tab of components whose id was
    /// already registered.
    pub fn push_tab(&mut self, tab: PaletteTab) -> Vec<usize> {
        let tab_index = self.tabs.len();
        let mut duplicates = Vec::new();

        for (index, component) in tab.components.iter().enumerate() {
            if self.by_id.contains_key(&component.id) {
                duplicates.push(index);
            } else {
                self.by_id.insert(component.id.clone(), (tab_index, index));
            }
        }

        self.tabs.push(tab);
        duplicates
    }
}

/// A non-fatal problem found while loading the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryIssue {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub severity: Severity,
}

impl RegistryIssue {
    fn error(message: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            file: Some(file.into()),
            severity: Severity::Error,
        }
    }
}

/// Result of a successful load.
#[derive(Debug, Clone, Default)]
pub struct LoadedRegistry {
    pub registry: ComponentRegistry,
    pub issues: Vec<RegistryIssue>,
}

/// Errors that prevent the registry from loading at all.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Registry file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    InvalidYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Loads `components/registry.yml` and its manifests from a workspace root.
#[derive(Debug, Clone)]
pub struct RegistryLoader {
    components_dir: PathBuf,
}

impl RegistryLoader {
    /// Create a loader for the given workspace root.
    pub fn new(workspace_root: impl AsRef<Path>) -> Self {
        Self {
            components_dir: workspace_root.as_ref().join(COMPONENTS_DIR),
        }
    }

    /// Path of the registry file this loader reads.
    pub fn registry_path(&self) -> PathBuf {
        self.components_dir.join(REGISTRY_FILE)
    }

    /// Load the registry file and every manifest it lists.
    ///
    /// Missing or invalid manifests and duplicate ids are reported as issues;
    /// only a missing or unparsable registry file is an error.
    pub fn load(&self) -> Result<LoadedRegistry, RegistryError> {
        let path = self.registry_path();
        tracing::debug!("Loading component registry from {}", path.display());

        if !path.exists() {
            return Err(RegistryError::NotFound(path));
        }

        let content = fs::read_to_string(&path).map_err(|source| RegistryError::Io {
            path: path.clone(),
            source,
        })?;

        let config: RegistryConfig =
            serde_yaml::from_str(&content).map_err(|source| RegistryError::InvalidYaml {
                path: path.clone(),
                source,
            })?;

        let mut loaded = LoadedRegistry::default();

        for tab_config in config.palette {
            let mut tab = PaletteTab {
                name: tab_config.tab,
                description: tab_config.description,
                components: Vec::new(),
            };

            let mut sources = Vec::new();
            for relative in &tab_config.components {
                if let Some(manifest) = self.load_manifest(relative, &mut loaded.issues) {
                    tab.components.push(manifest);
                    sources.push(relative.as_str());
                }
            }

            tracing::debug!(
                "Tab \"{}\": {} components",
                tab.name,
                tab.components.len()
            );

            let ids: Vec<String> = tab.components.iter().map(|c| c.id.clone()).collect();
            for index in loaded.registry.push_tab(tab) {
                loaded.issues.push(RegistryIssue::error(
                    format!("Duplicate component ID: {}", ids[index]),
                    sources[index],
                ));
            }
        }

        for issue in &loaded.issues {
            tracing::warn!(
                "{}: {}",
                issue.file.as_deref().unwrap_or(REGISTRY_FILE),
                issue.message
            );
        }

        tracing::info!(
            "Loaded {} components in {} tabs",
            loaded.registry.len(),
            loaded.registry.tabs.len()
        );

        Ok(loaded)
    }

    fn load_manifest(
        &self,
        relative: &str,
        issues: &mut Vec<RegistryIssue>,
    ) -> Option<ComponentManifest> {
        let path = self.components_dir.join(relative);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                issues.push(RegistryIssue::error(
                    format!("Component manifest not found: {relative}"),
                    relative,
                ));
                return None;
            }
            Err(e) => {
                issues.push(RegistryIssue::error(
                    format!("Failed to load component: {relative} - {e}"),
                    relative,
                ));
                return None;
            }
        };

        match parse_manifest(&content) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                issues.push(RegistryIssue::error(e.to_string(), relative));
                None
            }
        }
    }
}
