//! Component palette registry for xtform documents.
//!
//! Loads `components/registry.yml` and the component manifests it lists, so
//! hosts can offer a palette of insertable component templates. Documents are
//! never validated against the registry.

pub mod manifest;
pub mod registry;

pub use manifest::{parse_manifest, ComponentManifest, ManifestError};
pub use registry::{
    ComponentRegistry, LoadedRegistry, PaletteTab, RegistryError, RegistryIssue, RegistryLoader,
};
