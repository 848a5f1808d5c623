//! Solar-system catalog loading.
//!
//! A catalog is a TOML file holding one `[[system]]` table per selectable
//! tree of bodies:
//!
//! ```toml
//! [[system]]
//! name = "sun-earth-moon"
//!
//! [system.root]
//! name = "sun"
//! scale = 10.0
//! distance_from_parent = 40.0
//!
//! [[system.root.children]]
//! name = "earth"
//! scale = 3.0
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use orrery_core::scene::SceneNodeDescriptor;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const BUILTIN_ORIGIN: &str = "<builtin solar-systems.toml>";
const BUILTIN_CATALOG: &str = include_str!("../data/solar-systems.toml");

/// One selectable system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSystem {
    /// Name used to select the system.
    pub name: String,
    /// Root body of the tree.
    pub root: SceneNodeDescriptor,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    system: Vec<NamedSystem>,
}

/// Ordered, non-empty set of uniquely named systems.
///
/// The first system is the default selection.
#[derive(Debug, Clone)]
pub struct SystemCatalog {
    systems: Vec<NamedSystem>,
}

impl SystemCatalog {
    /// Build a catalog from already-parsed systems.
    pub fn new(systems: Vec<NamedSystem>, origin: &Path) -> Result<Self, ConfigError> {
        if systems.is_empty() {
            return Err(ConfigError::Empty {
                path: origin.to_path_buf(),
            });
        }

        let mut seen = HashSet::new();
        for system in &systems {
            if !seen.insert(system.name.as_str()) {
                return Err(ConfigError::DuplicateSystem {
                    name: system.name.clone(),
                });
            }
        }

        Ok(Self { systems })
    }

    /// Parse a catalog from TOML text. `origin` only shows up in errors.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let file: CatalogFile = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        Self::new(file.system, origin)
    }

    /// Read and parse a catalog file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&content, path)?;
        log::info!(
            "Loaded {} solar system(s) from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// The catalog shipped with the demos.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml_str(BUILTIN_CATALOG, &PathBuf::from(BUILTIN_ORIGIN))
    }

    /// System names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|system| system.name.as_str())
    }

    /// Look up a system by name.
    pub fn get(&self, name: &str) -> Option<&NamedSystem> {
        self.systems.iter().find(|system| system.name == name)
    }

    /// Position of the named system.
    pub fn index_of(&self, name: &str) -> Result<usize, ConfigError> {
        self.systems
            .iter()
            .position(|system| system.name == name)
            .ok_or_else(|| ConfigError::UnknownSystem {
                name: name.to_string(),
            })
    }

    /// System at `index`, if any.
    pub fn system(&self, index: usize) -> Option<&NamedSystem> {
        self.systems.get(index)
    }

    /// The first declared system.
    pub fn default_system(&self) -> &NamedSystem {
        &self.systems[0]
    }

    /// Number of systems.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}
