//! Demo error types.

use std::path::PathBuf;

use orrery_graphics::MeshError;
use thiserror::Error;

/// Errors raised while loading a solar-system catalog.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid catalog.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// The file parsed but declares no systems.
    #[error("{} declares no systems", path.display())]
    Empty { path: PathBuf },
    /// Two systems share a name.
    #[error("system `{name}` is declared more than once")]
    DuplicateSystem { name: String },
    /// A requested system is not in the catalog.
    #[error("no system named `{name}`")]
    UnknownSystem { name: String },
}

/// Errors raised by a running scene.
#[derive(Debug, Error)]
pub enum DemoError {
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A scene was drawn before `start` or after `end`.
    #[error("scene `{0}` is not running")]
    NotStarted(String),
}
