//! Scene descriptions for hierarchical trees of orbiting bodies.
//!
//! - [`SceneNodeDescriptor`] - One body: scale, orbit, spin, tint and children
//!
//! Descriptors are plain data. They can be built programmatically or
//! deserialized with `serde` from a configuration file.

mod types;

pub use types::{IDENTITY_TINT, SceneNodeDescriptor};
