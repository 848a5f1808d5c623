//! # Orrery Core
//!
//! GPU-agnostic building blocks for Orrery:
//!
//! - [`mesh`] - Vertex attribute layouts, flat geometry arrays and the
//!   procedural generators (plane, cubes, UV sphere, parsed surfaces)
//! - [`scene`] - Descriptors for hierarchical trees of orbiting bodies

pub mod mesh;
pub mod scene;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the core crate version.
pub fn init() {
    log::info!("Orrery Core v{} initialized", VERSION);
}
