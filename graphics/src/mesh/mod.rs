//! Mesh types for the graphics layer.
//!
//! - [`MeshBuffer`] - Context-resident vertex buffers plus an index buffer
//!
//! CPU-side layouts and geometry come from `orrery-core` and are re-exported
//! here so callers need a single import path.

mod buffer;

pub use buffer::MeshBuffer;

pub use orrery_core::mesh::{
    ComponentType, GeometryData, IndexFormat, PrimitiveTopology, UsageHint, VertexAttributeLayout,
    VertexLayout, generators,
};
