//! CPU-side mesh types and generators.
//!
//! This module provides GPU-agnostic mesh data structures:
//!
//! - [`VertexLayout`] - Ordered set of attribute layouts, each naming the buffer it reads
//! - [`GeometryData`] - Flat position/color/index arrays ready for upload
//! - Generators for common shapes (plane, cubes, UV sphere, parsed surfaces)
//!
//! These types are re-exported by `orrery-graphics` for convenience.

mod data;
pub mod generators;
mod layout;

pub use data::{GeometryData, IndexFormat, PrimitiveTopology, UsageHint};
pub use layout::{ComponentType, VertexAttributeLayout, VertexLayout};
