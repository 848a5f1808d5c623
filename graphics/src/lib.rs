//! # Orrery Graphics
//!
//! Context-resident meshes and hierarchical scene rendering.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`GraphicsContext`] - Narrow GL-like trait for buffer, attribute and draw calls
//! - [`MeshBuffer`] - Named vertex buffers plus an index buffer, with upload,
//!   draw and dispose
//! - [`SceneGraphRenderer`] - Recursive transform composition over a tree of
//!   orbiting bodies
//! - [`ShaderUniforms`] - Where the renderer writes its `MVP` and `tint` matrices
//! - Multiple context support: Dummy (for testing) and wgpu (`wgpu-backend`)
//!
//! ## Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use glam::Mat4;
//! use orrery_core::mesh::generators::generate_sphere;
//! use orrery_core::mesh::UsageHint;
//! use orrery_core::scene::SceneNodeDescriptor;
//! use orrery_graphics::{DummyContext, MeshBuffer, MeshDrawSink, SceneGraphRenderer, ShaderUniforms};
//!
//! struct NoUniforms;
//! impl ShaderUniforms for NoUniforms {
//!     fn set_matrix4(&mut self, _name: &str, _matrix: &Mat4) {}
//! }
//!
//! let context = Rc::new(RefCell::new(DummyContext::new()));
//! let mut sphere = MeshBuffer::from_geometry(context.clone(), &generate_sphere(32, 16, 1.0), UsageHint::Static)?;
//!
//! let system = SceneNodeDescriptor::new()
//!     .with_distance_from_parent(10.0)
//!     .with_child(SceneNodeDescriptor::new().with_scale(0.3));
//!
//! let mut sink = MeshDrawSink::new(&sphere, NoUniforms);
//! let stats = SceneGraphRenderer::new().render(&Mat4::IDENTITY, &system, 0.0, &mut sink)?;
//! assert_eq!(stats.nodes_drawn, 2);
//! assert_eq!(context.borrow().draws().len(), 2);
//!
//! sphere.dispose()?;
//! # Ok::<(), orrery_graphics::MeshError>(())
//! ```

pub mod context;
pub mod error;
pub mod mesh;
pub mod scene;
pub mod shader;

// Re-export main types for convenience
pub use context::{BufferHandle, BufferTarget, ContextCall, DrawRecord, DummyContext, GraphicsContext};
pub use error::{ContextError, MeshError};
pub use mesh::MeshBuffer;
pub use scene::{DrawSink, MeshDrawSink, RenderStats, SceneGraphRenderer};
pub use shader::{MVP_UNIFORM, ShaderUniforms, TINT_UNIFORM};

#[cfg(feature = "wgpu-backend")]
pub use context::WgpuContext;

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the graphics crate version.
pub fn init() {
    log::info!("Orrery Graphics v{} initialized", VERSION);
}

static_assertions::assert_impl_all!(MeshError: Send, Sync, std::error::Error);
static_assertions::assert_not_impl_any!(MeshBuffer<DummyContext>: Send, Sync);
