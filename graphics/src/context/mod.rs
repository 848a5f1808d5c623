//! Graphics context abstraction.
//!
//! A [`GraphicsContext`] is the narrow, GL-like surface a
//! [`MeshBuffer`](crate::mesh::MeshBuffer) talks to: buffers are created,
//! filled and bound by handle, vertex attributes read from whatever buffer is
//! bound to the vertex target, and indexed draws read from the buffer bound
//! to the index target.
//!
//! # Available Contexts
//!
//! - [`DummyContext`]: In-memory context that records every call, for tests
//!   and headless runs
//! - `WgpuContext` (feature `wgpu-backend`): Buffers live on a `wgpu::Device`;
//!   draws are recorded and replayed into a caller-owned render pass

pub mod dummy;

#[cfg(feature = "wgpu-backend")]
pub mod wgpu_context;

pub use dummy::{ContextCall, DrawRecord, DummyContext};

#[cfg(feature = "wgpu-backend")]
pub use wgpu_context::WgpuContext;

use orrery_core::mesh::{IndexFormat, PrimitiveTopology, UsageHint, VertexAttributeLayout};

use crate::error::ContextError;

/// Opaque handle to a buffer owned by a graphics context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(u64);

impl BufferHandle {
    /// Wrap a raw context-specific id.
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Binding point a buffer is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Source of vertex attribute data.
    Vertex,
    /// Source of indices for indexed draws.
    Index,
}

/// Operations a mesh needs from the underlying graphics API.
///
/// All calls happen on one thread; implementations are not required to be
/// `Send`.
pub trait GraphicsContext {
    /// Get the context name.
    fn name(&self) -> &'static str;

    /// Create an empty buffer.
    fn create_buffer(&mut self, label: &str) -> Result<BufferHandle, ContextError>;

    /// Delete a buffer. The handle must not be used afterwards.
    fn delete_buffer(&mut self, buffer: BufferHandle) -> Result<(), ContextError>;

    /// Bind a buffer to a target, replacing the previous binding.
    fn bind_buffer(&mut self, target: BufferTarget, buffer: BufferHandle)
    -> Result<(), ContextError>;

    /// Replace a buffer's contents, reallocating if the size changes.
    fn upload_buffer_data(
        &mut self,
        buffer: BufferHandle,
        data: &[u8],
        usage: UsageHint,
    ) -> Result<(), ContextError>;

    /// Enable the attribute's slot and point it at the buffer currently
    /// bound to [`BufferTarget::Vertex`].
    fn set_vertex_attribute(&mut self, attribute: &VertexAttributeLayout)
    -> Result<(), ContextError>;

    /// Draw `index_count` indices from the buffer bound to
    /// [`BufferTarget::Index`] using the enabled attributes.
    fn draw_indexed(
        &mut self,
        topology: PrimitiveTopology,
        index_count: u32,
        index_format: IndexFormat,
    ) -> Result<(), ContextError>;

    /// Current size of a buffer in bytes.
    fn buffer_byte_length(&self, buffer: BufferHandle) -> Result<u64, ContextError>;
}
