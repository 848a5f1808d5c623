//! GPU mesh with named vertex buffers and an index buffer.
//!
//! A [`MeshBuffer`] owns one context buffer per distinct buffer name in its
//! [`VertexLayout`] plus one index buffer, all created eagerly at
//! construction.
//!
//! # Multiple Vertex Buffers
//!
//! Attributes name the buffer they read from, so data can be split by
//! update frequency:
//! - **Dynamic positions**: re-uploaded every frame with [`UsageHint::Dynamic`]
//! - **Static colors**: uploaded once
//!
//! # Lifecycle
//!
//! Buffers are filled any number of times, each upload replacing the previous
//! contents. [`MeshBuffer::dispose`] releases every buffer exactly once; the
//! mesh rejects every call afterwards. Dropping an undisposed mesh releases
//! the buffers too, with a warning.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use orrery_core::mesh::{GeometryData, IndexFormat, PrimitiveTopology, UsageHint, VertexLayout};

use crate::context::{BufferHandle, BufferTarget, GraphicsContext};
use crate::error::{ContextError, MeshError};

/// Index data currently held by the index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IndexState {
    count: u32,
    format: IndexFormat,
}

/// One named vertex buffer and whether it has received data yet.
#[derive(Debug, Clone, PartialEq, Eq)]
struct VertexBuffer {
    name: String,
    handle: BufferHandle,
    uploaded: bool,
}

/// A mesh whose vertex and index data live in graphics-context buffers.
///
/// The context is shared through `Rc<RefCell<_>>`, so a mesh stays on the
/// thread that created it.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use orrery_core::mesh::generators::generate_sphere;
/// use orrery_core::mesh::{PrimitiveTopology, UsageHint};
/// use orrery_graphics::{DummyContext, MeshBuffer};
///
/// let context = Rc::new(RefCell::new(DummyContext::new()));
/// let geometry = generate_sphere(16, 8, 1.0);
/// let mut mesh = MeshBuffer::from_geometry(context.clone(), &geometry, UsageHint::Static)?;
///
/// mesh.draw(PrimitiveTopology::TriangleList)?;
/// assert_eq!(mesh.vertex_count()?, 17 * 9);
///
/// mesh.dispose()?;
/// # Ok::<(), orrery_graphics::MeshError>(())
/// ```
pub struct MeshBuffer<C: GraphicsContext> {
    context: Rc<RefCell<C>>,
    layout: Arc<VertexLayout>,
    /// Buffers in order of first appearance in the layout.
    vertex_buffers: Vec<VertexBuffer>,
    index_buffer: BufferHandle,
    indices: Option<IndexState>,
    disposed: bool,
    label: Option<String>,
}

impl<C: GraphicsContext> MeshBuffer<C> {
    /// Create a mesh for a layout, allocating one empty buffer per distinct
    /// buffer name plus the index buffer.
    pub fn new(context: Rc<RefCell<C>>, layout: Arc<VertexLayout>) -> Result<Self, MeshError> {
        layout.validate().map_err(MeshError::InvalidLayout)?;

        let (vertex_buffers, index_buffer) = {
            let mut ctx = context.borrow_mut();
            let mut vertex_buffers = Vec::new();
            for name in layout.buffer_names() {
                let handle = ctx.create_buffer(name)?;
                vertex_buffers.push(VertexBuffer {
                    name: name.to_string(),
                    handle,
                    uploaded: false,
                });
            }
            let index_buffer = ctx.create_buffer("indices")?;
            (vertex_buffers, index_buffer)
        };

        log::debug!(
            "MeshBuffer: created {} vertex buffers + index buffer for layout {:?}",
            vertex_buffers.len(),
            layout.label
        );

        Ok(Self {
            context,
            layout,
            vertex_buffers,
            index_buffer,
            indices: None,
            disposed: false,
            label: None,
        })
    }

    /// Create a position/color mesh and upload generated geometry into it.
    ///
    /// Uses [`VertexLayout::position_color`]; positions, colors and u32
    /// indices are uploaded with the same usage hint.
    pub fn from_geometry(
        context: Rc<RefCell<C>>,
        geometry: &GeometryData,
        usage: UsageHint,
    ) -> Result<Self, MeshError> {
        let mut mesh = Self::new(context, VertexLayout::position_color())?;
        if let Some(label) = geometry.label() {
            mesh.label = Some(label.to_string());
        }

        mesh.upload_vertex_data(VertexLayout::POSITIONS, geometry.position_bytes(), usage)?;
        mesh.upload_vertex_data(VertexLayout::COLORS, geometry.color_bytes(), usage)?;
        mesh.upload_indices(&geometry.indices, usage)?;
        Ok(mesh)
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the debug label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Handle of the named vertex buffer.
    pub fn vertex_buffer(&self, name: &str) -> Option<BufferHandle> {
        self.vertex_buffers
            .iter()
            .find(|buffer| buffer.name == name)
            .map(|buffer| buffer.handle)
    }

    /// Whether the named vertex buffer has received any data.
    pub fn is_uploaded(&self, name: &str) -> bool {
        self.vertex_buffers
            .iter()
            .any(|buffer| buffer.name == name && buffer.uploaded)
    }

    /// Handle of the index buffer.
    pub fn index_buffer(&self) -> BufferHandle {
        self.index_buffer
    }

    /// Number of indices uploaded by the last index upload.
    pub fn index_count(&self) -> u32 {
        self.indices.map_or(0, |state| state.count)
    }

    /// Element width of the last index upload.
    pub fn index_format(&self) -> Option<IndexFormat> {
        self.indices.map(|state| state.format)
    }

    /// Whether index data and every declared vertex buffer have been
    /// uploaded, so the mesh can be drawn.
    pub fn is_ready(&self) -> bool {
        !self.disposed
            && self.indices.is_some()
            && self.vertex_buffers.iter().all(|buffer| buffer.uploaded)
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Replace the contents of a named vertex buffer.
    pub fn upload_vertex_data(
        &mut self,
        name: &str,
        bytes: &[u8],
        usage: UsageHint,
    ) -> Result<(), MeshError> {
        self.check_alive()?;
        let buffer = self
            .vertex_buffers
            .iter_mut()
            .find(|buffer| buffer.name == name)
            .ok_or_else(|| MeshError::UnknownBuffer {
                name: name.to_string(),
            })?;

        let mut ctx = self.context.borrow_mut();
        ctx.bind_buffer(BufferTarget::Vertex, buffer.handle)?;
        ctx.upload_buffer_data(buffer.handle, bytes, usage)?;
        buffer.uploaded = true;
        Ok(())
    }

    /// Replace the index data with 32-bit indices.
    pub fn upload_indices(&mut self, indices: &[u32], usage: UsageHint) -> Result<(), MeshError> {
        self.upload_index_bytes(
            bytemuck::cast_slice(indices),
            indices.len(),
            IndexFormat::Uint32,
            usage,
        )
    }

    /// Replace the index data with 16-bit indices.
    pub fn upload_indices_u16(
        &mut self,
        indices: &[u16],
        usage: UsageHint,
    ) -> Result<(), MeshError> {
        self.upload_index_bytes(
            bytemuck::cast_slice(indices),
            indices.len(),
            IndexFormat::Uint16,
            usage,
        )
    }

    fn upload_index_bytes(
        &mut self,
        bytes: &[u8],
        count: usize,
        format: IndexFormat,
        usage: UsageHint,
    ) -> Result<(), MeshError> {
        self.check_alive()?;
        let count = u32::try_from(count).map_err(|_| {
            ContextError::Unsupported(format!("{count} indices exceed u32 range"))
        })?;

        {
            let mut ctx = self.context.borrow_mut();
            ctx.bind_buffer(BufferTarget::Index, self.index_buffer)?;
            ctx.upload_buffer_data(self.index_buffer, bytes, usage)?;
        }
        self.indices = Some(IndexState { count, format });
        Ok(())
    }

    /// Bind every attribute of the layout to its buffer and issue an indexed
    /// draw of the last uploaded indices.
    ///
    /// Fails with [`MeshError::NotReady`] before the first index upload and
    /// with [`MeshError::MissingVertexData`] while any declared vertex buffer
    /// is still empty. Nothing is bound in either case.
    pub fn draw(&self, topology: PrimitiveTopology) -> Result<(), MeshError> {
        self.check_alive()?;
        let indices = self.indices.ok_or(MeshError::NotReady)?;
        if let Some(empty) = self.vertex_buffers.iter().find(|buffer| !buffer.uploaded) {
            return Err(MeshError::MissingVertexData {
                name: empty.name.clone(),
            });
        }

        let mut ctx = self.context.borrow_mut();
        for attribute in &self.layout.attributes {
            let handle = self.vertex_buffer(&attribute.buffer_name).ok_or_else(|| {
                MeshError::UnknownBuffer {
                    name: attribute.buffer_name.clone(),
                }
            })?;
            ctx.bind_buffer(BufferTarget::Vertex, handle)?;
            ctx.set_vertex_attribute(attribute)?;
        }

        ctx.bind_buffer(BufferTarget::Index, self.index_buffer)?;
        ctx.draw_indexed(topology, indices.count, indices.format)?;
        Ok(())
    }

    /// Number of whole elements in the first attribute's buffer.
    ///
    /// Uses the attribute's stride, falling back to the packed element size.
    /// Returns 0 for a layout without attributes.
    pub fn vertex_count(&self) -> Result<u64, MeshError> {
        self.check_alive()?;
        let Some(first) = self.layout.attributes.first() else {
            return Ok(0);
        };
        let handle = self
            .vertex_buffer(&first.buffer_name)
            .ok_or_else(|| MeshError::UnknownBuffer {
                name: first.buffer_name.clone(),
            })?;

        let stride = u64::from(first.effective_stride());
        if stride == 0 {
            return Ok(0);
        }
        let byte_length = self.context.borrow().buffer_byte_length(handle)?;
        Ok(byte_length / stride)
    }

    /// Release every owned buffer. The mesh is unusable afterwards.
    ///
    /// Every buffer gets a delete attempt even if an earlier one fails; the
    /// first failure is returned.
    pub fn dispose(&mut self) -> Result<(), MeshError> {
        self.check_alive()?;
        self.disposed = true;
        self.indices = None;

        let mut ctx = self.context.borrow_mut();
        let mut first_error = None;
        let handles = self
            .vertex_buffers
            .iter()
            .map(|buffer| buffer.handle)
            .chain(std::iter::once(self.index_buffer));
        for handle in handles {
            if let Err(e) = ctx.delete_buffer(handle) {
                log::warn!("MeshBuffer: failed to release {:?}: {}", handle, e);
                first_error.get_or_insert(e);
            }
        }

        log::debug!("MeshBuffer: disposed {:?}", self.label);
        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn check_alive(&self) -> Result<(), MeshError> {
        if self.disposed {
            Err(MeshError::Disposed)
        } else {
            Ok(())
        }
    }
}

impl<C: GraphicsContext> Drop for MeshBuffer<C> {
    fn drop(&mut self) {
        if self.disposed {
            return;
        }
        log::warn!(
            "MeshBuffer {:?} dropped without dispose, releasing its buffers",
            self.label
        );

        let Ok(mut ctx) = self.context.try_borrow_mut() else {
            log::warn!("MeshBuffer: context busy during drop, buffers leaked");
            return;
        };
        for buffer in &self.vertex_buffers {
            if let Err(e) = ctx.delete_buffer(buffer.handle) {
                log::warn!("MeshBuffer: failed to release {:?}: {}", buffer.handle, e);
            }
        }
        if let Err(e) = ctx.delete_buffer(self.index_buffer) {
            log::warn!("MeshBuffer: failed to release {:?}: {}", self.index_buffer, e);
        }
    }
}

impl<C: GraphicsContext> std::fmt::Debug for MeshBuffer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshBuffer")
            .field("label", &self.label)
            .field("vertex_buffers", &self.vertex_buffers)
            .field("index_buffer", &self.index_buffer)
            .field("indices", &self.indices)
            .field("disposed", &self.disposed)
            .finish()
    }
}
