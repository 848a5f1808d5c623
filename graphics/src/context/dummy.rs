//! Dummy graphics context for testing and headless runs.
//!
//! This context doesn't talk to a GPU. It keeps buffer contents in memory,
//! tracks binding state the way a GL-style API would, and records every call
//! so tests can assert on exactly what a mesh did.

use std::collections::{BTreeMap, HashMap};

use orrery_core::mesh::{IndexFormat, PrimitiveTopology, UsageHint, VertexAttributeLayout};

use crate::error::ContextError;

use super::{BufferHandle, BufferTarget, GraphicsContext};

/// One recorded call made against a [`DummyContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextCall {
    CreateBuffer {
        buffer: BufferHandle,
        label: String,
    },
    DeleteBuffer {
        buffer: BufferHandle,
    },
    BindBuffer {
        target: BufferTarget,
        buffer: BufferHandle,
    },
    UploadBufferData {
        buffer: BufferHandle,
        byte_length: usize,
        usage: UsageHint,
    },
    SetVertexAttribute {
        slot: u32,
        buffer: BufferHandle,
    },
    DrawIndexed {
        topology: PrimitiveTopology,
        index_count: u32,
        index_format: IndexFormat,
    },
}

/// Snapshot of the state an indexed draw read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRecord {
    pub topology: PrimitiveTopology,
    pub index_count: u32,
    pub index_format: IndexFormat,
    /// Buffer bound to the index target at draw time.
    pub index_buffer: BufferHandle,
    /// Enabled attributes as `(slot, buffer)`, ordered by slot.
    pub attributes: Vec<(u32, BufferHandle)>,
}

#[derive(Debug)]
struct DummyBuffer {
    label: String,
    data: Vec<u8>,
    usage: UsageHint,
}

/// In-memory graphics context.
#[derive(Debug, Default)]
pub struct DummyContext {
    buffers: HashMap<BufferHandle, DummyBuffer>,
    next_id: u64,
    bound_vertex: Option<BufferHandle>,
    bound_index: Option<BufferHandle>,
    enabled_attributes: BTreeMap<u32, (BufferHandle, VertexAttributeLayout)>,
    calls: Vec<ContextCall>,
    draws: Vec<DrawRecord>,
}

impl DummyContext {
    /// Create a new dummy context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> &[ContextCall] {
        &self.calls
    }

    /// Every draw made so far, in order.
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// The most recent draw.
    pub fn last_draw(&self) -> Option<&DrawRecord> {
        self.draws.last()
    }

    /// Forget recorded calls and draws. Buffers and bindings are kept.
    pub fn clear_log(&mut self) {
        self.calls.clear();
        self.draws.clear();
    }

    /// Number of live buffers.
    pub fn live_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Whether the handle names a live buffer.
    pub fn is_live(&self, buffer: BufferHandle) -> bool {
        self.buffers.contains_key(&buffer)
    }

    /// Contents of a live buffer.
    pub fn buffer_data(&self, buffer: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(&buffer).map(|b| b.data.as_slice())
    }

    /// Usage hint of the last upload into a live buffer.
    pub fn buffer_usage(&self, buffer: BufferHandle) -> Option<UsageHint> {
        self.buffers.get(&buffer).map(|b| b.usage)
    }

    /// Label a live buffer was created with.
    pub fn buffer_label(&self, buffer: BufferHandle) -> Option<&str> {
        self.buffers.get(&buffer).map(|b| b.label.as_str())
    }

    /// Layout and source buffer of the attribute enabled at a slot.
    pub fn enabled_attribute(&self, slot: u32) -> Option<(BufferHandle, &VertexAttributeLayout)> {
        self.enabled_attributes
            .get(&slot)
            .map(|(buffer, layout)| (*buffer, layout))
    }

    /// Handles of every delete call recorded so far.
    pub fn deleted_buffers(&self) -> Vec<BufferHandle> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                ContextCall::DeleteBuffer { buffer } => Some(*buffer),
                _ => None,
            })
            .collect()
    }

    fn check_live(&self, buffer: BufferHandle) -> Result<(), ContextError> {
        if self.buffers.contains_key(&buffer) {
            Ok(())
        } else {
            Err(ContextError::UnknownHandle(buffer))
        }
    }
}

impl GraphicsContext for DummyContext {
    fn name(&self) -> &'static str {
        "Dummy Context"
    }

    fn create_buffer(&mut self, label: &str) -> Result<BufferHandle, ContextError> {
        self.next_id += 1;
        let buffer = BufferHandle::from_raw(self.next_id);
        log::trace!("DummyContext: creating buffer {:?} ({})", buffer, label);

        self.buffers.insert(
            buffer,
            DummyBuffer {
                label: label.to_string(),
                data: Vec::new(),
                usage: UsageHint::default(),
            },
        );
        self.calls.push(ContextCall::CreateBuffer {
            buffer,
            label: label.to_string(),
        });
        Ok(buffer)
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) -> Result<(), ContextError> {
        log::trace!("DummyContext: deleting buffer {:?}", buffer);
        if self.buffers.remove(&buffer).is_none() {
            return Err(ContextError::UnknownHandle(buffer));
        }

        if self.bound_vertex == Some(buffer) {
            self.bound_vertex = None;
        }
        if self.bound_index == Some(buffer) {
            self.bound_index = None;
        }
        self.enabled_attributes
            .retain(|_, (source, _)| *source != buffer);

        self.calls.push(ContextCall::DeleteBuffer { buffer });
        Ok(())
    }

    fn bind_buffer(
        &mut self,
        target: BufferTarget,
        buffer: BufferHandle,
    ) -> Result<(), ContextError> {
        log::trace!("DummyContext: binding {:?} to {:?}", buffer, target);
        self.check_live(buffer)?;

        match target {
            BufferTarget::Vertex => self.bound_vertex = Some(buffer),
            BufferTarget::Index => self.bound_index = Some(buffer),
        }
        self.calls.push(ContextCall::BindBuffer { target, buffer });
        Ok(())
    }

    fn upload_buffer_data(
        &mut self,
        buffer: BufferHandle,
        data: &[u8],
        usage: UsageHint,
    ) -> Result<(), ContextError> {
        log::trace!(
            "DummyContext: uploading {} bytes to {:?} ({:?})",
            data.len(),
            buffer,
            usage
        );
        let entry = self
            .buffers
            .get_mut(&buffer)
            .ok_or(ContextError::UnknownHandle(buffer))?;

        entry.data.clear();
        entry.data.extend_from_slice(data);
        entry.usage = usage;

        self.calls.push(ContextCall::UploadBufferData {
            buffer,
            byte_length: data.len(),
            usage,
        });
        Ok(())
    }

    fn set_vertex_attribute(
        &mut self,
        attribute: &VertexAttributeLayout,
    ) -> Result<(), ContextError> {
        let buffer = self
            .bound_vertex
            .ok_or(ContextError::NothingBound(BufferTarget::Vertex))?;
        log::trace!(
            "DummyContext: slot {} reads {:?} (x{} {:?})",
            attribute.slot,
            buffer,
            attribute.component_count,
            attribute.component_type
        );

        self.enabled_attributes
            .insert(attribute.slot, (buffer, attribute.clone()));
        self.calls.push(ContextCall::SetVertexAttribute {
            slot: attribute.slot,
            buffer,
        });
        Ok(())
    }

    fn draw_indexed(
        &mut self,
        topology: PrimitiveTopology,
        index_count: u32,
        index_format: IndexFormat,
    ) -> Result<(), ContextError> {
        let index_buffer = self
            .bound_index
            .ok_or(ContextError::NothingBound(BufferTarget::Index))?;
        log::trace!(
            "DummyContext: draw {} indices ({:?}, {:?})",
            index_count,
            topology,
            index_format
        );

        self.calls.push(ContextCall::DrawIndexed {
            topology,
            index_count,
            index_format,
        });
        self.draws.push(DrawRecord {
            topology,
            index_count,
            index_format,
            index_buffer,
            attributes: self
                .enabled_attributes
                .iter()
                .map(|(slot, (buffer, _))| (*slot, *buffer))
                .collect(),
        });
        Ok(())
    }

    fn buffer_byte_length(&self, buffer: BufferHandle) -> Result<u64, ContextError> {
        self.buffers
            .get(&buffer)
            .map(|b| b.data.len() as u64)
            .ok_or(ContextError::UnknownHandle(buffer))
    }
}
