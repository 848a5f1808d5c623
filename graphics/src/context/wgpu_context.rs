//! wgpu graphics context.
//!
//! Buffers are real `wgpu::Buffer`s on a device. wgpu has no global binding
//! state and no immediate-mode draws, so this context keeps the binding state
//! itself and records each indexed draw together with the buffers it read.
//! The recorded draws are replayed into a render pass the caller owns, with a
//! pipeline the caller built from [`vertex_buffer_layouts`].

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use orrery_core::mesh::{
    ComponentType, IndexFormat, PrimitiveTopology, UsageHint, VertexAttributeLayout, VertexLayout,
};

use crate::error::ContextError;

use super::{BufferHandle, BufferTarget, GraphicsContext};

struct WgpuBuffer {
    label: String,
    buffer: Option<wgpu::Buffer>,
    byte_length: u64,
}

/// A draw recorded for replay.
#[derive(Debug, Clone)]
struct RecordedDraw {
    topology: PrimitiveTopology,
    index_count: u32,
    index_format: IndexFormat,
    index_buffer: BufferHandle,
    vertex_buffers: Vec<(u32, BufferHandle)>,
}

/// Graphics context backed by a wgpu device and queue.
pub struct WgpuContext {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    buffers: HashMap<BufferHandle, WgpuBuffer>,
    next_id: u64,
    bound_vertex: Option<BufferHandle>,
    bound_index: Option<BufferHandle>,
    enabled_attributes: BTreeMap<u32, BufferHandle>,
    draws: Vec<RecordedDraw>,
}

impl std::fmt::Debug for WgpuContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuContext")
            .field("buffers", &self.buffers.len())
            .field("pending_draws", &self.draws.len())
            .finish()
    }
}

impl WgpuContext {
    /// Create a context on the default adapter with no surface.
    pub fn new() -> Result<Self, ContextError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags: wgpu::InstanceFlags::default(),
            backend_options: wgpu::BackendOptions::default(),
            memory_budget_thresholds: wgpu::MemoryBudgetThresholds::default(),
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .map_err(|e| ContextError::InitializationFailed(format!("No compatible GPU adapter: {e}")))?;

        log::info!("wgpu adapter: {:?}", adapter.get_info());

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Orrery Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::default(),
            experimental_features: wgpu::ExperimentalFeatures::default(),
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| ContextError::InitializationFailed(format!("Device creation failed: {e}")))?;

        Ok(Self::from_device(Arc::new(device), Arc::new(queue)))
    }

    /// Create a context on an existing device and queue.
    pub fn from_device(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        Self {
            device,
            queue,
            buffers: HashMap::new(),
            next_id: 0,
            bound_vertex: None,
            bound_index: None,
            enabled_attributes: BTreeMap::new(),
            draws: Vec::new(),
        }
    }

    /// Get the wgpu device.
    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    /// Get the wgpu queue.
    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }

    /// Number of draws recorded since the last [`clear_draws`](Self::clear_draws).
    pub fn pending_draw_count(&self) -> usize {
        self.draws.len()
    }

    /// Drop the recorded draws, usually once per frame after replay.
    pub fn clear_draws(&mut self) {
        self.draws.clear();
    }

    /// Replay recorded draws into a render pass.
    ///
    /// The pass must already have a pipeline whose vertex layouts match the
    /// meshes that were drawn. Draws reading a buffer that was never filled
    /// are skipped.
    pub fn replay(&self, pass: &mut wgpu::RenderPass<'_>) {
        for draw in &self.draws {
            let Some(index_buffer) = self.gpu_buffer(draw.index_buffer) else {
                log::warn!("WgpuContext: skipping draw with empty index buffer");
                continue;
            };

            let mut complete = true;
            for (slot, handle) in &draw.vertex_buffers {
                match self.gpu_buffer(*handle) {
                    Some(buffer) => pass.set_vertex_buffer(*slot, buffer.slice(..)),
                    None => complete = false,
                }
            }
            if !complete {
                log::warn!("WgpuContext: skipping draw with empty vertex buffer");
                continue;
            }

            log::trace!(
                "WgpuContext: replaying {} indices ({:?})",
                draw.index_count,
                draw.topology
            );
            pass.set_index_buffer(index_buffer.slice(..), index_format(draw.index_format));
            pass.draw_indexed(0..draw.index_count, 0, 0..1);
        }
    }

    fn gpu_buffer(&self, handle: BufferHandle) -> Option<&wgpu::Buffer> {
        self.buffers.get(&handle).and_then(|b| b.buffer.as_ref())
    }

    fn check_live(&self, buffer: BufferHandle) -> Result<(), ContextError> {
        if self.buffers.contains_key(&buffer) {
            Ok(())
        } else {
            Err(ContextError::UnknownHandle(buffer))
        }
    }
}

impl GraphicsContext for WgpuContext {
    fn name(&self) -> &'static str {
        "wgpu Context"
    }

    fn create_buffer(&mut self, label: &str) -> Result<BufferHandle, ContextError> {
        self.next_id += 1;
        let handle = BufferHandle::from_raw(self.next_id);
        // Allocation is deferred until the first upload fixes the size.
        self.buffers.insert(
            handle,
            WgpuBuffer {
                label: label.to_string(),
                buffer: None,
                byte_length: 0,
            },
        );
        Ok(handle)
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) -> Result<(), ContextError> {
        let entry = self
            .buffers
            .remove(&buffer)
            .ok_or(ContextError::UnknownHandle(buffer))?;
        if let Some(gpu) = entry.buffer {
            gpu.destroy();
        }

        if self.bound_vertex == Some(buffer) {
            self.bound_vertex = None;
        }
        if self.bound_index == Some(buffer) {
            self.bound_index = None;
        }
        self.enabled_attributes.retain(|_, source| *source != buffer);
        Ok(())
    }

    fn bind_buffer(
        &mut self,
        target: BufferTarget,
        buffer: BufferHandle,
    ) -> Result<(), ContextError> {
        self.check_live(buffer)?;
        match target {
            BufferTarget::Vertex => self.bound_vertex = Some(buffer),
            BufferTarget::Index => self.bound_index = Some(buffer),
        }
        Ok(())
    }

    fn upload_buffer_data(
        &mut self,
        buffer: BufferHandle,
        data: &[u8],
        usage: UsageHint,
    ) -> Result<(), ContextError> {
        let entry = self
            .buffers
            .get_mut(&buffer)
            .ok_or(ContextError::UnknownHandle(buffer))?;

        // Queue writes must be a multiple of COPY_BUFFER_ALIGNMENT.
        let padded_len = padded_size(data.len() as u64);
        let needs_realloc = entry
            .buffer
            .as_ref()
            .is_none_or(|gpu| gpu.size() != padded_len);

        if needs_realloc {
            log::debug!(
                "WgpuContext: allocating {} bytes for {} ({:?})",
                padded_len,
                entry.label,
                usage
            );
            if let Some(old) = entry.buffer.take() {
                old.destroy();
            }
            entry.buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(entry.label.as_str()),
                size: padded_len,
                usage: wgpu::BufferUsages::VERTEX
                    | wgpu::BufferUsages::INDEX
                    | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
        }

        if let Some(gpu) = &entry.buffer {
            if data.len() as u64 == padded_len {
                self.queue.write_buffer(gpu, 0, data);
            } else {
                let mut padded = data.to_vec();
                padded.resize(padded_len as usize, 0);
                self.queue.write_buffer(gpu, 0, &padded);
            }
        }
        entry.byte_length = data.len() as u64;
        Ok(())
    }

    fn set_vertex_attribute(
        &mut self,
        attribute: &VertexAttributeLayout,
    ) -> Result<(), ContextError> {
        let buffer = self
            .bound_vertex
            .ok_or(ContextError::NothingBound(BufferTarget::Vertex))?;
        if vertex_format(attribute).is_none() {
            return Err(ContextError::Unsupported(format!(
                "{:?} x{} vertex attribute (normalized: {})",
                attribute.component_type, attribute.component_count, attribute.normalized
            )));
        }
        self.enabled_attributes.insert(attribute.slot, buffer);
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
        self.draws.push(RecordedDraw {
            topology,
            index_count,
            index_format,
            index_buffer,
            vertex_buffers: self
                .enabled_attributes
                .iter()
                .map(|(slot, buffer)| (*slot, *buffer))
                .collect(),
        });
        Ok(())
    }

    fn buffer_byte_length(&self, buffer: BufferHandle) -> Result<u64, ContextError> {
        self.buffers
            .get(&buffer)
            .map(|b| b.byte_length)
            .ok_or(ContextError::UnknownHandle(buffer))
    }
}

fn padded_size(len: u64) -> u64 {
    let align = wgpu::COPY_BUFFER_ALIGNMENT;
    len.div_ceil(align).max(1) * align
}

// ============================================================================
// Conversions
// ============================================================================

/// Map an attribute layout to a wgpu vertex format.
///
/// Returns `None` for combinations wgpu cannot fetch (three-component 8 and
/// 16 bit vectors, normalized 32-bit integers).
pub fn vertex_format(attribute: &VertexAttributeLayout) -> Option<wgpu::VertexFormat> {
    use wgpu::VertexFormat as F;

    let format = match (
        attribute.component_type,
        attribute.component_count,
        attribute.normalized,
    ) {
        (ComponentType::Uint8, 2, false) => F::Uint8x2,
        (ComponentType::Uint8, 4, false) => F::Uint8x4,
        (ComponentType::Uint8, 2, true) => F::Unorm8x2,
        (ComponentType::Uint8, 4, true) => F::Unorm8x4,
        (ComponentType::Int8, 2, false) => F::Sint8x2,
        (ComponentType::Int8, 4, false) => F::Sint8x4,
        (ComponentType::Int8, 2, true) => F::Snorm8x2,
        (ComponentType::Int8, 4, true) => F::Snorm8x4,
        (ComponentType::Uint16, 2, false) => F::Uint16x2,
        (ComponentType::Uint16, 4, false) => F::Uint16x4,
        (ComponentType::Uint16, 2, true) => F::Unorm16x2,
        (ComponentType::Uint16, 4, true) => F::Unorm16x4,
        (ComponentType::Int16, 2, false) => F::Sint16x2,
        (ComponentType::Int16, 4, false) => F::Sint16x4,
        (ComponentType::Int16, 2, true) => F::Snorm16x2,
        (ComponentType::Int16, 4, true) => F::Snorm16x4,
        (ComponentType::Uint32, 1, false) => F::Uint32,
        (ComponentType::Uint32, 2, false) => F::Uint32x2,
        (ComponentType::Uint32, 3, false) => F::Uint32x3,
        (ComponentType::Uint32, 4, false) => F::Uint32x4,
        (ComponentType::Int32, 1, false) => F::Sint32,
        (ComponentType::Int32, 2, false) => F::Sint32x2,
        (ComponentType::Int32, 3, false) => F::Sint32x3,
        (ComponentType::Int32, 4, false) => F::Sint32x4,
        (ComponentType::Float32, 1, _) => F::Float32,
        (ComponentType::Float32, 2, _) => F::Float32x2,
        (ComponentType::Float32, 3, _) => F::Float32x3,
        (ComponentType::Float32, 4, _) => F::Float32x4,
        _ => return None,
    };
    Some(format)
}

/// Convert an index format.
pub fn index_format(format: IndexFormat) -> wgpu::IndexFormat {
    match format {
        IndexFormat::Uint16 => wgpu::IndexFormat::Uint16,
        IndexFormat::Uint32 => wgpu::IndexFormat::Uint32,
    }
}

/// Convert a primitive topology.
pub fn primitive_topology(topology: PrimitiveTopology) -> wgpu::PrimitiveTopology {
    match topology {
        PrimitiveTopology::PointList => wgpu::PrimitiveTopology::PointList,
        PrimitiveTopology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
    }
}

/// One wgpu vertex buffer layout per attribute, ordered by slot.
///
/// Draws are replayed with each attribute's buffer bound at its slot, so the
/// slot is the buffer index as well as the shader location. Slots must
/// therefore run `0..n` without gaps. Returns `(array_stride, attribute)`
/// pairs ready to be borrowed into `wgpu::VertexBufferLayout`s, or an error
/// naming the first attribute wgpu cannot fetch.
pub fn vertex_buffer_layouts(
    layout: &VertexLayout,
) -> Result<Vec<(u64, wgpu::VertexAttribute)>, ContextError> {
    let mut attributes: Vec<&VertexAttributeLayout> = layout.attributes.iter().collect();
    attributes.sort_by_key(|attribute| attribute.slot);

    attributes
        .into_iter()
        .enumerate()
        .map(|(index, attribute)| {
            if attribute.slot as usize != index {
                return Err(ContextError::Unsupported(format!(
                    "attribute slots must be contiguous from 0, found slot {} at buffer {}",
                    attribute.slot, index
                )));
            }
            let format = vertex_format(attribute).ok_or_else(|| {
                ContextError::Unsupported(format!(
                    "attribute at slot {} has no wgpu vertex format",
                    attribute.slot
                ))
            })?;
            Ok((
                attribute.effective_stride() as u64,
                wgpu::VertexAttribute {
                    format,
                    offset: attribute.byte_offset as u64,
                    shader_location: attribute.slot,
                },
            ))
        })
        .collect()
}
