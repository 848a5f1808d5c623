//! Vertex attribute layouts.
//!
//! A [`VertexLayout`] is an ordered list of [`VertexAttributeLayout`]s. Each
//! attribute names the buffer it reads from, so one layout can spread its
//! attributes over several buffers:
//!
//! - **Static/Dynamic separation**: keep frequently-updated positions in a
//!   buffer apart from colors that are uploaded once.
//! - **Interleaving**: several attributes can share one buffer by using the
//!   same stride with different byte offsets.
//!
//! Layouts are shared via `Arc` since there are typically only a few
//! combinations across many meshes.
//!
//! # Example
//!
//! ```
//! use orrery_core::mesh::{ComponentType, VertexAttributeLayout, VertexLayout};
//!
//! // Interleaved position (float3) + color (unorm8x4) in one buffer.
//! let layout = VertexLayout::new()
//!     .with_attribute(
//!         VertexAttributeLayout::new(0, "vertices", 3, ComponentType::Float32).with_stride(16),
//!     )
//!     .with_attribute(
//!         VertexAttributeLayout::new(1, "vertices", 4, ComponentType::Uint8)
//!             .with_normalized(true)
//!             .with_stride(16)
//!             .with_offset(12),
//!     );
//!
//! assert_eq!(layout.buffer_names(), vec!["vertices"]);
//! assert!(layout.validate().is_ok());
//! ```

use std::sync::Arc;

/// Scalar type of each component of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// Signed 8-bit integer.
    Int8,
    /// Unsigned 8-bit integer.
    Uint8,
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 16-bit integer.
    Uint16,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 32-bit integer.
    Uint32,
    /// 32-bit float.
    Float32,
}

impl ComponentType {
    /// Size in bytes of a single component.
    pub const fn size(self) -> u32 {
        match self {
            Self::Int8 | Self::Uint8 => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Int32 | Self::Uint32 | Self::Float32 => 4,
        }
    }

    /// Whether the type is an integer type (normalization only applies to these).
    pub const fn is_integer(self) -> bool {
        !matches!(self, Self::Float32)
    }

    /// Whether the type is signed.
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Float32)
    }
}

/// How one named buffer's bytes feed one shader input slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexAttributeLayout {
    /// Shader input slot.
    pub slot: u32,
    /// Name of the buffer supplying this attribute.
    pub buffer_name: String,
    /// Number of components per element (1-4).
    pub component_count: u32,
    /// Scalar type of each component.
    pub component_type: ComponentType,
    /// Map integer values to [0, 1] (unsigned) or [-1, 1] (signed) on read.
    pub normalized: bool,
    /// Bytes between consecutive elements. 0 means tightly packed.
    pub stride: u32,
    /// Start offset within the stride.
    pub byte_offset: u32,
}

impl VertexAttributeLayout {
    /// Create a tightly packed, non-normalized attribute.
    pub fn new(
        slot: u32,
        buffer_name: impl Into<String>,
        component_count: u32,
        component_type: ComponentType,
    ) -> Self {
        Self {
            slot,
            buffer_name: buffer_name.into(),
            component_count,
            component_type,
            normalized: false,
            stride: 0,
            byte_offset: 0,
        }
    }

    /// Create a float3 position attribute reading from `positions`.
    pub fn position(slot: u32) -> Self {
        Self::new(slot, VertexLayout::POSITIONS, 3, ComponentType::Float32)
    }

    /// Create a normalized unorm8x4 color attribute reading from `colors`.
    pub fn color(slot: u32) -> Self {
        Self::new(slot, VertexLayout::COLORS, 4, ComponentType::Uint8).with_normalized(true)
    }

    /// Set the normalization flag.
    pub fn with_normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    /// Set the stride in bytes (0 = tightly packed).
    pub fn with_stride(mut self, stride: u32) -> Self {
        self.stride = stride;
        self
    }

    /// Set the byte offset within the stride.
    pub fn with_offset(mut self, byte_offset: u32) -> Self {
        self.byte_offset = byte_offset;
        self
    }

    /// Size in bytes of one element (`component_count * component size`).
    pub fn element_size(&self) -> u32 {
        self.component_count * self.component_type.size()
    }

    /// Stride in bytes, resolving 0 to the tightly packed element size.
    pub fn effective_stride(&self) -> u32 {
        if self.stride == 0 {
            self.element_size()
        } else {
            self.stride
        }
    }
}

/// Ordered set of vertex attributes spread over one or more named buffers.
///
/// The attribute order is the order in which a mesh binds them when drawing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VertexLayout {
    /// The vertex attributes, each naming its source buffer.
    pub attributes: Vec<VertexAttributeLayout>,
    /// Optional label for debugging.
    pub label: Option<String>,
}

impl VertexLayout {
    /// Buffer name used for vertex positions by the built-in layouts.
    pub const POSITIONS: &'static str = "positions";
    /// Buffer name used for vertex colors by the built-in layouts.
    pub const COLORS: &'static str = "colors";

    /// Create a new empty vertex layout.
    pub fn new() -> Self {
        Self {
            attributes: Vec::new(),
            label: None,
        }
    }

    /// Add a vertex attribute.
    pub fn with_attribute(mut self, attribute: VertexAttributeLayout) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Distinct buffer names in order of first appearance.
    pub fn buffer_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for attr in &self.attributes {
            if !names.contains(&attr.buffer_name.as_str()) {
                names.push(attr.buffer_name.as_str());
            }
        }
        names
    }

    /// Check whether any attribute reads from the named buffer.
    pub fn has_buffer(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr.buffer_name == name)
    }

    /// Get all attributes reading from the named buffer.
    pub fn attributes_for_buffer<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a VertexAttributeLayout> {
        self.attributes
            .iter()
            .filter(move |attr| attr.buffer_name == name)
    }

    /// Get the attribute bound to a shader slot.
    pub fn attribute_at_slot(&self, slot: u32) -> Option<&VertexAttributeLayout> {
        self.attributes.iter().find(|attr| attr.slot == slot)
    }

    /// Validate the layout: component counts in 1..=4, no slot used twice,
    /// no empty buffer names.
    pub fn validate(&self) -> Result<(), String> {
        for (i, attr) in self.attributes.iter().enumerate() {
            if !(1..=4).contains(&attr.component_count) {
                return Err(format!(
                    "Attribute at slot {} has {} components (expected 1-4)",
                    attr.slot, attr.component_count
                ));
            }
            if attr.buffer_name.is_empty() {
                return Err(format!("Attribute at slot {} has no buffer name", attr.slot));
            }
            if self.attributes[..i].iter().any(|a| a.slot == attr.slot) {
                return Err(format!("Slot {} is used by more than one attribute", attr.slot));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Common Layouts
// ============================================================================

impl VertexLayout {
    /// Position + color layout shared by every built-in generator.
    ///
    /// - Slot 0: `positions`, float32 x3
    /// - Slot 1: `colors`, uint8 x4, normalized
    pub fn position_color() -> Arc<Self> {
        Arc::new(
            Self::new()
                .with_attribute(VertexAttributeLayout::position(0))
                .with_attribute(VertexAttributeLayout::color(1))
                .with_label("position_color"),
        )
    }
}

static_assertions::assert_impl_all!(VertexLayout: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_type_size() {
        assert_eq!(ComponentType::Int8.size(), 1);
        assert_eq!(ComponentType::Uint8.size(), 1);
        assert_eq!(ComponentType::Int16.size(), 2);
        assert_eq!(ComponentType::Uint16.size(), 2);
        assert_eq!(ComponentType::Int32.size(), 4);
        assert_eq!(ComponentType::Uint32.size(), 4);
        assert_eq!(ComponentType::Float32.size(), 4);
        assert!(!ComponentType::Float32.is_integer());
        assert!(ComponentType::Uint16.is_integer());
        assert!(!ComponentType::Uint8.is_signed());
    }

    #[test]
    fn test_effective_stride_fallback() {
        let packed = VertexAttributeLayout::new(0, "a", 3, ComponentType::Float32);
        assert_eq!(packed.effective_stride(), 12);

        let shorts = VertexAttributeLayout::new(0, "a", 2, ComponentType::Int16);
        assert_eq!(shorts.effective_stride(), 4);

        let explicit = VertexAttributeLayout::new(0, "a", 3, ComponentType::Float32).with_stride(32);
        assert_eq!(explicit.effective_stride(), 32);
        assert_eq!(explicit.element_size(), 12);
    }

    #[test]
    fn test_position_color_layout() {
        let layout = VertexLayout::position_color();
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(
            layout.buffer_names(),
            vec![VertexLayout::POSITIONS, VertexLayout::COLORS]
        );

        let color = layout.attribute_at_slot(1).unwrap();
        assert_eq!(color.component_type, ComponentType::Uint8);
        assert!(color.normalized);
        assert_eq!(color.effective_stride(), 4);
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_interleaved_buffer_names_are_distinct() {
        let layout = VertexLayout::new()
            .with_attribute(VertexAttributeLayout::new(0, "interleaved", 3, ComponentType::Float32))
            .with_attribute(VertexAttributeLayout::new(1, "interleaved", 4, ComponentType::Uint8).with_offset(12))
            .with_attribute(VertexAttributeLayout::new(2, "extra", 1, ComponentType::Float32));

        assert_eq!(layout.buffer_names(), vec!["interleaved", "extra"]);
        assert_eq!(layout.attributes_for_buffer("interleaved").count(), 2);
        assert!(layout.has_buffer("extra"));
        assert!(!layout.has_buffer("missing"));
    }

    #[test]
    fn test_validation() {
        let too_wide = VertexLayout::new()
            .with_attribute(VertexAttributeLayout::new(0, "a", 5, ComponentType::Float32));
        assert!(too_wide.validate().is_err());

        let duplicate_slot = VertexLayout::new()
            .with_attribute(VertexAttributeLayout::position(0))
            .with_attribute(VertexAttributeLayout::color(0));
        assert!(duplicate_slot.validate().is_err());

        let unnamed = VertexLayout::new()
            .with_attribute(VertexAttributeLayout::new(0, "", 3, ComponentType::Float32));
        assert!(unnamed.validate().is_err());

        assert!(VertexLayout::new().validate().is_ok());
    }
}
