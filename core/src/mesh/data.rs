//! CPU-side mesh data structures.
//!
//! This module provides:
//! - [`PrimitiveTopology`] - How indexed vertices are assembled into primitives
//! - [`IndexFormat`] - Index element width (u16 or u32)
//! - [`UsageHint`] - Expected update frequency of uploaded data
//! - [`GeometryData`] - Flat position, color and index arrays produced by generators

/// Primitive topology describing how vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Each vertex is a separate point.
    PointList,
    /// Every three vertices form a triangle.
    #[default]
    TriangleList,
}

impl PrimitiveTopology {
    /// Get the number of vertices per primitive.
    pub fn vertices_per_primitive(&self) -> u32 {
        match self {
            Self::PointList => 1,
            Self::TriangleList => 3,
        }
    }
}

/// Index format for indexed drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// 16-bit unsigned integers (max 65535 vertices).
    Uint16,
    /// 32-bit unsigned integers.
    #[default]
    Uint32,
}

impl IndexFormat {
    /// Get the size in bytes of each index.
    pub fn size(&self) -> usize {
        match self {
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }
}

/// Advisory hint on how often uploaded data changes.
///
/// Only affects the storage strategy a context picks, never semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UsageHint {
    /// Uploaded once, drawn many times.
    #[default]
    Static,
    /// Re-uploaded frequently.
    Dynamic,
}

/// Flat geometry arrays ready to be uploaded into a mesh.
///
/// - `positions`: 3 floats per vertex
/// - `colors`: 4 bytes (RGBA, 0-255) per vertex
/// - `indices`: 3 vertex indices per triangle
///
/// Produced by the functions in [`generators`](super::generators) and
/// consumed immediately by an upload.
#[derive(Clone, Default, PartialEq)]
pub struct GeometryData {
    /// Vertex positions, `[x, y, z]` per vertex.
    pub positions: Vec<f32>,
    /// Vertex colors, `[r, g, b, a]` per vertex.
    pub colors: Vec<u8>,
    /// Triangle indices into the vertex arrays.
    pub indices: Vec<u32>,
    /// Optional label for debugging.
    pub label: Option<String>,
}

impl GeometryData {
    /// Create geometry from its three arrays.
    pub fn new(positions: Vec<f32>, colors: Vec<u8>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            colors,
            indices,
            label: None,
        }
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

    /// Number of vertices (`positions.len() / 3`).
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of indices.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of triangles (`indices.len() / 3`).
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Position of a vertex, if it exists.
    pub fn position(&self, vertex: usize) -> Option<[f32; 3]> {
        let start = vertex * 3;
        self.positions
            .get(start..start + 3)
            .map(|p| [p[0], p[1], p[2]])
    }

    /// Color of a vertex, if it exists.
    pub fn color(&self, vertex: usize) -> Option<[u8; 4]> {
        let start = vertex * 4;
        self.colors
            .get(start..start + 4)
            .map(|c| [c[0], c[1], c[2], c[3]])
    }

    /// Check the array invariants: whole vertices and triangles, one color
    /// per position, and every index in range.
    pub fn is_well_formed(&self) -> bool {
        let vertex_count = self.vertex_count();
        self.positions.len() % 3 == 0
            && self.colors.len() % 4 == 0
            && self.colors.len() / 4 == vertex_count
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < vertex_count)
    }

    /// Position data as raw bytes.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Color data as raw bytes.
    pub fn color_bytes(&self) -> &[u8] {
        &self.colors
    }

    /// Index data as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

impl std::fmt::Debug for GeometryData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryData")
            .field("label", &self.label)
            .field("vertex_count", &self.vertex_count())
            .field("triangle_count", &self.triangle_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_topology_vertices() {
        assert_eq!(PrimitiveTopology::PointList.vertices_per_primitive(), 1);
        assert_eq!(PrimitiveTopology::TriangleList.vertices_per_primitive(), 3);
        assert_eq!(PrimitiveTopology::default(), PrimitiveTopology::TriangleList);
    }

    #[test]
    fn test_index_format_size() {
        assert_eq!(IndexFormat::Uint16.size(), 2);
        assert_eq!(IndexFormat::Uint32.size(), 4);
    }

    #[test]
    fn test_geometry_counts_and_bytes() {
        let geometry = GeometryData::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![255; 12],
            vec![0, 1, 2],
        )
        .with_label("triangle");

        assert_eq!(geometry.vertex_count(), 3);
        assert_eq!(geometry.triangle_count(), 1);
        assert_eq!(geometry.position_bytes().len(), 36);
        assert_eq!(geometry.color_bytes().len(), 12);
        assert_eq!(geometry.index_bytes().len(), 12);
        assert_eq!(geometry.position(1), Some([1.0, 0.0, 0.0]));
        assert_eq!(geometry.color(2), Some([255, 255, 255, 255]));
        assert_eq!(geometry.position(3), None);
        assert!(geometry.is_well_formed());
        assert_eq!(geometry.label(), Some("triangle"));
    }

    #[test]
    fn test_malformed_geometry() {
        let out_of_range = GeometryData::new(vec![0.0; 9], vec![0; 12], vec![0, 1, 3]);
        assert!(!out_of_range.is_well_formed());

        let missing_colors = GeometryData::new(vec![0.0; 9], vec![0; 8], vec![0, 1, 2]);
        assert!(!missing_colors.is_well_formed());

        assert!(GeometryData::default().is_well_formed());
    }
}
