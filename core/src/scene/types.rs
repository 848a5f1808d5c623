//! Scene node descriptor types.
//!
//! All types use plain arrays (`[f32; 16]`) instead of math library types to
//! keep the core crate free of `glam`. Convert as needed:
//! `Mat4::from_cols_array(&node.tint)`.

use serde::{Deserialize, Serialize};

/// Column-major 4x4 identity matrix.
#[rustfmt::skip]
pub const IDENTITY_TINT: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
];

fn default_tint() -> [f32; 16] {
    IDENTITY_TINT
}

fn default_scale() -> f32 {
    1.0
}

/// One body in a tree of orbiting bodies.
///
/// A node spins around its own Y axis and is scaled; its children sit
/// `distance_from_parent` along the parent's X axis and orbit the parent
/// around its Y axis. Speeds are radians per simulation time unit.
///
/// Nodes form a rooted tree with owned children, so cycles cannot be built.
/// Descriptors are immutable while a frame is being rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNodeDescriptor {
    /// Node name, if any. Only used for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Uniform scale applied to this node only (not to its children).
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Offset of this node's children along the X axis.
    #[serde(default)]
    pub distance_from_parent: f32,
    /// Orbit rate of this node's children around it.
    #[serde(default)]
    pub rotation_speed_around_parent: f32,
    /// Spin rate of this node around its own Y axis.
    #[serde(default)]
    pub rotation_speed_around_self: f32,
    /// Column-major color-modulation matrix.
    #[serde(default = "default_tint")]
    pub tint: [f32; 16],
    /// Child nodes in draw order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneNodeDescriptor>,
}

impl SceneNodeDescriptor {
    /// Create a unit-scale, motionless node with an identity tint and no children.
    pub fn new() -> Self {
        Self {
            name: None,
            scale: 1.0,
            distance_from_parent: 0.0,
            rotation_speed_around_parent: 0.0,
            rotation_speed_around_self: 0.0,
            tint: IDENTITY_TINT,
            children: Vec::new(),
        }
    }

    /// Set the node name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the uniform scale.
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the distance between this node and its children.
    #[must_use]
    pub fn with_distance_from_parent(mut self, distance: f32) -> Self {
        self.distance_from_parent = distance;
        self
    }

    /// Set the rate at which children orbit this node.
    #[must_use]
    pub fn with_rotation_speed_around_parent(mut self, speed: f32) -> Self {
        self.rotation_speed_around_parent = speed;
        self
    }

    /// Set the spin rate around this node's own axis.
    #[must_use]
    pub fn with_rotation_speed_around_self(mut self, speed: f32) -> Self {
        self.rotation_speed_around_self = speed;
        self
    }

    /// Set the tint matrix (column-major).
    #[must_use]
    pub fn with_tint(mut self, tint: [f32; 16]) -> Self {
        self.tint = tint;
        self
    }

    /// Set a diagonal tint that scales each RGBA channel.
    #[must_use]
    pub fn with_color(self, color: [f32; 4]) -> Self {
        let mut tint = IDENTITY_TINT;
        for (channel, value) in color.into_iter().enumerate() {
            tint[channel * 5] = value;
        }
        self.with_tint(tint)
    }

    /// Append a child node.
    #[must_use]
    pub fn with_child(mut self, child: SceneNodeDescriptor) -> Self {
        self.children.push(child);
        self
    }

    /// Returns true if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this sub-tree, including this node.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Number of levels in this sub-tree (1 for a leaf).
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }

    /// Visit every node depth-first in draw order.
    pub fn walk(&self, visitor: &mut impl FnMut(&SceneNodeDescriptor)) {
        visitor(self);
        for child in &self.children {
            child.walk(visitor);
        }
    }
}

impl Default for SceneNodeDescriptor {
    fn default() -> Self {
        Self::new()
    }
}
