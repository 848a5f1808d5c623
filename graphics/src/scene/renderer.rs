//! Recursive renderer for trees of orbiting bodies.
//!
//! For a node under a parent transform `P` at simulation time `t`:
//!
//! ```text
//! self  = P * rotate_y(t * rotation_speed_around_self) * scale(scale)
//! child = P * translate(distance_from_parent, 0, 0) * rotate_y(t * rotation_speed_around_parent)
//! ```
//!
//! The node is drawn with `self` as its MVP, then every child is rendered
//! recursively under `child`. Scale and spin therefore never leak into the
//! children; distance and orbit are shared by all of them.

use glam::{Mat4, Vec3};
use orrery_core::mesh::PrimitiveTopology;
use orrery_core::scene::SceneNodeDescriptor;

use crate::context::GraphicsContext;
use crate::error::MeshError;
use crate::mesh::MeshBuffer;
use crate::shader::{MVP_UNIFORM, ShaderUniforms, TINT_UNIFORM};

/// Receives one draw per visited node.
pub trait DrawSink {
    /// Draw one node with its final MVP and tint matrices.
    fn draw_node(
        &mut self,
        node: &SceneNodeDescriptor,
        mvp: &Mat4,
        tint: &Mat4,
    ) -> Result<(), MeshError>;
}

impl<F> DrawSink for F
where
    F: FnMut(&SceneNodeDescriptor, &Mat4, &Mat4) -> Result<(), MeshError>,
{
    fn draw_node(
        &mut self,
        node: &SceneNodeDescriptor,
        mvp: &Mat4,
        tint: &Mat4,
    ) -> Result<(), MeshError> {
        self(node, mvp, tint)
    }
}

/// Draws every node with one shared mesh: writes the `MVP` and `tint`
/// uniforms, then issues the mesh's draw.
pub struct MeshDrawSink<'a, C: GraphicsContext, U: ShaderUniforms> {
    mesh: &'a MeshBuffer<C>,
    uniforms: U,
    topology: PrimitiveTopology,
}

impl<'a, C: GraphicsContext, U: ShaderUniforms> MeshDrawSink<'a, C, U> {
    /// Create a sink drawing `mesh` as a triangle list.
    pub fn new(mesh: &'a MeshBuffer<C>, uniforms: U) -> Self {
        Self {
            mesh,
            uniforms,
            topology: PrimitiveTopology::TriangleList,
        }
    }

    /// Set the topology used for every draw.
    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    /// Give back the uniform sink.
    pub fn into_uniforms(self) -> U {
        self.uniforms
    }
}

impl<C: GraphicsContext, U: ShaderUniforms> DrawSink for MeshDrawSink<'_, C, U> {
    fn draw_node(
        &mut self,
        _node: &SceneNodeDescriptor,
        mvp: &Mat4,
        tint: &Mat4,
    ) -> Result<(), MeshError> {
        self.uniforms.set_matrix4(MVP_UNIFORM, mvp);
        self.uniforms.set_matrix4(TINT_UNIFORM, tint);
        self.mesh.draw(self.topology)
    }
}

/// Transform a node is drawn with.
pub fn self_transform(parent: &Mat4, node: &SceneNodeDescriptor, time: f32) -> Mat4 {
    *parent
        * Mat4::from_rotation_y(time * node.rotation_speed_around_self)
        * Mat4::from_scale(Vec3::splat(node.scale))
}

/// Parent transform handed to each of a node's children.
pub fn child_transform(parent: &Mat4, node: &SceneNodeDescriptor, time: f32) -> Mat4 {
    *parent
        * Mat4::from_translation(Vec3::new(node.distance_from_parent, 0.0, 0.0))
        * Mat4::from_rotation_y(time * node.rotation_speed_around_parent)
}

/// Counters from the last render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Draws issued.
    pub nodes_drawn: usize,
    /// Deepest level reached (1 for a lone root).
    pub max_depth: usize,
}

/// Walks a [`SceneNodeDescriptor`] tree, composing transforms and issuing one
/// draw per node in depth-first declaration order.
#[derive(Debug, Default)]
pub struct SceneGraphRenderer {
    last_stats: RenderStats,
}

impl SceneGraphRenderer {
    /// Create a new renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters from the last completed render.
    pub fn last_stats(&self) -> RenderStats {
        self.last_stats
    }

    /// Render `node` and its sub-tree under `parent` at simulation time `time`.
    ///
    /// The first error from the sink stops the traversal and is returned.
    pub fn render(
        &mut self,
        parent: &Mat4,
        node: &SceneNodeDescriptor,
        time: f32,
        sink: &mut impl DrawSink,
    ) -> Result<RenderStats, MeshError> {
        let mut stats = RenderStats::default();
        render_node(parent, node, time, 1, sink, &mut stats)?;

        log::trace!(
            "SceneGraphRenderer: {} draws, depth {} at t={}",
            stats.nodes_drawn,
            stats.max_depth,
            time
        );
        self.last_stats = stats;
        Ok(stats)
    }
}

fn render_node(
    parent: &Mat4,
    node: &SceneNodeDescriptor,
    time: f32,
    depth: usize,
    sink: &mut impl DrawSink,
    stats: &mut RenderStats,
) -> Result<(), MeshError> {
    let mvp = self_transform(parent, node, time);
    let tint = Mat4::from_cols_array(&node.tint);
    sink.draw_node(node, &mvp, &tint)?;

    stats.nodes_drawn += 1;
    stats.max_depth = stats.max_depth.max(depth);

    if node.children.is_empty() {
        return Ok(());
    }

    let frame = child_transform(parent, node, time);
    for child in &node.children {
        render_node(&frame, child, time, depth + 1, sink, stats)?;
    }
    Ok(())
}
