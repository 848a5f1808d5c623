//! Scene-graph rendering.
//!
//! - [`SceneGraphRenderer`] - Depth-first walk over a [`SceneNodeDescriptor`]
//!   tree that composes parent-relative transforms over time
//! - [`DrawSink`] - Where each node's draw goes (closure, recorder, or a
//!   [`MeshDrawSink`] drawing one shared mesh)
//!
//! The traversal itself is a pure function of the parent transform, the tree
//! and the simulation time; all side effects go through the sink.
//!
//! [`SceneNodeDescriptor`]: orrery_core::scene::SceneNodeDescriptor

mod renderer;

pub use renderer::{
    DrawSink, MeshDrawSink, RenderStats, SceneGraphRenderer, child_transform, self_transform,
};
