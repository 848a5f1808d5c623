//! Graphics error types.

use thiserror::Error;

use crate::context::{BufferHandle, BufferTarget};

/// Errors raised by a [`GraphicsContext`](crate::context::GraphicsContext).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The handle does not name a live buffer of this context.
    #[error("unknown buffer handle {0:?}")]
    UnknownHandle(BufferHandle),
    /// A call needed a bound buffer but nothing was bound to the target.
    #[error("no buffer bound to the {0:?} target")]
    NothingBound(BufferTarget),
    /// The context cannot express the request.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// Failed to initialize the context.
    #[error("initialization failed: {0}")]
    InitializationFailed(String),
}

/// Errors raised by [`MeshBuffer`](crate::mesh::MeshBuffer) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// An upload named a buffer the vertex layout does not declare.
    #[error("vertex layout declares no buffer named `{name}`")]
    UnknownBuffer { name: String },
    /// Draw was called before any index data was uploaded.
    #[error("mesh has no index data to draw")]
    NotReady,
    /// A declared vertex buffer has never received data.
    #[error("vertex buffer `{name}` has no uploaded data")]
    MissingVertexData { name: String },
    /// The mesh was already disposed.
    #[error("mesh buffer used after dispose")]
    Disposed,
    /// The vertex layout failed validation at construction.
    #[error("invalid vertex layout: {0}")]
    InvalidLayout(String),
    /// The underlying context rejected a call.
    #[error(transparent)]
    Context(#[from] ContextError),
}
