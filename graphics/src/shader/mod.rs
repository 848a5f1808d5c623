//! Shader program boundary.
//!
//! Program compilation and linking happen elsewhere; the renderer only needs
//! to write matrix uniforms by name before each draw.

use glam::Mat4;

/// Uniform holding the model-view-projection matrix.
pub const MVP_UNIFORM: &str = "MVP";

/// Uniform holding the color-modulation matrix.
pub const TINT_UNIFORM: &str = "tint";

/// A program whose matrix uniforms can be written by name.
pub trait ShaderUniforms {
    /// Write a 4x4 matrix uniform.
    fn set_matrix4(&mut self, name: &str, matrix: &Mat4);
}

impl<T: ShaderUniforms + ?Sized> ShaderUniforms for &mut T {
    fn set_matrix4(&mut self, name: &str, matrix: &Mat4) {
        (**self).set_matrix4(name, matrix);
    }
}
