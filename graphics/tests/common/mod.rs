//! Shared infrastructure for the graphics integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use glam::Mat4;
use orrery_core::mesh::generators::{
    generate_colored_cube, generate_plane, generate_sphere, generate_white_cube,
};
use orrery_core::mesh::GeometryData;
use orrery_graphics::{DummyContext, ShaderUniforms};

/// Enable log output for a test run. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A fresh dummy context behind the shared handle meshes expect.
pub fn dummy_context() -> Rc<RefCell<DummyContext>> {
    init_logging();
    Rc::new(RefCell::new(DummyContext::new()))
}

// ============================================================================
// Geometry
// ============================================================================

/// Built-in shapes, for parameterizing tests over generator output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Plane,
    ColoredCube,
    WhiteCube,
    Sphere { sectors: u32, stacks: u32 },
}

impl Shape {
    pub fn generate(self) -> GeometryData {
        match self {
            Shape::Plane => generate_plane(),
            Shape::ColoredCube => generate_colored_cube(),
            Shape::WhiteCube => generate_white_cube(),
            Shape::Sphere { sectors, stacks } => generate_sphere(sectors, stacks, 1.0),
        }
    }
}

// ============================================================================
// Uniforms
// ============================================================================

/// Uniform sink that remembers every write in order.
#[derive(Debug, Default)]
pub struct RecordingUniforms {
    pub writes: Vec<(String, Mat4)>,
}

impl RecordingUniforms {
    /// Every matrix written to `name`, in order.
    pub fn values(&self, name: &str) -> Vec<Mat4> {
        self.writes
            .iter()
            .filter(|(uniform, _)| uniform == name)
            .map(|(_, matrix)| *matrix)
            .collect()
    }
}

impl ShaderUniforms for RecordingUniforms {
    fn set_matrix4(&mut self, name: &str, matrix: &Mat4) {
        self.writes.push((name.to_string(), *matrix));
    }
}
