//! Single rotating UV sphere.

use std::cell::RefCell;
use std::f32::consts::FRAC_PI_2;
use std::rc::Rc;

use glam::Mat4;
use orrery_core::mesh::generators::generate_sphere;
use orrery_graphics::mesh::{PrimitiveTopology, UsageHint};
use orrery_graphics::{GraphicsContext, MVP_UNIFORM, MeshBuffer, ShaderUniforms, TINT_UNIFORM};

use crate::camera::Camera;
use crate::error::DemoError;
use crate::frame_loop::Scene;
use crate::program::LoggingProgram;

/// Smallest accepted sector or stack count.
pub const MIN_RESOLUTION: u32 = 2;
/// Largest accepted sector or stack count.
pub const MAX_RESOLUTION: u32 = 256;

/// Sphere parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereSettings {
    /// Longitude subdivisions (the vertical resolution control).
    pub sector_count: u32,
    /// Latitude subdivisions (the horizontal resolution control).
    pub stack_count: u32,
    pub radius: f32,
    /// Draw vertices as points instead of triangles.
    pub point_cloud: bool,
}

impl Default for SphereSettings {
    fn default() -> Self {
        Self {
            sector_count: 32,
            stack_count: 32,
            radius: 1.0,
            point_cloud: false,
        }
    }
}

fn clamp_resolution(value: u32) -> u32 {
    value.clamp(MIN_RESOLUTION, MAX_RESOLUTION)
}

/// Draws one sphere, tilted a quarter turn around X so its poles face the
/// camera's horizon.
pub struct SphereScene<C: GraphicsContext> {
    context: Rc<RefCell<C>>,
    settings: SphereSettings,
    mesh: Option<MeshBuffer<C>>,
    camera: Camera,
    program: LoggingProgram,
    last_vertex_count: Option<u64>,
    rebuild_count: usize,
}

impl<C: GraphicsContext> SphereScene<C> {
    /// Create a scene with clamped settings. The mesh is built on `start`.
    pub fn new(context: Rc<RefCell<C>>, settings: SphereSettings) -> Self {
        let settings = SphereSettings {
            sector_count: clamp_resolution(settings.sector_count),
            stack_count: clamp_resolution(settings.stack_count),
            ..settings
        };
        Self {
            context,
            settings,
            mesh: None,
            camera: Camera::default(),
            program: LoggingProgram::new("sphere"),
            last_vertex_count: None,
            rebuild_count: 0,
        }
    }

    /// Current sphere settings, resolution already clamped.
    pub fn settings(&self) -> &SphereSettings {
        &self.settings
    }

    /// The live mesh, if started.
    pub fn mesh(&self) -> Option<&MeshBuffer<C>> {
        self.mesh.as_ref()
    }

    /// Uniforms written by the last draw.
    pub fn program(&self) -> &LoggingProgram {
        &self.program
    }

    /// Vertex count reported by the last drawn frame.
    pub fn last_vertex_count(&self) -> Option<u64> {
        self.last_vertex_count
    }

    /// How many times the mesh was rebuilt after `start`.
    pub fn rebuild_count(&self) -> usize {
        self.rebuild_count
    }

    /// Switch between triangles and points from the next draw on.
    pub fn set_point_cloud(&mut self, point_cloud: bool) {
        self.settings.point_cloud = point_cloud;
    }

    /// Change the longitude subdivisions, clamped to
    /// [`MIN_RESOLUTION`]..=[`MAX_RESOLUTION`]. Rebuilds a running mesh.
    pub fn set_sector_count(&mut self, sector_count: u32) -> Result<(), DemoError> {
        let sector_count = clamp_resolution(sector_count);
        if sector_count == self.settings.sector_count {
            return Ok(());
        }
        self.settings.sector_count = sector_count;
        self.rebuild()
    }

    /// Change the latitude subdivisions, clamped like [`Self::set_sector_count`].
    pub fn set_stack_count(&mut self, stack_count: u32) -> Result<(), DemoError> {
        let stack_count = clamp_resolution(stack_count);
        if stack_count == self.settings.stack_count {
            return Ok(());
        }
        self.settings.stack_count = stack_count;
        self.rebuild()
    }

    fn topology(&self) -> PrimitiveTopology {
        if self.settings.point_cloud {
            PrimitiveTopology::PointList
        } else {
            PrimitiveTopology::TriangleList
        }
    }

    fn build_mesh(&self) -> Result<MeshBuffer<C>, DemoError> {
        let geometry = generate_sphere(
            self.settings.sector_count,
            self.settings.stack_count,
            self.settings.radius,
        );
        let mesh = MeshBuffer::from_geometry(self.context.clone(), &geometry, UsageHint::Static)?;
        Ok(mesh)
    }

    /// Swap in a mesh for the current settings. The old mesh is released
    /// before the new one is created.
    fn rebuild(&mut self) -> Result<(), DemoError> {
        let Some(mut old) = self.mesh.take() else {
            return Ok(());
        };
        old.dispose()?;

        self.mesh = Some(self.build_mesh()?);
        self.rebuild_count += 1;
        log::debug!(
            "Sphere rebuilt at {}x{}",
            self.settings.sector_count,
            self.settings.stack_count
        );
        Ok(())
    }
}

impl<C: GraphicsContext> Scene for SphereScene<C> {
    fn name(&self) -> &str {
        "sphere"
    }

    fn start(&mut self) -> Result<(), DemoError> {
        if self.mesh.is_none() {
            self.mesh = Some(self.build_mesh()?);
        }
        Ok(())
    }

    fn draw(&mut self, _delta: f32) -> Result<(), DemoError> {
        let topology = self.topology();
        let mesh = self
            .mesh
            .as_ref()
            .ok_or_else(|| DemoError::NotStarted(self.name().to_string()))?;

        let mvp = self.camera.view_projection_matrix() * Mat4::from_rotation_x(FRAC_PI_2);
        self.program.set_matrix4(MVP_UNIFORM, &mvp);
        self.program.set_matrix4(TINT_UNIFORM, &Mat4::IDENTITY);
        mesh.draw(topology)?;

        let vertex_count = mesh.vertex_count()?;
        log::debug!("Sphere: {} vertices", vertex_count);
        self.last_vertex_count = Some(vertex_count);
        Ok(())
    }

    fn end(&mut self) -> Result<(), DemoError> {
        if let Some(mut mesh) = self.mesh.take() {
            mesh.dispose()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use orrery_graphics::DummyContext;

    use super::*;

    fn scene(settings: SphereSettings) -> (Rc<RefCell<DummyContext>>, SphereScene<DummyContext>) {
        let context = Rc::new(RefCell::new(DummyContext::new()));
        let scene = SphereScene::new(context.clone(), settings);
        (context, scene)
    }

    #[test]
    fn test_draw_before_start() {
        let (_, mut scene) = scene(SphereSettings::default());
        assert!(matches!(scene.draw(1.0), Err(DemoError::NotStarted(_))));
    }

    #[test]
    fn test_draw_reports_vertex_count() {
        let (context, mut scene) = scene(SphereSettings::default());
        scene.start().unwrap();
        scene.draw(16.0).unwrap();

        assert_eq!(scene.last_vertex_count(), Some(33 * 33));
        let draw = context.borrow().last_draw().cloned().unwrap();
        assert_eq!(draw.topology, PrimitiveTopology::TriangleList);
        assert_eq!(draw.index_count, (32 * 31 * 6) as u32);
    }

    #[test]
    fn test_mvp_tilts_sphere() {
        let (_, mut scene) = scene(SphereSettings::default());
        scene.start().unwrap();
        scene.draw(16.0).unwrap();

        let expected = Camera::default().view_projection_matrix() * Mat4::from_rotation_x(FRAC_PI_2);
        assert_eq!(scene.program().uniform(MVP_UNIFORM), Some(expected));
        assert_eq!(scene.program().uniform(TINT_UNIFORM), Some(Mat4::IDENTITY));
    }

    #[test]
    fn test_point_cloud_topology() {
        let (context, mut scene) = scene(SphereSettings {
            point_cloud: true,
            ..Default::default()
        });
        scene.start().unwrap();
        scene.draw(16.0).unwrap();
        assert_eq!(
            context.borrow().last_draw().unwrap().topology,
            PrimitiveTopology::PointList
        );
    }

    #[test]
    fn test_point_cloud_switch_between_draws() {
        let (context, mut scene) = scene(SphereSettings::default());
        scene.start().unwrap();
        scene.draw(16.0).unwrap();
        scene.set_point_cloud(true);
        scene.draw(16.0).unwrap();

        let topologies: Vec<_> = context.borrow().draws().iter().map(|d| d.topology).collect();
        assert_eq!(
            topologies,
            vec![PrimitiveTopology::TriangleList, PrimitiveTopology::PointList]
        );
        // Topology is a draw-time choice; the mesh is not rebuilt.
        assert_eq!(scene.rebuild_count(), 0);
    }

    #[test]
    fn test_resolution_is_clamped() {
        let (_, mut scene) = scene(SphereSettings {
            sector_count: 0,
            stack_count: 1000,
            ..Default::default()
        });
        assert_eq!(scene.settings().sector_count, MIN_RESOLUTION);
        assert_eq!(scene.settings().stack_count, MAX_RESOLUTION);
    }

    #[test]
    fn test_rebuild_releases_old_mesh() {
        let (context, mut scene) = scene(SphereSettings::default());
        scene.start().unwrap();
        let old_positions = scene.mesh().unwrap().vertex_buffer("positions").unwrap();

        scene.set_sector_count(8).unwrap();
        scene.set_stack_count(4).unwrap();

        assert_eq!(scene.rebuild_count(), 2);
        assert!(!context.borrow().is_live(old_positions));
        assert_eq!(context.borrow().live_buffer_count(), 3);

        scene.draw(16.0).unwrap();
        assert_eq!(scene.last_vertex_count(), Some(9 * 5));
    }

    #[test]
    fn test_unchanged_resolution_skips_rebuild() {
        let (_, mut scene) = scene(SphereSettings::default());
        scene.start().unwrap();
        scene.set_sector_count(32).unwrap();
        scene.set_stack_count(999).unwrap();
        scene.set_stack_count(300).unwrap();
        assert_eq!(scene.rebuild_count(), 1);
    }

    #[test]
    fn test_end_releases_everything() {
        let (context, mut scene) = scene(SphereSettings::default());
        scene.start().unwrap();
        scene.end().unwrap();
        assert_eq!(context.borrow().live_buffer_count(), 0);
        assert!(scene.mesh().is_none());
    }
}
