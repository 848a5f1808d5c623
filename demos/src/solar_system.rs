//! Animated tree of orbiting bodies.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use orrery_core::mesh::generators::{generate_colored_cube, generate_sphere};
use orrery_graphics::mesh::UsageHint;
use orrery_graphics::{GraphicsContext, MeshBuffer, MeshDrawSink, RenderStats, SceneGraphRenderer};

use crate::camera::Camera;
use crate::config::{NamedSystem, SystemCatalog};
use crate::error::{ConfigError, DemoError};
use crate::frame_loop::Scene;
use crate::program::LoggingProgram;

const BODY_RESOLUTION: u32 = 32;

/// Renders one system from a [`SystemCatalog`], advancing simulation time
/// while playing.
///
/// Every body is drawn with the same unit mesh: a sphere, or a colored cube
/// when debug cubes are on.
pub struct SolarSystemScene<C: GraphicsContext> {
    context: Rc<RefCell<C>>,
    catalog: SystemCatalog,
    selected: usize,
    time: f32,
    playing: bool,
    debug_cubes: bool,
    sphere: Option<MeshBuffer<C>>,
    cube: Option<MeshBuffer<C>>,
    camera: Camera,
    program: LoggingProgram,
    renderer: SceneGraphRenderer,
}

impl<C: GraphicsContext> SolarSystemScene<C> {
    /// Create a paused scene showing the catalog's first system.
    pub fn new(context: Rc<RefCell<C>>, catalog: SystemCatalog) -> Self {
        Self {
            context,
            catalog,
            selected: 0,
            time: 0.0,
            playing: false,
            debug_cubes: false,
            sphere: None,
            cube: None,
            camera: Camera::new(Vec3::new(100.0, 100.0, 100.0), Vec3::ZERO),
            program: LoggingProgram::new("solar-system"),
            renderer: SceneGraphRenderer::new(),
        }
    }

    /// Systems this scene can switch between.
    pub fn catalog(&self) -> &SystemCatalog {
        &self.catalog
    }

    /// The system being rendered.
    pub fn selected_system(&self) -> &NamedSystem {
        self.catalog
            .system(self.selected)
            .unwrap_or_else(|| self.catalog.default_system())
    }

    /// Switch to the named system. Simulation time carries over.
    pub fn select_system(&mut self, name: &str) -> Result<(), ConfigError> {
        self.selected = self.catalog.index_of(name)?;
        log::info!("Selected system `{}`", name);
        Ok(())
    }

    /// Simulation time in milliseconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Jump to a simulation time in milliseconds.
    pub fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    /// Whether time advances on draw.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Advance time on every drawn frame.
    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Freeze time. Frames are still drawn.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Flip between playing and paused.
    pub fn toggle_playing(&mut self) {
        self.playing = !self.playing;
    }

    /// Whether bodies are drawn as colored cubes.
    pub fn debug_cubes(&self) -> bool {
        self.debug_cubes
    }

    /// Draw every body as a colored cube instead of a sphere.
    pub fn set_debug_cubes(&mut self, enabled: bool) {
        self.debug_cubes = enabled;
    }

    /// Uniforms written by the last drawn body.
    pub fn program(&self) -> &LoggingProgram {
        &self.program
    }

    /// Counters from the last drawn frame.
    pub fn last_stats(&self) -> RenderStats {
        self.renderer.last_stats()
    }
}

impl<C: GraphicsContext> Scene for SolarSystemScene<C> {
    fn name(&self) -> &str {
        "solar-system"
    }

    fn start(&mut self) -> Result<(), DemoError> {
        if self.sphere.is_none() {
            let geometry = generate_sphere(BODY_RESOLUTION, BODY_RESOLUTION, 1.0);
            self.sphere = Some(MeshBuffer::from_geometry(
                self.context.clone(),
                &geometry,
                UsageHint::Static,
            )?);
        }
        if self.cube.is_none() {
            self.cube = Some(MeshBuffer::from_geometry(
                self.context.clone(),
                &generate_colored_cube(),
                UsageHint::Static,
            )?);
        }
        log::info!(
            "Solar system scene started with `{}`",
            self.selected_system().name
        );
        Ok(())
    }

    fn draw(&mut self, delta: f32) -> Result<(), DemoError> {
        if self.playing {
            self.time += delta;
        }

        let mesh = if self.debug_cubes {
            self.cube.as_ref()
        } else {
            self.sphere.as_ref()
        };
        let mesh = mesh.ok_or_else(|| DemoError::NotStarted("solar-system".to_string()))?;

        let system = self
            .catalog
            .system(self.selected)
            .unwrap_or_else(|| self.catalog.default_system());
        let view_projection = self.camera.view_projection_matrix();
        let mut sink = MeshDrawSink::new(mesh, &mut self.program);
        self.renderer
            .render(&view_projection, &system.root, self.time, &mut sink)?;
        Ok(())
    }

    fn end(&mut self) -> Result<(), DemoError> {
        for mut mesh in [self.sphere.take(), self.cube.take()].into_iter().flatten() {
            mesh.dispose()?;
        }
        Ok(())
    }
}
