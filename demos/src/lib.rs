//! # Orrery Demos
//!
//! Headless demo scenes built on `orrery-graphics`.
//!
//! ## Available Demos
//!
//! - `sphere_demo` - A single UV sphere, optionally as a point cloud, with
//!   resolution rebuilds
//! - `solar_system_demo` - A catalog of orbiting-body trees rendered through
//!   the scene-graph renderer
//!
//! Both run against the in-memory [`DummyContext`](orrery_graphics::DummyContext)
//! for a fixed number of frames.

pub mod args;
pub mod camera;
pub mod config;
pub mod error;
pub mod frame_loop;
pub mod program;
pub mod solar_system;
pub mod sphere;

pub use camera::Camera;
pub use config::{NamedSystem, SystemCatalog};
pub use error::{ConfigError, DemoError};
pub use frame_loop::{FrameLoop, FrameReport, LogTotals, Scene};
pub use program::LoggingProgram;
pub use solar_system::SolarSystemScene;
pub use sphere::{SphereScene, SphereSettings};

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
