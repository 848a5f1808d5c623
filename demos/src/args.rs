//! Command-line arguments for the demo binaries.

use std::path::PathBuf;

use clap::Parser;

use crate::sphere::SphereSettings;

/// Orrery sphere demo arguments.
#[derive(Parser, Debug)]
#[command(
    name = "sphere_demo",
    about = "Draws a UV sphere headless",
    long_about = "Builds a UV sphere mesh, draws it for a number of frames against the \
                  in-memory graphics context and logs every frame's vertex count.",
    version
)]
pub struct SphereArgs {
    /// Longitude subdivisions (clamped to 2..=256)
    #[arg(long, default_value = "32")]
    pub sectors: u32,

    /// Latitude subdivisions (clamped to 2..=256)
    #[arg(long, default_value = "32")]
    pub stacks: u32,

    /// Sphere radius
    #[arg(long, default_value = "1.0")]
    pub radius: f32,

    /// Draw vertices as points
    #[arg(long)]
    pub point_cloud: bool,

    /// Number of frames to draw
    #[arg(long, default_value = "60")]
    pub frames: u64,

    /// Double the sector and stack counts every N frames
    #[arg(long)]
    pub rebuild_every: Option<u64>,
}

impl SphereArgs {
    pub fn settings(&self) -> SphereSettings {
        SphereSettings {
            sector_count: self.sectors,
            stack_count: self.stacks,
            radius: self.radius,
            point_cloud: self.point_cloud,
        }
    }
}

/// Orrery solar-system demo arguments.
#[derive(Parser, Debug)]
#[command(
    name = "solar_system_demo",
    about = "Animates a tree of orbiting bodies headless",
    long_about = "Loads a solar-system catalog, renders the selected system for a number of \
                  fixed-step frames against the in-memory graphics context and logs the draw \
                  statistics.",
    version
)]
pub struct SolarSystemArgs {
    /// Catalog file (TOML); the built-in catalog is used when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// System to render; defaults to the first one in the catalog
    #[arg(long)]
    pub system: Option<String>,

    /// Number of frames to draw
    #[arg(long, default_value = "120")]
    pub frames: u64,

    /// Simulated milliseconds per frame
    #[arg(long, default_value = "16.0")]
    pub time_step: f32,

    /// Simulation time of the first frame, in milliseconds
    #[arg(long, default_value = "0.0")]
    pub start_time: f32,

    /// Keep the simulation clock stopped
    #[arg(long)]
    pub paused: bool,

    /// Draw bodies as colored cubes
    #[arg(long)]
    pub debug_cubes: bool,
}
