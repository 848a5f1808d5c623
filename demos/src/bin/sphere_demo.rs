//! # Sphere Demo
//!
//! Draws a single UV sphere against the in-memory graphics context and logs
//! the vertex count of every frame. With `--rebuild-every N` the sector and
//! stack counts double every N frames, rebuilding the mesh.

use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use orrery_demos::args::SphereArgs;
use orrery_demos::{FrameLoop, LogTotals, Scene, SphereScene};
use orrery_graphics::DummyContext;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = SphereArgs::parse();

    log::info!("Starting Orrery Sphere Demo");
    log::info!("Core version: {}", orrery_core::VERSION);
    log::info!("Graphics version: {}", orrery_graphics::VERSION);

    orrery_core::init();
    orrery_graphics::init();

    let context = Rc::new(RefCell::new(DummyContext::new()));
    let mut scene = SphereScene::new(context.clone(), args.settings());
    let frame_loop = FrameLoop::new(args.frames, 16.0);

    let mut totals = LogTotals::default();
    let result = frame_loop.run_with(&mut scene, |scene, frame| {
        totals.drain(&mut context.borrow_mut());
        match args.rebuild_every {
            Some(every) if every > 0 && frame > 0 && frame % every == 0 => {
                let settings = *scene.settings();
                scene.set_sector_count(settings.sector_count.saturating_mul(2))?;
                scene.set_stack_count(settings.stack_count.saturating_mul(2))?;
            }
            _ => {}
        }
        Ok(())
    });

    totals.drain(&mut context.borrow_mut());

    match result {
        Ok(report) => {
            log::info!(
                "{} drew {} frame(s), {} rebuild(s), last frame {} vertices, {} context calls",
                scene.name(),
                report.frames_drawn,
                scene.rebuild_count(),
                scene.last_vertex_count().unwrap_or(0),
                totals.calls
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Sphere demo failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
