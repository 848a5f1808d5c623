//! # Solar System Demo
//!
//! Renders one system from a solar-system catalog against the in-memory
//! graphics context for a fixed number of frames.

use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use orrery_demos::args::SolarSystemArgs;
use orrery_demos::{DemoError, FrameLoop, LogTotals, SolarSystemScene, SystemCatalog};
use orrery_graphics::DummyContext;

fn run(args: &SolarSystemArgs) -> Result<(), DemoError> {
    let catalog = match &args.config {
        Some(path) => SystemCatalog::load(path)?,
        None => SystemCatalog::builtin()?,
    };
    let context = Rc::new(RefCell::new(DummyContext::new()));
    let mut scene = SolarSystemScene::new(context.clone(), catalog);
    log::info!(
        "Available systems: {}",
        scene.catalog().names().collect::<Vec<_>>().join(", ")
    );
    if let Some(name) = &args.system {
        scene.select_system(name)?;
    }
    scene.set_time(args.start_time);
    scene.set_debug_cubes(args.debug_cubes);
    if args.paused {
        scene.pause();
    } else {
        scene.play();
    }

    let mut totals = LogTotals::default();
    let report = FrameLoop::new(args.frames, args.time_step).run_with(&mut scene, |_, _| {
        totals.drain(&mut context.borrow_mut());
        Ok(())
    })?;
    totals.drain(&mut context.borrow_mut());

    let stats = scene.last_stats();
    log::info!(
        "`{}`: {} frame(s), t={} ms, {} bodies per frame, depth {}, {} draws issued",
        scene.selected_system().name,
        report.frames_drawn,
        scene.time(),
        stats.nodes_drawn,
        stats.max_depth,
        totals.draws
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = SolarSystemArgs::parse();

    log::info!("Starting Orrery Solar System Demo");
    log::info!("Core version: {}", orrery_core::VERSION);
    log::info!("Graphics version: {}", orrery_graphics::VERSION);

    orrery_core::init();
    orrery_graphics::init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("Solar system demo failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
