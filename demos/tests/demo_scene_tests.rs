//! Headless runs of the demo scenes through `FrameLoop`.

use std::cell::RefCell;
use std::rc::Rc;

use rstest::rstest;

use orrery_core::mesh::PrimitiveTopology;
use orrery_demos::{
    DemoError, FrameLoop, LogTotals, SolarSystemScene, SphereScene, SphereSettings, SystemCatalog,
};
use orrery_graphics::DummyContext;

fn dummy_context() -> Rc<RefCell<DummyContext>> {
    let _ = env_logger::builder().is_test(true).try_init();
    Rc::new(RefCell::new(DummyContext::new()))
}

#[rstest]
#[case::sun_earth_moon("sun-earth-moon", 3)]
#[case::gas_giant("gas-giant", 4)]
#[case::binary_star("binary-star", 2)]
fn test_builtin_system_runs(#[case] name: &str, #[case] bodies: usize) {
    let ctx = dummy_context();
    let mut scene = SolarSystemScene::new(ctx.clone(), SystemCatalog::builtin().unwrap());
    scene.select_system(name).unwrap();
    scene.play();

    let report = FrameLoop::new(10, 16.0).run(&mut scene).unwrap();

    assert_eq!(report.frames_drawn, 10);
    assert_eq!(scene.time(), 160.0);
    assert_eq!(scene.last_stats().nodes_drawn, bodies);
    assert_eq!(ctx.borrow().draws().len(), 10 * bodies);
    // Everything is released once the loop ends.
    assert_eq!(ctx.borrow().live_buffer_count(), 0);
}

#[rstest]
#[case::triangles(false, PrimitiveTopology::TriangleList)]
#[case::points(true, PrimitiveTopology::PointList)]
fn test_sphere_scene_topology(#[case] point_cloud: bool, #[case] expected: PrimitiveTopology) {
    let ctx = dummy_context();
    let mut scene = SphereScene::new(
        ctx.clone(),
        SphereSettings {
            point_cloud,
            ..Default::default()
        },
    );

    FrameLoop::new(3, 16.0).run(&mut scene).unwrap();

    let draws = ctx.borrow().draws().to_vec();
    assert_eq!(draws.len(), 3);
    assert!(draws.iter().all(|draw| draw.topology == expected));
}

#[test]
fn test_sphere_rebuild_between_frames() {
    let ctx = dummy_context();
    let mut scene = SphereScene::new(
        ctx.clone(),
        SphereSettings {
            sector_count: 4,
            stack_count: 2,
            ..Default::default()
        },
    );

    let mut counts = Vec::new();
    FrameLoop::new(3, 16.0)
        .run_with(&mut scene, |scene, frame| {
            if frame > 0 {
                counts.push(scene.last_vertex_count());
                let settings = *scene.settings();
                scene.set_sector_count(settings.sector_count * 2)?;
            }
            Ok(())
        })
        .unwrap();

    assert_eq!(counts, vec![Some(5 * 3), Some(9 * 3)]);
    assert_eq!(scene.rebuild_count(), 2);
    assert_eq!(scene.last_vertex_count(), Some(17 * 3));
    assert_eq!(ctx.borrow().live_buffer_count(), 0);
}

#[test]
fn test_catalog_from_file_drives_scene() {
    let text = r#"
        [[system]]
        name = "pair"

        [system.root]
        name = "planet"
        distance_from_parent = 5.0
        rotation_speed_around_parent = 0.01

        [[system.root.children]]
        name = "moon"
        scale = 0.25
    "#;
    let path = std::env::temp_dir().join("orrery_demo_scene_tests_pair.toml");
    std::fs::write(&path, text).unwrap();

    let catalog = SystemCatalog::load(&path).unwrap();
    let ctx = dummy_context();
    let mut scene = SolarSystemScene::new(ctx.clone(), catalog);
    FrameLoop::new(2, 16.0).run(&mut scene).unwrap();

    assert_eq!(scene.selected_system().name, "pair");
    assert_eq!(ctx.borrow().draws().len(), 4);
    // Paused by default.
    assert_eq!(scene.time(), 0.0);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_failed_frame_still_releases_meshes() {
    let ctx = dummy_context();
    let mut scene = SphereScene::new(ctx.clone(), SphereSettings::default());

    let result = FrameLoop::new(5, 16.0).run_with(&mut scene, |_, frame| {
        if frame == 2 {
            Err(DemoError::NotStarted("injected".to_string()))
        } else {
            Ok(())
        }
    });

    assert!(matches!(result, Err(DemoError::NotStarted(_))));
    assert_eq!(ctx.borrow().draws().len(), 2);
    assert_eq!(ctx.borrow().live_buffer_count(), 0);
}

#[test]
fn test_draining_log_keeps_one_frame() {
    let ctx = dummy_context();
    let mut scene = SolarSystemScene::new(ctx.clone(), SystemCatalog::builtin().unwrap());
    scene.select_system("gas-giant").unwrap();
    scene.play();

    let mut totals = LogTotals::default();
    let mut largest_log = 0;
    FrameLoop::new(200, 16.0)
        .run_with(&mut scene, |_, _| {
            largest_log = largest_log.max(ctx.borrow().draws().len());
            totals.drain(&mut ctx.borrow_mut());
            Ok(())
        })
        .unwrap();
    totals.drain(&mut ctx.borrow_mut());

    // Never more than one frame of draws is held.
    assert_eq!(largest_log, 4);
    assert_eq!(totals.draws, 200 * 4);
    assert!(totals.calls > totals.draws);
    assert!(ctx.borrow().calls().is_empty());
    assert!(ctx.borrow().draws().is_empty());
}
