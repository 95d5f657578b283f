//! End-to-end: config file in, published overlay snapshots out.

use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use gloam::config::OverlayConfig;
use gloam::watch::watch_config;
use gloam_blocks::BlockRegistry;
use gloam_geom::VoxelPos;
use gloam_overlay::OverlayReader;
use gloam_runtime::ScanScheduler;
use gloam_world::{GridWorld, WorldOracle, generate_terrain};

fn surface_y(world: &GridWorld, x: i32, z: i32) -> i32 {
    let (_, sy, _) = world.size();
    (0..sy as i32)
        .rev()
        .find(|&y| !world.block(VoxelPos::new(x, y, z)).is_air())
        .unwrap_or(0)
}

fn wait_until(
    reader: &OverlayReader,
    timeout: Duration,
    mut pred: impl FnMut(&OverlayReader) -> bool,
) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if pred(reader) {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn first_run_writes_defaults_then_loads_them() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overlay.toml");

    let cfg = OverlayConfig::load_or_init(&path).unwrap();
    assert!(path.exists());
    assert_eq!(cfg, OverlayConfig::default());

    // second run reads the file it wrote
    let again = OverlayConfig::load_or_init(&path).unwrap();
    assert_eq!(again, cfg);
}

#[test]
fn malformed_and_invalid_configs_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overlay.toml");

    fs::write(&path, "draw_distance = \"far\"").unwrap();
    assert!(OverlayConfig::load_or_init(&path).is_err());

    fs::write(&path, "draw_distance = -3").unwrap();
    assert!(OverlayConfig::load_or_init(&path).is_err());
}

#[test]
fn config_file_drives_a_full_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overlay.toml");
    fs::write(
        &path,
        "draw_distance = 12\ngenerate_interval_ms = 5\nstrategy = \"flood\"\n",
    )
    .unwrap();
    let cfg = OverlayConfig::load_or_init(&path).unwrap();
    let settings = cfg.settings().unwrap();

    let reg = Arc::new(BlockRegistry::default_catalog());
    let world = Arc::new(generate_terrain(Arc::clone(&reg), 2, 2, 32, 7));
    let observer = VoxelPos::new(16, surface_y(&world, 16, 16) + 1, 16);

    let oracle: Arc<dyn WorldOracle> = Arc::clone(&world) as Arc<dyn WorldOracle>;
    let sched = ScanScheduler::spawn(oracle, reg, settings, observer).unwrap();
    let reader = sched.reader();
    sched.set_active(true);

    assert!(wait_until(&reader, Duration::from_secs(5), |r| {
        !r.snapshot().is_empty()
    }));
    for rec in reader.snapshot().iter() {
        assert!(rec.light <= cfg.light_cutoff);
        assert!((0.0..=1.0).contains(&rec.height));
    }
    sched.stop();
}

#[test]
fn editing_the_config_reshapes_the_scan() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overlay.toml");
    fs::write(&path, "generate_interval_ms = 5\n").unwrap();
    let cfg = OverlayConfig::load_or_init(&path).unwrap();

    let reg = Arc::new(BlockRegistry::default_catalog());
    let world = Arc::new(generate_terrain(Arc::clone(&reg), 2, 2, 32, 3));
    // high above the terrain, so a tiny radius sees only air
    let observer = VoxelPos::new(16, surface_y(&world, 16, 16) + 10, 16);

    let oracle: Arc<dyn WorldOracle> = Arc::clone(&world) as Arc<dyn WorldOracle>;
    let sched = ScanScheduler::spawn(oracle, reg, cfg.settings().unwrap(), observer).unwrap();
    watch_config(path.clone(), sched.client());
    let reader = sched.reader();
    sched.set_active(true);

    assert!(wait_until(&reader, Duration::from_secs(5), |r| {
        !r.snapshot().is_empty()
    }));

    fs::write(&path, "generate_interval_ms = 5\ndraw_distance = 2\n").unwrap();
    assert!(wait_until(&reader, Duration::from_secs(10), |r| {
        r.snapshot().is_empty()
    }));
    sched.stop();
}
