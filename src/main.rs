use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use gloam::config::OverlayConfig;
use gloam::watch::watch_config;
use gloam_blocks::BlockRegistry;
use gloam_geom::VoxelPos;
use gloam_runtime::ScanScheduler;
use gloam_world::{GridWorld, WorldOracle, generate_terrain};

#[derive(Parser, Debug)]
#[command(name = "gloam", about = "Spawn-surface light overlay demo")]
struct Args {
    /// Overlay config TOML, created with defaults when missing
    #[arg(long, default_value = "overlay.toml")]
    config: PathBuf,
    /// Terrain seed for the demo world
    #[arg(long, default_value_t = 1)]
    seed: i32,
    /// Observer steps to walk before exiting
    #[arg(long, default_value_t = 12)]
    steps: u32,
    /// Hot-reload the config file while running
    #[arg(long)]
    watch: bool,
}

/// Highest occupied y in a column, for placing the observer on foot.
fn surface_y(world: &GridWorld, x: i32, z: i32) -> i32 {
    let (_, sy, _) = world.size();
    (0..sy as i32)
        .rev()
        .find(|&y| !world.block(VoxelPos::new(x, y, z)).is_air())
        .unwrap_or(0)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
    let args = Args::parse();

    let cfg = OverlayConfig::load_or_init(&args.config)?;
    let settings = cfg.settings()?;
    let reg = match &cfg.blocks_catalog {
        Some(path) => Arc::new(BlockRegistry::load_from_path(path)?),
        None => Arc::new(BlockRegistry::default_catalog()),
    };

    let world = Arc::new(generate_terrain(Arc::clone(&reg), 4, 4, 64, args.seed));
    let (sx, _, sz) = world.size();
    let z = sz as i32 / 2;
    let mut x = sx as i32 / 4;
    let start = VoxelPos::new(x, surface_y(&world, x, z) + 1, z);

    let oracle: Arc<dyn WorldOracle> = Arc::clone(&world) as Arc<dyn WorldOracle>;
    let sched = ScanScheduler::spawn(oracle, reg, settings, start)?;
    if args.watch {
        watch_config(args.config.clone(), sched.client());
    }
    let reader = sched.reader();
    sched.set_active(true);

    for step in 0..args.steps {
        thread::sleep(settings.interval.max(Duration::from_millis(50)));
        x = (x + 3).min(sx as i32 - 1);
        let pos = VoxelPos::new(x, surface_y(&world, x, z) + 1, z);
        sched.update_observer(pos);
        let snap = reader.snapshot();
        log::info!(
            "step {step}: observer {pos}, {} overlays (generation {})",
            snap.len(),
            reader.generation()
        );
    }
    sched.stop();
    Ok(())
}
