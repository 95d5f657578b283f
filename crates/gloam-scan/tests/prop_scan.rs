//! Cross-strategy properties over generated terrain.

use std::sync::Arc;

use gloam_blocks::BlockRegistry;
use gloam_geom::{Region, VoxelPos};
use gloam_scan::{ScanConfig, Strategy, scan_to_set};
use gloam_world::{GridWorld, LightChannel, generate_terrain};
use proptest::prelude::*;

fn terrain(seed: i32) -> GridWorld {
    generate_terrain(Arc::new(BlockRegistry::default_catalog()), 2, 2, 32, seed)
}

/// Highest non-air voxel anywhere in the world.
fn surface_top(w: &GridWorld) -> i32 {
    let (sx, sy, sz) = w.size();
    let mut top = 0;
    for x in 0..sx as i32 {
        for z in 0..sz as i32 {
            for y in (0..sy as i32).rev() {
                if !w.block(VoxelPos::new(x, y, z)).is_air() {
                    top = top.max(y);
                    break;
                }
            }
        }
    }
    top
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    // With the observer above all terrain every surface sits under
    // connected open space, so the two traversals must agree.
    #[test]
    fn strategies_agree_over_open_terrain(
        seed in 0i32..500,
        radius in 4i32..20,
        ox in 4i32..28,
        oz in 4i32..28,
    ) {
        let w = terrain(seed);
        let observer = VoxelPos::new(ox, surface_top(&w) + 1, oz);
        let cfg = ScanConfig { radius, ..Default::default() };

        let cols = scan_to_set(&w, w.registry(), &cfg, Strategy::Columns, observer).unwrap();
        let flood = scan_to_set(&w, w.registry(), &cfg, Strategy::Flood, observer).unwrap();
        prop_assert_eq!(cols.positions(), flood.positions());
    }

    #[test]
    fn scanning_is_deterministic(seed in 0i32..500, radius in 4i32..20) {
        let w = terrain(seed);
        let observer = VoxelPos::new(16, surface_top(&w) + 1, 16);
        let cfg = ScanConfig { radius, ..Default::default() };
        for strategy in [Strategy::Columns, Strategy::Flood] {
            let a = scan_to_set(&w, w.registry(), &cfg, strategy, observer).unwrap();
            let b = scan_to_set(&w, w.registry(), &cfg, strategy, observer).unwrap();
            prop_assert_eq!(a.records(), b.records());
        }
    }

    #[test]
    fn records_respect_cutoff_and_region(
        seed in 0i32..500,
        radius in 4i32..20,
        cutoff in 0u8..=15,
        sky in proptest::bool::ANY,
    ) {
        let w = terrain(seed);
        let observer = VoxelPos::new(16, surface_top(&w) + 1, 16);
        let cfg = ScanConfig {
            radius,
            light_cutoff: cutoff,
            channel: if sky { LightChannel::Sky } else { LightChannel::Block },
            ..Default::default()
        };
        let region = Region::around(observer, radius);
        let set = scan_to_set(&w, w.registry(), &cfg, Strategy::Columns, observer).unwrap();
        for rec in set.iter() {
            prop_assert!(rec.light <= cutoff);
            prop_assert!(region.contains(rec.pos));
            prop_assert!((0.0..=1.0).contains(&rec.height));
        }
    }
}
