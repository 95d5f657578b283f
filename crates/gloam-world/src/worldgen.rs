use std::sync::Arc;

use fastnoise_lite::{FastNoiseLite, NoiseType};
use gloam_blocks::BlockRegistry;
use gloam_geom::VoxelPos;

use crate::GridWorld;

/// Generate rolling heightmap terrain for the demo and the
/// cross-strategy test suites: stone core, dirt skin, grass top, with
/// occasional torches and glowstone on the surface so the block-light
/// channel has structure. All open space is connected from above the
/// surface (no overhangs), which the flood-fill scanner relies on.
pub fn generate_terrain(
    reg: Arc<BlockRegistry>,
    chunks_x: usize,
    chunks_z: usize,
    height: usize,
    seed: i32,
) -> GridWorld {
    let stone = reg.block_by_name("stone").expect("catalog has stone");
    let dirt = reg.block_by_name("dirt").expect("catalog has dirt");
    let grass = reg.block_by_name("grass").expect("catalog has grass");
    let torch = reg.block_by_name("torch");
    let glowstone = reg.block_by_name("glowstone");

    let mut terrain = FastNoiseLite::with_seed(seed);
    terrain.set_noise_type(Some(NoiseType::OpenSimplex2));
    terrain.set_frequency(Some(0.015));
    let mut feature = FastNoiseLite::with_seed(seed ^ 99_173);
    feature.set_noise_type(Some(NoiseType::OpenSimplex2));
    feature.set_frequency(Some(0.9));

    let mut w = GridWorld::new(reg, chunks_x, chunks_z, height);
    let (sx, sy, sz) = w.size();
    let base = (sy / 4) as i32;
    let span = (sy / 2) as f32;

    for x in 0..sx as i32 {
        for z in 0..sz as i32 {
            let n = terrain.get_noise_2d(x as f32, z as f32); // [-1, 1]
            let h = base + ((n * 0.5 + 0.5) * span) as i32;
            let h = h.clamp(1, sy as i32 - 2);
            w.fill_column(x, z, 0, h - 3, stone);
            w.fill_column(x, z, (h - 2).max(0), h - 1, dirt);
            w.set_block(VoxelPos::new(x, h, z), grass);

            let f = feature.get_noise_2d(x as f32, z as f32);
            if f > 0.88 {
                if let Some(t) = torch {
                    w.set_block(VoxelPos::new(x, h + 1, z), t);
                }
            } else if f < -0.93 {
                if let Some(g) = glowstone {
                    w.set_block(VoxelPos::new(x, h + 1, z), g);
                }
            }
        }
    }
    w.recompute_light();
    w
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LightChannel, WorldOracle};

    #[test]
    fn terrain_is_capped_and_lit_from_above() {
        let reg = Arc::new(BlockRegistry::default_catalog());
        let w = generate_terrain(reg, 2, 2, 48, 1337);
        let (sx, sy, sz) = w.size();
        for x in (0..sx as i32).step_by(5) {
            for z in (0..sz as i32).step_by(5) {
                // the top of the world is always open sky
                let top = VoxelPos::new(x, sy as i32 - 1, z);
                assert_eq!(w.light_level(LightChannel::Sky, top), 15);
                // some block exists in every column
                assert!((0..sy as i32).any(|y| w.block_at(VoxelPos::new(x, y, z)).is_some()));
            }
        }
        assert_eq!((sx, sz), (32, 32));
    }

    #[test]
    fn same_seed_same_world() {
        let reg = Arc::new(BlockRegistry::default_catalog());
        let a = generate_terrain(reg.clone(), 1, 1, 32, 7);
        let b = generate_terrain(reg, 1, 1, 32, 7);
        let (sx, sy, sz) = a.size();
        for x in 0..sx as i32 {
            for y in 0..sy as i32 {
                for z in 0..sz as i32 {
                    let p = VoxelPos::new(x, y, z);
                    assert_eq!(a.block(p), b.block(p));
                }
            }
        }
    }
}
