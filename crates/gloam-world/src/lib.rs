//! World-facing seam: the oracle trait, chunk coordinates, and an
//! in-memory grid world for tests and the demo binary.
#![forbid(unsafe_code)]

use gloam_blocks::Block;
use gloam_geom::VoxelPos;
use serde::{Deserialize, Serialize};

mod grid;
mod worldgen;

pub use worldgen::generate_terrain;
pub use grid::GridWorld;

/// Horizontal chunk-column edge in voxels. A traversal-locality tunable,
/// not a format constraint.
pub const CHUNK_SIZE: usize = 16;

/// Horizontal chunk-column coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    /// Chunk column containing a world position.
    #[inline]
    pub fn of_world(x: i32, z: i32) -> Self {
        let s = CHUNK_SIZE as i32;
        Self {
            cx: x.div_euclid(s),
            cz: z.div_euclid(s),
        }
    }

    /// World x/z of this chunk's minimum corner.
    #[inline]
    pub fn base(self) -> (i32, i32) {
        let s = CHUNK_SIZE as i32;
        (self.cx * s, self.cz * s)
    }
}

/// Which stored light value to sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightChannel {
    Sky,
    Block,
}

/// Read-only view of the voxel world, callable from the scan thread.
///
/// Queries that touch unloaded chunks or leave the world report "no
/// data" (`None`, zeroed light, `chunk_loaded == false`); they never
/// fault.
pub trait WorldOracle: Send + Sync {
    /// Block occupying the voxel, or `None` for air / no data.
    fn block_at(&self, pos: VoxelPos) -> Option<Block>;
    /// Whether the voxel presents a flat solid top face.
    fn has_solid_top(&self, pos: VoxelPos) -> bool;
    /// Stored light value in [0, 15] for the channel at the voxel.
    fn light_level(&self, channel: LightChannel, pos: VoxelPos) -> u8;
    /// Whether the chunk column is resident and queryable.
    fn chunk_loaded(&self, coord: ChunkCoord) -> bool;
    /// Top-surface height within the voxel, in [0, 1].
    fn top_surface_height(&self, pos: VoxelPos) -> f32;
}
