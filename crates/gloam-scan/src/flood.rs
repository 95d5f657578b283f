//! Flood-fill traversal: walks open space out from the observer and
//! marks the solid tops it stands on. Sealed pockets are never visited,
//! which is the point; surfaces the observer could not path to are not
//! worth drawing.

use std::collections::VecDeque;

use gloam_blocks::BlockRegistry;
use gloam_geom::{Region, VoxelPos};
use gloam_overlay::OverlayRecord;
use gloam_world::{ChunkCoord, WorldOracle};
use hashbrown::HashSet;

use crate::{ScanConfig, SurfaceKind, classify, surface_record};

/// Breadth-first fill seeded at the observer's own voxel.
///
/// Voxels in unloaded chunks are treated as walls: not traversed, not
/// emitted. The fill never leaves `region`.
pub fn scan_flood(
    oracle: &dyn WorldOracle,
    reg: &BlockRegistry,
    cfg: &ScanConfig,
    observer: VoxelPos,
    region: &Region,
    sink: &mut dyn FnMut(OverlayRecord),
) {
    let mut visited: HashSet<VoxelPos> = HashSet::new();
    let mut surfaced: HashSet<VoxelPos> = HashSet::new();
    let mut queue: VecDeque<VoxelPos> = VecDeque::new();
    queue.push_back(observer);

    while let Some(pos) = queue.pop_front() {
        if !region.contains(pos) || !visited.insert(pos) {
            continue;
        }
        if !oracle.chunk_loaded(ChunkCoord::of_world(pos.x, pos.z)) {
            continue;
        }
        let kind = classify(reg, oracle.block_at(pos), cfg);

        // Climb within head height even through solids, so a buried
        // observer still surfaces out of its own column.
        if pos.y < region.y_top() {
            queue.push_back(pos.above());
        }

        if kind == SurfaceKind::Open {
            let below = pos.below();
            if region.contains(below)
                && oracle.chunk_loaded(ChunkCoord::of_world(below.x, below.z))
            {
                let below_kind = classify(reg, oracle.block_at(below), cfg);
                if below_kind.is_surface() && surfaced.insert(below) {
                    if let Some(rec) = surface_record(oracle, cfg, below, below_kind) {
                        sink(rec);
                    }
                }
            }
        }

        for next in [
            pos.below(),
            pos.offset(1, 0, 0),
            pos.offset(-1, 0, 0),
            pos.offset(0, 0, 1),
            pos.offset(0, 0, -1),
        ] {
            if region.contains(next)
                && !visited.contains(&next)
                && classify(reg, oracle.block_at(next), cfg) == SurfaceKind::Open
            {
                queue.push_back(next);
            }
        }
    }
}
