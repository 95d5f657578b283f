//! Exhaustive column walk: every (x, z) in the region, top to bottom.

use gloam_blocks::BlockRegistry;
use gloam_geom::{Region, VoxelPos};
use gloam_overlay::OverlayRecord;
use gloam_world::{CHUNK_SIZE, ChunkCoord, WorldOracle};

use crate::{ScanConfig, SurfaceKind, classify, surface_record};

/// Fold a top-to-bottom run of voxel kinds into its surface cells.
///
/// A surface is a solid or eligible voxel entered from open space; the
/// walk starts "in open space", so a solid voxel at the very top of the
/// run is itself a surface. Consecutive solid voxels below it emit
/// nothing until the walk passes through open space again.
pub fn surface_transitions<I>(kinds: I) -> impl Iterator<Item = (i32, SurfaceKind)>
where
    I: IntoIterator<Item = (i32, SurfaceKind)>,
{
    kinds
        .into_iter()
        .scan(false, |in_solid, (y, kind)| {
            let was_solid = *in_solid;
            *in_solid = kind.is_surface();
            Some((!was_solid && kind.is_surface()).then_some((y, kind)))
        })
        .flatten()
}

/// Walk every column of the region, one chunk at a time so a whole
/// unloaded chunk is skipped with a single oracle query.
pub fn scan_columns(
    oracle: &dyn WorldOracle,
    reg: &BlockRegistry,
    cfg: &ScanConfig,
    region: &Region,
    sink: &mut dyn FnMut(OverlayRecord),
) {
    let s = CHUNK_SIZE as i32;
    let (c0x, c1x) = (region.min.x.div_euclid(s), region.max.x.div_euclid(s));
    let (c0z, c1z) = (region.min.z.div_euclid(s), region.max.z.div_euclid(s));
    for cx in c0x..=c1x {
        for cz in c0z..=c1z {
            let coord = ChunkCoord::new(cx, cz);
            if !oracle.chunk_loaded(coord) {
                continue;
            }
            let (bx, bz) = coord.base();
            let x0 = region.min.x.max(bx);
            let x1 = region.max.x.min(bx + s - 1);
            let z0 = region.min.z.max(bz);
            let z1 = region.max.z.min(bz + s - 1);
            for x in x0..=x1 {
                for z in z0..=z1 {
                    scan_column(oracle, reg, cfg, region, x, z, sink);
                }
            }
        }
    }
}

fn scan_column(
    oracle: &dyn WorldOracle,
    reg: &BlockRegistry,
    cfg: &ScanConfig,
    region: &Region,
    x: i32,
    z: i32,
    sink: &mut dyn FnMut(OverlayRecord),
) {
    let kinds = (region.y_bottom()..=region.y_top()).rev().map(|y| {
        let pos = VoxelPos::new(x, y, z);
        (y, classify(reg, oracle.block_at(pos), cfg))
    });
    for (y, kind) in surface_transitions(kinds) {
        let pos = VoxelPos::new(x, y, z);
        if let Some(rec) = surface_record(oracle, cfg, pos, kind) {
            sink(rec);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold(kinds: &[SurfaceKind]) -> Vec<i32> {
        let top = kinds.len() as i32 - 1;
        let seq = kinds.iter().enumerate().map(|(i, k)| (top - i as i32, *k));
        surface_transitions(seq).map(|(y, _)| y).collect()
    }

    use SurfaceKind::{Eligible, Open, Opaque};

    #[test]
    fn all_open_emits_nothing() {
        assert!(fold(&[Open, Open, Open]).is_empty());
    }

    #[test]
    fn open_to_solid_emits_once_per_run() {
        // top y=4 down to y=0
        assert_eq!(fold(&[Open, Opaque, Opaque, Open, Eligible]), vec![3, 0]);
    }

    #[test]
    fn solid_at_the_scan_top_is_a_surface() {
        assert_eq!(fold(&[Opaque, Opaque, Opaque]), vec![2]);
    }

    #[test]
    fn eligible_counts_as_solid_for_the_fold() {
        // slab directly on stone is one run, one surface
        assert_eq!(fold(&[Open, Eligible, Opaque]), vec![1]);
    }
}
