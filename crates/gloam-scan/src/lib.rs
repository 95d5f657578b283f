//! Spawn-surface scanning: voxel classification, the column walk, and
//! the flood-fill alternative, all behind one `run_scan` entry point.
#![forbid(unsafe_code)]

mod column;
mod flood;

pub use column::{scan_columns, surface_transitions};
pub use flood::scan_flood;

use gloam_blocks::{Block, BlockRegistry};
use gloam_geom::{Region, VoxelPos};
use gloam_overlay::{ATLAS_ROW_LEN, OverlayRecord, OverlaySet};
use gloam_world::{LightChannel, WorldOracle};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum light value a channel can report.
pub const LIGHT_MAX: u8 = 15;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan radius must be at least 1, got {0}")]
    InvalidRadius(i32),
    #[error("light cutoff must be at most {LIGHT_MAX}, got {0}")]
    InvalidCutoff(u8),
    #[error("atlas row must be below {ATLAS_ROW_LEN}, got {0}")]
    InvalidAtlasRow(u8),
}

/// Which traversal produces the overlay set. Both emit the same
/// surfaces wherever the open space above them is connected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Exhaustive per-column walk over the region footprint.
    #[default]
    Columns,
    /// FIFO flood fill through open space seeded at the observer.
    Flood,
}

/// Per-scan knobs, validated once at the start of every scan.
#[derive(Clone, Copy, Debug)]
pub struct ScanConfig {
    /// Horizontal/vertical scan reach in voxels.
    pub radius: i32,
    /// Surfaces brighter than this are dropped.
    pub light_cutoff: u8,
    /// Light channel sampled for the marker index.
    pub channel: LightChannel,
    /// Atlas row the renderer combines with the sampled light.
    pub atlas_row: u8,
    /// Also mark surfaces that cannot be spawned on (farmland, glass).
    pub include_non_spawnable: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            radius: 25,
            light_cutoff: LIGHT_MAX,
            channel: LightChannel::Block,
            atlas_row: 0,
            include_non_spawnable: false,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.radius < 1 {
            return Err(ScanError::InvalidRadius(self.radius));
        }
        if self.light_cutoff > LIGHT_MAX {
            return Err(ScanError::InvalidCutoff(self.light_cutoff));
        }
        if self.atlas_row >= ATLAS_ROW_LEN {
            return Err(ScanError::InvalidAtlasRow(self.atlas_row));
        }
        Ok(())
    }
}

/// How one voxel reads to the scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Traversable space: air, or a block with no markable top.
    Open,
    /// Full opaque cube.
    Opaque,
    /// Non-cube block whose top still takes a marker.
    Eligible,
}

impl SurfaceKind {
    #[inline]
    pub fn is_surface(self) -> bool {
        !matches!(self, SurfaceKind::Open)
    }
}

/// Classify a voxel. Eligibility wins over opacity so partial blocks
/// flagged opaque by a catalog still sample light at the right cell.
pub fn classify(reg: &BlockRegistry, block: Option<Block>, cfg: &ScanConfig) -> SurfaceKind {
    let Some(block) = block else {
        return SurfaceKind::Open;
    };
    let Some(ty) = reg.get(block.id) else {
        return SurfaceKind::Open;
    };
    if ty.overlay_surface || (cfg.include_non_spawnable && ty.non_spawnable) {
        SurfaceKind::Eligible
    } else if ty.opaque_cube {
        SurfaceKind::Opaque
    } else {
        SurfaceKind::Open
    }
}

/// Build the record for a surface voxel, or `None` when the sampled
/// light is brighter than the cutoff.
///
/// Opaque cubes always sample light one voxel above; eligible partial
/// blocks sample above only when their top reaches the upper half of
/// the voxel, otherwise inside their own cell (light passes over a
/// plate or carpet, not around it).
pub fn surface_record(
    oracle: &dyn WorldOracle,
    cfg: &ScanConfig,
    pos: VoxelPos,
    kind: SurfaceKind,
) -> Option<OverlayRecord> {
    let height = if oracle.has_solid_top(pos) {
        1.0
    } else {
        oracle.top_surface_height(pos).clamp(0.0, 1.0)
    };
    let sample = match kind {
        SurfaceKind::Eligible if height < 0.5 => pos,
        _ => pos.above(),
    };
    let light = oracle.light_level(cfg.channel, sample).min(LIGHT_MAX);
    if light > cfg.light_cutoff {
        return None;
    }
    Some(OverlayRecord {
        pos,
        height,
        light,
        atlas_row: cfg.atlas_row,
    })
}

/// Run one full scan around the observer, feeding records to `sink`.
pub fn run_scan(
    oracle: &dyn WorldOracle,
    reg: &BlockRegistry,
    cfg: &ScanConfig,
    strategy: Strategy,
    observer: VoxelPos,
    sink: &mut dyn FnMut(OverlayRecord),
) -> Result<(), ScanError> {
    cfg.validate()?;
    let region = Region::around(observer, cfg.radius);
    match strategy {
        Strategy::Columns => scan_columns(oracle, reg, cfg, &region, sink),
        Strategy::Flood => scan_flood(oracle, reg, cfg, observer, &region, sink),
    }
    Ok(())
}

/// `run_scan` collected into an owned set. Convenient for tests and
/// one-shot callers; the scheduler streams into its writer instead.
pub fn scan_to_set(
    oracle: &dyn WorldOracle,
    reg: &BlockRegistry,
    cfg: &ScanConfig,
    strategy: Strategy,
    observer: VoxelPos,
) -> Result<OverlaySet, ScanError> {
    let mut out = OverlaySet::new();
    run_scan(oracle, reg, cfg, strategy, observer, &mut |rec| {
        out.push(rec)
    })?;
    Ok(out)
}
