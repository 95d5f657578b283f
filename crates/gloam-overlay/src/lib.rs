//! Overlay records and the single-writer/single-reader publish buffer.
#![forbid(unsafe_code)]

mod buffer;

pub use buffer::{OverlayReader, OverlayWriter, overlay_buffer};

use gloam_geom::VoxelPos;

/// Light levels per atlas row: one 16-cell band of the marker texture.
pub const ATLAS_ROW_LEN: u8 = 16;

/// One renderable spawn-surface marker. Immutable once created.
///
/// `light` is the raw sampled channel value; the atlas row is kept
/// separate and the two are combined only at the renderer boundary so
/// the record survives a different atlas layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayRecord {
    pub pos: VoxelPos,
    /// Top-surface height within the voxel, in [0, 1]; 1.0 on full blocks.
    pub height: f32,
    /// Sampled light channel value, in [0, 15].
    pub light: u8,
    /// Texture-atlas row selector, in [0, 15].
    pub atlas_row: u8,
}

impl OverlayRecord {
    /// Final texture index for the renderer: light plus the row offset.
    #[inline]
    pub fn atlas_index(&self) -> u16 {
        u16::from(self.light) + u16::from(self.atlas_row) * u16::from(ATLAS_ROW_LEN)
    }
}

/// An ordered batch of overlay records from one completed scan.
/// Insertion order carries no meaning for rendering.
#[derive(Clone, Debug, Default)]
pub struct OverlaySet {
    records: Vec<OverlayRecord>,
    generation: u64,
}

impl OverlaySet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, rec: OverlayRecord) {
        self.records.push(rec);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn records(&self) -> &[OverlayRecord] {
        &self.records
    }

    /// Publish generation this set was swapped in under; 0 for a set
    /// that has never been published. The stamp travels with the set,
    /// so equal generations always mean an identical set.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, OverlayRecord> {
        self.records.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
        self.generation = 0;
    }

    /// Position set, order-insensitive; test helper for set equality.
    pub fn positions(&self) -> Vec<VoxelPos> {
        let mut v: Vec<VoxelPos> = self.records.iter().map(|r| r.pos).collect();
        v.sort_unstable_by_key(|p| (p.x, p.y, p.z));
        v
    }
}

impl<'a> IntoIterator for &'a OverlaySet {
    type Item = &'a OverlayRecord;
    type IntoIter = std::slice::Iter<'a, OverlayRecord>;
    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<OverlayRecord> for OverlaySet {
    fn from_iter<T: IntoIterator<Item = OverlayRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
            generation: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atlas_index_combines_row_and_light() {
        let rec = OverlayRecord {
            pos: VoxelPos::new(0, 0, 0),
            height: 1.0,
            light: 7,
            atlas_row: 2,
        };
        assert_eq!(rec.atlas_index(), 39);
        // raw sample is preserved untouched
        assert_eq!(rec.light, 7);
    }
}
