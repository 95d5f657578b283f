use std::collections::VecDeque;
use std::sync::Arc;

use gloam_blocks::{Block, BlockRegistry};
use gloam_geom::VoxelPos;
use hashbrown::HashSet;

use crate::{CHUNK_SIZE, ChunkCoord, LightChannel, WorldOracle};

/// Flat-array voxel world used by tests and the demo binary.
///
/// Chunks are all resident unless explicitly marked unloaded; lighting
/// is recomputed on demand, not incrementally.
pub struct GridWorld {
    reg: Arc<BlockRegistry>,
    chunks_x: usize,
    chunks_z: usize,
    sx: usize,
    sy: usize,
    sz: usize,
    blocks: Vec<Block>,
    sky: Vec<u8>,
    blk: Vec<u8>,
    unloaded: HashSet<ChunkCoord>,
}

impl GridWorld {
    pub fn new(reg: Arc<BlockRegistry>, chunks_x: usize, chunks_z: usize, height: usize) -> Self {
        let sx = chunks_x * CHUNK_SIZE;
        let sz = chunks_z * CHUNK_SIZE;
        let sy = height;
        let n = sx * sy * sz;
        Self {
            reg,
            chunks_x,
            chunks_z,
            sx,
            sy,
            sz,
            blocks: vec![Block::AIR; n],
            sky: vec![0; n],
            blk: vec![0; n],
            unloaded: HashSet::new(),
        }
    }

    #[inline]
    pub fn registry(&self) -> &BlockRegistry {
        &self.reg
    }

    #[inline]
    pub fn size(&self) -> (usize, usize, usize) {
        (self.sx, self.sy, self.sz)
    }

    #[inline]
    fn in_bounds(&self, p: VoxelPos) -> bool {
        p.x >= 0
            && p.y >= 0
            && p.z >= 0
            && (p.x as usize) < self.sx
            && (p.y as usize) < self.sy
            && (p.z as usize) < self.sz
    }

    #[inline]
    fn idx(&self, p: VoxelPos) -> usize {
        (p.y as usize * self.sz + p.z as usize) * self.sx + p.x as usize
    }

    #[inline]
    pub fn block(&self, p: VoxelPos) -> Block {
        if self.in_bounds(p) {
            self.blocks[self.idx(p)]
        } else {
            Block::AIR
        }
    }

    pub fn set_block(&mut self, p: VoxelPos, b: Block) {
        if self.in_bounds(p) {
            let i = self.idx(p);
            self.blocks[i] = b;
        }
    }

    pub fn fill_column(&mut self, x: i32, z: i32, y0: i32, y1: i32, b: Block) {
        for y in y0..=y1 {
            self.set_block(VoxelPos::new(x, y, z), b);
        }
    }

    pub fn set_light(&mut self, channel: LightChannel, p: VoxelPos, v: u8) {
        if self.in_bounds(p) {
            let i = self.idx(p);
            match channel {
                LightChannel::Sky => self.sky[i] = v.min(15),
                LightChannel::Block => self.blk[i] = v.min(15),
            }
        }
    }

    /// Poke a hole in residency; queries into this chunk report no data.
    pub fn mark_chunk_unloaded(&mut self, coord: ChunkCoord) {
        self.unloaded.insert(coord);
    }

    pub fn mark_chunk_loaded(&mut self, coord: ChunkCoord) {
        self.unloaded.remove(&coord);
    }

    #[inline]
    fn passes_light(&self, p: VoxelPos) -> bool {
        let b = self.block(p);
        if b.is_air() {
            return true;
        }
        self.reg.get(b.id).map(|ty| !ty.opaque_cube).unwrap_or(false)
    }

    /// Rebuild both light channels from scratch: column skylight seeds
    /// plus block-light seeds from emissive blocks, then a BFS flood with
    /// one level lost per step. Partial-height blocks do not seal the sky
    /// column; only opaque cubes do.
    pub fn recompute_light(&mut self) {
        self.sky.iter_mut().for_each(|v| *v = 0);
        self.blk.iter_mut().for_each(|v| *v = 0);

        let mut q_sky: VecDeque<(VoxelPos, u8)> = VecDeque::new();
        for z in 0..self.sz as i32 {
            for x in 0..self.sx as i32 {
                for y in (0..self.sy as i32).rev() {
                    let p = VoxelPos::new(x, y, z);
                    if !self.passes_light(p) {
                        break;
                    }
                    let i = self.idx(p);
                    self.sky[i] = 15;
                    q_sky.push_back((p, 15));
                }
            }
        }

        let mut q_blk: VecDeque<(VoxelPos, u8)> = VecDeque::new();
        for z in 0..self.sz as i32 {
            for y in 0..self.sy as i32 {
                for x in 0..self.sx as i32 {
                    let p = VoxelPos::new(x, y, z);
                    let b = self.blocks[self.idx(p)];
                    if b.is_air() {
                        continue;
                    }
                    let em = self.reg.get(b.id).map(|ty| ty.emission).unwrap_or(0);
                    if em > 0 {
                        let i = self.idx(p);
                        self.blk[i] = em;
                        q_blk.push_back((p, em));
                    }
                }
            }
        }

        self.flood(q_sky, LightChannel::Sky);
        self.flood(q_blk, LightChannel::Block);
    }

    fn flood(&mut self, mut q: VecDeque<(VoxelPos, u8)>, channel: LightChannel) {
        while let Some((p, level)) = q.pop_front() {
            if level <= 1 {
                continue;
            }
            let v = level - 1;
            for (dx, dy, dz) in [(1, 0, 0), (-1, 0, 0), (0, 1, 0), (0, -1, 0), (0, 0, 1), (0, 0, -1)] {
                let n = p.offset(dx, dy, dz);
                if !self.in_bounds(n) || !self.passes_light(n) {
                    continue;
                }
                let i = self.idx(n);
                let slot = match channel {
                    LightChannel::Sky => &mut self.sky[i],
                    LightChannel::Block => &mut self.blk[i],
                };
                if *slot < v {
                    *slot = v;
                    q.push_back((n, v));
                }
            }
        }
    }
}

impl WorldOracle for GridWorld {
    fn block_at(&self, pos: VoxelPos) -> Option<Block> {
        if !self.chunk_loaded(ChunkCoord::of_world(pos.x, pos.z)) {
            return None;
        }
        if !self.in_bounds(pos) {
            return None;
        }
        let b = self.blocks[self.idx(pos)];
        if b.is_air() { None } else { Some(b) }
    }

    fn has_solid_top(&self, pos: VoxelPos) -> bool {
        let b = self.block(pos);
        if b.is_air() {
            return false;
        }
        self.reg.get(b.id).map(|ty| ty.solid_top).unwrap_or(false)
    }

    fn light_level(&self, channel: LightChannel, pos: VoxelPos) -> u8 {
        if self.in_bounds(pos) {
            let i = self.idx(pos);
            return match channel {
                LightChannel::Sky => self.sky[i],
                LightChannel::Block => self.blk[i],
            };
        }
        // above the world the sky is unobstructed; everywhere else is dark
        if pos.y >= self.sy as i32
            && pos.x >= 0
            && pos.z >= 0
            && (pos.x as usize) < self.sx
            && (pos.z as usize) < self.sz
        {
            return match channel {
                LightChannel::Sky => 15,
                LightChannel::Block => 0,
            };
        }
        0
    }

    fn chunk_loaded(&self, coord: ChunkCoord) -> bool {
        coord.cx >= 0
            && coord.cz >= 0
            && (coord.cx as usize) < self.chunks_x
            && (coord.cz as usize) < self.chunks_z
            && !self.unloaded.contains(&coord)
    }

    fn top_surface_height(&self, pos: VoxelPos) -> f32 {
        let b = self.block(pos);
        if b.is_air() {
            return 0.0;
        }
        self.reg.get(b.id).map(|ty| ty.top_height).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> GridWorld {
        GridWorld::new(Arc::new(BlockRegistry::default_catalog()), 2, 2, 32)
    }

    #[test]
    fn skylight_fills_open_columns_and_stops_at_stone() {
        let mut w = world();
        let stone = w.registry().block_by_name("stone").unwrap();
        for x in 0..32 {
            for z in 0..32 {
                w.fill_column(x, z, 0, 4, stone);
            }
        }
        w.recompute_light();
        assert_eq!(w.light_level(LightChannel::Sky, VoxelPos::new(3, 5, 3)), 15);
        assert_eq!(w.light_level(LightChannel::Sky, VoxelPos::new(3, 4, 3)), 0);
        assert_eq!(w.light_level(LightChannel::Sky, VoxelPos::new(3, 2, 3)), 0);
    }

    #[test]
    fn block_light_spreads_from_torch_with_falloff() {
        let mut w = world();
        let torch = w.registry().block_by_name("torch").unwrap();
        w.set_block(VoxelPos::new(16, 10, 16), torch);
        w.recompute_light();
        assert_eq!(w.light_level(LightChannel::Block, VoxelPos::new(16, 10, 16)), 14);
        assert_eq!(w.light_level(LightChannel::Block, VoxelPos::new(18, 10, 16)), 12);
        assert_eq!(w.light_level(LightChannel::Block, VoxelPos::new(16, 10, 21)), 9);
    }

    #[test]
    fn unloaded_chunks_answer_no_data() {
        let mut w = world();
        let stone = w.registry().block_by_name("stone").unwrap();
        w.set_block(VoxelPos::new(2, 3, 2), stone);
        assert!(w.block_at(VoxelPos::new(2, 3, 2)).is_some());
        w.mark_chunk_unloaded(ChunkCoord::new(0, 0));
        assert!(!w.chunk_loaded(ChunkCoord::new(0, 0)));
        assert!(w.block_at(VoxelPos::new(2, 3, 2)).is_none());
        // a chunk outside the world was never loaded
        assert!(!w.chunk_loaded(ChunkCoord::new(-1, 0)));
    }

    #[test]
    fn oracle_edges_are_harmless() {
        let w = world();
        let far = VoxelPos::new(-100, -5, 900);
        assert!(w.block_at(far).is_none());
        assert!(!w.has_solid_top(far));
        assert_eq!(w.light_level(LightChannel::Block, far), 0);
        assert_eq!(w.top_surface_height(far), 0.0);
        // above the world the sky channel saturates
        assert_eq!(w.light_level(LightChannel::Sky, VoxelPos::new(1, 40, 1)), 15);
    }
}
