//! Integer voxel coordinates and the clamped scan region.
#![forbid(unsafe_code)]

/// One voxel cell in the world grid. Value type, used as a lookup key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VoxelPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    #[inline]
    pub fn above(self) -> Self {
        self.offset(0, 1, 0)
    }

    #[inline]
    pub fn below(self) -> Self {
        self.offset(0, -1, 0)
    }

    #[inline]
    pub fn with_y(self, y: i32) -> Self {
        Self { y, ..self }
    }
}

impl From<(i32, i32, i32)> for VoxelPos {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl std::fmt::Display for VoxelPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Lowest y a region may reach; scans never query below this.
pub const WORLD_FLOOR: i32 = 0;

/// Voxels scanned above the observer's feet before the walk turns downward.
pub const HEADROOM: i32 = 3;

/// Inclusive bounding cuboid around an observer, rebuilt every scan.
///
/// Symmetric in x/z; in y it reaches from `observer_y + HEADROOM` down
/// `radius` voxels, clamped so no coordinate below [`WORLD_FLOOR`] is
/// ever produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub min: VoxelPos,
    pub max: VoxelPos,
}

impl Region {
    /// Build the scan region around an observer's floored position.
    pub fn around(observer: VoxelPos, radius: i32) -> Self {
        let r = radius.max(1);
        let y_top = observer.y + HEADROOM;
        let y_bottom = (y_top - r).max(WORLD_FLOOR);
        Self {
            min: VoxelPos::new(observer.x - r, y_bottom, observer.z - r),
            max: VoxelPos::new(observer.x + r, y_top.max(y_bottom), observer.z + r),
        }
    }

    #[inline]
    pub fn contains(&self, p: VoxelPos) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    #[inline]
    pub fn y_top(&self) -> i32 {
        self.max.y
    }

    #[inline]
    pub fn y_bottom(&self) -> i32 {
        self.min.y
    }

    /// All (x, z) columns inside the region, x-major.
    pub fn columns(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let (x0, x1) = (self.min.x, self.max.x);
        let (z0, z1) = (self.min.z, self.max.z);
        (x0..=x1).flat_map(move |x| (z0..=z1).map(move |z| (x, z)))
    }

    /// Upper bound on the number of voxels inside the region.
    pub fn volume(&self) -> u64 {
        let dx = (self.max.x - self.min.x + 1) as u64;
        let dy = (self.max.y - self.min.y + 1) as u64;
        let dz = (self.max.z - self.min.z + 1) as u64;
        dx * dy * dz
    }
}
