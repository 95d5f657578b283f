//! Block identity and the surface-trait registry.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;

pub use registry::{BlockRegistry, BlockType};

pub type BlockId = u16;

/// Runtime block handle; all per-block traits live in the registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Block {
    pub id: BlockId,
}

impl Block {
    pub const AIR: Block = Block { id: 0 };

    #[inline]
    pub const fn new(id: BlockId) -> Self {
        Self { id }
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self.id == Self::AIR.id
    }
}
