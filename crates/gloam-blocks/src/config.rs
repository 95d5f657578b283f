//! Serde-facing block catalog definitions (TOML).

use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BlocksConfig {
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
}

/// One catalog entry. Optional fields fall back to sensible defaults in
/// the registry: a listed block is an opaque full cube unless it says
/// otherwise.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BlockDef {
    pub name: String,
    pub id: Option<u16>,
    /// Full opaque cube (stone, dirt, ...). Defaults to true.
    pub opaque: Option<bool>,
    /// Non-full surface mobs may still spawn on or under (slabs, snow
    /// layers, pressure plates, leaves...). Defaults to false.
    pub overlay: Option<bool>,
    /// Surface mobs cannot ordinarily spawn on (glass, ice, farmland);
    /// scanned only when the non-spawnable flag is set. Defaults to false.
    pub non_spawnable: Option<bool>,
    /// Whether the top face is flat and solid. Defaults to `opaque`.
    pub solid_top: Option<bool>,
    /// Top-surface height within the cell, in [0, 1]. Defaults to 1.0.
    pub top_height: Option<f32>,
    /// Emitted block-light level in [0, 15]. Defaults to 0.
    pub emission: Option<u8>,
}
