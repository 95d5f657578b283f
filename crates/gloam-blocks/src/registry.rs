use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use crate::config::{BlockDef, BlocksConfig};
use crate::{Block, BlockId};

/// Resolved per-block surface traits.
#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub opaque_cube: bool,
    pub overlay_surface: bool,
    pub non_spawnable: bool,
    pub solid_top: bool,
    pub top_height: f32,
    pub emission: u8,
}

#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
}

impl BlockRegistry {
    pub fn from_config(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut blocks: Vec<BlockType> = Vec::with_capacity(cfg.blocks.len());
        let mut by_name: HashMap<String, BlockId> = HashMap::new();
        let mut next_id: BlockId = 0;
        for def in cfg.blocks {
            let id = match def.id {
                Some(id) => id,
                None => next_id,
            };
            next_id = next_id.max(id.saturating_add(1));
            if by_name.contains_key(&def.name) {
                return Err(format!("duplicate block name '{}'", def.name).into());
            }
            if blocks.iter().any(|b: &BlockType| b.id == id) {
                return Err(format!("duplicate block id {} ('{}')", id, def.name).into());
            }
            let ty = resolve(def, id)?;
            by_name.insert(ty.name.clone(), id);
            blocks.push(ty);
        }
        if !blocks.iter().any(|b| b.id == Block::AIR.id) {
            return Err("catalog must define a block with id 0 (air)".into());
        }
        blocks.sort_by_key(|b| b.id);
        Ok(Self { blocks, by_name })
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        let cfg: BlocksConfig = toml::from_str(&text)?;
        Self::from_config(cfg)
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        // ids are sparse in principle; the built-in catalog is dense
        self.blocks.binary_search_by_key(&id, |b| b.id).ok().map(|i| &self.blocks[i])
    }

    #[inline]
    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn block_by_name(&self, name: &str) -> Option<Block> {
        self.id_by_name(name).map(Block::new)
    }

    /// Built-in catalog: opaque terrain cubes plus the partial-height
    /// surfaces the overlay draws onto.
    pub fn default_catalog() -> Self {
        let defs = vec![
            def("air", |d| {
                d.opaque = Some(false);
                d.solid_top = Some(false);
                d.top_height = Some(0.0);
            }),
            def("stone", |_| {}),
            def("dirt", |_| {}),
            def("grass", |_| {}),
            def("sand", |_| {}),
            def("glowstone", |d| {
                d.opaque = Some(false);
                d.overlay = Some(true);
                d.solid_top = Some(true);
                d.emission = Some(15);
            }),
            def("slab", |d| {
                d.opaque = Some(false);
                d.overlay = Some(true);
                d.solid_top = Some(false);
                d.top_height = Some(0.5);
            }),
            def("snow_layer", |d| {
                d.opaque = Some(false);
                d.overlay = Some(true);
                d.solid_top = Some(false);
                d.top_height = Some(0.125);
            }),
            def("pressure_plate", |d| {
                d.opaque = Some(false);
                d.overlay = Some(true);
                d.solid_top = Some(false);
                d.top_height = Some(0.0625);
            }),
            def("carpet", |d| {
                d.opaque = Some(false);
                d.overlay = Some(true);
                d.solid_top = Some(false);
                d.top_height = Some(0.0625);
            }),
            def("piston", |d| {
                d.opaque = Some(false);
                d.overlay = Some(true);
                d.solid_top = Some(true);
            }),
            def("leaves", |d| {
                d.opaque = Some(false);
                d.overlay = Some(true);
                d.solid_top = Some(false);
            }),
            def("glass", |d| {
                d.opaque = Some(false);
                d.non_spawnable = Some(true);
                d.solid_top = Some(true);
            }),
            def("ice", |d| {
                d.opaque = Some(false);
                d.non_spawnable = Some(true);
                d.solid_top = Some(true);
            }),
            def("farmland", |d| {
                d.opaque = Some(false);
                d.non_spawnable = Some(true);
                d.solid_top = Some(false);
                d.top_height = Some(0.9375);
            }),
            def("daylight_sensor", |d| {
                d.opaque = Some(false);
                d.non_spawnable = Some(true);
                d.solid_top = Some(false);
                d.top_height = Some(0.375);
            }),
            def("torch", |d| {
                d.opaque = Some(false);
                d.solid_top = Some(false);
                d.top_height = Some(0.0);
                d.emission = Some(14);
            }),
        ];
        Self::from_config(BlocksConfig { blocks: defs })
            .expect("built-in catalog is well formed")
    }
}

fn def(name: &str, fill: impl FnOnce(&mut BlockDef)) -> BlockDef {
    let mut d = BlockDef {
        name: name.to_string(),
        ..BlockDef::default()
    };
    fill(&mut d);
    d
}

fn resolve(d: BlockDef, id: BlockId) -> Result<BlockType, Box<dyn Error>> {
    let opaque = d.opaque.unwrap_or(true);
    let top_height = d.top_height.unwrap_or(1.0);
    if !(0.0..=1.0).contains(&top_height) {
        return Err(format!("block '{}': top_height {} outside [0, 1]", d.name, top_height).into());
    }
    let emission = d.emission.unwrap_or(0);
    if emission > 15 {
        return Err(format!("block '{}': emission {} outside [0, 15]", d.name, emission).into());
    }
    Ok(BlockType {
        id,
        name: d.name,
        opaque_cube: opaque,
        overlay_surface: d.overlay.unwrap_or(false),
        non_spawnable: d.non_spawnable.unwrap_or(false),
        solid_top: d.solid_top.unwrap_or(opaque),
        top_height,
        emission,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_resolves() {
        let reg = BlockRegistry::default_catalog();
        assert_eq!(reg.id_by_name("air"), Some(0));
        let stone = reg.get(reg.id_by_name("stone").unwrap()).unwrap();
        assert!(stone.opaque_cube && stone.solid_top);
        assert_eq!(stone.top_height, 1.0);
        let slab = reg.get(reg.id_by_name("slab").unwrap()).unwrap();
        assert!(slab.overlay_surface && !slab.opaque_cube && !slab.solid_top);
        assert_eq!(slab.top_height, 0.5);
        let glass = reg.get(reg.id_by_name("glass").unwrap()).unwrap();
        assert!(glass.non_spawnable && !glass.overlay_surface);
    }

    #[test]
    fn toml_catalog_parses_with_defaults() {
        let text = r#"
            [[blocks]]
            name = "air"
            opaque = false
            top_height = 0.0

            [[blocks]]
            name = "basalt"

            [[blocks]]
            name = "half_step"
            opaque = false
            overlay = true
            solid_top = false
            top_height = 0.5
        "#;
        let cfg: BlocksConfig = toml::from_str(text).unwrap();
        let reg = BlockRegistry::from_config(cfg).unwrap();
        let basalt = reg.get(reg.id_by_name("basalt").unwrap()).unwrap();
        assert!(basalt.opaque_cube && basalt.solid_top);
        let half = reg.get(reg.id_by_name("half_step").unwrap()).unwrap();
        assert_eq!(half.top_height, 0.5);
        assert!(!half.solid_top);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let cfg = BlocksConfig {
            blocks: vec![def("air", |d| d.opaque = Some(false)), def("air", |_| {})],
        };
        assert!(BlockRegistry::from_config(cfg).is_err());
    }

    #[test]
    fn catalog_without_air_is_rejected() {
        let cfg = BlocksConfig {
            blocks: vec![def("stone", |d| d.id = Some(3))],
        };
        assert!(BlockRegistry::from_config(cfg).is_err());
    }

    #[test]
    fn out_of_range_fields_are_rejected() {
        let mut bad = def("weird", |_| {});
        bad.top_height = Some(1.5);
        let cfg = BlocksConfig {
            blocks: vec![def("air", |d| d.opaque = Some(false)), bad],
        };
        assert!(BlockRegistry::from_config(cfg).is_err());
    }
}
