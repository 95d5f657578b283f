//! Overlay configuration: a small TOML file mapped onto scheduler
//! settings, written out with defaults on first run.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gloam_runtime::{SchedulerSettings, SettingsError};
use gloam_scan::{ScanConfig, Strategy};
use gloam_world::LightChannel;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Scan reach in voxels around the observer.
    #[serde(default = "default_draw_distance")]
    pub draw_distance: i32,
    /// Milliseconds between scans while the overlay is active.
    #[serde(default = "default_interval_ms")]
    pub generate_interval_ms: u64,
    /// Surfaces brighter than this are not marked.
    #[serde(default = "default_light_cutoff")]
    pub light_cutoff: u8,
    /// "sky" or "block".
    #[serde(default = "default_channel")]
    pub channel: LightChannel,
    /// Row of the marker texture atlas to draw from.
    #[serde(default)]
    pub atlas_row: u8,
    /// Also mark tops that mobs cannot actually stand on.
    #[serde(default)]
    pub include_non_spawnable: bool,
    /// "columns" or "flood".
    #[serde(default)]
    pub strategy: Strategy,
    /// Optional block catalog TOML; the built-in catalog when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks_catalog: Option<PathBuf>,
}

fn default_draw_distance() -> i32 {
    25
}
fn default_interval_ms() -> u64 {
    250
}
fn default_light_cutoff() -> u8 {
    15
}
fn default_channel() -> LightChannel {
    LightChannel::Block
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            draw_distance: default_draw_distance(),
            generate_interval_ms: default_interval_ms(),
            light_cutoff: default_light_cutoff(),
            channel: default_channel(),
            atlas_row: 0,
            include_non_spawnable: false,
            strategy: Strategy::default(),
            blocks_catalog: None,
        }
    }
}

impl OverlayConfig {
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        let cfg: Self = toml::from_str(&text)?;
        cfg.settings()?;
        Ok(cfg)
    }

    /// Load the config, writing one with defaults first if the file
    /// does not exist yet.
    pub fn load_or_init(path: &Path) -> Result<Self, Box<dyn Error>> {
        if !path.exists() {
            let cfg = Self::default();
            fs::write(path, toml::to_string_pretty(&cfg)?)?;
            return Ok(cfg);
        }
        Self::load(path)
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            radius: self.draw_distance,
            light_cutoff: self.light_cutoff,
            channel: self.channel,
            atlas_row: self.atlas_row,
            include_non_spawnable: self.include_non_spawnable,
        }
    }

    /// Validated scheduler settings for this config.
    pub fn settings(&self) -> Result<SchedulerSettings, SettingsError> {
        let settings = SchedulerSettings {
            scan: self.scan_config(),
            strategy: self.strategy,
            interval: Duration::from_millis(self.generate_interval_ms),
        };
        settings.validate()?;
        Ok(settings)
    }
}
