//! Spawnable-surface overlay: scans the world around an observer and
//! publishes light-level markers for every top a mob could stand on.
#![forbid(unsafe_code)]

pub mod config;
pub mod watch;

pub use config::OverlayConfig;
pub use gloam_overlay::{OverlayReader, OverlayRecord, OverlaySet};
pub use gloam_runtime::{
    ScanScheduler, SchedulerClient, SchedulerError, SchedulerSettings, SettingsError,
};
pub use gloam_scan::{ScanConfig, ScanError, Strategy};
pub use gloam_world::{LightChannel, WorldOracle};
