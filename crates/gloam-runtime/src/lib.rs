//! Background scan scheduling: one worker thread driven by a control
//! channel, publishing finished overlay sets through the swap buffer.
#![forbid(unsafe_code)]

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use gloam_blocks::BlockRegistry;
use gloam_geom::VoxelPos;
use gloam_overlay::{OverlayReader, OverlayWriter, overlay_buffer};
use gloam_scan::{ScanConfig, ScanError, Strategy, run_scan};
use gloam_world::{ChunkCoord, WorldOracle};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("scan interval must be nonzero")]
    ZeroInterval,
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("failed to spawn scan worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Everything the worker needs to run one scan, swappable at runtime.
#[derive(Clone, Copy, Debug)]
pub struct SchedulerSettings {
    pub scan: ScanConfig,
    pub strategy: Strategy,
    pub interval: Duration,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            strategy: Strategy::default(),
            interval: Duration::from_millis(250),
        }
    }
}

impl SchedulerSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.scan.validate()?;
        if self.interval.is_zero() {
            return Err(SettingsError::ZeroInterval);
        }
        Ok(())
    }
}

enum Control {
    SetActive(bool),
    Observer(VoxelPos),
    Reload(SchedulerSettings),
    Shutdown,
}

/// Cloneable control endpoint for a running scheduler. Sends are
/// fire-and-forget; messages to a stopped worker are dropped.
#[derive(Clone)]
pub struct SchedulerClient {
    tx: Sender<Control>,
}

impl SchedulerClient {
    /// Turn scanning on or off. Turning it off publishes an empty set.
    pub fn set_active(&self, on: bool) {
        let _ = self.tx.send(Control::SetActive(on));
    }

    /// Report the observer's current voxel. Crossing a chunk boundary
    /// makes the next scan due immediately.
    pub fn update_observer(&self, pos: VoxelPos) {
        let _ = self.tx.send(Control::Observer(pos));
    }

    /// Swap in new settings. Invalid settings are rejected by the
    /// worker, which keeps the previous ones and logs a warning.
    pub fn reload(&self, settings: SchedulerSettings) {
        let _ = self.tx.send(Control::Reload(settings));
    }
}

/// Handle to the scan worker thread. Dropping it (or calling [`stop`])
/// shuts the worker down and joins it.
///
/// [`stop`]: ScanScheduler::stop
pub struct ScanScheduler {
    client: SchedulerClient,
    reader: OverlayReader,
    join: Option<JoinHandle<()>>,
}

impl ScanScheduler {
    /// Spawn the worker. It starts inactive with an empty published set.
    pub fn spawn(
        oracle: Arc<dyn WorldOracle>,
        reg: Arc<BlockRegistry>,
        settings: SchedulerSettings,
        observer: VoxelPos,
    ) -> Result<Self, SchedulerError> {
        settings.validate()?;
        let (tx, rx) = unbounded::<Control>();
        let (writer, reader) = overlay_buffer();
        let join = thread::Builder::new()
            .name("gloam-scan".into())
            .spawn(move || {
                Worker::new(oracle, reg, settings, observer, rx, writer).run();
            })?;
        Ok(Self {
            client: SchedulerClient { tx },
            reader,
            join: Some(join),
        })
    }

    /// A cloneable control endpoint, detachable from this handle.
    pub fn client(&self) -> SchedulerClient {
        self.client.clone()
    }

    pub fn set_active(&self, on: bool) {
        self.client.set_active(on);
    }

    pub fn update_observer(&self, pos: VoxelPos) {
        self.client.update_observer(pos);
    }

    pub fn reload(&self, settings: SchedulerSettings) {
        self.client.reload(settings);
    }

    /// A cloneable read handle onto the published overlay sets.
    pub fn reader(&self) -> OverlayReader {
        self.reader.clone()
    }

    /// Shut down and join the worker.
    pub fn stop(mut self) {
        self.shutdown_and_join();
    }

    fn shutdown_and_join(&mut self) {
        if let Some(join) = self.join.take() {
            let _ = self.client.tx.send(Control::Shutdown);
            if join.join().is_err() {
                log::error!("scan worker panicked during shutdown");
            }
        }
    }
}

impl Drop for ScanScheduler {
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}

struct Worker {
    oracle: Arc<dyn WorldOracle>,
    reg: Arc<BlockRegistry>,
    settings: SchedulerSettings,
    rx: Receiver<Control>,
    writer: OverlayWriter,
    active: bool,
    running: bool,
    observer: VoxelPos,
    /// Bumped whenever the observer moves; a scan started under an
    /// older value is stale and its results are discarded.
    observer_rev: u64,
    /// Same discipline for settings swapped in by a reload.
    settings_rev: u64,
    last_scan: Option<Instant>,
}

impl Worker {
    fn new(
        oracle: Arc<dyn WorldOracle>,
        reg: Arc<BlockRegistry>,
        settings: SchedulerSettings,
        observer: VoxelPos,
        rx: Receiver<Control>,
        writer: OverlayWriter,
    ) -> Self {
        Self {
            oracle,
            reg,
            settings,
            rx,
            writer,
            active: false,
            running: true,
            observer,
            observer_rev: 0,
            settings_rev: 0,
            last_scan: None,
        }
    }

    fn run(&mut self) {
        while self.running {
            let msg = if self.active {
                match self.rx.recv_timeout(self.settings.interval) {
                    Ok(ctl) => Some(ctl),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            } else {
                match self.rx.recv() {
                    Ok(ctl) => Some(ctl),
                    Err(_) => break,
                }
            };
            if let Some(ctl) = msg {
                self.apply(ctl);
            }
            self.drain_pending();
            if self.running && self.active && self.due() {
                self.scan();
            }
        }
    }

    fn drain_pending(&mut self) {
        while self.running {
            match self.rx.try_recv() {
                Ok(ctl) => self.apply(ctl),
                Err(_) => break,
            }
        }
    }

    fn apply(&mut self, ctl: Control) {
        match ctl {
            Control::SetActive(on) => {
                if self.active == on {
                    return;
                }
                self.active = on;
                self.last_scan = None;
                if !on {
                    self.writer.clear();
                }
            }
            Control::Observer(pos) => {
                if pos == self.observer {
                    return;
                }
                let crossed = ChunkCoord::of_world(pos.x, pos.z)
                    != ChunkCoord::of_world(self.observer.x, self.observer.z);
                self.observer = pos;
                self.observer_rev += 1;
                if crossed {
                    // moving to a new chunk shifts the whole region
                    self.last_scan = None;
                }
            }
            Control::Reload(settings) => match settings.validate() {
                Ok(()) => {
                    self.settings = settings;
                    self.settings_rev += 1;
                    self.last_scan = None;
                }
                Err(e) => log::warn!("rejected scan settings: {e}"),
            },
            Control::Shutdown => self.running = false,
        }
    }

    fn due(&self) -> bool {
        self.last_scan
            .is_none_or(|t| t.elapsed() >= self.settings.interval)
    }

    fn scan(&mut self) {
        let started = Instant::now();
        let rev = self.observer_rev;
        let cfg_rev = self.settings_rev;
        let observer = self.observer;

        self.writer.begin();
        let writer = &mut self.writer;
        let result = run_scan(
            self.oracle.as_ref(),
            &self.reg,
            &self.settings.scan,
            self.settings.strategy,
            observer,
            &mut |rec| writer.push(rec),
        );
        if let Err(e) = result {
            // settings were validated on the way in; treat as a bug
            log::error!("scan aborted: {e}");
            self.last_scan = Some(Instant::now());
            return;
        }

        // Absorb control traffic that arrived mid-scan. If the observer
        // moved, the settings changed, or scanning was switched off,
        // this result is stale; the next loop iteration rescans.
        self.drain_pending();
        if !self.running
            || !self.active
            || self.observer_rev != rev
            || self.settings_rev != cfg_rev
        {
            return;
        }

        let count = self.writer.pending();
        let generation = self.writer.publish();
        self.last_scan = Some(Instant::now());
        log::debug!(
            "scan took {}ms for {} overlays (generation {}, observer {})",
            started.elapsed().as_millis(),
            count,
            generation,
            observer,
        );
    }
}
