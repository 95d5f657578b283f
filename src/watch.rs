//! Hot reload: watch the overlay config file and push validated
//! settings into the running scheduler.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use gloam_runtime::SchedulerClient;
use notify::{EventKind, RecursiveMode, Watcher};

use crate::config::OverlayConfig;

/// Spawn a detached watcher thread on the config path. Edits that
/// parse and validate are pushed to the scheduler; anything else is
/// logged and the previous settings stay live.
pub fn watch_config(path: PathBuf, client: SchedulerClient) {
    thread::spawn(move || {
        let (tx, rx) = mpsc::channel::<()>();
        let watcher = notify::recommended_watcher(
            move |res: Result<notify::Event, notify::Error>| {
                if let Ok(event) = res {
                    match event.kind {
                        EventKind::Modify(_)
                        | EventKind::Create(_)
                        | EventKind::Remove(_)
                        | EventKind::Any => {
                            let _ = tx.send(());
                        }
                        _ => {}
                    }
                }
            },
        );
        let mut watcher = match watcher {
            Ok(w) => w,
            Err(e) => {
                log::warn!("config watcher unavailable: {e}");
                return;
            }
        };
        if let Err(e) = watcher.watch(&path, RecursiveMode::NonRecursive) {
            log::warn!("cannot watch {}: {e}", path.display());
            return;
        }
        while rx.recv().is_ok() {
            // editors fire bursts of events for one save
            thread::sleep(Duration::from_millis(50));
            while rx.try_recv().is_ok() {}
            match OverlayConfig::load(&path) {
                Ok(cfg) => match cfg.settings() {
                    Ok(settings) => {
                        log::info!("config reloaded from {}", path.display());
                        client.reload(settings);
                    }
                    Err(e) => log::warn!("rejected config change: {e}"),
                },
                Err(e) => log::warn!("config reload failed: {e}"),
            }
        }
    });
}
