//! RCU-style double buffer: the scan thread fills a private write-side
//! set and publishes it with one atomic pointer swap; the render side
//! borrows whole point-in-time snapshots and never blocks the writer.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::{OverlayRecord, OverlaySet};

struct Shared {
    published: ArcSwap<OverlaySet>,
}

/// Create a connected writer/reader pair. Exactly one writer exists;
/// readers clone freely.
pub fn overlay_buffer() -> (OverlayWriter, OverlayReader) {
    let shared = Arc::new(Shared {
        published: ArcSwap::from_pointee(OverlaySet::new()),
    });
    (
        OverlayWriter {
            shared: Arc::clone(&shared),
            scratch: OverlaySet::new(),
            next_gen: 0,
        },
        OverlayReader { shared },
    )
}

/// Write side, owned by the scan thread.
pub struct OverlayWriter {
    shared: Arc<Shared>,
    scratch: OverlaySet,
    next_gen: u64,
}

impl OverlayWriter {
    /// Start a fresh write-side set. The published set stays untouched
    /// for concurrent readers.
    pub fn begin(&mut self) {
        self.scratch.clear();
    }

    /// Append to the write side only; invisible until [`publish`].
    ///
    /// [`publish`]: OverlayWriter::publish
    #[inline]
    pub fn push(&mut self, rec: OverlayRecord) {
        self.scratch.push(rec);
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.scratch.len()
    }

    /// Swap the write side into the published slot. Returns the new
    /// generation. The retired set's storage is recycled into the
    /// scratch buffer once no reader still holds it.
    pub fn publish(&mut self) -> u64 {
        self.next_gen += 1;
        let mut fresh = std::mem::take(&mut self.scratch);
        fresh.generation = self.next_gen;
        let retired = self.shared.published.swap(Arc::new(fresh));
        if let Some(mut set) = Arc::into_inner(retired) {
            set.clear();
            self.scratch = set;
        }
        self.next_gen
    }

    /// Publish an empty set (overlay toggled off: renderer shows nothing).
    pub fn clear(&mut self) -> u64 {
        self.begin();
        self.publish()
    }
}

/// Read side, cloneable, for the render path.
#[derive(Clone)]
pub struct OverlayReader {
    shared: Arc<Shared>,
}

impl OverlayReader {
    /// The currently published set; empty before the first publish.
    /// Never blocks and never observes a partially filled set.
    #[inline]
    pub fn snapshot(&self) -> Arc<OverlaySet> {
        self.shared.published.load_full()
    }

    /// Generation of the currently published set. The stamp lives inside
    /// the set itself, so a snapshot always reports the generation it was
    /// published under via [`OverlaySet::generation`].
    #[inline]
    pub fn generation(&self) -> u64 {
        self.shared.published.load().generation()
    }
}
