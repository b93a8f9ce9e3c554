//! Transform synchronization.
//!
//! The artwork's pose is published to observers only when a gesture settles
//! or when a sync is explicitly requested, never on every intermediate
//! moving/scaling/rotating event.

use merchmagic_core::TransformRecord;

/// Last published artwork pose.
#[derive(Debug, Clone)]
pub struct TransformSync {
    published: TransformRecord,
    revision: u64,
    pending: bool,
}

impl TransformSync {
    pub fn new(initial: TransformRecord) -> Self {
        Self {
            published: initial,
            revision: 0,
            pending: false,
        }
    }

    /// Publishes a record. Returns true if it differs from the last one.
    pub fn publish(&mut self, record: TransformRecord) -> bool {
        let changed = record != self.published;
        self.published = record;
        self.revision += 1;
        self.pending = true;
        changed
    }

    pub fn published(&self) -> TransformRecord {
        self.published
    }

    /// Incremented on every publish.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the record if it was published since the last call.
    pub fn take_update(&mut self) -> Option<TransformRecord> {
        if std::mem::take(&mut self.pending) {
            Some(self.published)
        } else {
            None
        }
    }

    /// Resets to `initial` without notifying observers.
    pub fn reset(&mut self, initial: TransformRecord) {
        self.published = initial;
        self.pending = false;
    }
}
