use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing indexing activity.
#[derive(Default)]
pub struct IndexingMetrics {
    submissions: AtomicU64,
    items_indexed: AtomicU64,
    chunks_committed: AtomicU64,
    chunks_failed: AtomicU64,
    thumbnails_attached: AtomicU64,
}

impl IndexingMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted submission.
    pub fn record_submission(&self) {
        self.submissions.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a chunk whose commit succeeded.
    pub fn record_chunk_committed(&self, records: u64, thumbnails: u64) {
        self.chunks_committed.fetch_add(1, Ordering::Relaxed);
        self.items_indexed.fetch_add(records, Ordering::Relaxed);
        self.thumbnails_attached
            .fetch_add(thumbnails, Ordering::Relaxed);
    }

    /// Record a chunk whose commit failed.
    pub fn record_chunk_failed(&self) {
        self.chunks_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            submissions: self.submissions.load(Ordering::Relaxed),
            items_indexed: self.items_indexed.load(Ordering::Relaxed),
            chunks_committed: self.chunks_committed.load(Ordering::Relaxed),
            chunks_failed: self.chunks_failed.load(Ordering::Relaxed),
            thumbnails_attached: self.thumbnails_attached.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of indexing counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Submissions accepted since startup.
    pub submissions: u64,
    /// Records committed since startup.
    pub items_indexed: u64,
    /// Chunks committed successfully.
    pub chunks_committed: u64,
    /// Chunks whose commit failed.
    pub chunks_failed: u64,
    /// Committed records that carried a thumbnail.
    pub thumbnails_attached: u64,
}
