//! Chunked, bounded-parallel submission of item lists.

use crate::{
    metrics::IndexingMetrics,
    processing::{
        registrar::BatchRegistrar,
        types::{IndexingOutcome, ProcessingError, SearchableItemInput},
    },
};
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;

/// Maximum number of items committed in a single index call.
pub const MAX_CHUNK_LEN: usize = 100;

/// Splits submissions into chunks and registers them concurrently.
pub struct ChunkScheduler {
    registrar: BatchRegistrar,
    max_concurrent_chunks: usize,
    metrics: Arc<IndexingMetrics>,
}

impl ChunkScheduler {
    /// Create a scheduler running at most `max_concurrent_chunks` registrations at once.
    pub fn new(
        registrar: BatchRegistrar,
        max_concurrent_chunks: usize,
        metrics: Arc<IndexingMetrics>,
    ) -> Self {
        Self {
            registrar,
            max_concurrent_chunks: max_concurrent_chunks.max(1),
            metrics,
        }
    }

    /// Index `items`, resolving once every chunk has finished.
    ///
    /// Chunks run in no particular order. A failing chunk does not stop its siblings; the first
    /// failure observed becomes the result, later ones are logged and dropped. Chunks that
    /// committed before a failure stay committed.
    pub async fn submit(
        &self,
        items: Vec<SearchableItemInput>,
    ) -> Result<IndexingOutcome, ProcessingError> {
        let chunks = partition(items);
        let chunk_count = chunks.len();
        tracing::debug!(
            chunks = chunk_count,
            max_concurrent = self.max_concurrent_chunks,
            "Dispatching chunks"
        );

        let mut results = stream::iter(chunks.into_iter().enumerate())
            .map(|(position, chunk)| async move {
                (position, self.registrar.register(chunk).await)
            })
            .buffer_unordered(self.max_concurrent_chunks);

        let mut outcome = IndexingOutcome::default();
        let mut first_error = None;
        while let Some((position, result)) = results.next().await {
            match result {
                Ok(report) => {
                    self.metrics
                        .record_chunk_committed(report.records as u64, report.thumbnails as u64);
                    outcome.items += report.records;
                    outcome.chunks += 1;
                    outcome.thumbnails += report.thumbnails;
                }
                Err(error) => {
                    self.metrics.record_chunk_failed();
                    tracing::warn!(chunk = position, error = %error, "Chunk commit failed");
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
            }
        }

        match first_error {
            Some(error) => Err(ProcessingError::Index(error)),
            None => Ok(outcome),
        }
    }
}

/// Split `items` into consecutive chunks of at most [`MAX_CHUNK_LEN`]. Empty input yields no chunks.
pub(crate) fn partition<T>(items: Vec<T>) -> Vec<Vec<T>> {
    let mut chunks = Vec::with_capacity(items.len().div_ceil(MAX_CHUNK_LEN));
    let mut remaining = items.into_iter().peekable();
    while remaining.peek().is_some() {
        chunks.push(remaining.by_ref().take(MAX_CHUNK_LEN).collect());
    }
    chunks
}
