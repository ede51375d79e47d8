//! Registration of a single chunk: concurrent conversion followed by one commit.

use crate::{
    index::{IndexError, IndexService},
    processing::{
        converter::ItemConverter,
        types::{ChunkReport, SearchableItemInput},
    },
};
use futures_util::future::join_all;
use std::sync::Arc;

/// Converts a chunk of items and commits the resulting records in a single index call.
#[derive(Clone)]
pub struct BatchRegistrar {
    converter: ItemConverter,
    index: Arc<dyn IndexService>,
}

impl BatchRegistrar {
    /// Create a registrar writing to `index`.
    pub fn new(converter: ItemConverter, index: Arc<dyn IndexService>) -> Self {
        Self { converter, index }
    }

    /// Convert every item of `chunk` concurrently, then commit them together.
    ///
    /// The commit is issued only after every conversion has finished, and it always carries
    /// exactly the items of the chunk. An empty chunk completes immediately without touching the
    /// index.
    pub async fn register(&self, chunk: Vec<SearchableItemInput>) -> Result<ChunkReport, IndexError> {
        if chunk.is_empty() {
            return Ok(ChunkReport::default());
        }

        let records = join_all(chunk.into_iter().map(|item| self.converter.convert(item))).await;
        let report = ChunkReport {
            records: records.len(),
            thumbnails: records
                .iter()
                .filter(|record| record.thumbnail.is_some())
                .count(),
        };

        self.index.commit(records).await?;
        tracing::debug!(
            records = report.records,
            thumbnails = report.thumbnails,
            "Chunk committed"
        );
        Ok(report)
    }
}
