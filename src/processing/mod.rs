//! Indexing pipeline: chunk scheduling, item conversion, and index commits.

pub mod converter;
pub mod registrar;
pub mod scheduler;
mod service;
pub mod types;

pub use converter::ItemConverter;
pub use registrar::BatchRegistrar;
pub use scheduler::{ChunkScheduler, MAX_CHUNK_LEN};
pub use service::{PipelineOptions, SpotlightApi, SpotlightBridge};
pub use types::{
    ChunkReport, IndexingOutcome, InitError, ProcessingError, SearchableItemDraft,
    SearchableItemInput, ValidationError, validate_drafts,
};
