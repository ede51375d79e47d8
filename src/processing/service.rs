//! Bridge service exposing indexing and activation operations to the application layer.

use crate::{
    config::Config,
    events::{ActivationEvent, ActivationHub, EventError, Subscription, UserActivity},
    index::{self, IndexService},
    metrics::{IndexingMetrics, MetricsSnapshot},
    processing::{
        converter::ItemConverter,
        registrar::BatchRegistrar,
        scheduler::ChunkScheduler,
        types::{IndexingOutcome, InitError, ProcessingError, SearchableItemInput},
    },
    thumbnail::{ThumbnailFetcher, ThumbnailSource},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Pipeline tuning derived from configuration.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Domain applied to items submitted without one.
    pub default_domain: String,
    /// Upper bound on concurrently registered chunks.
    pub max_concurrent_chunks: usize,
}

impl PipelineOptions {
    /// Extract pipeline options from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_domain: config.default_domain.clone(),
            max_concurrent_chunks: config.max_concurrent_chunks,
        }
    }
}

/// Owns the indexing pipeline, the index handle and the activation hub.
///
/// Construct once near process start and share it through an `Arc`. On hosts whose index
/// reports itself unsupported, every write and delete resolves successfully without doing
/// anything.
pub struct SpotlightBridge {
    index: Arc<dyn IndexService>,
    scheduler: ChunkScheduler,
    activations: ActivationHub,
    metrics: Arc<IndexingMetrics>,
}

/// Abstraction over the bridge used by external surfaces (HTTP, CLI).
#[async_trait]
pub trait SpotlightApi: Send + Sync {
    /// Report whether the host supports indexing.
    fn is_supported(&self) -> bool;

    /// Validate and index `items`.
    async fn add_searchable_items(
        &self,
        items: Vec<SearchableItemInput>,
    ) -> Result<IndexingOutcome, ProcessingError>;

    /// Remove every record.
    async fn delete_all(&self) -> Result<(), ProcessingError>;

    /// Remove records by id.
    async fn delete_identifiers(&self, identifiers: Vec<String>) -> Result<(), ProcessingError>;

    /// Remove records by domain.
    async fn delete_domains(&self, domains: Vec<String>) -> Result<(), ProcessingError>;

    /// Subscribe to activation events.
    fn subscribe(&self) -> Result<Subscription, EventError>;

    /// Deliver an activation to subscribers.
    fn publish_activation(&self, event: ActivationEvent) -> bool;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl SpotlightBridge {
    /// Assemble a bridge from explicit collaborators.
    pub fn new(
        index: Arc<dyn IndexService>,
        thumbnails: Arc<dyn ThumbnailSource>,
        activations: ActivationHub,
        options: PipelineOptions,
    ) -> Self {
        let metrics = Arc::new(IndexingMetrics::new());
        let converter = ItemConverter::new(thumbnails, options.default_domain);
        let registrar = BatchRegistrar::new(converter, index.clone());
        let scheduler =
            ChunkScheduler::new(registrar, options.max_concurrent_chunks, metrics.clone());
        Self {
            index,
            scheduler,
            activations,
            metrics,
        }
    }

    /// Build the bridge described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, InitError> {
        let index = index::index_from_config(config)?;
        let thumbnails = Arc::new(ThumbnailFetcher::from_config(config)?);
        let activations = if index.is_supported() {
            ActivationHub::default()
        } else {
            ActivationHub::unsupported()
        };
        tracing::info!(
            supported = index.is_supported(),
            default_domain = %config.default_domain,
            "Spotlight bridge initialized"
        );
        Ok(Self::new(
            index,
            thumbnails,
            activations,
            PipelineOptions::from_config(config),
        ))
    }

    /// Report whether the host supports indexing.
    pub fn is_supported(&self) -> bool {
        self.index.is_supported()
    }

    /// Validate and index `items`.
    ///
    /// On unsupported hosts this resolves to an empty outcome without looking at `items`.
    /// Otherwise validation covers the whole list before anything is dispatched. The result is a
    /// failure if any chunk failed to commit, even though other chunks may already be stored.
    pub async fn add_searchable_items(
        &self,
        items: Vec<SearchableItemInput>,
    ) -> Result<IndexingOutcome, ProcessingError> {
        if !self.is_supported() {
            tracing::debug!(items = items.len(), "Indexing unsupported; skipping submission");
            return Ok(IndexingOutcome::default());
        }
        for (position, item) in items.iter().enumerate() {
            item.validate(position)?;
        }
        if items.is_empty() {
            return Ok(IndexingOutcome::default());
        }

        self.metrics.record_submission();
        let submitted = items.len();
        tracing::info!(items = submitted, "Indexing searchable items");
        match self.scheduler.submit(items).await {
            Ok(outcome) => {
                tracing::info!(
                    items = outcome.items,
                    chunks = outcome.chunks,
                    thumbnails = outcome.thumbnails,
                    "Searchable items indexed"
                );
                Ok(outcome)
            }
            Err(error) => {
                tracing::error!(items = submitted, error = %error, "Indexing searchable items failed");
                Err(error)
            }
        }
    }

    /// Remove every record.
    pub async fn delete_all(&self) -> Result<(), ProcessingError> {
        if !self.is_supported() {
            return Ok(());
        }
        self.index.delete_all().await?;
        tracing::info!("All searchable items deleted");
        Ok(())
    }

    /// Remove records by id.
    pub async fn delete_identifiers(&self, identifiers: Vec<String>) -> Result<(), ProcessingError> {
        if !self.is_supported() {
            return Ok(());
        }
        self.index.delete_by_ids(&identifiers).await?;
        tracing::info!(ids = identifiers.len(), "Searchable items deleted by id");
        Ok(())
    }

    /// Remove records by domain.
    pub async fn delete_domains(&self, domains: Vec<String>) -> Result<(), ProcessingError> {
        if !self.is_supported() {
            return Ok(());
        }
        self.index.delete_by_domains(&domains).await?;
        tracing::info!(domains = ?domains, "Searchable items deleted by domain");
        Ok(())
    }

    /// Subscribe to activation events.
    pub fn subscribe(&self) -> Result<Subscription, EventError> {
        self.activations.subscribe()
    }

    /// Translate a host activity into an activation and deliver it.
    pub fn handle_activity(&self, activity: UserActivity) -> bool {
        self.activations.handle(activity)
    }

    /// Return the current indexing metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl SpotlightApi for SpotlightBridge {
    fn is_supported(&self) -> bool {
        SpotlightBridge::is_supported(self)
    }

    async fn add_searchable_items(
        &self,
        items: Vec<SearchableItemInput>,
    ) -> Result<IndexingOutcome, ProcessingError> {
        SpotlightBridge::add_searchable_items(self, items).await
    }

    async fn delete_all(&self) -> Result<(), ProcessingError> {
        SpotlightBridge::delete_all(self).await
    }

    async fn delete_identifiers(&self, identifiers: Vec<String>) -> Result<(), ProcessingError> {
        SpotlightBridge::delete_identifiers(self, identifiers).await
    }

    async fn delete_domains(&self, domains: Vec<String>) -> Result<(), ProcessingError> {
        SpotlightBridge::delete_domains(self, domains).await
    }

    fn subscribe(&self) -> Result<Subscription, EventError> {
        SpotlightBridge::subscribe(self)
    }

    fn publish_activation(&self, event: ActivationEvent) -> bool {
        self.activations.publish(event)
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        SpotlightBridge::metrics_snapshot(self)
    }
}
