//! Search index integration: the consumed service interface and its adapters.

pub mod client;
pub mod memory;
pub mod payload;
pub mod types;

use async_trait::async_trait;
use std::{sync::Arc, time::Duration};

use crate::config::Config;

pub use client::HttpIndexService;
pub use memory::InMemoryIndex;
pub use types::{IndexError, IndexableRecord};

/// Operations the indexing pipeline consumes from the host search index.
///
/// Writes are upserts keyed by record id. Implementations must tolerate concurrent calls; the
/// pipeline issues commits from several chunks at once and never serializes them itself.
#[async_trait]
pub trait IndexService: Send + Sync {
    /// Report whether the host offers an indexing facility at all.
    fn is_supported(&self) -> bool {
        true
    }

    /// Insert or replace the given records.
    async fn commit(&self, records: Vec<IndexableRecord>) -> Result<(), IndexError>;

    /// Remove every record owned by this application.
    async fn delete_all(&self) -> Result<(), IndexError>;

    /// Remove records by id. Unknown ids are ignored.
    async fn delete_by_ids(&self, ids: &[String]) -> Result<(), IndexError>;

    /// Remove every record tagged with one of the given domains.
    async fn delete_by_domains(&self, domains: &[String]) -> Result<(), IndexError>;
}

/// Index handle for hosts without a search facility. Every operation is a successful no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedIndex;

#[async_trait]
impl IndexService for UnsupportedIndex {
    fn is_supported(&self) -> bool {
        false
    }

    async fn commit(&self, _records: Vec<IndexableRecord>) -> Result<(), IndexError> {
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), IndexError> {
        Ok(())
    }

    async fn delete_by_ids(&self, _ids: &[String]) -> Result<(), IndexError> {
        Ok(())
    }

    async fn delete_by_domains(&self, _domains: &[String]) -> Result<(), IndexError> {
        Ok(())
    }
}

/// Select the index adapter described by configuration.
pub fn index_from_config(config: &Config) -> Result<Arc<dyn IndexService>, IndexError> {
    if !config.indexing_supported {
        tracing::info!("Indexing unsupported on this host; writes become no-ops");
        return Ok(Arc::new(UnsupportedIndex));
    }
    match config.index_url.as_deref() {
        Some(url) => Ok(Arc::new(HttpIndexService::new(
            url,
            config.index_api_key.clone(),
            Duration::from_secs(config.index_timeout_secs),
        )?)),
        None => {
            tracing::info!("No index URL configured; using in-process index");
            Ok(Arc::new(InMemoryIndex::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unsupported_index_accepts_everything_silently() {
        let index = UnsupportedIndex;
        assert!(!index.is_supported());
        assert!(index.commit(Vec::new()).await.is_ok());
        assert!(index.delete_all().await.is_ok());
        assert!(index.delete_by_ids(&["a".into()]).await.is_ok());
        assert!(index.delete_by_domains(&["d".into()]).await.is_ok());
    }

    #[test]
    fn config_selects_adapter() {
        let unsupported = Config {
            indexing_supported: false,
            ..Config::default()
        };
        assert!(!index_from_config(&unsupported).expect("index").is_supported());

        let local = Config::default();
        assert!(index_from_config(&local).expect("index").is_supported());

        let remote = Config {
            index_url: Some("not a url".into()),
            ..Config::default()
        };
        assert!(matches!(
            index_from_config(&remote),
            Err(IndexError::InvalidUrl(_))
        ));
    }
}
