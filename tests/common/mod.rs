#![allow(dead_code)]

use async_trait::async_trait;
use spotlight_bridge::{
    events::ActivationHub,
    index::{IndexError, IndexService, IndexableRecord},
    processing::{PipelineOptions, SearchableItemInput, SpotlightBridge},
    thumbnail::ThumbnailSource,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Index stub that records each commit and fails commits containing a marked id.
#[derive(Default)]
pub struct RecordingIndex {
    pub supported: bool,
    pub fail_when_contains: Option<String>,
    pub commits: Mutex<Vec<Vec<IndexableRecord>>>,
}

impl RecordingIndex {
    pub fn supported() -> Self {
        Self {
            supported: true,
            ..Self::default()
        }
    }

    pub fn failing_on(id: &str) -> Self {
        Self {
            supported: true,
            fail_when_contains: Some(id.to_string()),
            ..Self::default()
        }
    }

    pub async fn commit_sizes(&self) -> Vec<usize> {
        let mut sizes: Vec<usize> = self.commits.lock().await.iter().map(Vec::len).collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes
    }
}

#[async_trait]
impl IndexService for RecordingIndex {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn commit(&self, records: Vec<IndexableRecord>) -> Result<(), IndexError> {
        if let Some(marker) = &self.fail_when_contains
            && records.iter().any(|record| &record.id == marker)
        {
            return Err(IndexError::Rejected(format!("chunk containing {marker}")));
        }
        self.commits.lock().await.push(records);
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), IndexError> {
        self.commits.lock().await.clear();
        Ok(())
    }

    async fn delete_by_ids(&self, _ids: &[String]) -> Result<(), IndexError> {
        Ok(())
    }

    async fn delete_by_domains(&self, _domains: &[String]) -> Result<(), IndexError> {
        Ok(())
    }
}

pub struct NoThumbnails;

#[async_trait]
impl ThumbnailSource for NoThumbnails {
    async fn fetch(&self, _url: &str) -> Option<Vec<u8>> {
        None
    }
}

pub fn options() -> PipelineOptions {
    PipelineOptions {
        default_domain: "com.example.app".into(),
        max_concurrent_chunks: 4,
    }
}

pub fn bridge_with(
    index: Arc<dyn IndexService>,
    thumbnails: Arc<dyn ThumbnailSource>,
) -> SpotlightBridge {
    SpotlightBridge::new(index, thumbnails, ActivationHub::default(), options())
}

pub fn items(count: usize) -> Vec<SearchableItemInput> {
    (0..count)
        .map(|n| SearchableItemInput::new(format!("Item {n}"), format!("item-{n}")))
        .collect()
}
