//! Conversion of submitted items into indexable records.

use crate::{
    index::IndexableRecord, processing::types::SearchableItemInput, thumbnail::ThumbnailSource,
};
use std::sync::Arc;

/// Turns a [`SearchableItemInput`] into an [`IndexableRecord`], fetching its thumbnail on the way.
#[derive(Clone)]
pub struct ItemConverter {
    thumbnails: Arc<dyn ThumbnailSource>,
    default_domain: Arc<str>,
}

impl ItemConverter {
    /// Create a converter that falls back to `default_domain` for items without one.
    pub fn new(thumbnails: Arc<dyn ThumbnailSource>, default_domain: impl Into<Arc<str>>) -> Self {
        Self {
            thumbnails,
            default_domain: default_domain.into(),
        }
    }

    /// Convert one item. Never fails: a thumbnail that cannot be fetched is simply left out.
    pub async fn convert(&self, item: SearchableItemInput) -> IndexableRecord {
        let SearchableItemInput {
            title,
            id,
            description,
            keywords,
            image_url,
            domain,
        } = item;

        let thumbnail = match image_url.as_deref() {
            Some(url) => self.thumbnails.fetch(url).await,
            None => None,
        };

        IndexableRecord {
            domain: self.resolve_domain(domain),
            id,
            title,
            description,
            keywords,
            thumbnail,
        }
    }

    fn resolve_domain(&self, domain: Option<String>) -> String {
        domain
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| self.default_domain.to_string())
    }
}
