//! Core data types and error definitions for the indexing pipeline.

use crate::{index::IndexError, thumbnail::ThumbnailError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Item submitted by the application for indexing.
///
/// `title` and `id` must be non-blank. [`SearchableItemDraft::into_input`] checks this at the
/// boundary; [`SearchableItemInput::new`] does not, and the bridge re-validates every submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchableItemInput {
    /// Display title.
    pub title: String,
    /// Unique identifier used for later updates and deletion.
    pub id: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Optional search keywords.
    pub keywords: Option<Vec<String>>,
    /// Optional URL of a thumbnail image.
    pub image_url: Option<String>,
    /// Optional domain identifier; the configured default applies when absent or empty.
    pub domain: Option<String>,
}

impl SearchableItemInput {
    /// Create an item with only the required fields set.
    pub fn new(title: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            id: id.into(),
            description: None,
            keywords: None,
            image_url: None,
            domain: None,
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach search keywords.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    /// Attach a thumbnail URL.
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Attach a domain identifier.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub(crate) fn validate(&self, index: usize) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField {
                index,
                field: "title",
            });
        }
        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingField { index, field: "id" });
        }
        Ok(())
    }
}

/// Untrusted item shape as received from external callers (JSON bodies, files).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchableItemDraft {
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Unique identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional keywords.
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    /// Optional thumbnail URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Optional domain identifier.
    #[serde(default)]
    pub domain: Option<String>,
}

impl SearchableItemDraft {
    /// Validate the draft found at position `index` of a submission.
    pub fn into_input(self, index: usize) -> Result<SearchableItemInput, ValidationError> {
        let item = SearchableItemInput {
            title: self.title.unwrap_or_default(),
            id: self.id.unwrap_or_default(),
            description: self.description,
            keywords: self.keywords,
            image_url: self.image_url,
            domain: self.domain,
        };
        item.validate(index)?;
        Ok(item)
    }
}

/// Validate a list of drafts, stopping at the first invalid entry.
pub fn validate_drafts(
    drafts: Vec<SearchableItemDraft>,
) -> Result<Vec<SearchableItemInput>, ValidationError> {
    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| draft.into_input(index))
        .collect()
}

/// Rejection of a submission before any work is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was absent or blank.
    #[error("item {index} is missing required field `{field}`")]
    MissingField {
        /// Position of the offending item in the submission.
        index: usize,
        /// Name of the missing field.
        field: &'static str,
    },
}

/// Errors emitted by the indexing pipeline.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Submission contained an invalid item.
    #[error("Invalid searchable item: {0}")]
    Validation(#[from] ValidationError),
    /// Index service rejected a write or delete.
    #[error("Index operation failed: {0}")]
    Index(#[from] IndexError),
}

/// Errors raised while wiring the bridge together at startup.
#[derive(Debug, Error)]
pub enum InitError {
    /// Index adapter could not be constructed.
    #[error("Failed to initialize index: {0}")]
    Index(#[from] IndexError),
    /// Thumbnail HTTP client could not be constructed.
    #[error("Failed to initialize thumbnail fetcher: {0}")]
    Thumbnail(#[from] ThumbnailError),
}

/// Summary of a successful submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexingOutcome {
    /// Number of records committed.
    pub items: usize,
    /// Number of chunks committed.
    pub chunks: usize,
    /// Number of records committed with a thumbnail.
    pub thumbnails: usize,
}

/// Result of registering one chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkReport {
    /// Records included in the commit.
    pub records: usize,
    /// Records that carried a thumbnail.
    pub thumbnails: usize,
}
