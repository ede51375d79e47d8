//! Shared types used by the index adapters.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned while writing to or deleting from the search index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Base URL failed to parse or normalize.
    #[error("Invalid index URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Index service responded with an unexpected status code.
    #[error("Unexpected index response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from the index service.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Index refused the operation for a reason of its own.
    #[error("Index rejected the request: {0}")]
    Rejected(String),
}

/// Record ready to be stored in the search index.
///
/// Built by the item converter and handed to exactly one commit call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexableRecord {
    /// Unique identifier; later commits with the same id replace this record.
    pub id: String,
    /// Namespace used for bulk deletion.
    pub domain: String,
    /// Display title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Optional search keywords, in submission order.
    pub keywords: Option<Vec<String>>,
    /// PNG-encoded thumbnail, when one could be fetched.
    pub thumbnail: Option<Vec<u8>>,
}
