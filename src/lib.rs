#![deny(missing_docs)]

//! Core library for the Spotlight indexing bridge.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Search activation notifications.
pub mod events;
/// Search index service interface and adapters.
pub mod index;
/// Structured logging and tracing setup.
pub mod logging;
/// Indexing metrics helpers.
pub mod metrics;
/// Chunked, concurrent indexing pipeline.
pub mod processing;
/// Remote thumbnail retrieval.
pub mod thumbnail;
