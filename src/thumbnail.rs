//! Remote thumbnail retrieval.
//!
//! A thumbnail is optional decoration on an indexed record. Every failure on this path (bad URL,
//! transport error, non-2xx status, undecodable bytes, timeout) collapses to `None` so the text
//! fields of the item are still indexed.

use crate::config::Config;
use async_trait::async_trait;
use image::ImageFormat;
use reqwest::{Client, StatusCode};
use std::io::Cursor;
use std::time::Duration;
use thiserror::Error;

/// Reasons a thumbnail could not be produced. Logged, never surfaced to callers.
#[derive(Debug, Error)]
pub enum ThumbnailError {
    /// Request failed before a response arrived, including timeouts.
    #[error("thumbnail request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Image host answered with a non-success status.
    #[error("thumbnail host returned {0}")]
    Status(StatusCode),
    /// Response body was not a supported image.
    #[error("failed to decode thumbnail: {0}")]
    Decode(#[from] image::ImageError),
    /// Blocking decode task panicked or was cancelled.
    #[error("thumbnail decode task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Source of thumbnail bytes for item conversion.
#[async_trait]
pub trait ThumbnailSource: Send + Sync {
    /// Fetch `url` and return PNG bytes, or `None` when no thumbnail can be produced.
    async fn fetch(&self, url: &str) -> Option<Vec<u8>>;
}

/// Downloads images over HTTP and re-encodes them as PNG thumbnails.
#[derive(Clone)]
pub struct ThumbnailFetcher {
    client: Client,
    max_dimension: Option<u32>,
}

impl ThumbnailFetcher {
    /// Build a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration, max_dimension: Option<u32>) -> Result<Self, ThumbnailError> {
        let client = Client::builder()
            .user_agent(concat!("spotlight-bridge/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            max_dimension,
        })
    }

    /// Build a fetcher from the thumbnail settings in `config`.
    pub fn from_config(config: &Config) -> Result<Self, ThumbnailError> {
        Self::new(
            Duration::from_secs(config.thumbnail_timeout_secs),
            config.thumbnail_max_dimension,
        )
    }

    async fn try_fetch(&self, url: &str) -> Result<Vec<u8>, ThumbnailError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ThumbnailError::Status(status));
        }
        let bytes = response.bytes().await?;
        let max_dimension = self.max_dimension;
        tokio::task::spawn_blocking(move || encode_thumbnail(&bytes, max_dimension)).await?
    }
}

#[async_trait]
impl ThumbnailSource for ThumbnailFetcher {
    async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        match self.try_fetch(url).await {
            Ok(png) => {
                tracing::debug!(url, bytes = png.len(), "Thumbnail fetched");
                Some(png)
            }
            Err(error) => {
                tracing::debug!(url, error = %error, "Thumbnail unavailable; indexing without it");
                None
            }
        }
    }
}

fn encode_thumbnail(bytes: &[u8], max_dimension: Option<u32>) -> Result<Vec<u8>, ThumbnailError> {
    let image = image::load_from_memory(bytes)?;
    let image = match max_dimension {
        Some(max) if image.width() > max || image.height() > max => image.thumbnail(max, max),
        _ => image,
    };
    let mut encoded = Cursor::new(Vec::new());
    image.write_to(&mut encoded, ImageFormat::Png)?;
    Ok(encoded.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::GET, MockServer};
    use image::{DynamicImage, GenericImageView, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(width, height));
        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, ImageFormat::Png)
            .expect("encode png");
        buffer.into_inner()
    }

    fn fetcher(max_dimension: Option<u32>) -> ThumbnailFetcher {
        ThumbnailFetcher::new(Duration::from_secs(5), max_dimension).expect("fetcher")
    }

    #[tokio::test]
    async fn fetches_and_reencodes_png() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/cover.png");
                then.status(200)
                    .header("content-type", "image/png")
                    .body(png_bytes(8, 8));
            })
            .await;

        let png = fetcher(None)
            .fetch(&server.url("/cover.png"))
            .await
            .expect("thumbnail");
        let decoded = image::load_from_memory(&png).expect("decodable");
        assert_eq!(decoded.dimensions(), (8, 8));
    }

    #[tokio::test]
    async fn downscales_to_max_dimension() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/wide.png");
                then.status(200).body(png_bytes(64, 32));
            })
            .await;

        let png = fetcher(Some(16))
            .fetch(&server.url("/wide.png"))
            .await
            .expect("thumbnail");
        let decoded = image::load_from_memory(&png).expect("decodable");
        assert_eq!(decoded.dimensions(), (16, 8));
    }

    #[tokio::test]
    async fn error_status_yields_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing.png");
                then.status(404);
            })
            .await;

        assert!(fetcher(None).fetch(&server.url("/missing.png")).await.is_none());
    }

    #[tokio::test]
    async fn undecodable_body_yields_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/not-an-image");
                then.status(200).body("<html>nope</html>");
            })
            .await;

        assert!(
            fetcher(None)
                .fetch(&server.url("/not-an-image"))
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn slow_host_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/slow.png");
                then.status(200)
                    .delay(Duration::from_secs(3))
                    .body(png_bytes(2, 2));
            })
            .await;

        let fetcher = ThumbnailFetcher::new(Duration::from_millis(200), None).expect("fetcher");
        assert!(fetcher.fetch(&server.url("/slow.png")).await.is_none());
    }

    #[tokio::test]
    async fn malformed_url_yields_none() {
        assert!(fetcher(None).fetch("not a url").await.is_none());
    }
}
