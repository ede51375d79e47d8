//! HTTP client wrapper for a remote search index service.

use crate::index::{
    IndexService,
    payload::{build_payload, current_timestamp_rfc3339},
    types::{IndexError, IndexableRecord},
};
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::json;
use std::time::Duration;

/// Lightweight HTTP client for index operations.
pub struct HttpIndexService {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
}

impl HttpIndexService {
    /// Construct a client targeting `base_url`. Each request fails after `timeout`.
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, IndexError> {
        let client = Client::builder()
            .user_agent(concat!("spotlight-bridge/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        let base_url = normalize_base_url(base_url).map_err(IndexError::InvalidUrl)?;
        tracing::debug!(
            url = %base_url,
            has_api_key = api_key.as_deref().map(|value| !value.is_empty()).unwrap_or(false),
            "Initialized index HTTP client"
        );

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format_endpoint(&self.base_url, path);
        let mut req = self.client.request(method, url);
        if let Some(api_key) = &self.api_key
            && !api_key.is_empty()
        {
            req = req.header("api-key", api_key);
        }
        req
    }

    async fn ensure_success<F>(
        &self,
        response: reqwest::Response,
        on_success: F,
    ) -> Result<(), IndexError>
    where
        F: FnOnce(),
    {
        if response.status().is_success() {
            on_success();
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let error = IndexError::UnexpectedStatus { status, body };
            tracing::error!(error = %error, "Index request failed");
            Err(error)
        }
    }
}

#[async_trait]
impl IndexService for HttpIndexService {
    async fn commit(&self, records: Vec<IndexableRecord>) -> Result<(), IndexError> {
        if records.is_empty() {
            return Ok(());
        }

        let now = current_timestamp_rfc3339();
        let serialized: Vec<_> = records
            .iter()
            .map(|record| build_payload(record, &now))
            .collect();
        let record_count = serialized.len();

        let response = self
            .request(Method::PUT, "records")
            .query(&[("wait", true)])
            .json(&json!({ "records": serialized }))
            .send()
            .await?;

        self.ensure_success(response, || {
            tracing::debug!(records = record_count, "Records committed");
        })
        .await
    }

    async fn delete_all(&self) -> Result<(), IndexError> {
        let response = self.request(Method::DELETE, "records").send().await?;
        self.ensure_success(response, || {
            tracing::debug!("All records deleted");
        })
        .await
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<(), IndexError> {
        let response = self
            .request(Method::POST, "records/delete")
            .json(&json!({ "ids": ids }))
            .send()
            .await?;
        self.ensure_success(response, || {
            tracing::debug!(ids = ids.len(), "Records deleted by id");
        })
        .await
    }

    async fn delete_by_domains(&self, domains: &[String]) -> Result<(), IndexError> {
        let response = self
            .request(Method::POST, "records/delete")
            .json(&json!({ "domains": domains }))
            .send()
            .await?;
        self.ensure_success(response, || {
            tracing::debug!(domains = domains.len(), "Records deleted by domain");
        })
        .await
    }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

fn format_endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
