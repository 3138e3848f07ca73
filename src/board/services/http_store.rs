//! # HTTP Document Store
//!
//! REST client for the realtime JSON database that backs the board.

use super::store::{ChildQuery, DocumentStore, StorePath};
use crate::board::error::{BoardError, BoardResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Body returned by a create (`POST`) call
#[derive(Debug, Deserialize)]
struct CreatedKey {
    name: String,
}

/// Document store reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDocumentStore {
    pub fn new(base_url: impl Into<String>) -> BoardResult<Self> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(BoardError::Config(format!(
                "store_url must be an http(s) URL, got '{base_url}'"
            )));
        }

        tracing::debug!("Creating HttpDocumentStore for {}", base_url);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turn a non-success status into a network failure
    async fn check_status(response: reqwest::Response) -> BoardResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(BoardError::Network(format!(
                "{} {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or(""),
                body.trim()
            )))
        }
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn read(&self, path: &StorePath, query: Option<&ChildQuery>) -> BoardResult<Value> {
        let url = path.to_url(&self.base_url);
        tracing::debug!("GET {} (query: {:?})", url, query);

        let mut request = self.client.get(&url);
        if let Some(query) = query {
            request = request.query(&[
                ("orderBy", format!("\"{}\"", query.order_by)),
                ("limitToLast", query.limit_to_last.to_string()),
            ]);
        }

        let response = Self::check_status(request.send().await?).await?;
        let value = response.json::<Value>().await?;
        Ok(value)
    }

    async fn create(&self, path: &StorePath, document: Value) -> BoardResult<String> {
        let url = path.to_url(&self.base_url);
        tracing::debug!("POST {}", url);

        let response = self.client.post(&url).json(&document).send().await?;
        let response = Self::check_status(response).await?;
        let created: CreatedKey = response.json().await?;
        tracing::info!("Created {}/{}", path, created.name);
        Ok(created.name)
    }

    async fn overwrite(&self, path: &StorePath, value: Value) -> BoardResult<()> {
        let url = path.to_url(&self.base_url);
        tracing::debug!("PUT {} = {}", url, value);

        let response = self.client.put(&url).json(&value).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }
}
