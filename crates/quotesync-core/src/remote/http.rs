//! HTTP JSON remote feed.
//!
//! Speaks the placeholder-posts shape: `GET` returns an array of objects with
//! a `title`, `POST` accepts `{title, body}` and answers with an `id`.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::config::SyncSettings;
use crate::error::{Error, Result};
use crate::models::{Quote, RemoteId};
use crate::util::compact_text;

use super::{RemoteAdapter, RemoteQuote};

/// HTTP client for a JSON collection endpoint
#[derive(Debug, Clone)]
pub struct HttpRemote {
    endpoint: String,
    default_category: String,
    fetch_limit: usize,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct UploadBody<'a> {
    title: &'a str,
    body: &'a str,
}

impl HttpRemote {
    /// Build a client from validated sync settings.
    pub fn new(settings: &SyncSettings) -> Result<Self> {
        settings.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|error| Error::Config(format!("Failed to construct HTTP client: {error}")))?;

        Ok(Self {
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            default_category: settings.default_category.clone(),
            fetch_limit: settings.fetch_limit,
            client,
        })
    }

    /// Returns the endpoint this client was configured with.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn read_json(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Network(format!(
                "remote returned HTTP {}: {}",
                status.as_u16(),
                compact_text(&body)
            )));
        }
        Ok(response.json::<Value>().await?)
    }
}

impl RemoteAdapter for HttpRemote {
    async fn fetch_batch(&self) -> Result<Vec<RemoteQuote>> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let payload = Self::read_json(response).await?;
        parse_batch(&payload, &self.default_category, self.fetch_limit)
    }

    async fn upload(&self, quote: &Quote) -> Result<RemoteId> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&UploadBody {
                title: &quote.text,
                body: &quote.category,
            })
            .send()
            .await?;
        let payload = Self::read_json(response).await?;
        parse_upload_response(&payload)
    }
}

/// Map a fetched JSON payload onto remote quotes.
///
/// Elements without a string `title` are skipped; `category` falls back to
/// `default_category`.
pub fn parse_batch(
    payload: &Value,
    default_category: &str,
    limit: usize,
) -> Result<Vec<RemoteQuote>> {
    let items = payload
        .as_array()
        .ok_or_else(|| Error::Network("remote feed did not return a JSON array".to_string()))?;

    Ok(items
        .iter()
        .filter_map(|item| {
            let text = item.get("title")?.as_str()?.trim();
            if text.is_empty() {
                return None;
            }
            let category = item
                .get("category")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|category| !category.is_empty())
                .unwrap_or(default_category);
            Some(RemoteQuote {
                id: item.get("id").and_then(RemoteId::from_json),
                text: text.to_string(),
                category: category.to_string(),
            })
        })
        .take(limit)
        .collect())
}

/// Extract the assigned id from an upload response.
pub fn parse_upload_response(payload: &Value) -> Result<RemoteId> {
    payload
        .get("id")
        .and_then(RemoteId::from_json)
        .ok_or_else(|| Error::Network("upload response did not include an id".to_string()))
}
