//! HTTP implementation of the remote row store
//!
//! Speaks a PostgREST-style row API: `POST /rest/v1/{table}` creates,
//! `PATCH /rest/v1/{table}?id=eq.{id}` updates, `GET` with `eq.`
//! query filters reads. Authenticated by an API key on every request.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::Config;

use super::remote::{RemoteError, RemoteStore};

/// reqwest-backed [`RemoteStore`]
pub struct HttpRemoteStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpRemoteStore {
    /// Build a client from configuration. Timeout semantics are the
    /// HTTP client's: one deadline per request, no retry policy here.
    pub fn new(config: &Config) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| RemoteError::Request(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.remote_url.trim_end_matches('/').to_string(),
            api_key: config.remote_api_key.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status { status, body });
        }
        Ok(response)
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn create(&self, table: &str, row: Value) -> Result<Value, RemoteError> {
        let response = self
            .request(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await
            .map_err(|e| RemoteError::Request(format!("create {table} failed: {e}")))?;

        let created: Vec<Value> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::Request(format!("decode {table} response failed: {e}")))?;
        created.into_iter().next().ok_or(RemoteError::MissingId)
    }

    async fn create_many(&self, table: &str, rows: Vec<Value>) -> Result<(), RemoteError> {
        let response = self
            .request(self.client.post(self.table_url(table)))
            .header("Prefer", "return=minimal")
            .json(&rows)
            .send()
            .await
            .map_err(|e| RemoteError::Request(format!("create_many {table} failed: {e}")))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn update(&self, table: &str, id: &str, fields: Value) -> Result<(), RemoteError> {
        let response = self
            .request(self.client.patch(self.table_url(table)))
            .query(&[("id", format!("eq.{id}"))])
            .json(&fields)
            .send()
            .await
            .map_err(|e| RemoteError::Request(format!("update {table}/{id} failed: {e}")))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn read(&self, table: &str, filters: &[(&str, Value)]) -> Result<Vec<Value>, RemoteError> {
        let query: Vec<(String, String)> = filters
            .iter()
            .map(|(column, value)| {
                let literal = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (column.to_string(), format!("eq.{literal}"))
            })
            .collect();

        let response = self
            .request(self.client.get(self.table_url(table)))
            .query(&query)
            .send()
            .await
            .map_err(|e| RemoteError::Request(format!("read {table} failed: {e}")))?;

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::Request(format!("decode {table} response failed: {e}")))
    }
}
