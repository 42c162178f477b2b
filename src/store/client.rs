use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::store::query::Filter;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to store timed out")]
    Timeout,

    #[error("store request failed: {0}")]
    Transport(reqwest::Error),

    #[error("store responded {status}: {body}")]
    Unexpected { status: u16, body: String },
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Timeout
        } else {
            StoreError::Transport(err)
        }
    }
}

/// Client for the managed store's table, auth, and object-storage APIs.
///
/// One instance per process; the credential headers live here and nowhere
/// else. Cloning is cheap (the inner `reqwest::Client` is an `Arc`).
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl StoreClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let base_url = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", &self.api_key))
    }

    /// Insert a row and return the echoed record including the
    /// server-assigned id.
    pub async fn create(&self, table: &str, record: &Value) -> Result<Value, StoreError> {
        let url = format!("{}/rest/v1/{table}", self.base_url);
        let resp = self
            .authed(self.http.post(&url))
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await?;
        let status = resp.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(unexpected(status, resp).await);
        }
        let body: Value = resp.json().await?;
        // The store answers inserts with a one-element array.
        Ok(match body {
            Value::Array(mut rows) if !rows.is_empty() => rows.remove(0),
            other => other,
        })
    }

    /// Read rows matching `filter`, shaped by the column-selection
    /// expression (`*` selects everything, embedded relations allowed).
    pub async fn read(
        &self,
        table: &str,
        filter: &Filter,
        select: &str,
    ) -> Result<Vec<Value>, StoreError> {
        let url = format!("{}/rest/v1/{table}", self.base_url);
        let mut pairs = vec![("select".to_string(), select.to_string())];
        pairs.extend(filter.to_query_pairs());
        let resp = self
            .authed(self.http.get(&url))
            .query(&pairs)
            .send()
            .await?;
        if resp.status() != StatusCode::OK {
            return Err(unexpected(resp.status(), resp).await);
        }
        Ok(resp.json().await?)
    }

    /// Merge `patch` into every row matching `filter`.
    pub async fn update(
        &self,
        table: &str,
        filter: &Filter,
        patch: &Value,
    ) -> Result<(), StoreError> {
        let url = format!("{}/rest/v1/{table}", self.base_url);
        let resp = self
            .authed(self.http.patch(&url))
            .header("Prefer", "resolution=merge-duplicates")
            .query(&filter.to_query_pairs())
            .json(patch)
            .send()
            .await?;
        let status = resp.status();
        if status != StatusCode::OK && status != StatusCode::NO_CONTENT {
            return Err(unexpected(status, resp).await);
        }
        Ok(())
    }

    /// Delete every row matching `filter`.
    pub async fn delete(&self, table: &str, filter: &Filter) -> Result<(), StoreError> {
        let url = format!("{}/rest/v1/{table}", self.base_url);
        let resp = self
            .authed(self.http.delete(&url))
            .header("Prefer", "return=representation")
            .query(&filter.to_query_pairs())
            .send()
            .await?;
        let status = resp.status();
        if status != StatusCode::OK && status != StatusCode::NO_CONTENT {
            return Err(unexpected(status, resp).await);
        }
        Ok(())
    }

    /// Create an identity in the store's auth service.
    pub async fn signup(&self, email: &str, password: &str) -> Result<Value, StoreError> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let resp = self
            .authed(self.http.post(&url))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        let status = resp.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(unexpected(status, resp).await);
        }
        Ok(resp.json().await?)
    }

    /// Exchange credentials for an access token.
    pub async fn password_login(&self, email: &str, password: &str) -> Result<Value, StoreError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let resp = self
            .authed(self.http.post(&url))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        if resp.status() != StatusCode::OK {
            return Err(unexpected(resp.status(), resp).await);
        }
        Ok(resp.json().await?)
    }

    /// Upload raw bytes to object storage under `bucket/filename`.
    pub async fn upload_object(
        &self,
        bucket: &str,
        filename: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        let url = format!("{}/storage/v1/object/{bucket}/{filename}", self.base_url);
        let resp = self
            .authed(self.http.post(&url))
            .header("Content-Type", content_type.to_string())
            .body(bytes)
            .send()
            .await?;
        let status = resp.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(unexpected(status, resp).await);
        }
        Ok(())
    }

    /// Deterministic public URL for an uploaded object. No existence check
    /// is performed; the bucket is assumed public.
    pub fn public_object_url(&self, bucket: &str, filename: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{bucket}/{filename}",
            self.base_url
        )
    }
}

async fn unexpected(status: StatusCode, resp: reqwest::Response) -> StoreError {
    let body = resp.text().await.unwrap_or_default();
    StoreError::Unexpected {
        status: status.as_u16(),
        body,
    }
}
