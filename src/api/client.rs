//! HTTP client for the inventory backend REST API.
//!
//! All record tables share one URL scheme: `GET /{kind}` lists a page,
//! `GET /{kind}/{id}` fetches one record, `POST`/`PUT`/`DELETE` mutate.
//! Reads retry with exponential backoff because the console refreshes in
//! the background; mutations run exactly once so a flaky connection can
//! never double-create a record.

use backon::{ExponentialBuilder, Retryable};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::error::ApiError;
use crate::config::Config;
use crate::types::{
    Asset, Audit, Category, Component, EntityKind, EntitySummary, Product, Records, Repair,
    Supplier, User,
};

/// Environment variable holding the bearer token. Tokens never live in
/// config files.
pub const API_TOKEN_ENV: &str = "ASSETDESK_API_TOKEN";

const USER_AGENT: &str = concat!("assetdesk/", env!("CARGO_PKG_VERSION"));

/// One fetched page plus the server-side total row count.
#[derive(Debug, Clone)]
pub struct RecordPage {
    pub records: Records,
    pub total: u64,
}

/// Wire envelope for list endpoints.
#[derive(Debug, Deserialize)]
struct ListEnvelope<T> {
    items: Vec<T>,
    /// Older servers omit the total; the page length stands in.
    #[serde(default)]
    total: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: i64,
}

/// Client for one inventory backend.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    retry_attempts: usize,
}

impl ApiClient {
    /// Create a client against the given base URL.
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout_secs: u64,
        retry_attempts: usize,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            token,
            retry_attempts,
        })
    }

    /// Build a client from loaded configuration, reading the token from
    /// [`API_TOKEN_ENV`].
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let base_url = config.server.base_url.trim();
        if base_url.is_empty() {
            return Err(ApiError::NotConfigured);
        }

        let token = std::env::var(API_TOKEN_ENV)
            .ok()
            .filter(|t| !t.is_empty());
        if token.is_none() {
            debug!("No API token in environment, requests go out unauthenticated");
        }

        Self::new(
            base_url,
            token,
            config.server.timeout_secs,
            config.server.retry_attempts,
        )
    }

    /// Whether a bearer token was picked up at construction.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    // ─── Record Operations ──────────────────────────────────────────────────

    /// Fetch one page of records. `page` is 1-based; `search` narrows by
    /// name server-side when non-empty.
    pub async fn list(
        &self,
        kind: EntityKind,
        search: Option<&str>,
        page: usize,
        page_size: usize,
    ) -> Result<RecordPage, ApiError> {
        debug!(kind = kind.api_path(), page, "Fetching record page");

        let (records, total) = match kind {
            EntityKind::Assets => {
                let env = self.fetch_page::<Asset>(kind, search, page, page_size).await?;
                (Records::Assets(env.items), env.total)
            }
            EntityKind::Products => {
                let env = self.fetch_page::<Product>(kind, search, page, page_size).await?;
                (Records::Products(env.items), env.total)
            }
            EntityKind::Components => {
                let env = self
                    .fetch_page::<Component>(kind, search, page, page_size)
                    .await?;
                (Records::Components(env.items), env.total)
            }
            EntityKind::Audits => {
                let env = self.fetch_page::<Audit>(kind, search, page, page_size).await?;
                (Records::Audits(env.items), env.total)
            }
            EntityKind::Repairs => {
                let env = self.fetch_page::<Repair>(kind, search, page, page_size).await?;
                (Records::Repairs(env.items), env.total)
            }
            EntityKind::Suppliers => {
                let env = self
                    .fetch_page::<Supplier>(kind, search, page, page_size)
                    .await?;
                (Records::Suppliers(env.items), env.total)
            }
            EntityKind::Categories => {
                let env = self
                    .fetch_page::<Category>(kind, search, page, page_size)
                    .await?;
                (Records::Categories(env.items), env.total)
            }
            EntityKind::Users => {
                let env = self.fetch_page::<User>(kind, search, page, page_size).await?;
                (Records::Users(env.items), env.total)
            }
        };

        Ok(RecordPage { records, total })
    }

    /// Fetch the names of records whose name contains `fragment`.
    ///
    /// Used to collect clone relatives before duplicating; the caller still
    /// applies its own exact matching to what comes back.
    pub async fn search_names(
        &self,
        kind: EntityKind,
        fragment: &str,
    ) -> Result<Vec<String>, ApiError> {
        let path = format!("{}/names", kind.api_path());
        let query = [("search", fragment.to_string())];
        self.get_with_retry(&path, &query).await
    }

    /// Fetch a single product by id.
    pub async fn fetch_product(&self, id: i64) -> Result<Product, ApiError> {
        let path = format!("{}/{id}", EntityKind::Products.api_path());
        self.get_with_retry(&path, &[]).await
    }

    /// Fetch a single component by id.
    pub async fn fetch_component(&self, id: i64) -> Result<Component, ApiError> {
        let path = format!("{}/{id}", EntityKind::Components.api_path());
        self.get_with_retry(&path, &[]).await
    }

    /// Create a record and return the id the server assigned.
    pub async fn create(&self, kind: EntityKind, payload: &Value) -> Result<i64, ApiError> {
        let path = kind.api_path();
        debug!(kind = path, "Creating record");

        let response = self
            .authorized(self.http.post(self.url(path)))
            .json(payload)
            .send()
            .await?;
        let response = Self::ensure_success(response, path).await?;

        let created: CreatedResponse = response.json().await?;
        Ok(created.id)
    }

    /// Replace an existing record's fields.
    pub async fn update(&self, kind: EntityKind, id: i64, payload: &Value) -> Result<(), ApiError> {
        let path = format!("{}/{id}", kind.api_path());
        debug!(path = %path, "Updating record");

        let response = self
            .authorized(self.http.put(self.url(&path)))
            .json(payload)
            .send()
            .await?;
        Self::ensure_success(response, &path).await?;
        Ok(())
    }

    /// Delete a record.
    pub async fn delete(&self, kind: EntityKind, id: i64) -> Result<(), ApiError> {
        let path = format!("{}/{id}", kind.api_path());
        debug!(path = %path, "Deleting record");

        let response = self
            .authorized(self.http.delete(self.url(&path)))
            .send()
            .await?;
        Self::ensure_success(response, &path).await?;
        Ok(())
    }

    /// Per-kind record counts for the overview panel.
    pub async fn summaries(&self) -> Result<Vec<EntitySummary>, ApiError> {
        self.get_with_retry("summary", &[]).await
    }

    /// Cheap reachability and auth probe.
    pub async fn ping(&self) -> Result<(), ApiError> {
        let response = self.authorized(self.http.get(self.url("health"))).send().await?;
        Self::ensure_success(response, "health").await?;
        Ok(())
    }

    // ─── Plumbing ───────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    fn retry_strategy(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(500))
            .with_max_delay(Duration::from_secs(10))
            .with_max_times(self.retry_attempts)
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        search: Option<&str>,
        page: usize,
        page_size: usize,
    ) -> Result<PageResult<T>, ApiError> {
        let mut query: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("page_size", page_size.to_string()),
        ];
        if let Some(fragment) = search {
            if !fragment.is_empty() {
                query.push(("search", fragment.to_string()));
            }
        }

        let envelope: ListEnvelope<T> = self.get_with_retry(kind.api_path(), &query).await?;
        let total = envelope.total.unwrap_or(envelope.items.len() as u64);
        Ok(PageResult {
            items: envelope.items,
            total,
        })
    }

    /// GET with exponential backoff on transient failures.
    async fn get_with_retry<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let op = || async { self.get_json(path, query).await };

        op.retry(self.retry_strategy())
            .when(ApiError::is_retryable)
            .notify(|err, dur| {
                warn!(error = %err, delay = ?dur, "Retrying request");
            })
            .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut request = self.http.get(self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = self.authorized(request).send().await?;
        let response = Self::ensure_success(response, path).await?;
        Ok(response.json::<T>().await?)
    }

    /// Map non-success statuses onto [`ApiError`]. Consumes the response
    /// body on failure so the server's message reaches the status line.
    async fn ensure_success(
        response: reqwest::Response,
        resource: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        match status.as_u16() {
            200..=299 => Ok(response),
            401 => Err(ApiError::Unauthorized),
            403 => Err(ApiError::Forbidden),
            404 => Err(ApiError::not_found(resource)),
            400 | 422 => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::validation(error_message(&body)))
            }
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse().ok());
                Err(ApiError::rate_limited(retry_after))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::http(status, error_message(&body)))
            }
        }
    }
}

struct PageResult<T> {
    items: Vec<T>,
    total: u64,
}

/// Pull a human-readable message out of an error body. The backend sends
/// `{"error": "..."}`; plain text and empty bodies degrade sensibly.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = value.get("error").and_then(Value::as_str) {
            return msg.to_string();
        }
        if let Some(msg) = value.get("message").and_then(Value::as_str) {
            return msg.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no response body".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(base_url, None, 5, 0).unwrap()
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let c = client("http://localhost:8080/api/");
        assert_eq!(c.url("assets"), "http://localhost:8080/api/assets");

        let c = client("http://localhost:8080/api");
        assert_eq!(c.url("products/7"), "http://localhost:8080/api/products/7");
    }

    #[test]
    fn test_error_message_prefers_error_field() {
        assert_eq!(
            error_message(r#"{"error": "name already taken"}"#),
            "name already taken"
        );
        assert_eq!(
            error_message(r#"{"message": "bad request"}"#),
            "bad request"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_text() {
        assert_eq!(error_message("  internal failure \n"), "internal failure");
        assert_eq!(error_message(""), "no response body");
        assert_eq!(error_message("{\"detail\": 4}"), "{\"detail\": 4}");
    }

    #[test]
    fn test_from_config_requires_base_url() {
        let mut config = Config::default();
        config.server.base_url = String::new();
        let err = ApiClient::from_config(&config).err();
        assert!(matches!(err, Some(ApiError::NotConfigured)));
    }
}
