//! C1 — sends textual queries and form posts to the upstream catalog API,
//! returning raw response bodies (spec §4.1). OAuth acquisition against the
//! upstream's own auth provider is explicitly out of scope (spec §1); the
//! client only carries a pre-configured bearer token and retries transient
//! failures, the way the teacher crate's IGDB client retries 429/5xx.

use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{instrument, warn};

const MAX_RETRIES: u32 = 5;
const BACKOFF_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Either a query-language body (`fields *; limit N; offset M;`) or a
/// form-encoded set of parameters (webhook registration).
#[derive(Debug, Clone)]
pub enum RequestBody {
    Text(String),
    Form(Vec<(String, String)>),
}

#[derive(Debug, Deserialize)]
pub struct WebhookEntry {
    pub url: String,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: i64,
}

pub struct UpstreamClient {
    http: Client,
    base_url: String,
    auth_token: String,
}

impl UpstreamClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: config.upstream_base_url.trim_end_matches('/').to_string(),
            auth_token: config.upstream_auth_token.clone(),
        }
    }

    pub fn endpoint_url(&self, entity_path: &str) -> String {
        format!("{}/{}", self.base_url, entity_path)
    }

    /// Sends a textual-RPC request and returns the raw bytes of the
    /// response. The endpoint + HTTP status is folded into errors so
    /// callers can log which upstream call failed.
    #[instrument(skip(self, body))]
    pub async fn send_string_request(
        &self,
        endpoint: &str,
        body: RequestBody,
        method: HttpMethod,
    ) -> Result<bytes::Bytes> {
        let mut attempt = 0u32;
        loop {
            let mut request = match method {
                HttpMethod::Get => self.http.get(endpoint),
                HttpMethod::Post => self.http.post(endpoint),
            };
            request = request.header("Authorization", format!("Bearer {}", self.auth_token));
            request = match &body {
                RequestBody::Text(text) => request
                    .header("Content-Type", "text/plain")
                    .body(text.clone()),
                RequestBody::Form(fields) => request.form(fields),
            };

            let response = request.send().await;
            match response {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        return resp
                            .bytes()
                            .await
                            .with_context(|| format!("reading response body from {endpoint}"));
                    }
                    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                        if attempt >= MAX_RETRIES {
                            let text = resp.text().await.unwrap_or_default();
                            return Err(anyhow!(
                                "upstream request to {endpoint} failed after retries (status={status}): {text}"
                            ));
                        }
                        let wait = BACKOFF_MS * (attempt as u64 + 1);
                        warn!(endpoint, %status, attempt, "retrying upstream request");
                        tokio::time::sleep(Duration::from_millis(wait)).await;
                        attempt += 1;
                        continue;
                    }
                    let text = resp.text().await.unwrap_or_default();
                    return Err(anyhow!(
                        "upstream request to {endpoint} failed (status={status}): {text}"
                    ));
                }
                Err(err) => {
                    if attempt >= MAX_RETRIES {
                        return Err(err).context(format!("upstream request to {endpoint}"));
                    }
                    let wait = BACKOFF_MS * (attempt as u64 + 1);
                    attempt += 1;
                    tokio::time::sleep(Duration::from_millis(wait)).await;
                    continue;
                }
            }
        }
    }

    /// Convenience wrapper: send a query-language clone page and parse it.
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<T>> {
        let body = RequestBody::Text(format!("fields *; limit {limit}; offset {offset};"));
        let bytes = self
            .send_string_request(endpoint, body, HttpMethod::Post)
            .await?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("decoding page from {endpoint} (offset={offset})"))
    }

    /// Parses the upstream's `{endpoint}/webhooks` response list.
    pub async fn fetch_webhooks(&self, entity_endpoint: &str) -> Result<Vec<WebhookEntry>> {
        let url = format!("{entity_endpoint}/webhooks");
        let bytes = self
            .send_string_request(&url, RequestBody::Text(String::new()), HttpMethod::Get)
            .await?;
        serde_json::from_slice(&bytes).with_context(|| format!("decoding webhook list from {url}"))
    }

    /// Registers a webhook for the given method by POSTing the form body.
    pub async fn register_webhook(
        &self,
        entity_endpoint: &str,
        method: &str,
        secret: &str,
        url: &str,
    ) -> Result<Vec<WebhookEntry>> {
        let target = format!("{entity_endpoint}/webhooks");
        let form = vec![
            ("method".to_string(), method.to_string()),
            ("secret".to_string(), secret.to_string()),
            ("url".to_string(), url.to_string()),
        ];
        let bytes = self
            .send_string_request(&target, RequestBody::Form(form), HttpMethod::Post)
            .await?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("decoding webhook registration response from {target}"))
    }

    /// Used to cross-check clone completeness (spec §8.6); not part of the
    /// clone algorithm's own termination condition.
    pub async fn fetch_count(&self, entity_endpoint: &str) -> Result<i64> {
        let url = format!("{entity_endpoint}/count");
        let bytes = self
            .send_string_request(&url, RequestBody::Text(String::new()), HttpMethod::Post)
            .await?;
        let parsed: CountResponse = serde_json::from_slice(&bytes)
            .with_context(|| format!("decoding count response from {url}"))?;
        Ok(parsed.count)
    }
}
