//! reqwest-backed transport

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use super::{Reply, Transport};
use crate::common::config::BackendConfig;
use crate::common::Result;

/// HTTP transport to the backend API
///
/// Connections are pooled by the inner client and closed when this value
/// is dropped.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cj-run/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn finish(&self, response: reqwest::Response) -> Result<Reply> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(Reply { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, bearer: &str) -> Result<Reply> {
        tracing::debug!(path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(bearer)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        self.finish(response).await
    }

    async fn post(&self, path: &str, bearer: &str, body: Option<&Value>) -> Result<Reply> {
        tracing::debug!(path, "POST");
        let request = self.client.post(self.url(path)).bearer_auth(bearer);
        let request = match body {
            Some(body) => request.json(body),
            None => request.header(reqwest::header::CONTENT_TYPE, "application/json"),
        };
        let response = request.send().await?;
        self.finish(response).await
    }
}
