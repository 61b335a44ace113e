//! Gateway HTTP Client
//!
//! `GatewayPort` over the proxy endpoints, the same way a browser talks to
//! the gateway: no upstream credentials on this side.

use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::ports::{GatewayPort, MetadataQuote, UpstreamError};

#[derive(Debug, Clone)]
pub struct GatewayClient {
    base_url: String,
    http: Client,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, UpstreamError> {
        Self::with_timeout(base_url, Duration::from_secs(20))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, mint: &str) -> Result<T, UpstreamError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), endpoint);

        let response = self.http.get(&url).query(&[("id", mint)]).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(UpstreamError::EmptyBody);
        }

        serde_json::from_str(&body).map_err(|e| UpstreamError::ParseError(e.to_string()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl GatewayPort for GatewayClient {
    async fn coin_metadata(&self, mint: &str) -> Result<MetadataQuote, UpstreamError> {
        self.get("/proxy/metadata", mint).await
    }

    async fn all_time_high(&self, mint: &str) -> Result<serde_json::Value, UpstreamError> {
        self.get("/proxy/all-time-high", mint).await
    }
}
