//! Supabase Token Store
//!
//! `TokenStore` over the PostgREST endpoint Supabase exposes at
//! `{url}/rest/v1/{table}`. Range predicates and ordering are passed as
//! PostgREST query operators; exact counts come back in `Content-Range`
//! for a `HEAD` request carrying `Prefer: count=exact`.

use std::fmt;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};

use crate::domain::{CreatedRange, TokenRecord};
use crate::ports::{PageQuery, StoreError, TokenStore};

const CREATED_AT_COLUMN: &str = "createdAt";
const PAGE_COLUMNS: &str = "mint,name,symbol,createdAt";

#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Public (anon) API key
    pub anon_key: String,
    /// Table holding token rows
    pub table: String,
    /// Request timeout
    pub timeout: Duration,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            table: "tokens".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .field("table", &self.table)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SupabaseTokenStore {
    config: SupabaseConfig,
    http: Client,
}

impl SupabaseTokenStore {
    pub fn with_config(config: SupabaseConfig) -> Result<Self, StoreError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.url.trim_end_matches('/'),
            self.config.table
        )
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
    }
}

/// PostgREST filter pairs for a creation-time range
fn range_params(range: &CreatedRange) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(gte) = range.gte {
        params.push((CREATED_AT_COLUMN, format!("gte.{}", gte)));
    }
    if let Some(lt) = range.lt {
        params.push((CREATED_AT_COLUMN, format!("lt.{}", lt)));
    }
    params
}

fn page_params(query: &PageQuery) -> Vec<(&'static str, String)> {
    let direction = if query.order.is_ascending() { "asc" } else { "desc" };

    let mut params = vec![("select", PAGE_COLUMNS.to_string())];
    params.extend(range_params(&query.range));
    params.push(("order", format!("{}.{}", CREATED_AT_COLUMN, direction)));
    params.push(("offset", query.offset.to_string()));
    params.push(("limit", query.limit.to_string()));
    params
}

/// Total from a `Content-Range` header (`0-29/1234` or `*/1234`)
fn parse_content_range(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

async fn error_for(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    StoreError::Status { status, body }
}

#[async_trait]
impl TokenStore for SupabaseTokenStore {
    async fn count(&self, range: CreatedRange) -> Result<u64, StoreError> {
        let mut params = vec![("select", "*".to_string())];
        params.extend(range_params(&range));

        let response = self
            .authorized(self.http.head(self.table_url()))
            .header("Prefer", "count=exact")
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for(response).await);
        }

        let header = response
            .headers()
            .get("content-range")
            .ok_or(StoreError::MissingCount)?
            .to_str()
            .map_err(|e| StoreError::ParseError(format!("invalid Content-Range: {}", e)))?;

        parse_content_range(header).ok_or(StoreError::MissingCount)
    }

    async fn fetch_page(&self, query: PageQuery) -> Result<Vec<TokenRecord>, StoreError> {
        tracing::debug!(
            "Fetching tokens [{}..={}] order={} range={:?}",
            query.offset,
            query.last_index(),
            query.order,
            query.range
        );

        let response = self
            .authorized(self.http.get(self.table_url()))
            .query(&page_params(&query))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for(response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| StoreError::ParseError(format!("Failed to parse token rows: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SortOrder;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> SupabaseTokenStore {
        SupabaseTokenStore::with_config(SupabaseConfig::new(server.uri(), "anon-key")).unwrap()
    }

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range("*/1234"), Some(1234));
        assert_eq!(parse_content_range("0-29/57"), Some(57));
        assert_eq!(parse_content_range("0-29/*"), None);
        assert_eq!(parse_content_range("garbage"), None);
    }

    #[test]
    fn test_page_params() {
        let query = PageQuery {
            range: CreatedRange { gte: Some(100), lt: Some(200) },
            order: SortOrder::Oldest,
            offset: 30,
            limit: 90,
        };
        let params = page_params(&query);
        assert!(params.contains(&("createdAt", "gte.100".to_string())));
        assert!(params.contains(&("createdAt", "lt.200".to_string())));
        assert!(params.contains(&("order", "createdAt.asc".to_string())));
        assert!(params.contains(&("offset", "30".to_string())));
        assert!(params.contains(&("limit", "90".to_string())));
    }

    #[test]
    fn test_debug_redacts_key() {
        let printed = format!("{:?}", SupabaseConfig::new("https://x.supabase.co", "anon-secret"));
        assert!(!printed.contains("anon-secret"));
    }

    #[tokio::test]
    async fn test_count_reads_content_range() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/rest/v1/tokens"))
            .and(header("prefer", "count=exact"))
            .and(header("apikey", "anon-key"))
            .and(query_param("createdAt", "gte.100"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-range", "*/42"))
            .mount(&server)
            .await;

        let range = CreatedRange { gte: Some(100), lt: None };
        assert_eq!(store_for(&server).count(range).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_count_without_header_fails() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/rest/v1/tokens"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let result = store_for(&server).count(CreatedRange::default()).await;
        assert!(matches!(result, Err(StoreError::MissingCount)));
    }

    #[tokio::test]
    async fn test_fetch_page_decodes_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/tokens"))
            .and(query_param("order", "createdAt.desc"))
            .and(query_param("offset", "0"))
            .and(query_param("limit", "30"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"mint": "MintA", "name": "Alpha", "symbol": "ALP", "createdAt": 1717000100},
                {"mint": "MintB", "name": "Beta", "symbol": "BET", "createdAt": "1717000000"}
            ])))
            .mount(&server)
            .await;

        let query = PageQuery {
            range: CreatedRange::default(),
            order: SortOrder::Newest,
            offset: 0,
            limit: 30,
        };
        let rows = store_for(&server).fetch_page(query).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].mint, "MintA");
        assert_eq!(rows[1].created_at, 1_717_000_000);
    }

    #[tokio::test]
    async fn test_fetch_page_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/tokens"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad filter"))
            .mount(&server)
            .await;

        let query = PageQuery {
            range: CreatedRange::default(),
            order: SortOrder::Newest,
            offset: 0,
            limit: 30,
        };
        match store_for(&server).fetch_page(query).await {
            Err(StoreError::Status { status, body }) => {
                assert_eq!(status, 400);
                assert_eq!(body, "bad filter");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
