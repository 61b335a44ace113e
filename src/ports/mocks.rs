//! In-memory port implementations
//!
//! Deterministic stand-ins for the token store and the gateway that record
//! every call, used by the unit and integration tests. Only compiled for
//! tests or with the `test-support` feature.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;

use crate::domain::{CreatedRange, TokenRecord};
use super::gateway::{GatewayPort, MetadataQuote, UpstreamError};
use super::token_store::{PageQuery, StoreError, TokenStore};

/// A call made against the in-memory store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Count(CreatedRange),
    Page(PageQuery),
}

/// Token store backed by a vector, with switchable failures
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    records: Vec<TokenRecord>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    fail_count: AtomicBool,
    fail_page: AtomicBool,
    page_delay: Duration,
}

impl InMemoryTokenStore {
    pub fn new(records: Vec<TokenRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    /// Simulated round-trip latency for page queries
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    pub fn set_fail_count(&self, fail: bool) {
        self.fail_count.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_page(&self, fail: bool) {
        self.fail_page.store(fail, Ordering::SeqCst);
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn page_calls(&self) -> Vec<PageQuery> {
        self.get_calls()
            .into_iter()
            .filter_map(|c| match c {
                StoreCall::Page(q) => Some(q),
                StoreCall::Count(_) => None,
            })
            .collect()
    }

    pub fn count_calls(&self) -> usize {
        self.get_calls()
            .iter()
            .filter(|c| matches!(c, StoreCall::Count(_)))
            .count()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn count(&self, range: CreatedRange) -> Result<u64, StoreError> {
        self.calls.lock().unwrap().push(StoreCall::Count(range));
        if self.fail_count.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("count query failed".into()));
        }
        Ok(self.records.iter().filter(|r| range.contains(r.created_at)).count() as u64)
    }

    async fn fetch_page(&self, query: PageQuery) -> Result<Vec<TokenRecord>, StoreError> {
        self.calls.lock().unwrap().push(StoreCall::Page(query));
        if !self.page_delay.is_zero() {
            tokio::time::sleep(self.page_delay).await;
        }
        if self.fail_page.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("page query failed".into()));
        }

        let mut rows: Vec<TokenRecord> = self
            .records
            .iter()
            .filter(|r| query.range.contains(r.created_at))
            .cloned()
            .collect();

        // Ties broken by mint so repeated queries return the same order
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.mint.cmp(&b.mint)));
        if !query.order.is_ascending() {
            rows.reverse();
        }

        Ok(rows.into_iter().skip(query.offset).take(query.limit).collect())
    }
}

/// A call made against the in-memory gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Metadata(String),
    AllTimeHigh(String),
}

/// Gateway answering from fixed tables; unknown mints fail like an upstream 500
#[derive(Debug, Default)]
pub struct MockGateway {
    metadata: HashMap<String, MetadataQuote>,
    ath: HashMap<String, serde_json::Value>,
    calls: Arc<Mutex<Vec<GatewayCall>>>,
    delay: Duration,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the metadata answer for a mint
    pub fn with_metadata(mut self, mint: &str, quote: MetadataQuote) -> Self {
        self.metadata.insert(mint.to_string(), quote);
        self
    }

    /// Builder method to set the ATH market cap for a mint
    pub fn with_ath(mut self, mint: &str, highest_market_cap: f64) -> Self {
        self.ath.insert(
            mint.to_string(),
            serde_json::json!({ "highest_market_cap": highest_market_cap }),
        );
        self
    }

    /// Builder method to set an arbitrary ATH payload for a mint
    pub fn with_ath_payload(mut self, mint: &str, payload: serde_json::Value) -> Self {
        self.ath.insert(mint.to_string(), payload);
        self
    }

    /// Builder method to make every lookup take `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn ath_calls(&self) -> usize {
        self.get_calls()
            .iter()
            .filter(|c| matches!(c, GatewayCall::AllTimeHigh(_)))
            .count()
    }

    pub fn metadata_calls(&self) -> usize {
        self.get_calls()
            .iter()
            .filter(|c| matches!(c, GatewayCall::Metadata(_)))
            .count()
    }
}

#[async_trait]
impl GatewayPort for MockGateway {
    async fn coin_metadata(&self, mint: &str) -> Result<MetadataQuote, UpstreamError> {
        self.calls.lock().unwrap().push(GatewayCall::Metadata(mint.to_string()));
        self.wait().await;
        self.metadata.get(mint).cloned().ok_or(UpstreamError::Status(500))
    }

    async fn all_time_high(&self, mint: &str) -> Result<serde_json::Value, UpstreamError> {
        self.calls.lock().unwrap().push(GatewayCall::AllTimeHigh(mint.to_string()));
        self.wait().await;
        self.ath.get(mint).cloned().ok_or(UpstreamError::Status(500))
    }
}
