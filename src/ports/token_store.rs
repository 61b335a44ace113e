//! Token Store Port
//!
//! The relational store holding token rows is an external collaborator.
//! The explorer only needs two things from it: an exact count over a
//! creation-time range and an ordered, offset-windowed page.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{CreatedRange, SortOrder, TokenRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Store returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse store response: {0}")]
    ParseError(String),

    #[error("Store response carried no count")]
    MissingCount,

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// One page request against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub range: CreatedRange,
    pub order: SortOrder,
    pub offset: usize,
    pub limit: usize,
}

impl PageQuery {
    /// Inclusive index of the last row in the window (`offset + limit - 1`)
    pub fn last_index(&self) -> usize {
        (self.offset + self.limit).saturating_sub(1)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Exact number of rows inside `range`, ignoring any window
    async fn count(&self, range: CreatedRange) -> Result<u64, StoreError>;

    /// Rows inside `query.range`, ordered by creation time, windowed by offset/limit
    async fn fetch_page(&self, query: PageQuery) -> Result<Vec<TokenRecord>, StoreError>;
}
