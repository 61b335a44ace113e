//! Token Records and Rows
//!
//! `TokenRecord` is the read-only row owned by the token store.
//! `TokenRow` is the explorer's in-memory projection of a record plus
//! whatever enrichment has been attached to it so far.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A token row as stored in the `tokens` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Mint address (unique identifier)
    pub mint: String,
    /// Display name; null in the store reads as empty
    #[serde(default, deserialize_with = "de_null_as_empty")]
    pub name: String,
    /// Ticker symbol; null in the store reads as empty
    #[serde(default, deserialize_with = "de_null_as_empty")]
    pub symbol: String,
    /// Creation time (Unix seconds)
    #[serde(rename = "createdAt", deserialize_with = "de_unix_seconds")]
    pub created_at: i64,
}

impl TokenRecord {
    pub fn new(
        mint: impl Into<String>,
        name: impl Into<String>,
        symbol: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            mint: mint.into(),
            name: name.into(),
            symbol: symbol.into(),
            created_at,
        }
    }

    /// Creation time as a UTC datetime (None if out of chrono's range)
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at, 0)
    }
}

/// The store column is numeric but some exports hand it back as a string.
fn de_unix_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(v) => Ok(v),
        Raw::Float(v) => Ok(v.trunc() as i64),
        Raw::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid createdAt '{}': {}", s, e))),
    }
}

fn de_null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Longest identifier accepted as a mint address
pub const MAX_MINT_LEN: usize = 64;

/// Mint addresses are base58, so anything outside ASCII letters and digits
/// (path separators, dots, query characters) cannot be one.
pub fn is_mint_address(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate.len() <= MAX_MINT_LEN
        && candidate.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Supplementary fields fetched on demand from the upstream APIs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentData {
    pub image: Option<String>,
    pub market_cap: Option<f64>,
    pub description: Option<String>,
    pub ath_market_cap: Option<f64>,
}

/// Hover enrichment progress for a single row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HoverState {
    #[default]
    NotRequested,
    Loading,
    Enriched,
}

/// A token in the current result list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenRow {
    pub record: TokenRecord,
    pub enrichment: EnrichmentData,
    pub hover: HoverState,
}

impl TokenRow {
    pub fn mint(&self) -> &str {
        &self.record.mint
    }

    /// Row carrying an ATH value fetched during floor filtering
    pub fn with_ath(record: TokenRecord, ath_market_cap: f64) -> Self {
        Self {
            record,
            enrichment: EnrichmentData {
                ath_market_cap: Some(ath_market_cap),
                ..Default::default()
            },
            hover: HoverState::NotRequested,
        }
    }

    /// True once hover enrichment has started or finished
    pub fn hover_requested(&self) -> bool {
        self.hover != HoverState::NotRequested
    }
}

impl From<TokenRecord> for TokenRow {
    fn from(record: TokenRecord) -> Self {
        Self {
            record,
            enrichment: EnrichmentData::default(),
            hover: HoverState::NotRequested,
        }
    }
}
