//! Page Cursor
//!
//! Offset/exhaustion/total triple describing pagination progress for one
//! filter state. The offset counts raw store rows, never post-filter rows.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Total number of results for the active filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TotalCount {
    /// Exact count from the store
    Exact(u64),
    /// Extrapolated from the first page's ATH filter ratio
    Estimated(u64),
}

impl TotalCount {
    pub fn value(&self) -> u64 {
        match self {
            TotalCount::Exact(n) | TotalCount::Estimated(n) => *n,
        }
    }

    pub fn is_estimate(&self) -> bool {
        matches!(self, TotalCount::Estimated(_))
    }

    /// `round(unfiltered_total * filtered / raw)`; zero when nothing was fetched
    pub fn estimate(unfiltered_total: u64, filtered: usize, raw: usize) -> Self {
        if raw == 0 {
            return TotalCount::Estimated(0);
        }
        let ratio = filtered as f64 / raw as f64;
        TotalCount::Estimated((unfiltered_total as f64 * ratio).round() as u64)
    }
}

impl Default for TotalCount {
    fn default() -> Self {
        TotalCount::Exact(0)
    }
}

impl fmt::Display for TotalCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TotalCount::Exact(n) => write!(f, "{}", n),
            TotalCount::Estimated(n) => write!(f, "~{}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageCursor {
    pub offset: usize,
    pub exhausted: bool,
    pub total: TotalCount,
}

impl PageCursor {
    /// Record a fetch of `raw_len` rows out of a requested window of `window`
    pub fn advance(&mut self, raw_len: usize, window: usize) {
        self.offset += raw_len;
        self.exhausted = raw_len < window;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_full_page_keeps_going() {
        let mut cursor = PageCursor::default();
        cursor.advance(30, 30);
        assert_eq!(cursor.offset, 30);
        assert!(!cursor.exhausted);
    }

    #[test]
    fn test_advance_short_page_exhausts() {
        let mut cursor = PageCursor { offset: 60, ..Default::default() };
        cursor.advance(12, 30);
        assert_eq!(cursor.offset, 72);
        assert!(cursor.exhausted);
    }

    #[test]
    fn test_advance_empty_page() {
        let mut cursor = PageCursor::default();
        cursor.advance(0, 90);
        assert_eq!(cursor.offset, 0);
        assert!(cursor.exhausted);
    }

    #[test]
    fn test_estimate() {
        assert_eq!(TotalCount::estimate(100, 30, 90), TotalCount::Estimated(33));
        assert_eq!(TotalCount::estimate(100, 0, 90), TotalCount::Estimated(0));
        assert_eq!(TotalCount::estimate(100, 5, 0), TotalCount::Estimated(0));
        assert_eq!(TotalCount::estimate(7, 1, 2), TotalCount::Estimated(4));
    }

    #[test]
    fn test_display() {
        assert_eq!(TotalCount::Exact(5).to_string(), "5");
        assert_eq!(TotalCount::Estimated(33).to_string(), "~33");
        assert!(TotalCount::Estimated(1).is_estimate());
        assert_eq!(TotalCount::Estimated(1).value(), 1);
    }
}
