//! Filter State
//!
//! Date range, ATH floor and sort order the explorer is currently showing.
//! Calendar days are interpreted in UTC; the end date is inclusive through
//! 23:59:59, i.e. the store predicate is `< start of the following day`.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordering by creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recently created first (descending)
    #[default]
    Newest,
    /// Oldest first (ascending)
    Oldest,
}

impl SortOrder {
    pub fn is_ascending(&self) -> bool {
        matches!(self, SortOrder::Oldest)
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Newest => write!(f, "newest"),
            SortOrder::Oldest => write!(f, "oldest"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" | "desc" => Ok(SortOrder::Newest),
            "oldest" | "asc" => Ok(SortOrder::Oldest),
            other => Err(format!("unknown sort order '{}', expected newest or oldest", other)),
        }
    }
}

/// Creation-time bounds shared by the count and page queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CreatedRange {
    /// Inclusive lower bound (Unix seconds)
    pub gte: Option<i64>,
    /// Exclusive upper bound (Unix seconds)
    pub lt: Option<i64>,
}

impl CreatedRange {
    pub fn contains(&self, created_at: i64) -> bool {
        self.gte.map_or(true, |lo| created_at >= lo) && self.lt.map_or(true, |hi| created_at < hi)
    }
}

/// User-selected filters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Minimum all-time-high market cap in USD
    pub min_ath_market_cap: Option<f64>,
    pub sort: SortOrder,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn with_min_ath(mut self, floor: f64) -> Self {
        self.min_ath_market_cap = Some(floor);
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Active ATH floor; zero, negative and NaN all mean "no floor"
    pub fn ath_floor(&self) -> Option<f64> {
        self.min_ath_market_cap.filter(|floor| *floor > 0.0)
    }

    pub fn created_range(&self) -> CreatedRange {
        CreatedRange {
            gte: self.start_date.map(day_start),
            lt: self.end_date.and_then(|d| d.succ_opt()).map(day_start),
        }
    }
}

fn day_start(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_filter_is_unbounded_newest() {
        let filter = FilterState::default();
        assert_eq!(filter.sort, SortOrder::Newest);
        assert_eq!(filter.created_range(), CreatedRange::default());
        assert!(filter.ath_floor().is_none());
    }

    #[test]
    fn test_created_range_end_date_is_inclusive() {
        let filter = FilterState::new()
            .with_start_date(date(2024, 3, 1))
            .with_end_date(date(2024, 3, 1));
        let range = filter.created_range();

        // 2024-03-01T00:00:00Z and 2024-03-02T00:00:00Z
        assert_eq!(range.gte, Some(1_709_251_200));
        assert_eq!(range.lt, Some(1_709_337_600));
        assert!(range.contains(1_709_251_200));
        assert!(range.contains(1_709_337_599));
        assert!(!range.contains(1_709_337_600));
        assert!(!range.contains(1_709_251_199));
    }

    #[test]
    fn test_zero_floor_is_no_floor() {
        assert!(FilterState::new().with_min_ath(0.0).ath_floor().is_none());
        assert!(FilterState::new().with_min_ath(-5.0).ath_floor().is_none());
        assert_eq!(FilterState::new().with_min_ath(1e6).ath_floor(), Some(1e6));
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("newest".parse::<SortOrder>().unwrap(), SortOrder::Newest);
        assert_eq!("OLDEST".parse::<SortOrder>().unwrap(), SortOrder::Oldest);
        assert!("sideways".parse::<SortOrder>().is_err());
        assert!(SortOrder::Oldest.is_ascending());
        assert!(!SortOrder::Newest.is_ascending());
    }
}
