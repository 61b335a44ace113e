//! Token Explorer
//!
//! Pagination & filter engine behind the token list. Holds the active
//! filter, the loaded rows and the page cursor, and drives the token store
//! and the enrichment fetcher.
//!
//! Phases: `Idle -> LoadingInitial` on apply/reset/sort change,
//! `Idle -> LoadingMore` on a load-more signal, and `Exhausted` once the
//! store hands back a short page. Only one load runs per view at a time.
//!
//! With an ATH floor set, each page is fetched with a widened window and
//! post-filtered by looking up the ATH of every raw row, one at a time
//! with a pause in between to stay under the upstream rate limit. The
//! total is then an estimate extrapolated from the first page's hit ratio.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{
    CreatedRange, FilterState, HoverState, PageCursor, SortOrder, TokenRecord, TokenRow, TotalCount,
};
use crate::ports::{PageQuery, StoreError, TokenStore};
use super::enrichment::EnrichmentFetcher;

pub const DEFAULT_PAGE_SIZE: usize = 30;
pub const DEFAULT_ATH_WINDOW_MULTIPLIER: usize = 3;
pub const DEFAULT_ENRICHMENT_DELAY_MS: u64 = 100;

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("Store query failed: {0}")]
    Store(#[from] StoreError),

    #[error("A load is already in flight for this view")]
    LoadInFlight,
}

#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// Rows per page without an ATH floor
    pub page_size: usize,
    /// Window widening factor when post-filtering by ATH
    pub ath_window_multiplier: usize,
    /// Pause between consecutive ATH lookups
    pub enrichment_delay: Duration,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            ath_window_multiplier: DEFAULT_ATH_WINDOW_MULTIPLIER,
            enrichment_delay: Duration::from_millis(DEFAULT_ENRICHMENT_DELAY_MS),
        }
    }
}

impl ExplorerConfig {
    /// Rows requested from the store for one fetch
    pub fn window(&self, floor: Option<f64>) -> usize {
        match floor {
            Some(_) => self.page_size * self.ath_window_multiplier.max(1),
            None => self.page_size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExplorerPhase {
    Idle,
    LoadingInitial,
    LoadingMore,
    Exhausted,
}

impl ExplorerPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, ExplorerPhase::LoadingInitial | ExplorerPhase::LoadingMore)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// `added` rows were kept out of `raw` rows returned by the store
    Loaded { added: usize, raw: usize },
    /// Cursor already exhausted; the store was not queried
    NothingMore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadKind {
    Initial,
    More,
}

/// Owned copy of the view for rendering
#[derive(Debug, Clone, Serialize)]
pub struct ExplorerSnapshot {
    pub phase: ExplorerPhase,
    pub filter: FilterState,
    pub rows: Vec<TokenRow>,
    pub cursor: PageCursor,
}

#[derive(Debug)]
struct ViewState {
    phase: ExplorerPhase,
    filter: FilterState,
    rows: Vec<TokenRow>,
    cursor: PageCursor,
    /// Bumped every time an initial load replaces the rows
    generation: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            phase: ExplorerPhase::Idle,
            filter: FilterState::default(),
            rows: Vec::new(),
            cursor: PageCursor::default(),
            generation: 0,
        }
    }
}

/// Result of one store round before it is committed to the view
struct FetchedPage {
    rows: Vec<TokenRow>,
    raw_len: usize,
    window: usize,
    total: Option<TotalCount>,
}

/// Undoes the in-flight markers of a load or hover whose future is dropped
/// before it commits. `disarm` once the result is in.
struct Rollback<'a> {
    state: &'a Mutex<ViewState>,
    phase: Option<ExplorerPhase>,
    hover: Option<(String, u64)>,
}

impl<'a> Rollback<'a> {
    fn phase(state: &'a Mutex<ViewState>, previous: ExplorerPhase) -> Self {
        Self {
            state,
            phase: Some(previous),
            hover: None,
        }
    }

    fn hover(state: &'a Mutex<ViewState>, mint: &str, generation: u64) -> Self {
        Self {
            state,
            phase: None,
            hover: Some((mint.to_string(), generation)),
        }
    }

    fn disarm(mut self) {
        self.phase = None;
        self.hover = None;
    }
}

impl Drop for Rollback<'_> {
    fn drop(&mut self) {
        if self.phase.is_none() && self.hover.is_none() {
            return;
        }

        let mut state = lock(self.state);
        if let Some(phase) = self.phase.take() {
            tracing::warn!("Load did not complete, phase back to {:?}", phase);
            state.phase = phase;
        }
        if let Some((mint, generation)) = self.hover.take() {
            // Rows of a newer view are not ours to touch
            if state.generation == generation {
                for row in state
                    .rows
                    .iter_mut()
                    .filter(|r| r.mint() == mint && r.hover == HoverState::Loading)
                {
                    row.hover = HoverState::NotRequested;
                }
            }
        }
    }
}

/// The lock is never held across an await, so a poisoned guard is still consistent
fn lock(state: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct TokenExplorer {
    store: Arc<dyn TokenStore>,
    enrichment: EnrichmentFetcher,
    config: ExplorerConfig,
    state: Mutex<ViewState>,
}

impl TokenExplorer {
    pub fn new(store: Arc<dyn TokenStore>, enrichment: EnrichmentFetcher, config: ExplorerConfig) -> Self {
        Self {
            store,
            enrichment,
            config,
            state: Mutex::new(ViewState::default()),
        }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Replace the filter and load the first page
    pub async fn apply_filters(&self, filter: FilterState) -> Result<LoadOutcome, ExplorerError> {
        self.load(LoadKind::Initial, Some(filter)).await
    }

    /// Back to defaults (no dates, no floor, newest first) and reload
    pub async fn reset(&self) -> Result<LoadOutcome, ExplorerError> {
        self.apply_filters(FilterState::default()).await
    }

    /// Keep the other filters, change the ordering and reload
    pub async fn set_sort(&self, sort: SortOrder) -> Result<LoadOutcome, ExplorerError> {
        let filter = lock(&self.state).filter.clone().with_sort(sort);
        self.apply_filters(filter).await
    }

    /// Append the next page; called when the end of the list becomes visible
    pub async fn load_more(&self) -> Result<LoadOutcome, ExplorerError> {
        self.load(LoadKind::More, None).await
    }

    pub async fn phase(&self) -> ExplorerPhase {
        lock(&self.state).phase
    }

    pub async fn snapshot(&self) -> ExplorerSnapshot {
        let state = lock(&self.state);
        ExplorerSnapshot {
            phase: state.phase,
            filter: state.filter.clone(),
            rows: state.rows.clone(),
            cursor: state.cursor,
        }
    }

    /// Enrich one row with image / market cap / description.
    ///
    /// Returns true if the lookup ran and was merged. Rows already loading
    /// or enriched are left alone; if the view was reloaded while the
    /// lookup was in flight, the result is dropped.
    pub async fn hover(&self, mint: &str) -> bool {
        let (generation, rollback) = {
            let mut state = lock(&self.state);
            let generation = state.generation;
            let mut pending = state
                .rows
                .iter_mut()
                .filter(|r| r.mint() == mint && !r.hover_requested())
                .peekable();
            if pending.peek().is_none() {
                return false;
            }
            for row in pending {
                row.hover = HoverState::Loading;
            }
            (generation, Rollback::hover(&self.state, mint, generation))
        };

        let quote = self.enrichment.fetch_metadata(mint).await.unwrap_or_default();
        rollback.disarm();

        let mut state = lock(&self.state);
        if state.generation != generation {
            tracing::debug!("View reloaded while enriching {}, dropping result", mint);
            return false;
        }

        let mut merged = false;
        for row in state
            .rows
            .iter_mut()
            .filter(|r| r.mint() == mint && r.hover == HoverState::Loading)
        {
            row.enrichment.image = quote.image.clone();
            row.enrichment.market_cap = quote.market_cap;
            row.enrichment.description = quote.description.clone();
            row.hover = HoverState::Enriched;
            merged = true;
        }
        merged
    }

    async fn load(
        &self,
        kind: LoadKind,
        new_filter: Option<FilterState>,
    ) -> Result<LoadOutcome, ExplorerError> {
        let (filter, offset, rollback) = {
            let mut state = lock(&self.state);
            if state.phase.is_loading() {
                return Err(ExplorerError::LoadInFlight);
            }
            if kind == LoadKind::More && state.cursor.exhausted {
                return Ok(LoadOutcome::NothingMore);
            }

            let previous = state.phase;
            let (filter, offset) = match kind {
                LoadKind::Initial => (new_filter.unwrap_or_default(), 0),
                LoadKind::More => (state.filter.clone(), state.cursor.offset),
            };
            state.phase = match kind {
                LoadKind::Initial => ExplorerPhase::LoadingInitial,
                LoadKind::More => ExplorerPhase::LoadingMore,
            };
            (filter, offset, Rollback::phase(&self.state, previous))
        };

        // On error the rollback puts the previous phase back
        let page = match self.fetch(kind, &filter, offset).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!("Error fetching tokens: {}", e);
                return Err(e);
            }
        };
        rollback.disarm();

        let mut state = lock(&self.state);
        let added = page.rows.len();
        match kind {
            LoadKind::Initial => {
                state.rows = page.rows;
                state.filter = filter;
                state.cursor = PageCursor::default();
                state.generation += 1;
            }
            LoadKind::More => state.rows.extend(page.rows),
        }
        state.cursor.advance(page.raw_len, page.window);
        if let Some(total) = page.total {
            state.cursor.total = total;
        }
        state.phase = if state.cursor.exhausted {
            ExplorerPhase::Exhausted
        } else {
            ExplorerPhase::Idle
        };

        tracing::info!(
            "Loaded {} tokens ({} raw), showing {} of {} | offset={} exhausted={}",
            added,
            page.raw_len,
            state.rows.len(),
            state.cursor.total,
            state.cursor.offset,
            state.cursor.exhausted
        );

        Ok(LoadOutcome::Loaded {
            added,
            raw: page.raw_len,
        })
    }

    async fn fetch(
        &self,
        kind: LoadKind,
        filter: &FilterState,
        offset: usize,
    ) -> Result<FetchedPage, ExplorerError> {
        let floor = filter.ath_floor();
        let range = filter.created_range();
        let initial = kind == LoadKind::Initial;

        let mut total = None;
        if initial && floor.is_none() {
            total = Some(TotalCount::Exact(self.store.count(range).await?));
        }

        let window = self.config.window(floor);
        let query = PageQuery {
            range,
            order: filter.sort,
            offset,
            limit: window,
        };
        let raw = self.store.fetch_page(query).await?;
        let raw_len = raw.len();

        let rows = match floor {
            Some(floor) => self.filter_by_ath(raw, floor).await,
            None => raw.into_iter().map(TokenRow::from).collect(),
        };

        if initial && floor.is_some() {
            total = Some(self.estimate_total(range, rows.len(), raw_len).await?);
        }

        Ok(FetchedPage {
            rows,
            raw_len,
            window,
            total,
        })
    }

    /// Sequential ATH lookups; rows without an ATH or below the floor are dropped
    async fn filter_by_ath(&self, raw: Vec<TokenRecord>, floor: f64) -> Vec<TokenRow> {
        let mut kept = Vec::new();

        for (i, record) in raw.into_iter().enumerate() {
            if i > 0 && !self.config.enrichment_delay.is_zero() {
                tokio::time::sleep(self.config.enrichment_delay).await;
            }

            match self.enrichment.fetch_all_time_high(&record.mint).await {
                Some(ath) if ath >= floor => kept.push(TokenRow::with_ath(record, ath)),
                _ => {}
            }
        }

        kept
    }

    async fn estimate_total(
        &self,
        range: CreatedRange,
        filtered: usize,
        raw: usize,
    ) -> Result<TotalCount, ExplorerError> {
        // A zero ratio extrapolates to zero whatever the unfiltered total is
        if filtered == 0 || raw == 0 {
            return Ok(TotalCount::Estimated(0));
        }
        let unfiltered = self.store.count(range).await?;
        Ok(TotalCount::estimate(unfiltered, filtered, raw))
    }
}
