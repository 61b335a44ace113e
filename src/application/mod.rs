pub mod enrichment;
pub mod explorer;

pub use enrichment::EnrichmentFetcher;
pub use explorer::{
    TokenExplorer, ExplorerConfig, ExplorerError, ExplorerPhase, ExplorerSnapshot, LoadOutcome,
    DEFAULT_PAGE_SIZE, DEFAULT_ATH_WINDOW_MULTIPLIER, DEFAULT_ENRICHMENT_DELAY_MS,
};
