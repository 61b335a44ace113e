//! Domain Layer - Core types for the mint explorer
//!
//! Pure data types with no I/O. Everything that talks to the token store
//! or the upstream APIs goes through the ports layer.
//!
//! - `token`: store records, enrichment data and in-memory rows
//! - `filter`: date range / ATH floor / sort order and derived store bounds
//! - `cursor`: pagination progress and (estimated) totals

pub mod token;
pub mod filter;
pub mod cursor;

pub use token::{TokenRecord, TokenRow, EnrichmentData, HoverState, is_mint_address};
pub use filter::{FilterState, SortOrder, CreatedRange};
pub use cursor::{PageCursor, TotalCount};
