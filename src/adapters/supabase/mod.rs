//! Supabase Adapter
//!
//! Token store backed by a Supabase (PostgREST) `tokens` table with
//! columns `mint`, `name`, `symbol`, `createdAt` (Unix seconds).

mod client;

pub use client::{SupabaseConfig, SupabaseTokenStore};
