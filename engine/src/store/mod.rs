//! Storage abstraction.
//!
//! Every engine operation talks to a [`SentimentStore`] so the same code
//! runs against SeaORM in production ([`DbStore`]) and an in-memory store in
//! tests ([`MemoryStore`]). Trait methods return `anyhow::Result`; the
//! engine wraps failures into [`crate::EngineError::Store`].

mod db;
mod memory;

pub use db::DbStore;
pub use memory::MemoryStore;

use anyhow::Result;
use async_trait::async_trait;
use shared::models::{
    FinanceEntity, Granularity, IndexSentimentSnapshot, KeywordGraphEdge, KeywordOccurrence,
    TickerSentimentSlice,
};

#[async_trait]
pub trait SentimentStore: Send + Sync {
    async fn find_entity_by_symbol(&self, symbol: &str) -> Result<Option<FinanceEntity>>;
    async fn insert_entity(&self, entity: FinanceEntity) -> Result<()>;
    /// Update the entity identified by `entity_id`.
    async fn update_entity(&self, entity: FinanceEntity) -> Result<()>;
    async fn list_entities(&self) -> Result<Vec<FinanceEntity>>;

    async fn insert_occurrences(&self, occurrences: Vec<KeywordOccurrence>) -> Result<u64>;
    /// Occurrences with `occurred_at` in `[start, end)`.
    async fn occurrences_in_range(&self, start: i64, end: i64) -> Result<Vec<KeywordOccurrence>>;

    async fn find_slice(
        &self,
        ticker: &str,
        interval_start: i64,
        granularity: Granularity,
    ) -> Result<Option<TickerSentimentSlice>>;
    /// Insert if absent. Returns false when a slice already exists for the
    /// (ticker, interval_start, granularity) key.
    async fn insert_slice(&self, slice: TickerSentimentSlice) -> Result<bool>;
    async fn slices_at(
        &self,
        bucket_time: i64,
        granularity: Granularity,
    ) -> Result<Vec<TickerSentimentSlice>>;

    async fn find_index_snapshot(
        &self,
        bucket_time: i64,
        granularity: Granularity,
    ) -> Result<Option<IndexSentimentSnapshot>>;
    /// Insert if absent, keyed by (bucket_time, granularity).
    async fn insert_index_snapshot(&self, snapshot: IndexSentimentSnapshot) -> Result<bool>;

    async fn find_edge(
        &self,
        source: &str,
        target: &str,
        window_start: i64,
    ) -> Result<Option<KeywordGraphEdge>>;
    async fn insert_edge(&self, edge: KeywordGraphEdge) -> Result<()>;
    /// Patch the edge identified by (source, target, window_start).
    async fn update_edge(&self, edge: KeywordGraphEdge) -> Result<()>;
    async fn edges_for_window(&self, window_start: i64) -> Result<Vec<KeywordGraphEdge>>;
    /// Delete edges where strength < min_strength OR co_occurrence_count <
    /// min_co_occurrence, optionally restricted to window_start older than
    /// the cutoff. Returns the number of deleted edges.
    async fn delete_edges(
        &self,
        min_strength: f64,
        min_co_occurrence: u64,
        older_than: Option<i64>,
    ) -> Result<u64>;
}
