//! In-memory store for tests and embedding.

use super::SentimentStore;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::models::{
    FinanceEntity, Granularity, IndexSentimentSnapshot, KeywordGraphEdge, KeywordOccurrence,
    TickerSentimentSlice,
};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
struct Inner {
    entities: Vec<FinanceEntity>,
    occurrences: Vec<KeywordOccurrence>,
    slices: HashMap<(String, i64, Granularity), TickerSentimentSlice>,
    snapshots: HashMap<(i64, Granularity), IndexSentimentSnapshot>,
    edges: HashMap<(String, String, i64), KeywordGraphEdge>,
}

/// Single-process store backed by hash maps. Insert-if-absent runs under one
/// write lock, which makes the idempotency checks atomic.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|_| anyhow!("store lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|_| anyhow!("store lock poisoned"))
    }
}

#[async_trait]
impl SentimentStore for MemoryStore {
    async fn find_entity_by_symbol(&self, symbol: &str) -> Result<Option<FinanceEntity>> {
        Ok(self
            .read()?
            .entities
            .iter()
            .find(|e| e.canonical_symbol == symbol)
            .cloned())
    }

    async fn insert_entity(&self, entity: FinanceEntity) -> Result<()> {
        self.write()?.entities.push(entity);
        Ok(())
    }

    async fn update_entity(&self, entity: FinanceEntity) -> Result<()> {
        let mut inner = self.write()?;
        match inner
            .entities
            .iter_mut()
            .find(|e| e.entity_id == entity.entity_id)
        {
            Some(existing) => {
                *existing = entity;
                Ok(())
            }
            None => Err(anyhow!("entity not found: {}", entity.entity_id)),
        }
    }

    async fn list_entities(&self) -> Result<Vec<FinanceEntity>> {
        Ok(self.read()?.entities.clone())
    }

    async fn insert_occurrences(&self, occurrences: Vec<KeywordOccurrence>) -> Result<u64> {
        let count = occurrences.len() as u64;
        self.write()?.occurrences.extend(occurrences);
        Ok(count)
    }

    async fn occurrences_in_range(&self, start: i64, end: i64) -> Result<Vec<KeywordOccurrence>> {
        Ok(self
            .read()?
            .occurrences
            .iter()
            .filter(|o| o.occurred_at >= start && o.occurred_at < end)
            .cloned()
            .collect())
    }

    async fn find_slice(
        &self,
        ticker: &str,
        interval_start: i64,
        granularity: Granularity,
    ) -> Result<Option<TickerSentimentSlice>> {
        let key = (ticker.to_string(), interval_start, granularity);
        Ok(self.read()?.slices.get(&key).cloned())
    }

    async fn insert_slice(&self, slice: TickerSentimentSlice) -> Result<bool> {
        let mut inner = self.write()?;
        let key = (slice.ticker.clone(), slice.interval_start, slice.granularity);
        if inner.slices.contains_key(&key) {
            return Ok(false);
        }
        inner.slices.insert(key, slice);
        Ok(true)
    }

    async fn slices_at(
        &self,
        bucket_time: i64,
        granularity: Granularity,
    ) -> Result<Vec<TickerSentimentSlice>> {
        let mut slices: Vec<TickerSentimentSlice> = self
            .read()?
            .slices
            .values()
            .filter(|s| s.interval_start == bucket_time && s.granularity == granularity)
            .cloned()
            .collect();
        slices.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        Ok(slices)
    }

    async fn find_index_snapshot(
        &self,
        bucket_time: i64,
        granularity: Granularity,
    ) -> Result<Option<IndexSentimentSnapshot>> {
        Ok(self
            .read()?
            .snapshots
            .get(&(bucket_time, granularity))
            .cloned())
    }

    async fn insert_index_snapshot(&self, snapshot: IndexSentimentSnapshot) -> Result<bool> {
        let mut inner = self.write()?;
        let key = (snapshot.bucket_time, snapshot.granularity);
        if inner.snapshots.contains_key(&key) {
            return Ok(false);
        }
        inner.snapshots.insert(key, snapshot);
        Ok(true)
    }

    async fn find_edge(
        &self,
        source: &str,
        target: &str,
        window_start: i64,
    ) -> Result<Option<KeywordGraphEdge>> {
        let key = (source.to_string(), target.to_string(), window_start);
        Ok(self.read()?.edges.get(&key).cloned())
    }

    async fn insert_edge(&self, edge: KeywordGraphEdge) -> Result<()> {
        let mut inner = self.write()?;
        let key = (
            edge.source_keyword.clone(),
            edge.target_keyword.clone(),
            edge.window_start,
        );
        inner.edges.insert(key, edge);
        Ok(())
    }

    async fn update_edge(&self, edge: KeywordGraphEdge) -> Result<()> {
        let mut inner = self.write()?;
        let key = (
            edge.source_keyword.clone(),
            edge.target_keyword.clone(),
            edge.window_start,
        );
        match inner.edges.get_mut(&key) {
            Some(existing) => {
                *existing = edge;
                Ok(())
            }
            None => Err(anyhow!(
                "edge not found: {} -> {} @ {}",
                key.0,
                key.1,
                key.2
            )),
        }
    }

    async fn edges_for_window(&self, window_start: i64) -> Result<Vec<KeywordGraphEdge>> {
        let mut edges: Vec<KeywordGraphEdge> = self
            .read()?
            .edges
            .values()
            .filter(|e| e.window_start == window_start)
            .cloned()
            .collect();
        edges.sort_by(|a, b| {
            a.source_keyword
                .cmp(&b.source_keyword)
                .then(a.target_keyword.cmp(&b.target_keyword))
        });
        Ok(edges)
    }

    async fn delete_edges(
        &self,
        min_strength: f64,
        min_co_occurrence: u64,
        older_than: Option<i64>,
    ) -> Result<u64> {
        let mut inner = self.write()?;
        let before = inner.edges.len();
        inner.edges.retain(|_, e| {
            let weak = e.strength < min_strength || e.co_occurrence_count < min_co_occurrence;
            let in_scope = older_than.map_or(true, |cutoff| e.window_start < cutoff);
            !(weak && in_scope)
        });
        Ok((before - inner.edges.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(ticker: &str, start: i64) -> TickerSentimentSlice {
        TickerSentimentSlice {
            ticker: ticker.to_string(),
            interval_start: start,
            granularity: Granularity::OneHour,
            weighted_sentiment: 0.5,
            confidence: 0.8,
            positive_count: 3,
            negative_count: 1,
            neutral_count: 0,
            total_mentions: 4,
            engagement_sum: 2.0,
            unique_posts: 4,
            unique_sources: 2,
            velocity: 0.0,
            acceleration: 0.0,
            computed_at: 0,
        }
    }

    #[tokio::test]
    async fn test_insert_slice_is_insert_if_absent() {
        let store = MemoryStore::new();
        assert!(store.insert_slice(slice("AAPL", 0)).await.unwrap());
        assert!(!store.insert_slice(slice("AAPL", 0)).await.unwrap());
        assert!(store.insert_slice(slice("AAPL", 3_600_000)).await.unwrap());
        assert!(store.insert_slice(slice("MSFT", 0)).await.unwrap());
    }

    #[tokio::test]
    async fn test_occurrence_range_is_half_open() {
        let store = MemoryStore::new();
        let mut occ = KeywordOccurrence {
            keyword: "AAPL".to_string(),
            keyword_normalized: "aapl".to_string(),
            post_id: "p1".to_string(),
            source: "stocks".to_string(),
            occurred_at: 1000,
            sentiment: shared::models::SentimentSnapshot::neutral_zero_confidence(),
            engagement_weight: 1.0,
            metrics: shared::models::PostMetrics {
                score: 1,
                comment_count: 0,
                upvote_ratio: 0.5,
            },
            mapped_tickers: vec!["AAPL".to_string()],
            in_title: true,
            in_body: false,
        };
        store.insert_occurrences(vec![occ.clone()]).await.unwrap();
        occ.occurred_at = 2000;
        store.insert_occurrences(vec![occ]).await.unwrap();

        let hits = store.occurrences_in_range(1000, 2000).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].occurred_at, 1000);
    }
}
