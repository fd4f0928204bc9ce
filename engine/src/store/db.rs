//! SeaORM-backed store.
//!
//! Insert-if-absent here is find-then-insert; the unique indexes created by
//! the migration refuse duplicate keys, so a same-key race surfaces as a
//! store error on the losing side rather than a duplicate row.

use super::SentimentStore;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sea_orm::{
    ActiveValue, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
};
use shared::entity::{
    finance_entities, index_sentiment_snapshots, keyword_graph_edges, keyword_occurrences,
    ticker_sentiment_slices,
};
use shared::models::{
    FinanceEntity, Granularity, IndexSentimentSnapshot, KeywordGraphEdge, KeywordOccurrence,
    PostMetrics, SentimentSnapshot, TickerSentimentSlice,
};
use std::sync::Arc;

pub struct DbStore {
    db: Arc<DatabaseConnection>,
}

impl DbStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn parse_granularity(s: &str) -> Result<Granularity> {
    s.parse::<Granularity>().map_err(|e| anyhow!(e))
}

fn entity_from_model(m: finance_entities::Model) -> Result<FinanceEntity> {
    Ok(FinanceEntity {
        entity_id: m.entity_id,
        canonical_symbol: m.canonical_symbol,
        name: m.name,
        aliases: serde_json::from_value(m.aliases)?,
        sector: m.sector,
        industry: m.industry,
        entity_type: m.entity_type,
        active: m.active,
        kb_version: m.kb_version,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn entity_to_active_model(e: &FinanceEntity) -> Result<finance_entities::ActiveModel> {
    Ok(finance_entities::ActiveModel {
        id: ActiveValue::NotSet,
        entity_id: ActiveValue::Set(e.entity_id.clone()),
        canonical_symbol: ActiveValue::Set(e.canonical_symbol.clone()),
        name: ActiveValue::Set(e.name.clone()),
        aliases: ActiveValue::Set(serde_json::to_value(&e.aliases)?),
        sector: ActiveValue::Set(e.sector.clone()),
        industry: ActiveValue::Set(e.industry.clone()),
        entity_type: ActiveValue::Set(e.entity_type.clone()),
        active: ActiveValue::Set(e.active),
        kb_version: ActiveValue::Set(e.kb_version),
        created_at: ActiveValue::Set(e.created_at),
        updated_at: ActiveValue::Set(e.updated_at),
    })
}

fn occurrence_from_model(m: keyword_occurrences::Model) -> Result<KeywordOccurrence> {
    Ok(KeywordOccurrence {
        keyword: m.keyword,
        keyword_normalized: m.keyword_normalized,
        post_id: m.post_id,
        source: m.source,
        occurred_at: m.occurred_at,
        sentiment: SentimentSnapshot {
            positive: m.positive,
            negative: m.negative,
            neutral: m.neutral,
            mixed: m.mixed,
            confidence: m.confidence,
        },
        engagement_weight: m.engagement_weight,
        metrics: PostMetrics {
            score: m.score,
            comment_count: m.comment_count,
            upvote_ratio: m.upvote_ratio,
        },
        mapped_tickers: serde_json::from_value(m.mapped_tickers)?,
        in_title: m.in_title,
        in_body: m.in_body,
    })
}

fn occurrence_to_active_model(o: &KeywordOccurrence) -> Result<keyword_occurrences::ActiveModel> {
    Ok(keyword_occurrences::ActiveModel {
        id: ActiveValue::NotSet,
        keyword: ActiveValue::Set(o.keyword.clone()),
        keyword_normalized: ActiveValue::Set(o.keyword_normalized.clone()),
        post_id: ActiveValue::Set(o.post_id.clone()),
        source: ActiveValue::Set(o.source.clone()),
        occurred_at: ActiveValue::Set(o.occurred_at),
        positive: ActiveValue::Set(o.sentiment.positive),
        negative: ActiveValue::Set(o.sentiment.negative),
        neutral: ActiveValue::Set(o.sentiment.neutral),
        mixed: ActiveValue::Set(o.sentiment.mixed),
        confidence: ActiveValue::Set(o.sentiment.confidence),
        engagement_weight: ActiveValue::Set(o.engagement_weight),
        score: ActiveValue::Set(o.metrics.score),
        comment_count: ActiveValue::Set(o.metrics.comment_count),
        upvote_ratio: ActiveValue::Set(o.metrics.upvote_ratio),
        mapped_tickers: ActiveValue::Set(serde_json::to_value(&o.mapped_tickers)?),
        in_title: ActiveValue::Set(o.in_title),
        in_body: ActiveValue::Set(o.in_body),
    })
}

fn slice_from_model(m: ticker_sentiment_slices::Model) -> Result<TickerSentimentSlice> {
    Ok(TickerSentimentSlice {
        ticker: m.ticker,
        interval_start: m.interval_start,
        granularity: parse_granularity(&m.granularity)?,
        weighted_sentiment: m.weighted_sentiment,
        confidence: m.confidence,
        positive_count: m.positive_count as u64,
        negative_count: m.negative_count as u64,
        neutral_count: m.neutral_count as u64,
        total_mentions: m.total_mentions as u64,
        engagement_sum: m.engagement_sum,
        unique_posts: m.unique_posts as u64,
        unique_sources: m.unique_sources as u64,
        velocity: m.velocity,
        acceleration: m.acceleration,
        computed_at: m.computed_at,
    })
}

fn slice_to_active_model(s: &TickerSentimentSlice) -> ticker_sentiment_slices::ActiveModel {
    ticker_sentiment_slices::ActiveModel {
        id: ActiveValue::NotSet,
        ticker: ActiveValue::Set(s.ticker.clone()),
        interval_start: ActiveValue::Set(s.interval_start),
        granularity: ActiveValue::Set(s.granularity.as_str().to_string()),
        weighted_sentiment: ActiveValue::Set(s.weighted_sentiment),
        confidence: ActiveValue::Set(s.confidence),
        positive_count: ActiveValue::Set(s.positive_count as i64),
        negative_count: ActiveValue::Set(s.negative_count as i64),
        neutral_count: ActiveValue::Set(s.neutral_count as i64),
        total_mentions: ActiveValue::Set(s.total_mentions as i64),
        engagement_sum: ActiveValue::Set(s.engagement_sum),
        unique_posts: ActiveValue::Set(s.unique_posts as i64),
        unique_sources: ActiveValue::Set(s.unique_sources as i64),
        velocity: ActiveValue::Set(s.velocity),
        acceleration: ActiveValue::Set(s.acceleration),
        computed_at: ActiveValue::Set(s.computed_at),
    }
}

fn snapshot_from_model(m: index_sentiment_snapshots::Model) -> Result<IndexSentimentSnapshot> {
    Ok(IndexSentimentSnapshot {
        bucket_time: m.bucket_time,
        granularity: parse_granularity(&m.granularity)?,
        weighted_sentiment: m.weighted_sentiment,
        breadth: m.breadth,
        dispersion: m.dispersion,
        regime: m.regime.parse().map_err(|e: String| anyhow!(e))?,
        top_contributors: serde_json::from_value(m.top_contributors)?,
        total_mentions: m.total_mentions as u64,
        total_engagement: m.total_engagement,
        active_tickers: m.active_tickers as u64,
        computed_at: m.computed_at,
    })
}

fn snapshot_to_active_model(
    s: &IndexSentimentSnapshot,
) -> Result<index_sentiment_snapshots::ActiveModel> {
    Ok(index_sentiment_snapshots::ActiveModel {
        id: ActiveValue::NotSet,
        bucket_time: ActiveValue::Set(s.bucket_time),
        granularity: ActiveValue::Set(s.granularity.as_str().to_string()),
        weighted_sentiment: ActiveValue::Set(s.weighted_sentiment),
        breadth: ActiveValue::Set(s.breadth),
        dispersion: ActiveValue::Set(s.dispersion),
        regime: ActiveValue::Set(s.regime.as_str().to_string()),
        top_contributors: ActiveValue::Set(serde_json::to_value(&s.top_contributors)?),
        total_mentions: ActiveValue::Set(s.total_mentions as i64),
        total_engagement: ActiveValue::Set(s.total_engagement),
        active_tickers: ActiveValue::Set(s.active_tickers as i64),
        computed_at: ActiveValue::Set(s.computed_at),
    })
}

fn edge_from_model(m: keyword_graph_edges::Model) -> Result<KeywordGraphEdge> {
    Ok(KeywordGraphEdge {
        source_keyword: m.source_keyword,
        target_keyword: m.target_keyword,
        window_start: m.window_start,
        window_length: m.window_length,
        co_occurrence_count: m.co_occurrence_count as u64,
        source_count: m.source_count as u64,
        target_count: m.target_count as u64,
        strength: m.strength,
        pmi: m.pmi,
        finance_relevance: m.finance_relevance,
        shared_tickers: m
            .shared_tickers
            .map(serde_json::from_value)
            .transpose()?
            .unwrap_or_default(),
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn edge_to_active_model(e: &KeywordGraphEdge) -> Result<keyword_graph_edges::ActiveModel> {
    Ok(keyword_graph_edges::ActiveModel {
        id: ActiveValue::NotSet,
        source_keyword: ActiveValue::Set(e.source_keyword.clone()),
        target_keyword: ActiveValue::Set(e.target_keyword.clone()),
        window_start: ActiveValue::Set(e.window_start),
        window_length: ActiveValue::Set(e.window_length),
        co_occurrence_count: ActiveValue::Set(e.co_occurrence_count as i64),
        source_count: ActiveValue::Set(e.source_count as i64),
        target_count: ActiveValue::Set(e.target_count as i64),
        strength: ActiveValue::Set(e.strength),
        pmi: ActiveValue::Set(e.pmi),
        finance_relevance: ActiveValue::Set(e.finance_relevance),
        shared_tickers: ActiveValue::Set(Some(serde_json::to_value(&e.shared_tickers)?)),
        created_at: ActiveValue::Set(e.created_at),
        updated_at: ActiveValue::Set(e.updated_at),
    })
}

#[async_trait]
impl SentimentStore for DbStore {
    async fn find_entity_by_symbol(&self, symbol: &str) -> Result<Option<FinanceEntity>> {
        let model = finance_entities::Entity::find()
            .filter(finance_entities::Column::CanonicalSymbol.eq(symbol))
            .one(self.db.as_ref())
            .await?;
        model.map(entity_from_model).transpose()
    }

    async fn insert_entity(&self, entity: FinanceEntity) -> Result<()> {
        finance_entities::Entity::insert(entity_to_active_model(&entity)?)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn update_entity(&self, entity: FinanceEntity) -> Result<()> {
        let entity_id = entity.entity_id.clone();
        finance_entities::Entity::update_many()
            .set(entity_to_active_model(&entity)?)
            .filter(finance_entities::Column::EntityId.eq(entity_id))
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn list_entities(&self) -> Result<Vec<FinanceEntity>> {
        let models = finance_entities::Entity::find()
            .all(self.db.as_ref())
            .await?;
        models.into_iter().map(entity_from_model).collect()
    }

    async fn insert_occurrences(&self, occurrences: Vec<KeywordOccurrence>) -> Result<u64> {
        if occurrences.is_empty() {
            return Ok(0);
        }
        let count = occurrences.len() as u64;
        let models = occurrences
            .iter()
            .map(occurrence_to_active_model)
            .collect::<Result<Vec<_>>>()?;
        keyword_occurrences::Entity::insert_many(models)
            .exec(self.db.as_ref())
            .await?;
        Ok(count)
    }

    async fn occurrences_in_range(&self, start: i64, end: i64) -> Result<Vec<KeywordOccurrence>> {
        let models = keyword_occurrences::Entity::find()
            .filter(keyword_occurrences::Column::OccurredAt.gte(start))
            .filter(keyword_occurrences::Column::OccurredAt.lt(end))
            .all(self.db.as_ref())
            .await?;
        models.into_iter().map(occurrence_from_model).collect()
    }

    async fn find_slice(
        &self,
        ticker: &str,
        interval_start: i64,
        granularity: Granularity,
    ) -> Result<Option<TickerSentimentSlice>> {
        let model = ticker_sentiment_slices::Entity::find()
            .filter(ticker_sentiment_slices::Column::Ticker.eq(ticker))
            .filter(ticker_sentiment_slices::Column::IntervalStart.eq(interval_start))
            .filter(ticker_sentiment_slices::Column::Granularity.eq(granularity.as_str()))
            .one(self.db.as_ref())
            .await?;
        model.map(slice_from_model).transpose()
    }

    async fn insert_slice(&self, slice: TickerSentimentSlice) -> Result<bool> {
        if self
            .find_slice(&slice.ticker, slice.interval_start, slice.granularity)
            .await?
            .is_some()
        {
            return Ok(false);
        }
        ticker_sentiment_slices::Entity::insert(slice_to_active_model(&slice))
            .exec(self.db.as_ref())
            .await?;
        Ok(true)
    }

    async fn slices_at(
        &self,
        bucket_time: i64,
        granularity: Granularity,
    ) -> Result<Vec<TickerSentimentSlice>> {
        let models = ticker_sentiment_slices::Entity::find()
            .filter(ticker_sentiment_slices::Column::IntervalStart.eq(bucket_time))
            .filter(ticker_sentiment_slices::Column::Granularity.eq(granularity.as_str()))
            .all(self.db.as_ref())
            .await?;
        models.into_iter().map(slice_from_model).collect()
    }

    async fn find_index_snapshot(
        &self,
        bucket_time: i64,
        granularity: Granularity,
    ) -> Result<Option<IndexSentimentSnapshot>> {
        let model = index_sentiment_snapshots::Entity::find()
            .filter(index_sentiment_snapshots::Column::BucketTime.eq(bucket_time))
            .filter(index_sentiment_snapshots::Column::Granularity.eq(granularity.as_str()))
            .one(self.db.as_ref())
            .await?;
        model.map(snapshot_from_model).transpose()
    }

    async fn insert_index_snapshot(&self, snapshot: IndexSentimentSnapshot) -> Result<bool> {
        if self
            .find_index_snapshot(snapshot.bucket_time, snapshot.granularity)
            .await?
            .is_some()
        {
            return Ok(false);
        }
        index_sentiment_snapshots::Entity::insert(snapshot_to_active_model(&snapshot)?)
            .exec(self.db.as_ref())
            .await?;
        Ok(true)
    }

    async fn find_edge(
        &self,
        source: &str,
        target: &str,
        window_start: i64,
    ) -> Result<Option<KeywordGraphEdge>> {
        let model = keyword_graph_edges::Entity::find()
            .filter(keyword_graph_edges::Column::SourceKeyword.eq(source))
            .filter(keyword_graph_edges::Column::TargetKeyword.eq(target))
            .filter(keyword_graph_edges::Column::WindowStart.eq(window_start))
            .one(self.db.as_ref())
            .await?;
        model.map(edge_from_model).transpose()
    }

    async fn insert_edge(&self, edge: KeywordGraphEdge) -> Result<()> {
        keyword_graph_edges::Entity::insert(edge_to_active_model(&edge)?)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn update_edge(&self, edge: KeywordGraphEdge) -> Result<()> {
        let (source, target, window_start) = (
            edge.source_keyword.clone(),
            edge.target_keyword.clone(),
            edge.window_start,
        );
        keyword_graph_edges::Entity::update_many()
            .set(edge_to_active_model(&edge)?)
            .filter(keyword_graph_edges::Column::SourceKeyword.eq(source))
            .filter(keyword_graph_edges::Column::TargetKeyword.eq(target))
            .filter(keyword_graph_edges::Column::WindowStart.eq(window_start))
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn edges_for_window(&self, window_start: i64) -> Result<Vec<KeywordGraphEdge>> {
        let models = keyword_graph_edges::Entity::find()
            .filter(keyword_graph_edges::Column::WindowStart.eq(window_start))
            .all(self.db.as_ref())
            .await?;
        models.into_iter().map(edge_from_model).collect()
    }

    async fn delete_edges(
        &self,
        min_strength: f64,
        min_co_occurrence: u64,
        older_than: Option<i64>,
    ) -> Result<u64> {
        let weak = Condition::any()
            .add(keyword_graph_edges::Column::Strength.lt(min_strength))
            .add(keyword_graph_edges::Column::CoOccurrenceCount.lt(min_co_occurrence as i64));
        let mut condition = Condition::all().add(weak);
        if let Some(cutoff) = older_than {
            condition = condition.add(keyword_graph_edges::Column::WindowStart.lt(cutoff));
        }
        let result = keyword_graph_edges::Entity::delete_many()
            .filter(condition)
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected)
    }
}
