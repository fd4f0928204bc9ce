use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregation bucket sizes supported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
}

impl Granularity {
    pub const ALL: [Granularity; 5] = [
        Granularity::FiveMinutes,
        Granularity::FifteenMinutes,
        Granularity::OneHour,
        Granularity::FourHours,
        Granularity::OneDay,
    ];

    /// Bucket length in epoch milliseconds.
    pub fn duration_ms(&self) -> i64 {
        match self {
            Granularity::FiveMinutes => 5 * 60 * 1000,
            Granularity::FifteenMinutes => 15 * 60 * 1000,
            Granularity::OneHour => 60 * 60 * 1000,
            Granularity::FourHours => 4 * 60 * 60 * 1000,
            Granularity::OneDay => 24 * 60 * 60 * 1000,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::FiveMinutes => "5m",
            Granularity::FifteenMinutes => "15m",
            Granularity::OneHour => "1h",
            Granularity::FourHours => "4h",
            Granularity::OneDay => "1d",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "5m" => Ok(Granularity::FiveMinutes),
            "15m" => Ok(Granularity::FifteenMinutes),
            "1h" => Ok(Granularity::OneHour),
            "4h" => Ok(Granularity::FourHours),
            "1d" => Ok(Granularity::OneDay),
            other => Err(format!("unknown granularity: {}", other)),
        }
    }
}

/// Market-wide regime classification for an index snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketRegime {
    #[serde(rename = "bullish")]
    Bullish,
    #[serde(rename = "bearish")]
    Bearish,
    #[serde(rename = "uncertain")]
    Uncertain,
    #[serde(rename = "low-signal")]
    LowSignal,
}

impl MarketRegime {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketRegime::Bullish => "bullish",
            MarketRegime::Bearish => "bearish",
            MarketRegime::Uncertain => "uncertain",
            MarketRegime::LowSignal => "low-signal",
        }
    }
}

impl FromStr for MarketRegime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bullish" => Ok(MarketRegime::Bullish),
            "bearish" => Ok(MarketRegime::Bearish),
            "uncertain" => Ok(MarketRegime::Uncertain),
            "low-signal" => Ok(MarketRegime::LowSignal),
            other => Err(format!("unknown regime: {}", other)),
        }
    }
}

/// Per-keyword momentum classification derived from velocity/acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStatus {
    Dormant,
    Emerging,
    Rising,
    Peak,
    Declining,
    Stable,
}

/// Sentiment class probabilities attached to a post by the ingestion feed.
/// The three primary classes sum to roughly 1; all fields are in [0,1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentSnapshot {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub mixed: f64,
    pub confidence: f64,
}

impl SentimentSnapshot {
    pub fn neutral_zero_confidence() -> Self {
        Self {
            positive: 0.0,
            negative: 0.0,
            neutral: 1.0,
            mixed: 0.0,
            confidence: 0.0,
        }
    }
}

/// Raw engagement numbers from the post feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostMetrics {
    pub score: i64,
    pub comment_count: i64,
    pub upvote_ratio: f64,
}

/// Canonical record for a tradable security tracked by the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceEntity {
    pub entity_id: String,
    pub canonical_symbol: String,
    pub name: String,
    pub aliases: Vec<String>,
    pub sector: String,
    pub industry: String,
    pub entity_type: String,
    pub active: bool,
    pub kb_version: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One event of a keyword appearing in one post at one instant.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordOccurrence {
    pub keyword: String,
    pub keyword_normalized: String,
    pub post_id: String,
    pub source: String,
    pub occurred_at: i64,
    pub sentiment: SentimentSnapshot,
    pub engagement_weight: f64,
    pub metrics: PostMetrics,
    pub mapped_tickers: Vec<String>,
    pub in_title: bool,
    pub in_body: bool,
}

/// Aggregate over one (ticker, time-bucket, granularity) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSentimentSlice {
    pub ticker: String,
    pub interval_start: i64,
    pub granularity: Granularity,
    pub weighted_sentiment: f64,
    pub confidence: f64,
    pub positive_count: u64,
    pub negative_count: u64,
    pub neutral_count: u64,
    pub total_mentions: u64,
    pub engagement_sum: f64,
    pub unique_posts: u64,
    pub unique_sources: u64,
    pub velocity: f64,
    pub acceleration: f64,
    pub computed_at: i64,
}

/// One constituent's contribution to an index snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopContributor {
    pub ticker: String,
    pub sentiment: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// Basket-level aggregate over one (timestamp, granularity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSentimentSnapshot {
    pub bucket_time: i64,
    pub granularity: Granularity,
    pub weighted_sentiment: f64,
    pub breadth: f64,
    pub dispersion: f64,
    pub regime: MarketRegime,
    pub top_contributors: Vec<TopContributor>,
    pub total_mentions: u64,
    pub total_engagement: f64,
    pub active_tickers: u64,
    pub computed_at: i64,
}

/// Undirected co-occurrence edge stored with canonical ordering
/// (source_keyword < target_keyword), scoped to a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordGraphEdge {
    pub source_keyword: String,
    pub target_keyword: String,
    pub window_start: i64,
    pub window_length: i64,
    pub co_occurrence_count: u64,
    pub source_count: u64,
    pub target_count: u64,
    pub strength: f64,
    pub pmi: f64,
    pub finance_relevance: Option<f64>,
    pub shared_tickers: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

// ---- operation result records ----

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedResult {
    pub entities_created: u64,
    pub entities_updated: u64,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerAggregation {
    pub created: bool,
    pub slice: TickerSentimentSlice,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexAggregation {
    pub created: bool,
    pub snapshot: IndexSentimentSnapshot,
}

/// Planning output: the buckets that need individual aggregation calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPlan {
    pub intervals_processed: usize,
    pub message: String,
    pub intervals: Vec<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphBuildResult {
    pub edges_created: u64,
    pub keywords_processed: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PruneResult {
    pub edges_deleted: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinanceSubgraphStats {
    pub finance_edges: u64,
    pub finance_keywords: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorCount {
    pub sector: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeCount {
    pub entity_type: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityStats {
    pub total_entities: u64,
    pub active_entities: u64,
    pub by_sector: Vec<SectorCount>,
    pub by_type: Vec<TypeCount>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestResult {
    pub posts_processed: u64,
    pub occurrences_created: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_roundtrip() {
        for g in Granularity::ALL {
            assert_eq!(g.as_str().parse::<Granularity>().unwrap(), g);
        }
        assert!("2h".parse::<Granularity>().is_err());
    }

    #[test]
    fn test_granularity_durations() {
        assert_eq!(Granularity::FiveMinutes.duration_ms(), 300_000);
        assert_eq!(Granularity::OneDay.duration_ms(), 86_400_000);
    }
}
