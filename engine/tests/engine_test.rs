//! End-to-end engine tests over the in-memory store.

use engine::clock::FixedClock;
use engine::extract::{ingest_posts, RawPost};
use engine::graph::{build_co_occurrence_graph, finance_subgraph_stats, prune_graph_edges};
use engine::knowledge::seed::{finance_entity_stats, initialize_finance_entities};
use engine::knowledge::FinanceKnowledgeBase;
use engine::scoring::EngagementConfig;
use engine::sentiment::{aggregate_index_sentiment, aggregate_ticker_sentiment};
use engine::store::{MemoryStore, SentimentStore};
use shared::models::{
    Granularity, KeywordGraphEdge, MarketRegime, PostMetrics, SentimentSnapshot,
    TickerSentimentSlice,
};

const HOUR: i64 = 3_600_000;
const T0: i64 = 1_700_000_000_000 - 1_700_000_000_000 % HOUR;

fn post(id: &str, title: &str, observed_at: i64) -> RawPost {
    RawPost {
        post_id: id.to_string(),
        source: "stocks".to_string(),
        title: title.to_string(),
        body: String::new(),
        metrics: PostMetrics {
            score: 200,
            comment_count: 40,
            upvote_ratio: 0.9,
        },
        sentiment: SentimentSnapshot {
            positive: 0.7,
            negative: 0.1,
            neutral: 0.2,
            mixed: 0.0,
            confidence: 0.9,
        },
        observed_at,
    }
}

fn slice(ticker: &str, bucket: i64, sentiment: f64) -> TickerSentimentSlice {
    TickerSentimentSlice {
        ticker: ticker.to_string(),
        interval_start: bucket,
        granularity: Granularity::OneHour,
        weighted_sentiment: sentiment,
        confidence: 0.8,
        positive_count: 1,
        negative_count: 0,
        neutral_count: 0,
        total_mentions: 1,
        engagement_sum: 1.0,
        unique_posts: 1,
        unique_sources: 1,
        velocity: 0.0,
        acceleration: 0.0,
        computed_at: 0,
    }
}

fn edge(source: &str, target: &str, window_start: i64, strength: f64) -> KeywordGraphEdge {
    KeywordGraphEdge {
        source_keyword: source.to_string(),
        target_keyword: target.to_string(),
        window_start,
        window_length: HOUR,
        co_occurrence_count: 5,
        source_count: 5,
        target_count: 5,
        strength,
        pmi: 0.0,
        finance_relevance: Some(0.8),
        shared_tickers: Vec::new(),
        created_at: 0,
        updated_at: 0,
    }
}

#[tokio::test]
async fn test_seeding_round_trip() {
    let store = MemoryStore::new();
    let clock = FixedClock(T0);
    let kb = FinanceKnowledgeBase::with_nasdaq_defaults();
    let total = kb.securities().len() as u64;

    let first = initialize_finance_entities(&store, &clock, &kb, 1, false)
        .await
        .unwrap();
    assert_eq!(first.entities_created, total);
    assert_eq!(first.entities_updated, 0);
    assert!(first.errors.is_empty());

    let second = initialize_finance_entities(&store, &clock, &kb, 1, false)
        .await
        .unwrap();
    assert_eq!(second.entities_created, 0);
    assert_eq!(second.entities_updated, 0);

    let third = initialize_finance_entities(&store, &clock, &kb, 2, true)
        .await
        .unwrap();
    assert_eq!(third.entities_created, 0);
    assert_eq!(third.entities_updated, total);

    let stats = finance_entity_stats(&store).await.unwrap();
    assert_eq!(stats.total_entities, total);
    assert_eq!(stats.active_entities, total);
    assert!(stats.by_sector.iter().any(|s| s.sector == "Technology"));
    assert!(stats.by_type.iter().any(|t| t.entity_type == "etf"));
}

#[tokio::test]
async fn test_ticker_aggregation_is_idempotent() {
    let store = MemoryStore::new();
    let clock = FixedClock(T0 + 2 * HOUR);
    let kb = FinanceKnowledgeBase::with_nasdaq_defaults();
    let cfg = EngagementConfig::default();

    let posts = vec![
        post("p1", "AAPL beats on earnings", T0 + 60_000),
        post("p2", "loading up on AAPL calls", T0 + 120_000),
    ];
    ingest_posts(&store, &kb, &cfg, &posts).await.unwrap();

    let first = aggregate_ticker_sentiment(&store, &clock, "AAPL", T0, Granularity::OneHour)
        .await
        .unwrap();
    assert!(first.created);
    assert_eq!(first.slice.total_mentions, 2);
    assert_eq!(first.slice.unique_posts, 2);
    assert_eq!(first.slice.unique_sources, 1);
    assert!(first.slice.weighted_sentiment > 0.0);
    assert_eq!(first.slice.positive_count, 2);

    let second = aggregate_ticker_sentiment(&store, &clock, "AAPL", T0, Granularity::OneHour)
        .await
        .unwrap();
    assert!(!second.created);
    assert_eq!(second.slice, first.slice);
}

#[tokio::test]
async fn test_empty_bucket_returns_zero_result_without_persisting() {
    let store = MemoryStore::new();
    let clock = FixedClock(T0);

    let result = aggregate_ticker_sentiment(&store, &clock, "AAPL", T0, Granularity::OneHour)
        .await
        .unwrap();
    assert!(!result.created);
    assert_eq!(result.slice.total_mentions, 0);
    assert_eq!(result.slice.weighted_sentiment, 0.0);

    let stored = store
        .find_slice("AAPL", T0, Granularity::OneHour)
        .await
        .unwrap();
    assert!(stored.is_none());
}

#[tokio::test]
async fn test_velocity_and_acceleration_conventions() {
    let store = MemoryStore::new();
    let clock = FixedClock(T0 + 3 * HOUR);
    let kb = FinanceKnowledgeBase::with_nasdaq_defaults();
    let cfg = EngagementConfig::default();

    let mut posts = vec![post("a1", "AAPL thread", T0 + 1000)];
    for i in 0..3 {
        posts.push(post(
            &format!("b{}", i),
            "AAPL still climbing",
            T0 + HOUR + 1000 + i,
        ));
    }
    ingest_posts(&store, &kb, &cfg, &posts).await.unwrap();

    // Standing start: previous bucket has no slice
    let first = aggregate_ticker_sentiment(&store, &clock, "AAPL", T0, Granularity::OneHour)
        .await
        .unwrap();
    assert_eq!(first.slice.velocity, 1.0);
    assert_eq!(first.slice.acceleration, 1.0);

    // 1 -> 3 mentions: velocity (3-1)/1 = 2, acceleration 2 - 1 = 1
    let second = aggregate_ticker_sentiment(
        &store,
        &clock,
        "AAPL",
        T0 + HOUR,
        Granularity::OneHour,
    )
    .await
    .unwrap();
    assert_eq!(second.slice.total_mentions, 3);
    assert_eq!(second.slice.velocity, 2.0);
    assert_eq!(second.slice.acceleration, 1.0);
}

#[tokio::test]
async fn test_index_regime_boundaries() {
    let kb = FinanceKnowledgeBase::with_nasdaq_defaults();
    let clock = FixedClock(T0);

    // 4 contributing tickers -> low-signal regardless of sentiment.
    // Unknown tickers share the default market-cap weight, so the weighted
    // mean equals the arithmetic mean.
    let store = MemoryStore::new();
    for (i, s) in [0.9, 0.8, 0.9, 0.7].iter().enumerate() {
        store
            .insert_slice(slice(&format!("T{}", i), T0, *s))
            .await
            .unwrap();
    }
    let result = aggregate_index_sentiment(&store, &clock, &kb, T0, Granularity::OneHour, None)
        .await
        .unwrap();
    assert!(result.created);
    assert_eq!(result.snapshot.regime, MarketRegime::LowSignal);

    // 5 tickers, mean 0.22 > 0.2, breadth 0.8 > 0.6 -> bullish
    let store = MemoryStore::new();
    for (i, s) in [0.3, 0.3, 0.3, 0.3, -0.1].iter().enumerate() {
        store
            .insert_slice(slice(&format!("T{}", i), T0, *s))
            .await
            .unwrap();
    }
    let result = aggregate_index_sentiment(&store, &clock, &kb, T0, Granularity::OneHour, None)
        .await
        .unwrap();
    assert!(result.created);
    assert_eq!(result.snapshot.regime, MarketRegime::Bullish);
    assert!((result.snapshot.breadth - 0.8).abs() < 1e-12);
    assert_eq!(result.snapshot.active_tickers, 5);

    // mean 0.25 but breadth 0.4 -> uncertain
    let store = MemoryStore::new();
    for (i, s) in [0.85, 0.8, -0.1, -0.1, -0.2].iter().enumerate() {
        store
            .insert_slice(slice(&format!("T{}", i), T0, *s))
            .await
            .unwrap();
    }
    let result = aggregate_index_sentiment(&store, &clock, &kb, T0, Granularity::OneHour, None)
        .await
        .unwrap();
    assert_eq!(result.snapshot.regime, MarketRegime::Uncertain);

    // Idempotency: second call returns the stored snapshot
    let repeat = aggregate_index_sentiment(&store, &clock, &kb, T0, Granularity::OneHour, None)
        .await
        .unwrap();
    assert!(!repeat.created);
    assert_eq!(repeat.snapshot, result.snapshot);
}

#[tokio::test]
async fn test_graph_build_and_upsert() {
    let store = MemoryStore::new();
    let clock = FixedClock(T0 + HOUR);
    let kb = FinanceKnowledgeBase::with_nasdaq_defaults();
    let cfg = EngagementConfig::default();

    let posts = vec![
        post("g1", "AAPL and MSFT both reported", T0 + 1000),
        post("g2", "AAPL vs MSFT earnings", T0 + 2000),
        post("g3", "AAPL and NVDA chips", T0 + 3000),
    ];
    ingest_posts(&store, &kb, &cfg, &posts).await.unwrap();

    let result = build_co_occurrence_graph(&store, &clock, T0, HOUR, Some(2), None)
        .await
        .unwrap();
    // (aapl, msft) co-occurs twice; (aapl, nvda) only once and is skipped
    assert_eq!(result.edges_created, 1);
    assert_eq!(result.keywords_processed, 3);

    let stored = store.find_edge("aapl", "msft", T0).await.unwrap().unwrap();
    assert_eq!(stored.co_occurrence_count, 2);
    // aapl in 3 posts, msft in 2: jaccard = 2 / (3 + 2 - 2)
    assert!((stored.strength - 2.0 / 3.0).abs() < 1e-12);
    // pmi = log2((2/3) / ((3/3) * (2/3))) = 0
    assert!(stored.pmi.abs() < 1e-12);
    // both endpoints map tickers, none shared
    assert_eq!(stored.finance_relevance, Some(0.8));
    assert!(stored.shared_tickers.is_empty());

    // Rebuild of the same window patches in place, creates nothing
    let rebuilt = build_co_occurrence_graph(&store, &clock, T0, HOUR, Some(2), None)
        .await
        .unwrap();
    assert_eq!(rebuilt.edges_created, 0);

    let stats = finance_subgraph_stats(&store, T0, 0.5).await.unwrap();
    assert_eq!(stats.finance_edges, 1);
    assert_eq!(stats.finance_keywords, 2);
}

#[tokio::test]
async fn test_perfect_overlap_has_jaccard_one() {
    let store = MemoryStore::new();
    let clock = FixedClock(T0 + HOUR);
    let kb = FinanceKnowledgeBase::with_nasdaq_defaults();
    let cfg = EngagementConfig::default();

    let posts = vec![
        post("j1", "TSLA and NVDA momentum", T0 + 1000),
        post("j2", "TSLA NVDA pair trade", T0 + 2000),
    ];
    ingest_posts(&store, &kb, &cfg, &posts).await.unwrap();

    build_co_occurrence_graph(&store, &clock, T0, HOUR, Some(2), None)
        .await
        .unwrap();

    let stored = store.find_edge("nvda", "tsla", T0).await.unwrap().unwrap();
    assert_eq!(stored.strength, 1.0);
    // always together: pmi = log2((2/2) / ((2/2) * (2/2))) = 0 with n=2
    assert!(stored.pmi.abs() < 1e-12);
}

#[tokio::test]
async fn test_pruning_thresholds() {
    let store = MemoryStore::new();
    store.insert_edge(edge("aapl", "msft", T0, 0.05)).await.unwrap();
    store.insert_edge(edge("nvda", "tsla", T0, 0.2)).await.unwrap();

    let result = prune_graph_edges(&store, 0.1, 1, None).await.unwrap();
    assert_eq!(result.edges_deleted, 1);

    assert!(store.find_edge("aapl", "msft", T0).await.unwrap().is_none());
    assert!(store.find_edge("nvda", "tsla", T0).await.unwrap().is_some());
}

#[tokio::test]
async fn test_pruning_respects_age_cutoff() {
    let store = MemoryStore::new();
    store.insert_edge(edge("aapl", "msft", T0, 0.05)).await.unwrap();
    store
        .insert_edge(edge("nvda", "tsla", T0 + HOUR, 0.05))
        .await
        .unwrap();

    // Only windows strictly before the cutoff are in scope
    let result = prune_graph_edges(&store, 0.1, 1, Some(T0 + HOUR))
        .await
        .unwrap();
    assert_eq!(result.edges_deleted, 1);
    assert!(store
        .find_edge("nvda", "tsla", T0 + HOUR)
        .await
        .unwrap()
        .is_some());
}
