//! Basket-level index aggregation across per-ticker slices.

use crate::clock::Clock;
use crate::knowledge::FinanceKnowledgeBase;
use crate::store::SentimentStore;
use crate::Result;
use shared::models::{
    Granularity, IndexAggregation, IndexSentimentSnapshot, MarketRegime, TickerSentimentSlice,
    TopContributor,
};
use tracing::{debug, info};

/// Contributing tickers below this count force the low-signal regime.
const LOW_SIGNAL_THRESHOLD: usize = 5;
/// Number of top contributors recorded per snapshot.
const TOP_CONTRIBUTORS: usize = 5;

/// Aggregate the ticker slices at one (timestamp, granularity) into a
/// market-cap-weighted index snapshot.
///
/// Idempotent like the ticker aggregation: an existing snapshot is returned
/// with `created=false`, and an empty bucket yields a synthetic zero
/// snapshot that is never persisted. An optional ticker filter restricts the
/// constituents (the low-signal threshold still applies to the filtered
/// count).
pub async fn aggregate_index_sentiment<S: SentimentStore>(
    store: &S,
    clock: &impl Clock,
    kb: &FinanceKnowledgeBase,
    timestamp: i64,
    granularity: Granularity,
    tickers: Option<&[String]>,
) -> Result<IndexAggregation> {
    if let Some(existing) = store.find_index_snapshot(timestamp, granularity).await? {
        debug!("Index snapshot already exists @ {} ({})", timestamp, granularity);
        return Ok(IndexAggregation {
            created: false,
            snapshot: existing,
        });
    }

    let mut slices = store.slices_at(timestamp, granularity).await?;
    if let Some(filter) = tickers {
        slices.retain(|s| filter.iter().any(|t| t == &s.ticker));
    }

    if slices.is_empty() {
        return Ok(IndexAggregation {
            created: false,
            snapshot: zero_snapshot(timestamp, granularity, clock.now_ms()),
        });
    }

    let snapshot = compute_snapshot(kb, &slices, timestamp, granularity, clock.now_ms());

    if !store.insert_index_snapshot(snapshot.clone()).await? {
        let existing = store
            .find_index_snapshot(timestamp, granularity)
            .await?
            .unwrap_or(snapshot);
        return Ok(IndexAggregation {
            created: false,
            snapshot: existing,
        });
    }

    info!(
        "Index snapshot @ {} ({}): sentiment {:.3}, breadth {:.2}, regime {}",
        timestamp,
        granularity,
        snapshot.weighted_sentiment,
        snapshot.breadth,
        snapshot.regime.as_str()
    );
    Ok(IndexAggregation {
        created: true,
        snapshot,
    })
}

fn compute_snapshot(
    kb: &FinanceKnowledgeBase,
    slices: &[TickerSentimentSlice],
    timestamp: i64,
    granularity: Granularity,
    now: i64,
) -> IndexSentimentSnapshot {
    let mut weight_sum = 0.0;
    let mut weighted_sentiment_sum = 0.0;
    let mut positive_tickers = 0usize;
    let mut contributors: Vec<TopContributor> = Vec::with_capacity(slices.len());

    for slice in slices {
        let weight = kb.market_cap_weight(&slice.ticker);
        weight_sum += weight;
        weighted_sentiment_sum += weight * slice.weighted_sentiment;
        if slice.weighted_sentiment > 0.0 {
            positive_tickers += 1;
        }
        contributors.push(TopContributor {
            ticker: slice.ticker.clone(),
            sentiment: slice.weighted_sentiment,
            weight,
            contribution: slice.weighted_sentiment * weight,
        });
    }

    let weighted_sentiment = if weight_sum > 0.0 {
        weighted_sentiment_sum / weight_sum
    } else {
        0.0
    };
    let breadth = positive_tickers as f64 / slices.len() as f64;
    let dispersion = population_std_dev(slices);

    contributors.sort_by(|a, b| {
        b.contribution
            .abs()
            .partial_cmp(&a.contribution.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    contributors.truncate(TOP_CONTRIBUTORS);

    let regime = classify_regime(slices.len(), weighted_sentiment, breadth);

    IndexSentimentSnapshot {
        bucket_time: timestamp,
        granularity,
        weighted_sentiment,
        breadth,
        dispersion,
        regime,
        top_contributors: contributors,
        total_mentions: slices.iter().map(|s| s.total_mentions).sum(),
        total_engagement: slices.iter().map(|s| s.engagement_sum).sum(),
        active_tickers: slices.len() as u64,
        computed_at: now,
    }
}

/// Regime ladder, evaluated top-down. The thresholds are exact decision
/// boundaries.
fn classify_regime(contributing: usize, sentiment: f64, breadth: f64) -> MarketRegime {
    if contributing < LOW_SIGNAL_THRESHOLD {
        MarketRegime::LowSignal
    } else if sentiment > 0.2 && breadth > 0.6 {
        MarketRegime::Bullish
    } else if sentiment < -0.2 && breadth < 0.4 {
        MarketRegime::Bearish
    } else {
        MarketRegime::Uncertain
    }
}

/// Unweighted population standard deviation of constituent sentiments.
fn population_std_dev(slices: &[TickerSentimentSlice]) -> f64 {
    let n = slices.len() as f64;
    let mean = slices.iter().map(|s| s.weighted_sentiment).sum::<f64>() / n;
    let variance = slices
        .iter()
        .map(|s| (s.weighted_sentiment - mean).powi(2))
        .sum::<f64>()
        / n;
    variance.sqrt()
}

fn zero_snapshot(timestamp: i64, granularity: Granularity, now: i64) -> IndexSentimentSnapshot {
    IndexSentimentSnapshot {
        bucket_time: timestamp,
        granularity,
        weighted_sentiment: 0.0,
        breadth: 0.0,
        dispersion: 0.0,
        regime: MarketRegime::LowSignal,
        top_contributors: Vec::new(),
        total_mentions: 0,
        total_engagement: 0.0,
        active_tickers: 0,
        computed_at: now,
    }
}
