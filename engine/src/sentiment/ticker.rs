//! Per-ticker sentiment aggregation over one time bucket.

use crate::clock::Clock;
use crate::sentiment::aggregate::{aggregate_sentiment, SentimentInput};
use crate::store::SentimentStore;
use crate::Result;
use shared::models::{Granularity, KeywordOccurrence, TickerAggregation, TickerSentimentSlice};
use std::collections::HashSet;
use tracing::{debug, info};

/// Aggregate sentiment for one (ticker, interval_start, granularity) bucket.
///
/// Idempotent: an existing slice is returned unchanged with `created=false`.
/// A bucket with no matching occurrences yields a synthetic zero slice that
/// is never persisted. Velocity compares mention counts against the previous
/// bucket (1.0 from a standing start, 0.0 when both are empty); acceleration
/// is the velocity delta.
pub async fn aggregate_ticker_sentiment<S: SentimentStore>(
    store: &S,
    clock: &impl Clock,
    ticker: &str,
    interval_start: i64,
    granularity: Granularity,
) -> Result<TickerAggregation> {
    if let Some(existing) = store.find_slice(ticker, interval_start, granularity).await? {
        debug!(
            "Slice already exists for {} @ {} ({})",
            ticker, interval_start, granularity
        );
        return Ok(TickerAggregation {
            created: false,
            slice: existing,
        });
    }

    let duration = granularity.duration_ms();
    let interval_end = interval_start + duration;
    let occurrences: Vec<KeywordOccurrence> = store
        .occurrences_in_range(interval_start, interval_end)
        .await?
        .into_iter()
        .filter(|o| o.mapped_tickers.iter().any(|t| t == ticker))
        .collect();

    if occurrences.is_empty() {
        return Ok(TickerAggregation {
            created: false,
            slice: zero_slice(ticker, interval_start, granularity, clock.now_ms()),
        });
    }

    let inputs: Vec<SentimentInput> = occurrences
        .iter()
        .map(|o| SentimentInput {
            positive: o.sentiment.positive,
            negative: o.sentiment.negative,
            neutral: o.sentiment.neutral,
            mixed: o.sentiment.mixed,
            confidence: o.sentiment.confidence,
            weight: o.engagement_weight,
        })
        .collect();
    let aggregated = aggregate_sentiment(&inputs);

    let mut positive_count = 0u64;
    let mut negative_count = 0u64;
    let mut neutral_count = 0u64;
    for o in &occurrences {
        match dominant_class(o) {
            Class::Positive => positive_count += 1,
            Class::Negative => negative_count += 1,
            Class::Neutral => neutral_count += 1,
        }
    }

    let unique_posts = occurrences
        .iter()
        .map(|o| o.post_id.as_str())
        .collect::<HashSet<_>>()
        .len() as u64;
    let unique_sources = occurrences
        .iter()
        .map(|o| o.source.as_str())
        .collect::<HashSet<_>>()
        .len() as u64;
    let total_mentions = occurrences.len() as u64;
    let engagement_sum: f64 = occurrences.iter().map(|o| o.engagement_weight).sum();

    let previous = store
        .find_slice(ticker, interval_start - duration, granularity)
        .await?;
    let previous_mentions = previous.as_ref().map_or(0, |p| p.total_mentions);
    let previous_velocity = previous.as_ref().map_or(0.0, |p| p.velocity);

    let velocity = if previous_mentions == 0 {
        if total_mentions > 0 {
            1.0
        } else {
            0.0
        }
    } else {
        (total_mentions as f64 - previous_mentions as f64) / previous_mentions as f64
    };
    let acceleration = velocity - previous_velocity;

    let slice = TickerSentimentSlice {
        ticker: ticker.to_string(),
        interval_start,
        granularity,
        weighted_sentiment: aggregated.weighted_score,
        confidence: aggregated.avg_confidence,
        positive_count,
        negative_count,
        neutral_count,
        total_mentions,
        engagement_sum,
        unique_posts,
        unique_sources,
        velocity,
        acceleration,
        computed_at: clock.now_ms(),
    };

    if !store.insert_slice(slice.clone()).await? {
        // Lost a same-key race; the stored slice wins.
        let existing = store
            .find_slice(ticker, interval_start, granularity)
            .await?
            .unwrap_or(slice);
        return Ok(TickerAggregation {
            created: false,
            slice: existing,
        });
    }

    info!(
        "Aggregated {} mentions for {} @ {} ({}): sentiment {:.3}, velocity {:.3}",
        total_mentions, ticker, interval_start, granularity, slice.weighted_sentiment, velocity
    );
    Ok(TickerAggregation {
        created: true,
        slice,
    })
}

enum Class {
    Positive,
    Negative,
    Neutral,
}

/// Dominant primary class of one occurrence; ties fall to neutral.
fn dominant_class(o: &KeywordOccurrence) -> Class {
    let s = &o.sentiment;
    if s.positive > s.negative && s.positive > s.neutral {
        Class::Positive
    } else if s.negative > s.positive && s.negative > s.neutral {
        Class::Negative
    } else {
        Class::Neutral
    }
}

fn zero_slice(
    ticker: &str,
    interval_start: i64,
    granularity: Granularity,
    now: i64,
) -> TickerSentimentSlice {
    TickerSentimentSlice {
        ticker: ticker.to_string(),
        interval_start,
        granularity,
        weighted_sentiment: 0.0,
        confidence: 0.0,
        positive_count: 0,
        negative_count: 0,
        neutral_count: 0,
        total_mentions: 0,
        engagement_sum: 0.0,
        unique_posts: 0,
        unique_sources: 0,
        velocity: 0.0,
        acceleration: 0.0,
        computed_at: now,
    }
}
