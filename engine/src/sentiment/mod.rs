//! Sentiment and trend aggregation over fixed time buckets.

pub mod aggregate;
pub mod batch;
pub mod index;
pub mod ticker;
pub mod trend;

pub use aggregate::{aggregate_sentiment, AggregatedSentiment, SentimentInput};
pub use batch::{enumerate_intervals, plan_batch_aggregation};
pub use index::aggregate_index_sentiment;
pub use ticker::aggregate_ticker_sentiment;
pub use trend::{calculate_trend_metrics, classify_trend, ema, TrendMetrics};
