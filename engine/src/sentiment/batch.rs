//! Batch aggregation planning.
//!
//! Pure interval enumeration: generates the bucket start-times a scheduler
//! should fan out as individual aggregation calls. Never mutates state.

use crate::{EngineError, Result};
use shared::models::{BatchPlan, Granularity};

/// Bucket start-times covering `[start, end)`, aligned down to the
/// granularity boundary. Rejects empty or inverted ranges.
pub fn enumerate_intervals(start: i64, end: i64, granularity: Granularity) -> Result<Vec<i64>> {
    if end <= start {
        return Err(EngineError::InvalidWindow(format!(
            "end {} must be after start {}",
            end, start
        )));
    }
    let duration = granularity.duration_ms();
    let mut current = start.div_euclid(duration) * duration;
    let mut intervals = Vec::new();
    while current < end {
        intervals.push(current);
        current += duration;
    }
    Ok(intervals)
}

/// Plan the (ticker × interval) aggregation fan-out for a time range.
pub fn plan_batch_aggregation(
    tickers: &[String],
    start: i64,
    end: i64,
    granularity: Granularity,
) -> Result<BatchPlan> {
    let intervals = enumerate_intervals(start, end, granularity)?;
    let message = format!(
        "Planned {} intervals ({}) for {} tickers; schedule aggregate_ticker_sentiment per (ticker, interval)",
        intervals.len(),
        granularity,
        tickers.len()
    );
    Ok(BatchPlan {
        intervals_processed: intervals.len(),
        message,
        intervals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerate_aligns_to_boundary() {
        let hour = Granularity::OneHour.duration_ms();
        let intervals = enumerate_intervals(hour + 1, 3 * hour, Granularity::OneHour).unwrap();
        assert_eq!(intervals, vec![hour, 2 * hour]);
    }

    #[test]
    fn test_enumerate_rejects_empty_range() {
        assert!(matches!(
            enumerate_intervals(1000, 1000, Granularity::FiveMinutes),
            Err(EngineError::InvalidWindow(_))
        ));
        assert!(enumerate_intervals(2000, 1000, Granularity::FiveMinutes).is_err());
    }

    #[test]
    fn test_plan_counts_intervals() {
        let day = Granularity::OneDay.duration_ms();
        let plan = plan_batch_aggregation(
            &["AAPL".to_string(), "MSFT".to_string()],
            0,
            3 * day,
            Granularity::OneDay,
        )
        .unwrap();
        assert_eq!(plan.intervals_processed, 3);
        assert_eq!(plan.intervals, vec![0, day, 2 * day]);
    }
}
