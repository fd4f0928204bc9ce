//! EMA smoothing and trend-status classification.

use shared::models::TrendStatus;

pub const DEFAULT_SHORT_PERIOD: usize = 5;
pub const DEFAULT_LONG_PERIOD: usize = 20;

/// Exponential moving average over a series with smoothing factor
/// `α = 2 / (period + 1)`, seeded with the first value. Returns the final
/// smoothed value, or None for an empty series.
pub fn ema(values: &[f64], period: usize) -> Option<f64> {
    let mut iter = values.iter();
    let mut current = *iter.next()?;
    let alpha = 2.0 / (period as f64 + 1.0);
    for &value in iter {
        current = alpha * value + (1.0 - alpha) * current;
    }
    Some(current)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendMetrics {
    pub short_ema: f64,
    pub long_ema: f64,
    pub status: TrendStatus,
}

/// Trend-status ladder, evaluated top-down.
pub fn classify_trend(
    occurrences: u64,
    velocity: f64,
    acceleration: f64,
    prior: Option<TrendStatus>,
) -> TrendStatus {
    if occurrences == 0 {
        TrendStatus::Dormant
    } else if occurrences >= 5 && velocity > 0.5 {
        TrendStatus::Emerging
    } else if velocity > 0.2 && acceleration > 0.0 {
        TrendStatus::Rising
    } else if velocity.abs() <= 0.1 && occurrences > 10 {
        TrendStatus::Peak
    } else if velocity < -0.25 {
        TrendStatus::Declining
    } else if occurrences >= 5 {
        TrendStatus::Stable
    } else {
        prior.unwrap_or(TrendStatus::Dormant)
    }
}

/// Smooth a per-bucket mention series with short/long EMAs (defaults 5/20)
/// and classify the current trend from the latest bucket's dynamics.
pub fn calculate_trend_metrics(
    mention_series: &[f64],
    velocity: f64,
    acceleration: f64,
    prior: Option<TrendStatus>,
) -> TrendMetrics {
    let short_ema = ema(mention_series, DEFAULT_SHORT_PERIOD).unwrap_or(0.0);
    let long_ema = ema(mention_series, DEFAULT_LONG_PERIOD).unwrap_or(0.0);
    let occurrences = mention_series.last().copied().unwrap_or(0.0).max(0.0) as u64;

    TrendMetrics {
        short_ema,
        long_ema,
        status: classify_trend(occurrences, velocity, acceleration, prior),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_constant_series_converges() {
        let values = vec![7.0; 50];
        let result = ema(&values, 5).unwrap();
        assert!((result - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_ema_empty_series() {
        assert!(ema(&[], 5).is_none());
    }

    #[test]
    fn test_ema_smoothing_factor() {
        // alpha = 2/(2+1) = 2/3; seed 0, next 3 -> 2.0
        let result = ema(&[0.0, 3.0], 2).unwrap();
        assert!((result - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_trend_ladder() {
        assert_eq!(classify_trend(0, 2.0, 1.0, None), TrendStatus::Dormant);
        assert_eq!(classify_trend(5, 0.51, 0.0, None), TrendStatus::Emerging);
        assert_eq!(classify_trend(3, 0.3, 0.1, None), TrendStatus::Rising);
        assert_eq!(classify_trend(11, 0.05, -0.1, None), TrendStatus::Peak);
        assert_eq!(classify_trend(3, -0.3, 0.0, None), TrendStatus::Declining);
        assert_eq!(classify_trend(8, 0.15, -0.2, None), TrendStatus::Stable);
        assert_eq!(classify_trend(2, 0.0, 0.0, None), TrendStatus::Dormant);
        assert_eq!(
            classify_trend(2, 0.0, 0.0, Some(TrendStatus::Rising)),
            TrendStatus::Rising
        );
    }

    #[test]
    fn test_trend_ladder_boundaries() {
        // velocity exactly 0.5 with enough occurrences is not emerging
        assert_ne!(classify_trend(5, 0.5, 0.0, None), TrendStatus::Emerging);
        // |velocity| exactly 0.1 still counts as peak when busy enough
        assert_eq!(classify_trend(11, -0.1, 0.0, None), TrendStatus::Peak);
        // velocity exactly -0.25 is not declining
        assert_ne!(classify_trend(3, -0.25, 0.0, None), TrendStatus::Declining);
    }

    #[test]
    fn test_calculate_trend_metrics() {
        let series = vec![1.0, 2.0, 4.0, 8.0, 12.0];
        let metrics = calculate_trend_metrics(&series, 0.6, 0.1, None);
        assert_eq!(metrics.status, TrendStatus::Emerging);
        assert!(metrics.short_ema > metrics.long_ema);
    }
}
