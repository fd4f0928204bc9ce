//! Confidence-and-engagement-weighted sentiment averaging.

/// One occurrence's contribution to an aggregate.
#[derive(Debug, Clone, Copy)]
pub struct SentimentInput {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub mixed: f64,
    pub confidence: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatedSentiment {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub mixed: f64,
    pub avg_confidence: f64,
    pub weighted_score: f64,
}

impl AggregatedSentiment {
    fn neutral_zero_confidence() -> Self {
        Self {
            positive: 0.0,
            negative: 0.0,
            neutral: 1.0,
            mixed: 0.0,
            avg_confidence: 0.0,
            weighted_score: 0.0,
        }
    }
}

/// Each item contributes with weight `confidence × weight`. Class outputs
/// are weight-normalized averages; `weighted_score = positive − negative`.
///
/// `avg_confidence` is the unweighted mean of input confidences. Every other
/// quantity is weight-normalized; this asymmetry is intentional and must be
/// preserved, since changing it would silently shift historical aggregates.
pub fn aggregate_sentiment(items: &[SentimentInput]) -> AggregatedSentiment {
    let total_weight: f64 = items.iter().map(|i| i.confidence * i.weight).sum();
    if total_weight == 0.0 || items.is_empty() {
        return AggregatedSentiment::neutral_zero_confidence();
    }

    let mut positive = 0.0;
    let mut negative = 0.0;
    let mut neutral = 0.0;
    let mut mixed = 0.0;
    let mut confidence_sum = 0.0;
    for item in items {
        let w = item.confidence * item.weight;
        positive += item.positive * w;
        negative += item.negative * w;
        neutral += item.neutral * w;
        mixed += item.mixed * w;
        confidence_sum += item.confidence;
    }

    positive /= total_weight;
    negative /= total_weight;
    neutral /= total_weight;
    mixed /= total_weight;

    AggregatedSentiment {
        positive,
        negative,
        neutral,
        mixed,
        avg_confidence: confidence_sum / items.len() as f64,
        weighted_score: positive - negative,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(positive: f64, negative: f64, confidence: f64, weight: f64) -> SentimentInput {
        SentimentInput {
            positive,
            negative,
            neutral: 1.0 - positive - negative,
            mixed: 0.0,
            confidence,
            weight,
        }
    }

    #[test]
    fn test_zero_weight_returns_neutral() {
        let result = aggregate_sentiment(&[input(0.9, 0.0, 0.0, 1.0)]);
        assert_eq!(result.neutral, 1.0);
        assert_eq!(result.avg_confidence, 0.0);
        assert_eq!(result.weighted_score, 0.0);

        let result = aggregate_sentiment(&[]);
        assert_eq!(result.neutral, 1.0);
    }

    #[test]
    fn test_single_item_passthrough() {
        let result = aggregate_sentiment(&[input(0.7, 0.1, 0.9, 2.0)]);
        assert!((result.positive - 0.7).abs() < 1e-12);
        assert!((result.negative - 0.1).abs() < 1e-12);
        assert!((result.weighted_score - 0.6).abs() < 1e-12);
        assert!((result.avg_confidence - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_heavier_item_dominates() {
        let result = aggregate_sentiment(&[
            input(1.0, 0.0, 1.0, 9.0),
            input(0.0, 1.0, 1.0, 1.0),
        ]);
        assert!((result.positive - 0.9).abs() < 1e-12);
        assert!((result.negative - 0.1).abs() < 1e-12);
        assert!((result.weighted_score - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_avg_confidence_is_unweighted() {
        // One very heavy item must not drag the confidence mean
        let result = aggregate_sentiment(&[
            input(0.5, 0.2, 1.0, 100.0),
            input(0.5, 0.2, 0.2, 0.001),
        ]);
        assert!((result.avg_confidence - 0.6).abs() < 1e-12);
    }
}
