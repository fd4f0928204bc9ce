//! Engagement weighting and finance-relevance scoring.
//!
//! Both scores are deterministic heuristics: the engagement weight is a
//! relative (unbounded) scalar, the relevance score is an additive prior
//! capped at 1.0. The additive structure is load-bearing for
//! reproducibility and must not be reordered.

use shared::models::PostMetrics;
use std::collections::HashMap;

/// Keywords that exactly match one of these earn the +0.15 term bonus.
const FINANCIAL_TERMS: &[&str] = &[
    "earnings", "revenue", "guidance", "dividend", "buyback", "valuation",
    "calls", "puts", "options", "shares", "stock", "stocks", "short",
    "squeeze", "ipo", "split", "upgrade", "downgrade", "bullish", "bearish",
    "rally", "selloff", "breakout", "margin", "pe", "eps",
];

/// Keywords containing one of these fragments earn the +0.10 phrase bonus.
/// Checked once; the first hit wins and bonuses do not stack.
const FINANCIAL_FRAGMENTS: &[&str] = &[
    "earning", "price target", "market cap", "all time high", "52 week",
    "pre market", "after hours", "short interest", "insider", "quarter",
];

/// How subreddit authority scales the engagement weight.
#[derive(Debug, Clone)]
pub enum SubredditAuthority {
    /// Every source weighs 1.0.
    Flat,
    /// Lookup by lower-cased subreddit name with a fallback weight.
    Table {
        weights: HashMap<String, f64>,
        default: f64,
    },
}

impl SubredditAuthority {
    pub fn multiplier(&self, subreddit: &str) -> f64 {
        match self {
            SubredditAuthority::Flat => 1.0,
            SubredditAuthority::Table { weights, default } => weights
                .get(&subreddit.to_lowercase())
                .copied()
                .unwrap_or(*default),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngagementConfig {
    pub score_weight: f64,
    pub comment_weight: f64,
    pub ratio_weight: f64,
    pub authority: SubredditAuthority,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            score_weight: 0.4,
            comment_weight: 0.4,
            ratio_weight: 0.2,
            authority: SubredditAuthority::Flat,
        }
    }
}

/// Normalized engagement weight for a post.
///
/// Score and comment count are log10-normalized over 5 and 4 decades
/// respectively (clamped to >= 1 before the log); the upvote ratio is taken
/// as-is. The weighted sum is scaled by the subreddit authority multiplier.
/// The result has no fixed upper bound; treat it as a relative weight.
pub fn engagement_weight(
    metrics: &PostMetrics,
    subreddit: &str,
    config: &EngagementConfig,
) -> f64 {
    let norm_score = (metrics.score.max(1) as f64).log10() / 5.0;
    let norm_comments = (metrics.comment_count.max(1) as f64).log10() / 4.0;

    let combined = config.score_weight * norm_score
        + config.comment_weight * norm_comments
        + config.ratio_weight * metrics.upvote_ratio;

    combined * config.authority.multiplier(subreddit)
}

#[derive(Debug, Clone)]
pub struct RelevanceConfig {
    pub exact_terms: Vec<String>,
    pub fragments: Vec<String>,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            exact_terms: FINANCIAL_TERMS.iter().map(|t| t.to_string()).collect(),
            fragments: FINANCIAL_FRAGMENTS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Finance-relevance prior for a keyword.
///
/// 0.0 without a ticker mapping, else 0.7 base; +0.15 for more than one
/// mapped ticker; +0.15 for an exact financial-term match; +0.10 if the
/// keyword contains a financial phrase fragment (first match only); capped
/// at 1.0.
pub fn finance_relevance(keyword: &str, mapped_tickers: &[String], config: &RelevanceConfig) -> f64 {
    if mapped_tickers.is_empty() {
        return 0.0;
    }
    let keyword = keyword.to_lowercase();
    let mut score: f64 = 0.7;

    if mapped_tickers.len() > 1 {
        score += 0.15;
    }
    if config.exact_terms.iter().any(|t| t == &keyword) {
        score += 0.15;
    }
    if config.fragments.iter().any(|f| keyword.contains(f.as_str())) {
        score += 0.10;
    }

    score.min(1.0)
}
