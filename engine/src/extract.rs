//! Post ingestion: entity resolution over raw posts and occurrence-record
//! creation. Occurrence timestamps come from the post's observed time, not
//! the compute time, so aggregation windows stay historically accurate on
//! backfill.

use crate::knowledge::FinanceKnowledgeBase;
use crate::scoring::{engagement_weight, EngagementConfig};
use crate::store::SentimentStore;
use crate::Result;
use serde::{Deserialize, Serialize};
use shared::models::{IngestResult, KeywordOccurrence, PostMetrics, SentimentSnapshot};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// One post from the ingestion feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPost {
    pub post_id: String,
    pub source: String,
    pub title: String,
    pub body: String,
    pub metrics: PostMetrics,
    pub sentiment: SentimentSnapshot,
    /// Epoch milliseconds at which the feed observed the post.
    pub observed_at: i64,
}

struct KeywordGroup {
    keyword: String,
    tickers: Vec<String>,
    in_title: bool,
    in_body: bool,
}

/// Resolve entities over title+body and emit one occurrence per
/// (keyword, post) pair, carrying the full mapped-ticker list.
pub fn extract_occurrences(
    kb: &FinanceKnowledgeBase,
    config: &EngagementConfig,
    post: &RawPost,
) -> Vec<KeywordOccurrence> {
    let text = format!("{}\n{}", post.title, post.body);
    let matches = kb.resolve_entities(&text);
    if matches.is_empty() {
        return Vec::new();
    }

    let weight = engagement_weight(&post.metrics, &post.source, config);
    let title_len = post.title.len();

    // One group per normalized keyword; an ambiguous alias maps the same
    // keyword to several tickers.
    let mut groups: HashMap<String, KeywordGroup> = HashMap::new();
    for m in matches {
        let normalized = m.matched_text.to_lowercase();
        let group = groups.entry(normalized).or_insert_with(|| KeywordGroup {
            keyword: m.matched_text.clone(),
            tickers: Vec::new(),
            in_title: false,
            in_body: false,
        });
        if !group.tickers.contains(&m.ticker) {
            group.tickers.push(m.ticker.clone());
        }
        if m.position < title_len {
            group.in_title = true;
        } else {
            group.in_body = true;
        }
    }

    let mut occurrences: Vec<KeywordOccurrence> = groups
        .into_iter()
        .map(|(normalized, group)| KeywordOccurrence {
            keyword: group.keyword,
            keyword_normalized: normalized,
            post_id: post.post_id.clone(),
            source: post.source.clone(),
            occurred_at: post.observed_at,
            sentiment: post.sentiment,
            engagement_weight: weight,
            metrics: post.metrics,
            mapped_tickers: group.tickers,
            in_title: group.in_title,
            in_body: group.in_body,
        })
        .collect();
    occurrences.sort_by(|a, b| a.keyword_normalized.cmp(&b.keyword_normalized));
    occurrences
}

/// Extract and persist occurrences for a batch of posts.
///
/// A (keyword, post) pair is written at most once per pass, even when the
/// feed repeats a post within the batch.
pub async fn ingest_posts<S: SentimentStore>(
    store: &S,
    kb: &FinanceKnowledgeBase,
    config: &EngagementConfig,
    posts: &[RawPost],
) -> Result<IngestResult> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut batch: Vec<KeywordOccurrence> = Vec::new();

    for post in posts {
        for occ in extract_occurrences(kb, config, post) {
            let key = (occ.keyword_normalized.clone(), occ.post_id.clone());
            if seen.insert(key) {
                batch.push(occ);
            } else {
                debug!(
                    "Skipping duplicate occurrence {} in post {}",
                    occ.keyword_normalized, occ.post_id
                );
            }
        }
    }

    let occurrences_created = store.insert_occurrences(batch).await?;
    info!(
        "Ingested {} posts, created {} occurrences",
        posts.len(),
        occurrences_created
    );
    Ok(IngestResult {
        posts_processed: posts.len() as u64,
        occurrences_created,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, title: &str, body: &str) -> RawPost {
        RawPost {
            post_id: id.to_string(),
            source: "stocks".to_string(),
            title: title.to_string(),
            body: body.to_string(),
            metrics: PostMetrics {
                score: 120,
                comment_count: 30,
                upvote_ratio: 0.92,
            },
            sentiment: SentimentSnapshot {
                positive: 0.6,
                negative: 0.1,
                neutral: 0.3,
                mixed: 0.0,
                confidence: 0.9,
            },
            observed_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_one_occurrence_per_keyword() {
        let kb = FinanceKnowledgeBase::with_nasdaq_defaults();
        let cfg = EngagementConfig::default();
        let p = post("p1", "AAPL earnings tomorrow", "AAPL calls, also watching $MSFT");
        let occurrences = extract_occurrences(&kb, &cfg, &p);

        assert_eq!(occurrences.len(), 2);
        let aapl = occurrences
            .iter()
            .find(|o| o.keyword_normalized == "aapl")
            .unwrap();
        assert_eq!(aapl.mapped_tickers, vec!["AAPL".to_string()]);
        assert!(aapl.in_title);
        assert_eq!(aapl.occurred_at, 1_700_000_000_000);
    }

    #[test]
    fn test_body_only_provenance() {
        let kb = FinanceKnowledgeBase::with_nasdaq_defaults();
        let cfg = EngagementConfig::default();
        let p = post("p1", "market thread", "nvidia keeps running");
        let occurrences = extract_occurrences(&kb, &cfg, &p);

        assert_eq!(occurrences.len(), 1);
        assert!(!occurrences[0].in_title);
        assert!(occurrences[0].in_body);
        assert_eq!(occurrences[0].mapped_tickers, vec!["NVDA".to_string()]);
    }

    #[tokio::test]
    async fn test_ingest_deduplicates_within_pass() {
        let kb = FinanceKnowledgeBase::with_nasdaq_defaults();
        let cfg = EngagementConfig::default();
        let store = crate::store::MemoryStore::new();
        let p = post("p1", "AAPL up big", "");

        let result = ingest_posts(&store, &kb, &cfg, &[p.clone(), p])
            .await
            .unwrap();
        assert_eq!(result.posts_processed, 2);
        assert_eq!(result.occurrences_created, 1);
    }
}
