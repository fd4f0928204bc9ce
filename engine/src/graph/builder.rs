//! Co-occurrence graph construction for one time window.

use crate::clock::Clock;
use crate::graph::{canonical_pair, jaccard, pmi};
use crate::store::SentimentStore;
use crate::{EngineError, Result};
use shared::models::{GraphBuildResult, KeywordGraphEdge};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

pub const DEFAULT_MIN_CO_OCCURRENCE: u64 = 2;
pub const DEFAULT_MAX_EDGES_PER_NODE: usize = 50;

/// Build (or refresh) the keyword co-occurrence graph for one
/// `(window_start, window_length)` window.
///
/// Keywords co-occur when they appear in the same post. Pair keys are
/// canonically ordered, each source keyword keeps only its top-N targets by
/// raw co-occurrence count, and pairs below the minimum count are skipped.
/// Edges are upserted by (source, target, window_start); `edges_created`
/// counts only new edges.
pub async fn build_co_occurrence_graph<S: SentimentStore>(
    store: &S,
    clock: &impl Clock,
    window_start: i64,
    window_length_ms: i64,
    min_co_occurrence: Option<u64>,
    max_edges_per_node: Option<usize>,
) -> Result<GraphBuildResult> {
    if window_length_ms <= 0 {
        return Err(EngineError::InvalidWindow(format!(
            "window length must be positive, got {}",
            window_length_ms
        )));
    }
    let min_co_occurrence = min_co_occurrence.unwrap_or(DEFAULT_MIN_CO_OCCURRENCE);
    let max_edges_per_node = max_edges_per_node.unwrap_or(DEFAULT_MAX_EDGES_PER_NODE);

    let occurrences = store
        .occurrences_in_range(window_start, window_start + window_length_ms)
        .await?;

    // Co-occurrence unit is the post: group keywords by post id.
    let mut post_keywords: HashMap<String, HashSet<String>> = HashMap::new();
    let mut keyword_tickers: HashMap<String, HashSet<String>> = HashMap::new();
    for occ in &occurrences {
        post_keywords
            .entry(occ.post_id.clone())
            .or_default()
            .insert(occ.keyword_normalized.clone());
        keyword_tickers
            .entry(occ.keyword_normalized.clone())
            .or_default()
            .extend(occ.mapped_tickers.iter().cloned());
    }

    let total_posts = post_keywords.len() as u64;

    // Marginal counts: number of posts containing each keyword.
    let mut keyword_counts: HashMap<String, u64> = HashMap::new();
    for keywords in post_keywords.values() {
        for keyword in keywords {
            *keyword_counts.entry(keyword.clone()).or_default() += 1;
        }
    }

    let mut pair_counts: HashMap<(String, String), u64> = HashMap::new();
    for keywords in post_keywords.values() {
        let mut sorted: Vec<&String> = keywords.iter().collect();
        sorted.sort_unstable();
        for i in 0..sorted.len() {
            for j in (i + 1)..sorted.len() {
                let key = canonical_pair(sorted[i], sorted[j]);
                *pair_counts.entry(key).or_default() += 1;
            }
        }
    }

    // Per source keyword, keep the top-N targets by raw count.
    let mut by_source: HashMap<&String, Vec<(&(String, String), u64)>> = HashMap::new();
    for (pair, &count) in &pair_counts {
        if count < min_co_occurrence {
            continue;
        }
        by_source.entry(&pair.0).or_default().push((pair, count));
    }

    let now = clock.now_ms();
    let mut edges_created = 0u64;
    for (_, mut pairs) in by_source {
        pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0 .1.cmp(&b.0 .1)));
        pairs.truncate(max_edges_per_node);

        for ((source, target), co_count) in pairs {
            let count1 = keyword_counts.get(source).copied().unwrap_or(0);
            let count2 = keyword_counts.get(target).copied().unwrap_or(0);
            let strength = jaccard(co_count, count1, count2);
            let pmi_score = pmi(co_count, count1, count2, total_posts);

            let empty = HashSet::new();
            let tickers1 = keyword_tickers.get(source).unwrap_or(&empty);
            let tickers2 = keyword_tickers.get(target).unwrap_or(&empty);
            let (relevance, shared) = edge_finance_relevance(tickers1, tickers2);

            let edge = KeywordGraphEdge {
                source_keyword: source.clone(),
                target_keyword: target.clone(),
                window_start,
                window_length: window_length_ms,
                co_occurrence_count: co_count,
                source_count: count1,
                target_count: count2,
                strength,
                pmi: pmi_score,
                finance_relevance: Some(relevance),
                shared_tickers: shared,
                created_at: now,
                updated_at: now,
            };

            match store.find_edge(source, target, window_start).await? {
                Some(existing) => {
                    debug!("Patching edge {} -> {} @ {}", source, target, window_start);
                    store
                        .update_edge(KeywordGraphEdge {
                            created_at: existing.created_at,
                            ..edge
                        })
                        .await?;
                }
                None => {
                    store.insert_edge(edge).await?;
                    edges_created += 1;
                }
            }
        }
    }

    let keywords_processed = keyword_counts.len() as u64;
    info!(
        "Graph build @ {} (+{}ms): {} posts, {} keywords, {} new edges",
        window_start, window_length_ms, total_posts, keywords_processed, edges_created
    );
    Ok(GraphBuildResult {
        edges_created,
        keywords_processed,
    })
}

/// Edge-level finance relevance: 0 without ticker mappings, 0.5 with one
/// mapped endpoint, 0.8 with both, 1.0 when both endpoints share a ticker.
fn edge_finance_relevance(
    tickers1: &HashSet<String>,
    tickers2: &HashSet<String>,
) -> (f64, Vec<String>) {
    match (tickers1.is_empty(), tickers2.is_empty()) {
        (true, true) => (0.0, Vec::new()),
        (false, true) | (true, false) => (0.5, Vec::new()),
        (false, false) => {
            let mut shared: Vec<String> = tickers1.intersection(tickers2).cloned().collect();
            shared.sort_unstable();
            if shared.is_empty() {
                (0.8, shared)
            } else {
                (1.0, shared)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tickers: &[&str]) -> HashSet<String> {
        tickers.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_edge_finance_relevance_ladder() {
        assert_eq!(edge_finance_relevance(&set(&[]), &set(&[])).0, 0.0);
        assert_eq!(edge_finance_relevance(&set(&["AAPL"]), &set(&[])).0, 0.5);
        assert_eq!(edge_finance_relevance(&set(&[]), &set(&["AAPL"])).0, 0.5);
        assert_eq!(
            edge_finance_relevance(&set(&["AAPL"]), &set(&["MSFT"])).0,
            0.8
        );
        let (relevance, shared) =
            edge_finance_relevance(&set(&["AAPL", "MSFT"]), &set(&["MSFT"]));
        assert_eq!(relevance, 1.0);
        assert_eq!(shared, vec!["MSFT".to_string()]);
    }
}
