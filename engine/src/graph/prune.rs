//! Graph maintenance: weak-edge pruning and finance-subgraph stats.

use crate::store::SentimentStore;
use crate::Result;
use shared::models::{FinanceSubgraphStats, PruneResult};
use std::collections::HashSet;
use tracing::info;

/// Delete edges with `strength < min_strength` OR
/// `co_occurrence_count < min_co_occurrence`, optionally restricted to
/// windows starting before `older_than_ms`. Independent of the build step;
/// safe to run concurrently with builds for other windows.
pub async fn prune_graph_edges<S: SentimentStore>(
    store: &S,
    min_strength: f64,
    min_co_occurrence: u64,
    older_than_ms: Option<i64>,
) -> Result<PruneResult> {
    let edges_deleted = store
        .delete_edges(min_strength, min_co_occurrence, older_than_ms)
        .await?;
    info!(
        "Pruned {} edges (min_strength {}, min_co_occurrence {})",
        edges_deleted, min_strength, min_co_occurrence
    );
    Ok(PruneResult { edges_deleted })
}

/// Count finance-relevant edges and their distinct endpoint keywords in one
/// window.
pub async fn finance_subgraph_stats<S: SentimentStore>(
    store: &S,
    window_start: i64,
    min_finance_relevance: f64,
) -> Result<FinanceSubgraphStats> {
    let edges = store.edges_for_window(window_start).await?;

    let mut finance_edges = 0u64;
    let mut keywords: HashSet<String> = HashSet::new();
    for edge in edges {
        let relevant = edge
            .finance_relevance
            .map_or(false, |r| r >= min_finance_relevance);
        if relevant {
            finance_edges += 1;
            keywords.insert(edge.source_keyword);
            keywords.insert(edge.target_keyword);
        }
    }

    Ok(FinanceSubgraphStats {
        finance_edges,
        finance_keywords: keywords.len() as u64,
    })
}
