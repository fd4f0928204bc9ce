//! Keyword co-occurrence graph: window builds, pruning, and subgraph stats.

mod builder;
mod prune;

pub use builder::{build_co_occurrence_graph, DEFAULT_MAX_EDGES_PER_NODE, DEFAULT_MIN_CO_OCCURRENCE};
pub use prune::{finance_subgraph_stats, prune_graph_edges};

/// Canonical undirected pair ordering: source < target lexicographically.
/// Every pair key in the graph goes through here so an edge is never
/// double-counted or duplicated in both directions.
pub fn canonical_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Pointwise mutual information over post counts:
/// `log2((co/n) / ((count1/n) * (count2/n)))`. Zero when the pair never
/// co-occurs or either marginal count is zero.
pub fn pmi(co_occurrence: u64, count1: u64, count2: u64, n: u64) -> f64 {
    if co_occurrence == 0 || count1 == 0 || count2 == 0 || n == 0 {
        return 0.0;
    }
    let n = n as f64;
    let joint = co_occurrence as f64 / n;
    let expected = (count1 as f64 / n) * (count2 as f64 / n);
    (joint / expected).log2()
}

/// Jaccard similarity `co / (count1 + count2 - co)`; zero on an empty
/// denominator.
pub fn jaccard(co_occurrence: u64, count1: u64, count2: u64) -> f64 {
    let denominator = count1 + count2 - co_occurrence;
    if denominator == 0 {
        return 0.0;
    }
    co_occurrence as f64 / denominator as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_pair_ordering() {
        assert_eq!(
            canonical_pair("nvda", "aapl"),
            ("aapl".to_string(), "nvda".to_string())
        );
        assert_eq!(
            canonical_pair("aapl", "nvda"),
            ("aapl".to_string(), "nvda".to_string())
        );
    }

    #[test]
    fn test_pmi_zero_guards() {
        assert_eq!(pmi(0, 5, 5, 10), 0.0);
        assert_eq!(pmi(3, 0, 5, 10), 0.0);
        assert_eq!(pmi(3, 5, 0, 10), 0.0);
        assert_eq!(pmi(3, 5, 5, 0), 0.0);
    }

    #[test]
    fn test_pmi_independent_pair_is_zero() {
        // co/n == (c1/n)(c2/n): 4/16 = (8/16)(8/16) -> log2(1) = 0
        assert!((pmi(4, 8, 8, 16)).abs() < 1e-12);
    }

    #[test]
    fn test_pmi_positive_association() {
        // always together: co=c1=c2=5, n=10 -> log2(2) = 1
        assert!((pmi(5, 5, 5, 10) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_jaccard_edge_cases() {
        assert_eq!(jaccard(0, 0, 0), 0.0);
        assert_eq!(jaccard(0, 3, 4), 0.0);
        // count1 = count2 = co -> perfect overlap
        assert_eq!(jaccard(5, 5, 5), 1.0);
        assert!((jaccard(2, 4, 4) - 2.0 / 6.0).abs() < 1e-12);
    }
}
