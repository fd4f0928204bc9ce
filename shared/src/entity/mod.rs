pub mod finance_entities;
pub mod index_sentiment_snapshots;
pub mod keyword_graph_edges;
pub mod keyword_occurrences;
pub mod ticker_sentiment_slices;
