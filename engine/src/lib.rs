//! Entity-resolution and sentiment-correlation engine.
//!
//! Ingests free-text social posts, resolves mentions of publicly traded
//! companies, aggregates engagement-weighted sentiment into fixed time
//! buckets, tracks trend dynamics, and maintains a keyword co-occurrence
//! graph. Persistence goes through the [`store::SentimentStore`] trait so the
//! same operations run against SeaORM in production and an in-memory store in
//! tests.
//!
//! All operations are idempotent, retryable units of work over disjoint keys
//! (ticker × interval × granularity, or window_start × window_length); see
//! the individual modules for the exact semantics.

pub mod clock;
pub mod error;
pub mod extract;
pub mod graph;
pub mod knowledge;
pub mod scoring;
pub mod sentiment;
pub mod store;

pub use error::EngineError;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

pub mod prelude {
    pub use crate::clock::{Clock, FixedClock, SystemClock};
    pub use crate::error::EngineError;
    pub use crate::knowledge::{EntityMatch, FinanceKnowledgeBase, MatchType};
    pub use crate::scoring::{EngagementConfig, RelevanceConfig, SubredditAuthority};
    pub use crate::store::{MemoryStore, SentimentStore};
    pub use shared::models::*;
}
