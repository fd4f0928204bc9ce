//! Engine error taxonomy.
//!
//! Configuration errors are rejected synchronously with no partial writes.
//! Idempotency conflicts and empty inputs are not errors and never surface
//! here. Per-entity seeding failures are collected into the seed result
//! rather than aborting the batch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid granularity: {0}")]
    InvalidGranularity(String),

    #[error("invalid window: {0}")]
    InvalidWindow(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
