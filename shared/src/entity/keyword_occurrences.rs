//! `SeaORM` Entity for keyword occurrence events

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "keyword_occurrences")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    pub keyword: String,
    pub keyword_normalized: String,
    pub post_id: String,
    pub source: String,
    /// Epoch milliseconds of the post observation, not the compute time.
    pub occurred_at: i64,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub mixed: f64,
    pub confidence: f64,
    pub engagement_weight: f64,
    pub score: i64,
    pub comment_count: i64,
    pub upvote_ratio: f64,
    /// JSON array of ticker symbols.
    pub mapped_tickers: Json,
    pub in_title: bool,
    pub in_body: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
