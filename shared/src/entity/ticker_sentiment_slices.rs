//! `SeaORM` Entity for per-ticker sentiment aggregates

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ticker_sentiment_slices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    pub ticker: String,
    pub interval_start: i64,
    pub granularity: String,
    pub weighted_sentiment: f64,
    pub confidence: f64,
    pub positive_count: i64,
    pub negative_count: i64,
    pub neutral_count: i64,
    pub total_mentions: i64,
    pub engagement_sum: f64,
    pub unique_posts: i64,
    pub unique_sources: i64,
    pub velocity: f64,
    pub acceleration: f64,
    pub computed_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
