//! `SeaORM` Entity for basket-level index sentiment snapshots

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "index_sentiment_snapshots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    pub bucket_time: i64,
    pub granularity: String,
    pub weighted_sentiment: f64,
    pub breadth: f64,
    pub dispersion: f64,
    pub regime: String,
    /// JSON array of contributor records.
    pub top_contributors: Json,
    pub total_mentions: i64,
    pub total_engagement: f64,
    pub active_tickers: i64,
    pub computed_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
