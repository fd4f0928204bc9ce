//! `SeaORM` Entity for keyword co-occurrence edges

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "keyword_graph_edges")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    pub source_keyword: String,
    pub target_keyword: String,
    pub window_start: i64,
    pub window_length: i64,
    pub co_occurrence_count: i64,
    pub source_count: i64,
    pub target_count: i64,
    pub strength: f64,
    pub pmi: f64,
    pub finance_relevance: Option<f64>,
    /// JSON array of ticker symbols both endpoints map to.
    pub shared_tickers: Option<Json>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
