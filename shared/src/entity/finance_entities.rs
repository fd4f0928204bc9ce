//! `SeaORM` Entity for tracked securities

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "finance_entities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    #[sea_orm(unique)]
    pub entity_id: String,
    pub canonical_symbol: String,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    /// JSON array of alias strings.
    pub aliases: Json,
    pub sector: String,
    pub industry: String,
    pub entity_type: String,
    pub active: bool,
    pub kb_version: i32,
    /// Epoch milliseconds.
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
