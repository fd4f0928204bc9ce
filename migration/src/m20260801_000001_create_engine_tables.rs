use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Tracked securities (seeded, never deleted, only deactivated)
        manager
            .create_table(
                Table::create()
                    .table(FinanceEntities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FinanceEntities::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(FinanceEntities::EntityId).string().not_null().unique_key())
                    .col(ColumnDef::new(FinanceEntities::CanonicalSymbol).string().not_null())
                    .col(ColumnDef::new(FinanceEntities::Name).text().not_null())
                    .col(ColumnDef::new(FinanceEntities::Aliases).json().not_null())
                    .col(ColumnDef::new(FinanceEntities::Sector).string().not_null())
                    .col(ColumnDef::new(FinanceEntities::Industry).string().not_null())
                    .col(ColumnDef::new(FinanceEntities::EntityType).string().not_null().default("stock"))
                    .col(ColumnDef::new(FinanceEntities::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(FinanceEntities::KbVersion).integer().not_null().default(1))
                    .col(ColumnDef::new(FinanceEntities::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(FinanceEntities::UpdatedAt).big_integer().not_null())
                    .index(
                        Index::create()
                            .name("idx_entities_symbol")
                            .table(FinanceEntities::Table)
                            .col(FinanceEntities::CanonicalSymbol),
                    )
                    .to_owned(),
            )
            .await?;

        // Raw keyword occurrence events, immutable once written
        manager
            .create_table(
                Table::create()
                    .table(KeywordOccurrences::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(KeywordOccurrences::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(KeywordOccurrences::Keyword).string().not_null())
                    .col(ColumnDef::new(KeywordOccurrences::KeywordNormalized).string().not_null())
                    .col(ColumnDef::new(KeywordOccurrences::PostId).string().not_null())
                    .col(ColumnDef::new(KeywordOccurrences::Source).string().not_null())
                    .col(ColumnDef::new(KeywordOccurrences::OccurredAt).big_integer().not_null())
                    .col(ColumnDef::new(KeywordOccurrences::Positive).double().not_null())
                    .col(ColumnDef::new(KeywordOccurrences::Negative).double().not_null())
                    .col(ColumnDef::new(KeywordOccurrences::Neutral).double().not_null())
                    .col(ColumnDef::new(KeywordOccurrences::Mixed).double().not_null())
                    .col(ColumnDef::new(KeywordOccurrences::Confidence).double().not_null())
                    .col(ColumnDef::new(KeywordOccurrences::EngagementWeight).double().not_null())
                    .col(ColumnDef::new(KeywordOccurrences::Score).big_integer().not_null())
                    .col(ColumnDef::new(KeywordOccurrences::CommentCount).big_integer().not_null())
                    .col(ColumnDef::new(KeywordOccurrences::UpvoteRatio).double().not_null())
                    .col(ColumnDef::new(KeywordOccurrences::MappedTickers).json().not_null())
                    .col(ColumnDef::new(KeywordOccurrences::InTitle).boolean().not_null())
                    .col(ColumnDef::new(KeywordOccurrences::InBody).boolean().not_null())
                    .index(
                        Index::create()
                            .name("idx_occurrences_time")
                            .table(KeywordOccurrences::Table)
                            .col(KeywordOccurrences::OccurredAt),
                    )
                    .index(
                        Index::create()
                            .name("idx_occurrences_keyword_post")
                            .table(KeywordOccurrences::Table)
                            .col(KeywordOccurrences::KeywordNormalized)
                            .col(KeywordOccurrences::PostId),
                    )
                    .to_owned(),
            )
            .await?;

        // Per-ticker aggregates; the unique index backs the idempotency key
        manager
            .create_table(
                Table::create()
                    .table(TickerSentimentSlices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TickerSentimentSlices::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(TickerSentimentSlices::Ticker).string().not_null())
                    .col(ColumnDef::new(TickerSentimentSlices::IntervalStart).big_integer().not_null())
                    .col(ColumnDef::new(TickerSentimentSlices::Granularity).string().not_null())
                    .col(ColumnDef::new(TickerSentimentSlices::WeightedSentiment).double().not_null())
                    .col(ColumnDef::new(TickerSentimentSlices::Confidence).double().not_null())
                    .col(ColumnDef::new(TickerSentimentSlices::PositiveCount).big_integer().not_null())
                    .col(ColumnDef::new(TickerSentimentSlices::NegativeCount).big_integer().not_null())
                    .col(ColumnDef::new(TickerSentimentSlices::NeutralCount).big_integer().not_null())
                    .col(ColumnDef::new(TickerSentimentSlices::TotalMentions).big_integer().not_null())
                    .col(ColumnDef::new(TickerSentimentSlices::EngagementSum).double().not_null())
                    .col(ColumnDef::new(TickerSentimentSlices::UniquePosts).big_integer().not_null())
                    .col(ColumnDef::new(TickerSentimentSlices::UniqueSources).big_integer().not_null())
                    .col(ColumnDef::new(TickerSentimentSlices::Velocity).double().not_null())
                    .col(ColumnDef::new(TickerSentimentSlices::Acceleration).double().not_null())
                    .col(ColumnDef::new(TickerSentimentSlices::ComputedAt).big_integer().not_null())
                    .index(
                        Index::create()
                            .name("uq_slice_key")
                            .table(TickerSentimentSlices::Table)
                            .col(TickerSentimentSlices::Ticker)
                            .col(TickerSentimentSlices::IntervalStart)
                            .col(TickerSentimentSlices::Granularity)
                            .unique(),
                    )
                    .index(
                        Index::create()
                            .name("idx_slices_bucket")
                            .table(TickerSentimentSlices::Table)
                            .col(TickerSentimentSlices::IntervalStart)
                            .col(TickerSentimentSlices::Granularity),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(IndexSentimentSnapshots::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(IndexSentimentSnapshots::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(IndexSentimentSnapshots::BucketTime).big_integer().not_null())
                    .col(ColumnDef::new(IndexSentimentSnapshots::Granularity).string().not_null())
                    .col(ColumnDef::new(IndexSentimentSnapshots::WeightedSentiment).double().not_null())
                    .col(ColumnDef::new(IndexSentimentSnapshots::Breadth).double().not_null())
                    .col(ColumnDef::new(IndexSentimentSnapshots::Dispersion).double().not_null())
                    .col(ColumnDef::new(IndexSentimentSnapshots::Regime).string().not_null())
                    .col(ColumnDef::new(IndexSentimentSnapshots::TopContributors).json().not_null())
                    .col(ColumnDef::new(IndexSentimentSnapshots::TotalMentions).big_integer().not_null())
                    .col(ColumnDef::new(IndexSentimentSnapshots::TotalEngagement).double().not_null())
                    .col(ColumnDef::new(IndexSentimentSnapshots::ActiveTickers).big_integer().not_null())
                    .col(ColumnDef::new(IndexSentimentSnapshots::ComputedAt).big_integer().not_null())
                    .index(
                        Index::create()
                            .name("uq_snapshot_key")
                            .table(IndexSentimentSnapshots::Table)
                            .col(IndexSentimentSnapshots::BucketTime)
                            .col(IndexSentimentSnapshots::Granularity)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(KeywordGraphEdges::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(KeywordGraphEdges::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(KeywordGraphEdges::SourceKeyword).string().not_null())
                    .col(ColumnDef::new(KeywordGraphEdges::TargetKeyword).string().not_null())
                    .col(ColumnDef::new(KeywordGraphEdges::WindowStart).big_integer().not_null())
                    .col(ColumnDef::new(KeywordGraphEdges::WindowLength).big_integer().not_null())
                    .col(ColumnDef::new(KeywordGraphEdges::CoOccurrenceCount).big_integer().not_null())
                    .col(ColumnDef::new(KeywordGraphEdges::SourceCount).big_integer().not_null())
                    .col(ColumnDef::new(KeywordGraphEdges::TargetCount).big_integer().not_null())
                    .col(ColumnDef::new(KeywordGraphEdges::Strength).double().not_null())
                    .col(ColumnDef::new(KeywordGraphEdges::Pmi).double().not_null())
                    .col(ColumnDef::new(KeywordGraphEdges::FinanceRelevance).double().null())
                    .col(ColumnDef::new(KeywordGraphEdges::SharedTickers).json().null())
                    .col(ColumnDef::new(KeywordGraphEdges::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(KeywordGraphEdges::UpdatedAt).big_integer().not_null())
                    .index(
                        Index::create()
                            .name("uq_edge_key")
                            .table(KeywordGraphEdges::Table)
                            .col(KeywordGraphEdges::SourceKeyword)
                            .col(KeywordGraphEdges::TargetKeyword)
                            .col(KeywordGraphEdges::WindowStart)
                            .unique(),
                    )
                    .index(
                        Index::create()
                            .name("idx_edges_window")
                            .table(KeywordGraphEdges::Table)
                            .col(KeywordGraphEdges::WindowStart),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(KeywordGraphEdges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(IndexSentimentSnapshots::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TickerSentimentSlices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(KeywordOccurrences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FinanceEntities::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum FinanceEntities {
    Table,
    Id,
    EntityId,
    CanonicalSymbol,
    Name,
    Aliases,
    Sector,
    Industry,
    EntityType,
    Active,
    KbVersion,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum KeywordOccurrences {
    Table,
    Id,
    Keyword,
    KeywordNormalized,
    PostId,
    Source,
    OccurredAt,
    Positive,
    Negative,
    Neutral,
    Mixed,
    Confidence,
    EngagementWeight,
    Score,
    CommentCount,
    UpvoteRatio,
    MappedTickers,
    InTitle,
    InBody,
}

#[derive(Iden)]
enum TickerSentimentSlices {
    Table,
    Id,
    Ticker,
    IntervalStart,
    Granularity,
    WeightedSentiment,
    Confidence,
    PositiveCount,
    NegativeCount,
    NeutralCount,
    TotalMentions,
    EngagementSum,
    UniquePosts,
    UniqueSources,
    Velocity,
    Acceleration,
    ComputedAt,
}

#[derive(Iden)]
enum IndexSentimentSnapshots {
    Table,
    Id,
    BucketTime,
    Granularity,
    WeightedSentiment,
    Breadth,
    Dispersion,
    Regime,
    TopContributors,
    TotalMentions,
    TotalEngagement,
    ActiveTickers,
    ComputedAt,
}

#[derive(Iden)]
enum KeywordGraphEdges {
    Table,
    Id,
    SourceKeyword,
    TargetKeyword,
    WindowStart,
    WindowLength,
    CoOccurrenceCount,
    SourceCount,
    TargetCount,
    Strength,
    Pmi,
    FinanceRelevance,
    SharedTickers,
    CreatedAt,
    UpdatedAt,
}
