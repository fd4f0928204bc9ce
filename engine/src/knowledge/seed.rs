//! Reference-data seeding and entity stats.

use crate::clock::Clock;
use crate::knowledge::FinanceKnowledgeBase;
use crate::store::SentimentStore;
use crate::Result;
use shared::models::{EntityStats, FinanceEntity, SectorCount, SeedResult, TypeCount};
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

/// Seed the entity table from the knowledge base.
///
/// Insert-if-absent by canonical symbol; with `overwrite` set, existing rows
/// are refreshed from the reference table (entity id and created_at are
/// preserved). Per-entity failures are collected into `errors` and
/// processing continues; partial success is a valid outcome. Entities are
/// never deleted here, only written active.
pub async fn initialize_finance_entities<S: SentimentStore>(
    store: &S,
    clock: &impl Clock,
    kb: &FinanceKnowledgeBase,
    kb_version: i32,
    overwrite: bool,
) -> Result<SeedResult> {
    let mut result = SeedResult::default();
    let now = clock.now_ms();

    for sec in kb.securities() {
        let outcome = async {
            match store.find_entity_by_symbol(&sec.symbol).await? {
                None => {
                    store
                        .insert_entity(FinanceEntity {
                            entity_id: Uuid::new_v4().to_string(),
                            canonical_symbol: sec.symbol.clone(),
                            name: sec.name.clone(),
                            aliases: sec.aliases.clone(),
                            sector: sec.sector.clone(),
                            industry: sec.industry.clone(),
                            entity_type: sec.entity_type.clone(),
                            active: true,
                            kb_version,
                            created_at: now,
                            updated_at: now,
                        })
                        .await?;
                    Ok::<_, anyhow::Error>(Some(true))
                }
                Some(existing) if overwrite => {
                    store
                        .update_entity(FinanceEntity {
                            name: sec.name.clone(),
                            aliases: sec.aliases.clone(),
                            sector: sec.sector.clone(),
                            industry: sec.industry.clone(),
                            entity_type: sec.entity_type.clone(),
                            active: true,
                            kb_version,
                            updated_at: now,
                            ..existing
                        })
                        .await?;
                    Ok(Some(false))
                }
                Some(_) => Ok(None),
            }
        }
        .await;

        match outcome {
            Ok(Some(true)) => result.entities_created += 1,
            Ok(Some(false)) => result.entities_updated += 1,
            Ok(None) => {}
            Err(e) => {
                warn!("Failed to seed entity {}: {}", sec.symbol, e);
                result.errors.push(format!("{}: {}", sec.symbol, e));
            }
        }
    }

    info!(
        "Seeded finance entities: {} created, {} updated, {} errors",
        result.entities_created,
        result.entities_updated,
        result.errors.len()
    );
    Ok(result)
}

/// Totals plus active-entity breakdowns by sector and security type.
pub async fn finance_entity_stats<S: SentimentStore>(store: &S) -> Result<EntityStats> {
    let entities = store.list_entities().await?;
    let total_entities = entities.len() as u64;
    let active: Vec<_> = entities.into_iter().filter(|e| e.active).collect();

    let mut by_sector: HashMap<String, u64> = HashMap::new();
    let mut by_type: HashMap<String, u64> = HashMap::new();
    for e in &active {
        *by_sector.entry(e.sector.clone()).or_default() += 1;
        *by_type.entry(e.entity_type.clone()).or_default() += 1;
    }

    let mut by_sector: Vec<SectorCount> = by_sector
        .into_iter()
        .map(|(sector, count)| SectorCount { sector, count })
        .collect();
    by_sector.sort_by(|a, b| b.count.cmp(&a.count).then(a.sector.cmp(&b.sector)));

    let mut by_type: Vec<TypeCount> = by_type
        .into_iter()
        .map(|(entity_type, count)| TypeCount { entity_type, count })
        .collect();
    by_type.sort_by(|a, b| b.count.cmp(&a.count).then(a.entity_type.cmp(&b.entity_type)));

    Ok(EntityStats {
        total_entities,
        active_entities: active.len() as u64,
        by_sector,
        by_type,
    })
}
