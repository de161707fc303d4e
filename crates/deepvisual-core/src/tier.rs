//! Tier classification of relation rows.
//!
//! Rows are classified in three sweeps so that each tier sees the complete set of the tiers
//! below it:
//!
//! 1. **SelfLoop**: `from == to`, both literal labels. The label becomes an entity.
//! 2. **Direct**: both endpoints resolve to (distinct) self-loop rows; the row is an
//!    entity-to-entity edge.
//! 3. **Indirect**: both endpoints resolve to self-loop or direct rows; the row links two
//!    relations.
//!
//! Anything else is unresolved and reported as a [`Diagnostic`].

use crate::diagnostics::{Diagnostic, UnresolvedReason};
use crate::endpoint::{Endpoint, ReferenceSyntax};
use crate::table::Table;
use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    SelfLoop,
    Direct,
    Indirect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub id: u32,
    pub source: Endpoint,
    pub target: Endpoint,
    pub tier: Tier,
    /// The relation id each endpoint resolves to. A self-loop resolves to itself; a direct
    /// relation to the self-loop rows owning its entities; an indirect relation to the
    /// self-loop/direct rows it links.
    pub source_ref: u32,
    pub target_ref: u32,
}

/// A directed entity-to-entity edge recorded for each direct relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityEdge {
    pub relation_id: u32,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierResolution {
    /// Entities in first-seen order.
    pub entities: IndexSet<String>,
    /// Classified relations in ascending id order. Unresolved rows are absent.
    pub relations: Vec<Relation>,
    pub entity_edges: Vec<EntityEdge>,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip)]
    self_loop_entity: FxHashMap<u32, String>,
    // First self-loop row that introduced each entity.
    #[serde(skip)]
    entity_owner: FxHashMap<String, u32>,
    #[serde(skip)]
    index: FxHashMap<u32, usize>,
}

impl TierResolution {
    pub fn relation(&self, id: u32) -> Option<&Relation> {
        self.index.get(&id).map(|&idx| &self.relations[idx])
    }

    pub fn tier_of(&self, id: u32) -> Option<Tier> {
        self.relation(id).map(|r| r.tier)
    }

    /// The entity label of a self-loop relation.
    pub fn entity_of(&self, id: u32) -> Option<&str> {
        self.self_loop_entity.get(&id).map(String::as_str)
    }

    /// The key `id` is matched on when relations are compared by shared endpoints. Every
    /// self-loop of an entity keys to the first one, so repeated self-loops of one entity
    /// collapse to a single key.
    pub fn endpoint_key(&self, id: u32) -> u32 {
        self.entity_of(id)
            .and_then(|entity| self.entity_owner.get(entity))
            .copied()
            .unwrap_or(id)
    }

    pub fn by_tier(&self, tier: Tier) -> impl Iterator<Item = &Relation> {
        self.relations.iter().filter(move |r| r.tier == tier)
    }

    pub fn unresolved_ids(&self) -> Vec<u32> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::UnresolvedRow { .. }))
            .filter_map(Diagnostic::relation_id)
            .collect()
    }
}

struct ParsedRow {
    id: u32,
    source: Endpoint,
    target: Endpoint,
    self_loop: Option<String>,
}

/// Classifies every row of `table`. Pure and deterministic: the same table and syntax always
/// produce the same tiers.
pub fn resolve_tiers(table: &Table, syntax: ReferenceSyntax) -> TierResolution {
    let rows: Vec<ParsedRow> = table
        .iter_with_ids()
        .map(|(id, row)| match syntax.self_loop_label(&row.from, &row.to) {
            // Self-loop rows keep literal endpoints even under positional syntax.
            Some(label) => ParsedRow {
                id,
                source: Endpoint::entity(label),
                target: Endpoint::entity(label),
                self_loop: Some(label.to_string()),
            },
            None => ParsedRow {
                id,
                source: syntax.parse_endpoint(&row.from),
                target: syntax.parse_endpoint(&row.to),
                self_loop: None,
            },
        })
        .collect();

    let mut tiers: Vec<Option<Tier>> = vec![None; rows.len()];
    let mut refs: Vec<(u32, u32)> = vec![(0, 0); rows.len()];
    let mut out = TierResolution::default();
    let mut entity_owner: FxHashMap<String, u32> = FxHashMap::default();

    for (idx, row) in rows.iter().enumerate() {
        let Some(label) = row.self_loop.as_ref() else {
            continue;
        };
        tiers[idx] = Some(Tier::SelfLoop);
        refs[idx] = (row.id, row.id);
        out.entities.insert(label.clone());
        out.self_loop_entity.insert(row.id, label.clone());
        entity_owner.entry(label.clone()).or_insert(row.id);
    }

    let resolve = |ep: &Endpoint,
                   own_id: u32,
                   tiers: &[Option<Tier>],
                   accept: &dyn Fn(Tier) -> bool|
     -> Result<u32, UnresolvedReason> {
        match ep {
            Endpoint::Entity(label) => entity_owner
                .get(label)
                .copied()
                .ok_or(UnresolvedReason::UnknownEntity),
            Endpoint::RelationRef(id) => {
                let id = *id;
                if id == own_id {
                    return Err(UnresolvedReason::SelfReference);
                }
                if id == 0 || id as usize > tiers.len() {
                    return Err(UnresolvedReason::MissingRelation);
                }
                match tiers[id as usize - 1] {
                    Some(t) if accept(t) => Ok(id),
                    Some(Tier::Indirect) => Err(UnresolvedReason::IndirectTarget),
                    _ => Err(UnresolvedReason::UnresolvedTarget),
                }
            }
        }
    };

    let only_self_loops = |t: Tier| t == Tier::SelfLoop;
    for (idx, row) in rows.iter().enumerate() {
        if tiers[idx].is_some() {
            continue;
        }
        let (Ok(s), Ok(t)) = (
            resolve(&row.source, row.id, &tiers, &only_self_loops),
            resolve(&row.target, row.id, &tiers, &only_self_loops),
        ) else {
            continue;
        };
        // Both endpoints naming the same entity is not an entity-to-entity edge, even through
        // two different self-loop rows; such rows fall through to the indirect sweep.
        if out.self_loop_entity.get(&s) == out.self_loop_entity.get(&t) {
            continue;
        }
        tiers[idx] = Some(Tier::Direct);
        refs[idx] = (s, t);
    }

    // Indirect rows may only reference self-loop/direct rows, so every row is checked against
    // the tiers as they stood after the direct sweep.
    let below_indirect = |t: Tier| matches!(t, Tier::SelfLoop | Tier::Direct);
    let indirect: Vec<Option<(u32, u32)>> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            if tiers[idx].is_some() {
                return None;
            }
            let s = resolve(&row.source, row.id, &tiers, &below_indirect).ok()?;
            let t = resolve(&row.target, row.id, &tiers, &below_indirect).ok()?;
            Some((s, t))
        })
        .collect();
    for (idx, pair) in indirect.into_iter().enumerate() {
        if let Some(pair) = pair {
            tiers[idx] = Some(Tier::Indirect);
            refs[idx] = pair;
        }
    }

    for (idx, row) in rows.iter().enumerate() {
        if tiers[idx].is_some() {
            continue;
        }
        let diagnostic = match resolve(&row.source, row.id, &tiers, &below_indirect) {
            Err(reason) => unresolved(row.id, &row.source, reason),
            Ok(_) => {
                let reason = resolve(&row.target, row.id, &tiers, &below_indirect)
                    .err()
                    .unwrap_or(UnresolvedReason::UnresolvedTarget);
                unresolved(row.id, &row.target, reason)
            }
        };
        out.diagnostics.push(diagnostic);
    }

    for (idx, row) in rows.iter().enumerate() {
        let Some(tier) = tiers[idx] else {
            continue;
        };
        let (source_ref, target_ref) = refs[idx];
        if tier == Tier::Direct {
            if let (Some(from), Some(to)) = (
                out.self_loop_entity.get(&source_ref),
                out.self_loop_entity.get(&target_ref),
            ) {
                out.entity_edges.push(EntityEdge {
                    relation_id: row.id,
                    from: from.clone(),
                    to: to.clone(),
                });
            }
        }
        out.index.insert(row.id, out.relations.len());
        out.relations.push(Relation {
            id: row.id,
            source: row.source.clone(),
            target: row.target.clone(),
            tier,
            source_ref,
            target_ref,
        });
    }

    out.entity_owner = entity_owner;

    tracing::debug!(
        rows = rows.len(),
        entities = out.entities.len(),
        self_loops = out.by_tier(Tier::SelfLoop).count(),
        direct = out.by_tier(Tier::Direct).count(),
        indirect = out.by_tier(Tier::Indirect).count(),
        unresolved = out.diagnostics.len(),
        "classified relation tiers"
    );

    out
}

fn unresolved(relation_id: u32, endpoint: &Endpoint, reason: UnresolvedReason) -> Diagnostic {
    let diagnostic = Diagnostic::UnresolvedRow {
        relation_id,
        endpoint: endpoint.clone(),
        reason,
    };
    tracing::warn!("{diagnostic}");
    diagnostic
}
