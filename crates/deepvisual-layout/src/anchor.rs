//! Anchor resolution: turns classified relations into geometric attachment points.
//!
//! Self-loop and direct relations are anchored first, so every indirect relation sees the full
//! set of lower-tier anchors it may reference. Indirect relations never anchor other indirect
//! relations.

use crate::circle::CircularLayout;
use crate::geom::{Point, midpoint};
use deepvisual_core::{Diagnostic, Endpoint, Relation, Tier, TierResolution};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Anchor {
    /// A self-loop sits on its entity's node.
    Point { at: Point },
    /// A direct relation spans its two entities.
    Segment { start: Point, end: Point },
}

impl Anchor {
    /// Where an indirect relation attaches: the point itself, or the segment midpoint.
    pub fn attach_point(&self) -> Point {
        match *self {
            Self::Point { at } => at,
            Self::Segment { start, end } => midpoint(start, end),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAnchor {
    pub relation_id: u32,
    pub tier: Tier,
    pub anchor: Anchor,
    /// Signed arc curvature; zero draws a straight segment.
    pub curvature: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorOptions {
    pub direct_curvature: f64,
    pub indirect_curvature: f64,
}

impl Default for AnchorOptions {
    fn default() -> Self {
        Self {
            direct_curvature: 0.0,
            indirect_curvature: 0.3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnchorTable {
    // Slot `id - 1` holds relation `id`.
    #[serde(rename = "anchors", serialize_with = "present_only")]
    slots: Vec<Option<ResolvedAnchor>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl AnchorTable {
    pub fn get(&self, relation_id: u32) -> Option<&ResolvedAnchor> {
        let idx = usize::try_from(relation_id).ok()?.checked_sub(1)?;
        self.slots.get(idx)?.as_ref()
    }

    /// Resolved anchors in ascending relation id.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedAnchor> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    fn insert(&mut self, anchor: ResolvedAnchor) {
        let idx = anchor.relation_id as usize - 1;
        if self.slots.len() <= idx {
            self.slots.resize(idx + 1, None);
        }
        self.slots[idx] = Some(anchor);
    }
}

/// Anchors every classified relation against `layout`.
///
/// Relations whose geometry cannot be resolved are left out of the table and reported in
/// [`AnchorTable::diagnostics`]; the rest of the diagram is still produced.
pub fn resolve_anchors(
    tiers: &TierResolution,
    layout: &CircularLayout,
    options: &AnchorOptions,
) -> AnchorTable {
    let mut table = AnchorTable::default();

    for rel in tiers.relations.iter().filter(|r| r.tier != Tier::Indirect) {
        match lower_tier_anchor(tiers, layout, rel) {
            Ok(anchor) => table.insert(ResolvedAnchor {
                relation_id: rel.id,
                tier: rel.tier,
                anchor,
                curvature: if rel.tier == Tier::Direct {
                    options.direct_curvature
                } else {
                    0.0
                },
            }),
            Err(entity) => {
                tracing::warn!(relation = rel.id, entity = %entity, "entity has no layout position");
                table.diagnostics.push(Diagnostic::MissingPosition {
                    relation_id: rel.id,
                    entity,
                });
            }
        }
    }

    let mut indirect = Vec::new();
    for rel in tiers.by_tier(Tier::Indirect) {
        let source = attach_point(&table, rel.source_ref);
        let target = attach_point(&table, rel.target_ref);
        match (source, target) {
            (Some(start), Some(end)) => {
                let curvature = if start.y > end.y {
                    options.indirect_curvature
                } else {
                    -options.indirect_curvature
                };
                indirect.push(ResolvedAnchor {
                    relation_id: rel.id,
                    tier: Tier::Indirect,
                    anchor: Anchor::Segment { start, end },
                    curvature,
                });
            }
            (start, _) => {
                let endpoint = if start.is_none() {
                    rel.source.clone()
                } else {
                    rel.target.clone()
                };
                tracing::warn!(relation = rel.id, endpoint = %endpoint, "indirect relation has no anchor");
                table
                    .diagnostics
                    .push(Diagnostic::UnresolvedReference {
                        relation_id: rel.id,
                        endpoint,
                    });
            }
        }
    }
    for anchor in indirect {
        table.insert(anchor);
    }

    tracing::debug!(
        anchors = table.len(),
        diagnostics = table.diagnostics.len(),
        "anchors resolved"
    );
    table
}

fn present_only<S: serde::Serializer>(
    slots: &[Option<ResolvedAnchor>],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(slots.iter().flatten())
}

fn lower_tier_anchor(
    tiers: &TierResolution,
    layout: &CircularLayout,
    rel: &Relation,
) -> Result<Anchor, String> {
    let position_of = |id: u32, fallback: &Endpoint| -> Result<Point, String> {
        let entity = tiers
            .entity_of(id)
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string());
        layout.position(&entity).ok_or(entity)
    };
    match rel.tier {
        Tier::SelfLoop => Ok(Anchor::Point {
            at: position_of(rel.id, &rel.source)?,
        }),
        _ => Ok(Anchor::Segment {
            start: position_of(rel.source_ref, &rel.source)?,
            end: position_of(rel.target_ref, &rel.target)?,
        }),
    }
}

fn attach_point(table: &AnchorTable, relation_id: u32) -> Option<Point> {
    table
        .get(relation_id)
        .filter(|a| a.tier != Tier::Indirect)
        .map(|a| a.anchor.attach_point())
}
