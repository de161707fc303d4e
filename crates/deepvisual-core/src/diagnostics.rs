//! Non-fatal problems reported alongside a (partial) result.

use crate::endpoint::Endpoint;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UnresolvedReason {
    /// A literal label that no self-loop row introduces.
    UnknownEntity,
    /// A reference outside `1..=rows`.
    MissingRelation,
    /// A reference to the row itself.
    SelfReference,
    /// A reference to an indirect relation (only two tiers of indirection are supported).
    IndirectTarget,
    /// A reference to a row that could not be classified.
    UnresolvedTarget,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::UnknownEntity => "no self-loop row introduces this entity",
            Self::MissingRelation => "no row has this id",
            Self::SelfReference => "a row cannot reference itself",
            Self::IndirectTarget => "the referenced row is itself indirect",
            Self::UnresolvedTarget => "the referenced row is unresolved",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Diagnostic {
    /// A row that fits no tier; it is left out of the diagram.
    UnresolvedRow {
        relation_id: u32,
        endpoint: Endpoint,
        reason: UnresolvedReason,
    },
    /// An indirect relation whose endpoint has no resolved anchor; it is left out of the diagram.
    UnresolvedReference { relation_id: u32, endpoint: Endpoint },
    /// A self-loop or direct relation whose entity has no layout position.
    MissingPosition { relation_id: u32, entity: String },
    /// Community detection stopped at its pass cap; the partition is usable but not final.
    ClusteringNonconvergence { passes: usize, modularity: f64 },
}

impl Diagnostic {
    pub fn relation_id(&self) -> Option<u32> {
        match self {
            Self::UnresolvedRow { relation_id, .. }
            | Self::UnresolvedReference { relation_id, .. }
            | Self::MissingPosition { relation_id, .. } => Some(*relation_id),
            Self::ClusteringNonconvergence { .. } => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedRow {
                relation_id,
                endpoint,
                reason,
            } => write!(
                f,
                "relation {relation_id} skipped: endpoint `{endpoint}` does not resolve ({reason})"
            ),
            Self::UnresolvedReference {
                relation_id,
                endpoint,
            } => write!(
                f,
                "relation {relation_id} skipped: endpoint `{endpoint}` has no resolved anchor"
            ),
            Self::MissingPosition {
                relation_id,
                entity,
            } => write!(
                f,
                "relation {relation_id} skipped: entity `{entity}` has no layout position"
            ),
            Self::ClusteringNonconvergence { passes, modularity } => write!(
                f,
                "clustering stopped after {passes} passes without converging (modularity {modularity:.4})"
            ),
        }
    }
}
