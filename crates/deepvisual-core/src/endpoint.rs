//! Relation endpoints.
//!
//! A raw table cell either names an entity or points back at another row. The two are kept apart
//! as an explicit tagged value so that a numeric entity label is never mistaken for a row id.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

fn explicit_ref_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#([0-9]+)$").expect("valid regex"))
}

fn positional_ref_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]+)$").expect("valid regex"))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Endpoint {
    /// A literal entity label.
    Entity(String),
    /// A back-reference to another relation, by its 1-based row id.
    RelationRef(u32),
}

impl Endpoint {
    pub fn entity(label: impl Into<String>) -> Self {
        Self::Entity(label.into())
    }

    pub fn relation(id: u32) -> Self {
        Self::RelationRef(id)
    }

    pub fn is_entity(&self) -> bool {
        matches!(self, Self::Entity(_))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity(label) => write!(f, "{label}"),
            Self::RelationRef(id) => write!(f, "#{id}"),
        }
    }
}

/// How raw cells are split into entity labels and row references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferenceSyntax {
    /// `#<id>` is a row reference; every other cell is a literal label, numeric or not.
    #[default]
    Explicit,
    /// Legacy tables: a bare positive integer is a row reference whenever the row is not a
    /// self-loop.
    Positional,
}

impl ReferenceSyntax {
    pub fn parse_endpoint(self, raw: &str) -> Endpoint {
        let re = match self {
            Self::Explicit => explicit_ref_regex(),
            Self::Positional => positional_ref_regex(),
        };
        let id = re
            .captures(raw.trim())
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok());
        match id {
            Some(id) => Endpoint::RelationRef(id),
            // Ids that overflow `u32` cannot name a row, so they stay literal labels.
            None => Endpoint::Entity(raw.to_string()),
        }
    }

    /// Returns the entity label when `source`/`target` form a self-loop row.
    pub fn self_loop_label<'a>(self, source: &'a str, target: &str) -> Option<&'a str> {
        if source != target {
            return None;
        }
        match self {
            Self::Positional => Some(source),
            Self::Explicit => self.parse_endpoint(source).is_entity().then_some(source),
        }
    }
}
