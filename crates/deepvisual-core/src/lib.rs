#![forbid(unsafe_code)]

//! Relation tables and their tiered reference graph (headless).
//!
//! A link-doublet table is a list of `from`/`to` rows identified by 1-based position. Each row
//! is classified as a self-loop (introduces an entity), a direct edge between two entities, or
//! an indirect edge between two earlier-tier relations. Layout, clustering and draw-plan
//! assembly live in the sibling crates.

pub mod color;
pub mod config;
pub mod diagnostics;
pub mod endpoint;
pub mod error;
pub mod table;
pub mod tier;

pub use config::{DEFAULT_PALETTE, DeepVisualConfig, LINK_DOUBLET_KEY, LinkDoubletOptions};
pub use diagnostics::{Diagnostic, UnresolvedReason};
pub use endpoint::{Endpoint, ReferenceSyntax};
pub use error::{Error, Result};
pub use table::{Row, Table};
pub use tier::{EntityEdge, Relation, Tier, TierResolution, resolve_tiers};
