#![forbid(unsafe_code)]

//! Headless circular layout for link-doublet diagrams.
//!
//! Entities are placed evenly on a circle; every classified relation is then anchored to
//! points on that layout so a renderer can draw it without further lookups.

pub mod anchor;
pub mod circle;
pub mod error;
pub mod geom;

pub use anchor::{Anchor, AnchorOptions, AnchorTable, ResolvedAnchor, resolve_anchors};
pub use circle::{CircularLayout, circular_layout};
pub use error::{Error, Result};
pub use geom::{Point, Vector};

/// Lays out the entities of `tiers` and anchors all of its relations.
pub fn layout(
    tiers: &deepvisual_core::TierResolution,
    radius: f64,
    options: &AnchorOptions,
) -> Result<(CircularLayout, AnchorTable)> {
    let positions = circular_layout(&tiers.entities, radius)?;
    let anchors = resolve_anchors(tiers, &positions, options);
    Ok((positions, anchors))
}
