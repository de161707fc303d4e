#![forbid(unsafe_code)]

//! `deepvisual` turns tables of binary relations into link-doublet diagrams: entities on a
//! circle, relations drawn as self-loops, direct edges and arcs between other relations.
//!
//! # Features
//!
//! - `render` (default): layout, clustering and draw-plan assembly (`deepvisual::render`)

pub use deepvisual_core::*;

#[cfg(feature = "render")]
pub mod render;
