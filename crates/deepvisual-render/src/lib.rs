#![forbid(unsafe_code)]

//! Backend-agnostic draw plans for link-doublet diagrams.

pub mod link_doublet;
pub mod model;
pub mod palette;

pub use link_doublet::assemble_plan;
pub use model::{Bounds, DrawInstruction, DrawPlan, LabelAlignment};
pub use palette::ColorScale;
