use crate::color::validate_color;
use crate::endpoint::ReferenceSyntax;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Cluster colors, indexed by `cluster_label % len`. Once there are more clusters than colors,
/// distinct clusters share a color.
pub const DEFAULT_PALETTE: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct LinkDoubletOptions {
    pub palette: Vec<String>,
    /// Radius of the entity circle.
    pub radius: f64,
    pub self_loop_radius: f64,
    pub show_labels: bool,
    /// Arc curvature magnitude for indirect links; the sign is picked per relation.
    pub indirect_curvature: f64,
    /// Arc curvature for direct links (`0.0` draws straight connectors).
    pub direct_curvature: f64,
    /// Run community detection and color relations by cluster.
    pub cluster: bool,
    /// Edge color used when clustering is off.
    pub edge_color: String,
    pub node_color: String,
    pub label_color: String,
    /// Distance between a self-loop and its id label.
    pub label_offset: f64,
    /// Position of the start tick along a direct edge, as a fraction of its length.
    pub tick_fraction: f64,
    pub tick_length: f64,
    pub reference_syntax: ReferenceSyntax,
    /// Cap on local-moving passes per Louvain level.
    pub max_passes: usize,
    /// Modularity resolution; values above 1 favor smaller clusters.
    pub resolution: f64,
}

impl Default for LinkDoubletOptions {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.iter().map(|c| (*c).to_string()).collect(),
            radius: 5.0,
            self_loop_radius: 0.4,
            show_labels: true,
            indirect_curvature: 0.3,
            direct_curvature: 0.0,
            cluster: false,
            edge_color: "gray".to_string(),
            node_color: "lightblue".to_string(),
            label_color: "black".to_string(),
            label_offset: 0.15,
            tick_fraction: 0.15,
            tick_length: 0.2,
            reference_syntax: ReferenceSyntax::Explicit,
            max_passes: 100,
            resolution: 1.0,
        }
    }
}

impl LinkDoubletOptions {
    pub fn validate(&self) -> Result<()> {
        if self.palette.is_empty() {
            return Err(invalid("palette", "must contain at least one color"));
        }
        for (idx, color) in self.palette.iter().enumerate() {
            validate_color(&format!("palette[{idx}]"), color)?;
        }
        validate_color("edgeColor", &self.edge_color)?;
        validate_color("nodeColor", &self.node_color)?;
        validate_color("labelColor", &self.label_color)?;

        positive("radius", self.radius)?;
        positive("selfLoopRadius", self.self_loop_radius)?;
        positive("resolution", self.resolution)?;
        finite("indirectCurvature", self.indirect_curvature)?;
        finite("directCurvature", self.direct_curvature)?;
        finite("tickLength", self.tick_length)?;
        finite("labelOffset", self.label_offset)?;
        if !(0.0..=1.0).contains(&self.tick_fraction) {
            return Err(invalid("tickFraction", "must be within [0, 1]"));
        }
        if self.max_passes == 0 {
            return Err(invalid("maxPasses", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(option: &str, message: &str) -> Error {
    Error::InvalidOption {
        option: option.to_string(),
        message: message.to_string(),
    }
}

fn finite(option: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(option, "must be a finite number"))
    }
}

fn positive(option: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(option, "must be a positive number"))
    }
}
