//! The full link-doublet pipeline: classify, lay out, anchor, optionally cluster, then
//! assemble the draw plan.

pub use deepvisual_graph::{AdjacencyGraph, ClusterAssignment, LouvainOptions};
pub use deepvisual_layout::Error as LayoutError;
pub use deepvisual_layout::{Anchor, AnchorOptions, AnchorTable, CircularLayout, Point};
pub use deepvisual_render::{Bounds, DrawInstruction, DrawPlan, LabelAlignment};

use deepvisual_core::{
    DeepVisualConfig, Diagnostic, LinkDoubletOptions, Table, Tier, TierResolution, resolve_tiers,
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum HeadlessError {
    #[error(transparent)]
    Config(#[from] deepvisual_core::Error),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

pub type Result<T> = std::result::Result<T, HeadlessError>;

#[derive(Debug, Clone, Serialize)]
pub struct LinkDoubletDiagram {
    pub tiers: TierResolution,
    pub layout: CircularLayout,
    pub anchors: AnchorTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clusters: Option<ClusterAssignment>,
    pub plan: DrawPlan,
    /// Everything skipped or flagged along the way, in pipeline order.
    pub diagnostics: Vec<Diagnostic>,
}

pub fn anchor_options(options: &LinkDoubletOptions) -> AnchorOptions {
    AnchorOptions {
        direct_curvature: options.direct_curvature,
        indirect_curvature: options.indirect_curvature,
    }
}

/// Lays out the entities of `tiers` and anchors its relations.
pub fn layout_tiers(
    tiers: &TierResolution,
    options: &LinkDoubletOptions,
) -> Result<(CircularLayout, AnchorTable)> {
    Ok(deepvisual_layout::layout(
        tiers,
        options.radius,
        &anchor_options(options),
    )?)
}

/// Builds the "shares an endpoint" graph over every anchored relation. Self-loop endpoints are
/// keyed by entity, so every relation touching an entity is adjacent to all of its self-loops.
pub fn relation_adjacency(tiers: &TierResolution, anchors: &AnchorTable) -> AdjacencyGraph {
    deepvisual_graph::build_link_adjacency(
        tiers
            .relations
            .iter()
            .filter(|r| anchors.get(r.id).is_some())
            .map(|r| {
                (
                    r.id,
                    tiers.endpoint_key(r.source_ref),
                    tiers.endpoint_key(r.target_ref),
                )
            }),
    )
}

/// Runs Louvain over the relation adjacency graph. A partition cut short by the pass cap is
/// still returned, along with a [`Diagnostic::ClusteringNonconvergence`].
pub fn cluster_relations(
    tiers: &TierResolution,
    anchors: &AnchorTable,
    options: &LinkDoubletOptions,
) -> (ClusterAssignment, Option<Diagnostic>) {
    let graph = relation_adjacency(tiers, anchors);
    let clusters = deepvisual_graph::louvain(
        &graph,
        &LouvainOptions {
            max_passes: options.max_passes,
            resolution: options.resolution,
        },
    );
    let notice = (!clusters.converged).then(|| {
        tracing::warn!(
            passes = clusters.passes,
            modularity = clusters.modularity,
            "clustering stopped at the pass cap"
        );
        Diagnostic::ClusteringNonconvergence {
            passes: clusters.passes,
            modularity: clusters.modularity,
        }
    });
    (clusters, notice)
}

/// Runs the whole pipeline over `table`.
///
/// Fails only on invalid options or a table without entities; unresolved rows and references
/// are skipped and reported in [`LinkDoubletDiagram::diagnostics`].
pub fn link_doublet(table: &Table, options: &LinkDoubletOptions) -> Result<LinkDoubletDiagram> {
    options.validate()?;

    let tiers = resolve_tiers(table, options.reference_syntax);
    let (layout, anchors) = layout_tiers(&tiers, options)?;

    let mut diagnostics = tiers.diagnostics.clone();
    diagnostics.extend(anchors.diagnostics.iter().cloned());

    let clusters = if options.cluster {
        let (clusters, notice) = cluster_relations(&tiers, &anchors, options);
        diagnostics.extend(notice);
        Some(clusters)
    } else {
        None
    };

    let plan = deepvisual_render::assemble_plan(&layout, &anchors, clusters.as_ref(), options);

    tracing::debug!(
        rows = table.len(),
        entities = tiers.entities.len(),
        self_loops = tiers.by_tier(Tier::SelfLoop).count(),
        direct = tiers.by_tier(Tier::Direct).count(),
        indirect = tiers.by_tier(Tier::Indirect).count(),
        clusters = clusters.as_ref().map(|c| c.cluster_count),
        diagnostics = diagnostics.len(),
        "link-doublet diagram built"
    );

    Ok(LinkDoubletDiagram {
        tiers,
        layout,
        anchors,
        clusters,
        plan,
        diagnostics,
    })
}

/// [`link_doublet`] with options read from the `linkDoublet` section of `config`.
pub fn link_doublet_with_config(
    table: &Table,
    config: &DeepVisualConfig,
) -> Result<LinkDoubletDiagram> {
    let options = config.link_doublet_options()?;
    link_doublet(table, &options)
}
