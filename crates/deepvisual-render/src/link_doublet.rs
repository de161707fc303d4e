//! Draw-plan assembly for link-doublet diagrams.
//!
//! The plan lists node markers in entity order, then every anchored relation in row order:
//!
//! - self-loop: a loop whose center sits radially outside the node, touching it at the arrow
//!   tip, with the id label hanging below;
//! - direct: a connector plus a perpendicular tick near the source, labeled at its midpoint;
//! - indirect: an arc between the two referenced anchors, labeled at the arc midpoint.

use crate::model::{Bounds, DrawInstruction, DrawPlan, LabelAlignment};
use crate::palette::ColorScale;
use deepvisual_core::{LinkDoubletOptions, Tier};
use deepvisual_graph::ClusterAssignment;
use deepvisual_layout::geom::{midpoint, perpendicular, unit, vector};
use deepvisual_layout::{Anchor, AnchorTable, CircularLayout, Point, ResolvedAnchor};

/// Builds the plan. Pure: the inputs are only read.
pub fn assemble_plan(
    layout: &CircularLayout,
    anchors: &AnchorTable,
    clusters: Option<&ClusterAssignment>,
    options: &LinkDoubletOptions,
) -> DrawPlan {
    let mut builder = PlanBuilder {
        options,
        colors: ColorScale::new(&options.palette, &options.edge_color).with_clusters(clusters),
        instructions: Vec::with_capacity(layout.len() + anchors.len() * 3),
        extent: Vec::new(),
    };

    for (entity, &position) in layout.positions() {
        builder.extent.push(position);
        builder.instructions.push(DrawInstruction::NodeMarker {
            entity: entity.clone(),
            position,
            color: options.node_color.clone(),
        });
    }

    for resolved in anchors.iter() {
        match resolved.anchor {
            Anchor::Point { at } => builder.self_loop(resolved.relation_id, at),
            Anchor::Segment { start, end } => builder.connector(resolved, start, end),
        }
    }

    let plan = DrawPlan {
        bounds: Bounds::from_points(builder.extent.iter().copied()),
        instructions: builder.instructions,
    };
    tracing::debug!(
        instructions = plan.len(),
        edges = plan.edge_order().len(),
        "draw plan assembled"
    );
    plan
}

/// Midpoint of the quadratic arc from `start` to `end` with `arc3` curvature `rad`.
pub fn arc_midpoint(start: Point, end: Point, rad: f64) -> Point {
    midpoint(start, end) + perpendicular(end - start) * (rad / 2.0)
}

/// Perpendicular tick crossing the segment `start → end` at `fraction` of its length.
/// `None` when the segment has no length.
pub fn tick_mark(start: Point, end: Point, fraction: f64, length: f64) -> Option<(Point, Point)> {
    let dir = end - start;
    let normal = perpendicular(unit(dir)?) * (length / 2.0);
    let base = start + dir * fraction;
    Some((base - normal, base + normal))
}

struct PlanBuilder<'a> {
    options: &'a LinkDoubletOptions,
    colors: ColorScale<'a>,
    instructions: Vec<DrawInstruction>,
    extent: Vec<Point>,
}

impl PlanBuilder<'_> {
    fn self_loop(&mut self, relation_id: u32, at: Point) {
        let radius = self.options.self_loop_radius;
        // Outward from the circle center; a node at the origin loops to the right.
        let outward = unit(at.to_vector()).unwrap_or(vector(1.0, 0.0));
        let center = at + outward * radius;

        self.extent.extend([
            center + vector(radius, 0.0),
            center - vector(radius, 0.0),
            center + vector(0.0, radius),
            center - vector(0.0, radius),
        ]);
        self.instructions.push(DrawInstruction::SelfLoopEdge {
            relation_id,
            center,
            radius,
            arrow_tip: at,
            color: self.colors.color_for(relation_id).to_string(),
        });

        let below = center - vector(0.0, radius + self.options.label_offset);
        self.label(relation_id, below, LabelAlignment::Top);
    }

    fn connector(&mut self, resolved: &ResolvedAnchor, start: Point, end: Point) {
        let relation_id = resolved.relation_id;
        let color = self.colors.color_for(relation_id).to_string();
        let tick = match resolved.tier {
            Tier::Direct => tick_mark(
                start,
                end,
                self.options.tick_fraction,
                self.options.tick_length,
            ),
            _ => None,
        };
        let apex = arc_midpoint(start, end, resolved.curvature);

        self.extent.extend([start, end, apex]);
        self.instructions.push(DrawInstruction::StraightOrCurvedEdge {
            relation_id,
            start,
            end,
            curvature: resolved.curvature,
            color: color.clone(),
            tick_mark: tick.is_some(),
        });
        if let Some((tick_start, tick_end)) = tick {
            self.extent.extend([tick_start, tick_end]);
            self.instructions.push(DrawInstruction::TickMark {
                relation_id,
                start: tick_start,
                end: tick_end,
                color,
            });
        }

        self.label(relation_id, apex, LabelAlignment::Center);
    }

    fn label(&mut self, relation_id: u32, position: Point, alignment: LabelAlignment) {
        if !self.options.show_labels {
            return;
        }
        self.extent.push(position);
        self.instructions.push(DrawInstruction::Label {
            text: relation_id.to_string(),
            position,
            color: self.options.label_color.clone(),
            alignment,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{arc_midpoint, tick_mark};
    use deepvisual_layout::geom::point;

    #[test]
    fn straight_arc_midpoint_is_the_chord_midpoint() {
        let m = arc_midpoint(point(0.0, 0.0), point(4.0, 2.0), 0.0);
        assert_eq!((m.x, m.y), (2.0, 1.0));
    }

    #[test]
    fn positive_curvature_bends_clockwise_of_the_chord() {
        // Chord along +x: (dy, -dx) points down.
        let m = arc_midpoint(point(0.0, 0.0), point(2.0, 0.0), 0.5);
        assert!((m.x - 1.0).abs() < 1e-12);
        assert!((m.y + 0.5).abs() < 1e-12);
    }

    #[test]
    fn tick_is_perpendicular_and_centered_on_the_segment() {
        let (a, b) = tick_mark(point(0.0, 0.0), point(10.0, 0.0), 0.15, 0.2).unwrap();
        assert!((a.x - 1.5).abs() < 1e-12 && (b.x - 1.5).abs() < 1e-12);
        assert!(((a.y - b.y).abs() - 0.2).abs() < 1e-12);
        assert!((a.y + b.y).abs() < 1e-12);
    }

    #[test]
    fn zero_length_segment_has_no_tick() {
        assert!(tick_mark(point(1.0, 1.0), point(1.0, 1.0), 0.15, 0.2).is_none());
    }
}
