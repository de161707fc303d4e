use deepvisual_layout::Point;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelAlignment {
    /// Text centered on its position.
    Center,
    /// Text hangs below its position.
    Top,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DrawInstruction {
    #[serde(rename_all = "camelCase")]
    NodeMarker {
        entity: String,
        position: Point,
        color: String,
    },
    /// A closed loop touching its node from outside, with an arrowhead at `arrow_tip`.
    #[serde(rename_all = "camelCase")]
    SelfLoopEdge {
        relation_id: u32,
        center: Point,
        radius: f64,
        arrow_tip: Point,
        color: String,
    },
    /// A connector from `start` to `end`; zero curvature is a straight segment, otherwise an
    /// `arc3`-style quadratic arc. `tick_mark` is set when a [`DrawInstruction::TickMark`] for
    /// the same relation follows.
    #[serde(rename_all = "camelCase")]
    StraightOrCurvedEdge {
        relation_id: u32,
        start: Point,
        end: Point,
        curvature: f64,
        color: String,
        tick_mark: bool,
    },
    #[serde(rename_all = "camelCase")]
    TickMark {
        relation_id: u32,
        start: Point,
        end: Point,
        color: String,
    },
    #[serde(rename_all = "camelCase")]
    Label {
        text: String,
        position: Point,
        color: String,
        alignment: LabelAlignment,
    },
}

impl DrawInstruction {
    pub fn relation_id(&self) -> Option<u32> {
        match self {
            Self::SelfLoopEdge { relation_id, .. }
            | Self::StraightOrCurvedEdge { relation_id, .. }
            | Self::TickMark { relation_id, .. } => Some(*relation_id),
            Self::NodeMarker { .. } | Self::Label { .. } => None,
        }
    }

    pub fn is_edge(&self) -> bool {
        matches!(
            self,
            Self::SelfLoopEdge { .. } | Self::StraightOrCurvedEdge { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut it = points.into_iter();
        let p0 = it.next()?;
        let mut b = Self {
            min_x: p0.x,
            min_y: p0.y,
            max_x: p0.x,
            max_y: p0.y,
        };
        for p in it {
            b.min_x = b.min_x.min(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_x = b.max_x.max(p.x);
            b.max_y = b.max_y.max(p.y);
        }
        Some(b)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DrawPlan {
    pub instructions: Vec<DrawInstruction>,
    /// Extent of every drawn point, loops included. `None` for an empty plan.
    pub bounds: Option<Bounds>,
}

impl DrawPlan {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawInstruction> {
        self.instructions.iter()
    }

    /// Relation ids in the order their edges are drawn.
    pub fn edge_order(&self) -> Vec<u32> {
        self.instructions
            .iter()
            .filter(|i| i.is_edge())
            .filter_map(DrawInstruction::relation_id)
            .collect()
    }
}
