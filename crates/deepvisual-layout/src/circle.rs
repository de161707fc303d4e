use crate::error::{Error, Result};
use crate::geom::{Point, point};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::f64::consts::TAU;

/// Entities placed at equal angular spacing around the origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircularLayout {
    pub radius: f64,
    positions: IndexMap<String, Point>,
}

impl CircularLayout {
    pub fn position(&self, entity: &str) -> Option<Point> {
        self.positions.get(entity).copied()
    }

    /// Positions in placement order.
    pub fn positions(&self) -> &IndexMap<String, Point> {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Angular step between consecutive entities.
    pub fn angle_step(&self) -> f64 {
        TAU / self.positions.len() as f64
    }

    /// Angle of the entity at placement index `idx`.
    pub fn angle_at(&self, idx: usize) -> f64 {
        idx as f64 * self.angle_step()
    }
}

/// Places `entities` on a circle of `radius`: entity `i` of `n` sits at `θ = 2π·i/n`, starting
/// at `(radius, 0)` and running counter-clockwise.
///
/// Order is taken as given (first-seen order in the table, never sorted). Repeated labels keep
/// their first slot.
pub fn circular_layout<I, S>(entities: I, radius: f64) -> Result<CircularLayout>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if !radius.is_finite() || radius <= 0.0 {
        return Err(Error::InvalidRadius { radius });
    }

    let labels: IndexSet<String> = entities
        .into_iter()
        .map(|e| e.as_ref().to_string())
        .collect();
    if labels.is_empty() {
        return Err(Error::EmptyInput);
    }

    let step = TAU / labels.len() as f64;
    let positions = labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| {
            let theta = i as f64 * step;
            (label, point(radius * theta.cos(), radius * theta.sin()))
        })
        .collect();

    Ok(CircularLayout { radius, positions })
}
