//! Louvain community detection.
//!
//! Modularity of a partition:
//!
//! ```text
//! Q = Σ_c [ in_c / m - γ · (tot_c / 2m)² ]
//! ```
//!
//! where `in_c` is the edge weight inside cluster `c`, `tot_c` the summed degree of its nodes,
//! `m` the total edge weight and `γ` the resolution.
//!
//! Each level runs local moving (every node tries the neighboring clusters and joins the one
//! with the largest strictly positive gain) until a full pass moves nothing, then collapses the
//! clusters into super-nodes whose self-loops carry the intra-cluster weight. Levels repeat until
//! a local-moving phase makes no move or a single node remains.
//!
//! Nodes are visited in ascending relation id. On equal gains a node stays where it is, and
//! among other clusters the lowest cluster id wins, so results are reproducible.

use crate::adjacency::AdjacencyGraph;
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use std::collections::BTreeMap;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

const GAIN_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct LouvainOptions {
    /// Maximum local-moving passes per level. Reaching it stops the algorithm and flags the
    /// result as not converged.
    pub max_passes: usize,
    pub resolution: f64,
}

impl Default for LouvainOptions {
    fn default() -> Self {
        Self {
            max_passes: 100,
            resolution: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterAssignment {
    /// Relation id → cluster label. Labels are dense and numbered by the smallest relation id
    /// in each cluster; they are partition names, not ranks.
    labels: BTreeMap<u32, usize>,
    pub cluster_count: usize,
    pub modularity: f64,
    /// Modularity measured on the input graph after every local-moving pass, in order.
    pub pass_modularity: Vec<f64>,
    pub passes: usize,
    pub levels: usize,
    /// `false` when the pass cap was reached before a fixed point.
    pub converged: bool,
}

impl ClusterAssignment {
    pub fn label_of(&self, relation_id: u32) -> Option<usize> {
        self.labels.get(&relation_id).copied()
    }

    pub fn labels(&self) -> &BTreeMap<u32, usize> {
        &self.labels
    }

    pub fn members(&self, label: usize) -> Vec<u32> {
        self.labels
            .iter()
            .filter(|(_, l)| **l == label)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Weighted working graph for one level.
#[derive(Debug, Clone)]
struct Level {
    adj: Vec<Vec<(usize, f64)>>,
    // Intra-node weight, each collapsed edge counted once.
    loops: Vec<f64>,
    degree: Vec<f64>,
    total_weight: f64,
}

impl Level {
    fn new(adj: Vec<Vec<(usize, f64)>>, loops: Vec<f64>) -> Self {
        let degree: Vec<f64> = adj
            .iter()
            .zip(&loops)
            .map(|(neigh, l)| 2.0 * l + neigh.iter().map(|(_, w)| w).sum::<f64>())
            .collect();
        let total_weight = degree.iter().sum::<f64>() / 2.0;
        Self {
            adj,
            loops,
            degree,
            total_weight,
        }
    }

    fn from_graph(g: &AdjacencyGraph) -> Self {
        let adj = (0..g.node_count())
            .map(|i| g.neighbor_indices(i).iter().map(|&j| (j, 1.0)).collect())
            .collect();
        Self::new(adj, vec![0.0; g.node_count()])
    }

    fn len(&self) -> usize {
        self.adj.len()
    }

    fn modularity(&self, comm: &[usize], resolution: f64) -> f64 {
        if self.total_weight <= 0.0 {
            return 0.0;
        }
        let n = self.len();
        let mut internal = vec![0.0; n];
        let mut tot = vec![0.0; n];
        for i in 0..n {
            let c = comm[i];
            internal[c] += self.loops[i];
            tot[c] += self.degree[i];
            for &(j, w) in &self.adj[i] {
                if j > i && comm[j] == c {
                    internal[c] += w;
                }
            }
        }
        let m = self.total_weight;
        internal
            .iter()
            .zip(&tot)
            .map(|(inside, t)| inside / m - resolution * (t / (2.0 * m)).powi(2))
            .sum()
    }

    /// One local-moving pass over all nodes. Returns the number of moved nodes.
    fn move_nodes(&self, comm: &mut [usize], tot: &mut [f64], resolution: f64) -> usize {
        let m2 = 2.0 * self.total_weight;
        let mut moved = 0;
        let mut weight_to: HashMap<usize, f64> = HashMap::default();
        let mut candidates: Vec<usize> = Vec::new();

        for i in 0..self.len() {
            let current = comm[i];
            let ki = self.degree[i];

            weight_to.clear();
            for &(j, w) in &self.adj[i] {
                *weight_to.entry(comm[j]).or_insert(0.0) += w;
            }
            candidates.clear();
            candidates.extend(weight_to.keys().copied());
            candidates.sort_unstable();

            tot[current] -= ki;
            let gain = |c: usize| {
                weight_to.get(&c).copied().unwrap_or(0.0) - resolution * tot[c] * ki / m2
            };

            let mut best = current;
            let mut best_gain = gain(current);
            for &c in &candidates {
                if c == current {
                    continue;
                }
                let g = gain(c);
                if g > best_gain + GAIN_EPSILON {
                    best = c;
                    best_gain = g;
                }
            }

            tot[best] += ki;
            if best != current {
                comm[i] = best;
                moved += 1;
            }
        }
        moved
    }

    fn aggregate(&self, comm: &[usize], count: usize) -> Level {
        let mut loops = vec![0.0; count];
        let mut between: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); count];
        for i in 0..self.len() {
            let ci = comm[i];
            loops[ci] += self.loops[i];
            for &(j, w) in &self.adj[i] {
                if j <= i {
                    continue;
                }
                let cj = comm[j];
                if ci == cj {
                    loops[ci] += w;
                } else {
                    *between[ci].entry(cj).or_insert(0.0) += w;
                    *between[cj].entry(ci).or_insert(0.0) += w;
                }
            }
        }
        let adj = between.into_iter().map(|m| m.into_iter().collect()).collect();
        Level::new(adj, loops)
    }
}

/// Relabels cluster ids densely in order of first appearance.
fn renumber(comm: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping: HashMap<usize, usize> = HashMap::default();
    let dense = comm
        .iter()
        .map(|c| {
            let next = mapping.len();
            *mapping.entry(*c).or_insert(next)
        })
        .collect();
    (dense, mapping.len())
}

pub fn louvain(graph: &AdjacencyGraph, options: &LouvainOptions) -> ClusterAssignment {
    let n = graph.node_count();
    let base = Level::from_graph(graph);
    let max_passes = options.max_passes.max(1);

    // Original node index → node index at the current level.
    let mut membership: Vec<usize> = (0..n).collect();
    let mut pass_modularity: Vec<f64> = Vec::new();
    let mut passes = 0;
    let mut levels = 0;
    let mut converged = true;

    if base.total_weight > 0.0 {
        let mut level = base.clone();
        loop {
            let mut comm: Vec<usize> = (0..level.len()).collect();
            let mut tot = level.degree.clone();
            let mut moved_any = false;
            let mut level_converged = false;

            for _ in 0..max_passes {
                let moved = level.move_nodes(&mut comm, &mut tot, options.resolution);
                passes += 1;
                let flat: Vec<usize> = membership.iter().map(|&m| comm[m]).collect();
                pass_modularity.push(base.modularity(&flat, options.resolution));
                if moved == 0 {
                    level_converged = true;
                    break;
                }
                moved_any = true;
            }

            if !moved_any {
                break;
            }
            let (dense, count) = renumber(&comm);
            for m in membership.iter_mut() {
                *m = dense[*m];
            }
            levels += 1;
            tracing::debug!(level = levels, clusters = count, "louvain level collapsed");

            if !level_converged {
                converged = false;
                break;
            }
            if count <= 1 {
                break;
            }
            level = level.aggregate(&dense, count);
        }
    }

    let (dense, cluster_count) = renumber(&membership);
    let modularity = base.modularity(&dense, options.resolution);
    let labels = dense
        .iter()
        .enumerate()
        .map(|(idx, &label)| (graph.id_at(idx), label))
        .collect();

    tracing::debug!(
        nodes = n,
        edges = graph.edge_count(),
        clusters = cluster_count,
        modularity,
        passes,
        converged,
        "louvain finished"
    );

    ClusterAssignment {
        labels,
        cluster_count,
        modularity,
        pass_modularity,
        passes,
        levels,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::{Level, renumber};
    use crate::AdjacencyGraph;

    #[test]
    fn renumber_follows_first_appearance() {
        assert_eq!(renumber(&[4, 4, 1, 7, 1]), (vec![0, 0, 1, 2, 1], 3));
    }

    #[test]
    fn aggregation_preserves_total_weight() {
        let g = AdjacencyGraph::from_edges([], [(1, 2), (2, 3), (3, 1), (3, 4)]);
        let level = Level::from_graph(&g);
        let collapsed = level.aggregate(&[0, 0, 0, 1], 2);
        assert_eq!(collapsed.loops, vec![3.0, 0.0]);
        assert_eq!(collapsed.adj[0], vec![(1, 1.0)]);
        assert_eq!(collapsed.total_weight, level.total_weight);
        assert_eq!(collapsed.degree, vec![7.0, 1.0]);
    }

    #[test]
    fn modularity_matches_hand_computation() {
        // Two triangles joined by one bridge: m = 7.
        let g = AdjacencyGraph::from_edges(
            [],
            [(1, 2), (2, 3), (3, 1), (4, 5), (5, 6), (6, 4), (3, 4)],
        );
        let level = Level::from_graph(&g);
        let q = level.modularity(&[0, 0, 0, 1, 1, 1], 1.0);
        // Each side: in = 3, tot = 7.
        let expected = 2.0 * (3.0 / 7.0 - (7.0f64 / 14.0).powi(2));
        assert!((q - expected).abs() < 1e-12, "q = {q}");
    }
}
