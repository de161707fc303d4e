//! Undirected "shares an endpoint" graph over relations.

use rustc_hash::FxBuildHasher;
use std::collections::BTreeSet;
use std::hash::Hash;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// Immutable undirected simple graph keyed by relation id.
///
/// Node indices follow ascending relation id, which is also the visitation order used by the
/// clustering algorithms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjacencyGraph {
    nodes: Vec<u32>,
    index: HashMap<u32, usize>,
    // Sorted, deduplicated neighbor indices; never contains the node itself.
    adj: Vec<Vec<usize>>,
    edge_count: usize,
}

impl AdjacencyGraph {
    /// Builds a graph from node ids and undirected edges. Edge endpoints missing from `nodes`
    /// are added; self-edges and duplicates are ignored.
    pub fn from_edges(
        nodes: impl IntoIterator<Item = u32>,
        edges: impl IntoIterator<Item = (u32, u32)>,
    ) -> Self {
        let edges: Vec<(u32, u32)> = edges.into_iter().collect();
        let mut ids: BTreeSet<u32> = nodes.into_iter().collect();
        for &(a, b) in &edges {
            ids.insert(a);
            ids.insert(b);
        }

        let nodes: Vec<u32> = ids.into_iter().collect();
        let mut index: HashMap<u32, usize> = HashMap::default();
        for (idx, id) in nodes.iter().enumerate() {
            index.insert(*id, idx);
        }

        let mut adj: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); nodes.len()];
        for (a, b) in edges {
            if a == b {
                continue;
            }
            let (ia, ib) = (index[&a], index[&b]);
            adj[ia].insert(ib);
            adj[ib].insert(ia);
        }
        let adj: Vec<Vec<usize>> = adj.into_iter().map(|s| s.into_iter().collect()).collect();
        let edge_count = adj.iter().map(Vec::len).sum::<usize>() / 2;

        Self {
            nodes,
            index,
            adj,
            edge_count,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Relation ids in ascending order.
    pub fn node_ids(&self) -> &[u32] {
        &self.nodes
    }

    pub fn index_of(&self, id: u32) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn id_at(&self, idx: usize) -> u32 {
        self.nodes[idx]
    }

    pub fn neighbor_indices(&self, idx: usize) -> &[usize] {
        &self.adj[idx]
    }

    pub fn neighbors(&self, id: u32) -> Vec<u32> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };
        self.adj[idx].iter().map(|&j| self.nodes[j]).collect()
    }

    pub fn has_edge(&self, a: u32, b: u32) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(ia), Some(ib)) => self.adj[ia].binary_search(&ib).is_ok(),
            _ => false,
        }
    }

    /// Each undirected edge once, as `(lower id, higher id)`, in ascending order.
    pub fn edges(&self) -> Vec<(u32, u32)> {
        let mut out = Vec::with_capacity(self.edge_count);
        for (i, neigh) in self.adj.iter().enumerate() {
            for &j in neigh {
                if j > i {
                    out.push((self.nodes[i], self.nodes[j]));
                }
            }
        }
        out
    }
}

/// Connects every pair of relations whose endpoint keys intersect.
///
/// `relations` yields `(relation id, source key, target key)`. An inverted index from key to
/// relation ids keeps this near-linear; the result equals the pairwise set-intersection test.
pub fn build_link_adjacency<K, I>(relations: I) -> AdjacencyGraph
where
    K: Hash + Eq,
    I: IntoIterator<Item = (u32, K, K)>,
{
    let mut nodes: Vec<u32> = Vec::new();
    let mut by_key: HashMap<K, Vec<u32>> = HashMap::default();
    for (id, source, target) in relations {
        nodes.push(id);
        if source == target {
            by_key.entry(source).or_default().push(id);
        } else {
            by_key.entry(source).or_default().push(id);
            by_key.entry(target).or_default().push(id);
        }
    }

    let mut edges: Vec<(u32, u32)> = Vec::new();
    for members in by_key.values() {
        for (i, &a) in members.iter().enumerate() {
            for &b in &members[i + 1..] {
                edges.push((a, b));
            }
        }
    }

    AdjacencyGraph::from_edges(nodes, edges)
}
