//! Algorithms over [`crate::AdjacencyGraph`].

pub mod louvain;
