#![forbid(unsafe_code)]

//! Graph container and clustering algorithms used by `deepvisual`.
//!
//! Nodes are relation ids (`u32`, the 1-based row position of a relation). The container is
//! undirected, unweighted and built once; `alg` holds the algorithms that run over it.

pub mod adjacency;
pub mod alg;

pub use adjacency::{AdjacencyGraph, build_link_adjacency};
pub use alg::louvain::{ClusterAssignment, LouvainOptions, louvain};
