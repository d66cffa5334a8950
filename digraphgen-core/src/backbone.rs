//! Deterministic backbone construction.
//!
//! The backbone is the path `0 → 1 → … → (min_depth - 1)` inserted before any
//! random sampling, so every generated graph contains a path of at least
//! `min_depth - 1` edges.

use tracing::{debug, instrument};

use crate::graph::AdjacencyMatrix;

/// Chains vertices `0..min_depth` into a directed path and returns the number
/// of edges inserted.
///
/// `min_depth` must not exceed the graph's vertex count; the builder enforces
/// this before any graph is created. A depth of zero or one inserts nothing.
///
/// # Examples
/// ```
/// use digraphgen_core::{AdjacencyMatrix, build_backbone};
///
/// let mut graph = AdjacencyMatrix::new(5);
/// assert_eq!(build_backbone(&mut graph, 3), 2);
/// assert!(graph.has_edge(0, 1));
/// assert!(graph.has_edge(1, 2));
/// assert!(!graph.has_edge(2, 3));
/// ```
#[instrument(name = "backbone.build", level = "debug", skip(graph), fields(vertices = graph.vertex_count()))]
pub fn build_backbone(graph: &mut AdjacencyMatrix, min_depth: u32) -> u32 {
    let mut inserted = 0;
    for to in 1..min_depth {
        graph.add_edge(to - 1, to);
        inserted += 1;
    }
    debug!(inserted, "backbone built");
    inserted
}
