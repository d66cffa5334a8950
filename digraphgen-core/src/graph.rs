//! Dense adjacency storage for directed graphs.
//!
//! [`AdjacencyMatrix`] owns an `n × n` boolean buffer laid out row-major by
//! source vertex. It records edges and answers existence queries; it never
//! validates what it is asked to store. Keeping the graph free of
//! duplicates and self-loops is the job of the callers that populate it.

/// A fixed-size directed graph backed by a dense adjacency buffer.
///
/// # Examples
/// ```
/// use digraphgen_core::AdjacencyMatrix;
///
/// let mut graph = AdjacencyMatrix::new(3);
/// graph.add_edge(0, 2);
/// assert!(graph.has_edge(0, 2));
/// assert!(!graph.has_edge(2, 0));
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    vertex_count: u32,
    edge_count: u32,
    cells: Vec<bool>,
}

impl AdjacencyMatrix {
    /// Creates an empty graph over `vertex_count` vertices.
    ///
    /// Memory use is quadratic in `vertex_count`.
    #[must_use]
    pub fn new(vertex_count: u32) -> Self {
        let side = vertex_count as usize;
        Self {
            vertex_count,
            edge_count: 0,
            cells: vec![false; side.saturating_mul(side)],
        }
    }

    /// Records the directed edge `from → to` and bumps the edge count.
    ///
    /// The store performs no validation: inserting an edge twice counts it
    /// twice, so callers must consult [`Self::has_edge`] first. Indices must be
    /// below [`Self::vertex_count`]; an out-of-range insert is a caller bug and
    /// is ignored in release builds.
    pub fn add_edge(&mut self, from: u32, to: u32) {
        debug_assert!(
            from < self.vertex_count && to < self.vertex_count,
            "edge ({from}, {to}) outside a graph of {} vertices",
            self.vertex_count
        );
        let Some(cell) = self
            .offset(from, to)
            .and_then(|offset| self.cells.get_mut(offset))
        else {
            return;
        };
        *cell = true;
        self.edge_count = self.edge_count.saturating_add(1);
    }

    /// Returns whether the directed edge `from → to` is present.
    #[must_use]
    pub fn has_edge(&self, from: u32, to: u32) -> bool {
        self.offset(from, to)
            .and_then(|offset| self.cells.get(offset))
            .copied()
            .unwrap_or(false)
    }

    /// Number of vertices the graph was created with.
    #[must_use]
    pub const fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Number of edges recorded so far.
    #[must_use]
    pub const fn edge_count(&self) -> u32 {
        self.edge_count
    }

    /// Iterates over present edges, ascending by source and then by target.
    ///
    /// # Examples
    /// ```
    /// use digraphgen_core::AdjacencyMatrix;
    ///
    /// let mut graph = AdjacencyMatrix::new(3);
    /// graph.add_edge(2, 0);
    /// graph.add_edge(0, 1);
    /// let edges: Vec<_> = graph.edges().collect();
    /// assert_eq!(edges, vec![(0, 1), (2, 0)]);
    /// ```
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let n = self.vertex_count;
        (0..n).flat_map(move |from| {
            (0..n)
                .filter(move |&to| self.has_edge(from, to))
                .map(move |to| (from, to))
        })
    }

    fn offset(&self, from: u32, to: u32) -> Option<usize> {
        if from >= self.vertex_count || to >= self.vertex_count {
            return None;
        }
        (from as usize)
            .checked_mul(self.vertex_count as usize)
            .and_then(|row| row.checked_add(to as usize))
    }
}
