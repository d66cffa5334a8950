//! Builder utilities for configuring graph generation.
//!
//! All parameter validation happens in [`GeneratorBuilder::build`], before any
//! graph storage is allocated.

use crate::{
    Result,
    error::GraphGenError,
    generator::Generator,
    sampler::{CyclePolicy, DEFAULT_RETRY_BUDGET},
};

/// Validated generation parameters shared by [`Generator`] and its callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphParams {
    /// Number of vertices in the graph.
    pub vertex_count: u32,
    /// Number of vertices on the deterministic backbone path.
    pub min_depth: u32,
    /// Number of random edges placed after the backbone.
    pub additional_edges: u32,
    /// Which edges the sampler may propose.
    pub policy: CyclePolicy,
    /// Whether output labels are shuffled.
    pub shuffle_output: bool,
    /// Consecutive rejected candidates tolerated before giving up.
    pub retry_budget: u32,
}

impl GraphParams {
    /// Number of edges the backbone contributes.
    ///
    /// # Examples
    /// ```
    /// use digraphgen_core::GeneratorBuilder;
    ///
    /// let generator = GeneratorBuilder::new()
    ///     .with_vertex_count(5)
    ///     .with_min_depth(3)
    ///     .build()
    ///     .expect("configuration is valid");
    /// assert_eq!(generator.params().backbone_edges(), 2);
    /// ```
    #[must_use]
    pub const fn backbone_edges(&self) -> u32 {
        self.min_depth.saturating_sub(1)
    }

    /// Total number of edges a successful run produces.
    #[must_use]
    pub const fn expected_edges(&self) -> u32 {
        self.backbone_edges().saturating_add(self.additional_edges)
    }
}

/// Configures and constructs [`Generator`] instances.
///
/// # Examples
/// ```
/// use digraphgen_core::{CyclePolicy, GeneratorBuilder};
///
/// let generator = GeneratorBuilder::new()
///     .with_vertex_count(10)
///     .with_min_depth(4)
///     .with_additional_edges(5)
///     .with_cycles(true)
///     .with_seed(42)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(generator.params().policy, CyclePolicy::Cyclic);
/// assert_eq!(generator.seed(), Some(42));
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorBuilder {
    vertex_count: u32,
    min_depth: u32,
    additional_edges: u32,
    allow_cycles: bool,
    shuffle_output: bool,
    retry_budget: u32,
    seed: Option<u64>,
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self {
            vertex_count: 0,
            min_depth: 0,
            additional_edges: 0,
            allow_cycles: false,
            shuffle_output: false,
            retry_budget: DEFAULT_RETRY_BUDGET,
            seed: None,
        }
    }
}

impl GeneratorBuilder {
    /// Creates a builder for an empty, acyclic, unshuffled graph.
    ///
    /// # Examples
    /// ```
    /// use digraphgen_core::GeneratorBuilder;
    ///
    /// let builder = GeneratorBuilder::new();
    /// assert_eq!(builder.vertex_count(), 0);
    /// assert_eq!(builder.retry_budget(), 256);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of vertices.
    #[must_use]
    pub const fn with_vertex_count(mut self, vertex_count: u32) -> Self {
        self.vertex_count = vertex_count;
        self
    }

    /// Sets the number of vertices on the backbone path.
    #[must_use]
    pub const fn with_min_depth(mut self, min_depth: u32) -> Self {
        self.min_depth = min_depth;
        self
    }

    /// Sets the number of random edges placed after the backbone.
    #[must_use]
    pub const fn with_additional_edges(mut self, additional_edges: u32) -> Self {
        self.additional_edges = additional_edges;
        self
    }

    /// Allows random edges to form cycles and guarantees at least one.
    #[must_use]
    pub const fn with_cycles(mut self, allow_cycles: bool) -> Self {
        self.allow_cycles = allow_cycles;
        self
    }

    /// Shuffles the vertex labels written to the output.
    #[must_use]
    pub const fn with_shuffle(mut self, shuffle_output: bool) -> Self {
        self.shuffle_output = shuffle_output;
        self
    }

    /// Overrides the consecutive-failure threshold of the edge sampler.
    ///
    /// # Examples
    /// ```
    /// use digraphgen_core::{GeneratorBuilder, GraphGenError};
    ///
    /// let err = GeneratorBuilder::new().with_retry_budget(0).build().unwrap_err();
    /// assert_eq!(err, GraphGenError::InvalidRetryBudget { got: 0 });
    /// ```
    #[must_use]
    pub const fn with_retry_budget(mut self, retry_budget: u32) -> Self {
        self.retry_budget = retry_budget;
        self
    }

    /// Fixes the base seed so generation is reproducible.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the configured vertex count.
    #[must_use]
    pub const fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Returns the configured retry budget.
    #[must_use]
    pub const fn retry_budget(&self) -> u32 {
        self.retry_budget
    }

    /// Validates the configuration and constructs a [`Generator`].
    ///
    /// # Errors
    /// - [`GraphGenError::DepthExceedsVertices`] when `min_depth` exceeds the
    ///   vertex count.
    /// - [`GraphGenError::CyclesRequireAdditionalEdges`] when cycles are
    ///   requested without any additional edge to create one.
    /// - [`GraphGenError::InvalidRetryBudget`] when the retry budget is zero.
    pub fn build(self) -> Result<Generator> {
        if self.min_depth > self.vertex_count {
            return Err(GraphGenError::DepthExceedsVertices {
                min_depth: self.min_depth,
                vertex_count: self.vertex_count,
            });
        }
        if self.allow_cycles && self.additional_edges < 1 {
            return Err(GraphGenError::CyclesRequireAdditionalEdges);
        }
        if self.retry_budget == 0 {
            return Err(GraphGenError::InvalidRetryBudget {
                got: self.retry_budget,
            });
        }

        let params = GraphParams {
            vertex_count: self.vertex_count,
            min_depth: self.min_depth,
            additional_edges: self.additional_edges,
            policy: CyclePolicy::from_allow_cycles(self.allow_cycles),
            shuffle_output: self.shuffle_output,
            retry_budget: self.retry_budget,
        };
        Ok(Generator::new(params, self.seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::depth_exceeds(3, 4, 0, false, GraphGenError::DepthExceedsVertices { min_depth: 4, vertex_count: 3 })]
    #[case::cycles_without_edges(5, 3, 0, true, GraphGenError::CyclesRequireAdditionalEdges)]
    #[case::depth_checked_first(2, 3, 0, true, GraphGenError::DepthExceedsVertices { min_depth: 3, vertex_count: 2 })]
    fn build_rejects_invalid_parameters(
        #[case] vertices: u32,
        #[case] min_depth: u32,
        #[case] additional: u32,
        #[case] cycles: bool,
        #[case] expected: GraphGenError,
    ) {
        let err = GeneratorBuilder::new()
            .with_vertex_count(vertices)
            .with_min_depth(min_depth)
            .with_additional_edges(additional)
            .with_cycles(cycles)
            .build()
            .expect_err("parameters must be rejected");
        assert_eq!(err, expected);
        assert!(err.is_validation());
    }

    #[rstest]
    #[case::depth_equals_vertices(4, 4, 0, false)]
    #[case::empty(0, 0, 0, false)]
    #[case::cyclic_with_one_edge(5, 3, 1, true)]
    fn build_accepts_boundary_parameters(
        #[case] vertices: u32,
        #[case] min_depth: u32,
        #[case] additional: u32,
        #[case] cycles: bool,
    ) {
        let generator = GeneratorBuilder::new()
            .with_vertex_count(vertices)
            .with_min_depth(min_depth)
            .with_additional_edges(additional)
            .with_cycles(cycles)
            .build()
            .expect("parameters must be accepted");
        assert_eq!(generator.params().vertex_count, vertices);
        assert_eq!(
            generator.params().policy,
            CyclePolicy::from_allow_cycles(cycles)
        );
    }

    #[rstest]
    #[case(0, 7, 7)]
    #[case(1, 7, 7)]
    #[case(5, 0, 4)]
    #[case(5, 3, 7)]
    fn expected_edges_counts_backbone_and_additional(
        #[case] min_depth: u32,
        #[case] additional: u32,
        #[case] expected: u32,
    ) {
        let generator = GeneratorBuilder::new()
            .with_vertex_count(10)
            .with_min_depth(min_depth)
            .with_additional_edges(additional)
            .build()
            .expect("parameters must be accepted");
        assert_eq!(generator.params().expected_edges(), expected);
    }
}
