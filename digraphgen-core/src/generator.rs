//! Graph generation orchestration.
//!
//! [`Generator`] runs the pipeline: backbone, edge sampling, then label
//! mapping. The result is a [`GeneratedGraph`] ready for serialization.

use std::io::{self, Write};

use rand::Rng;
use tracing::{Span, field, info, instrument};

use crate::{
    Result,
    backbone::build_backbone,
    builder::GraphParams,
    graph::AdjacencyMatrix,
    labels::LabelMapping,
    rng::{Stream, stream_rng},
    sampler::{EdgeSampler, SamplerReport},
    serialize::write_edge_list,
};

/// Entry point for generating a graph from validated parameters.
///
/// # Examples
/// ```
/// use digraphgen_core::GeneratorBuilder;
///
/// let generator = GeneratorBuilder::new()
///     .with_vertex_count(5)
///     .with_min_depth(3)
///     .build()
///     .expect("builder must succeed");
/// let generated = generator.generate_seeded(1).expect("generation must succeed");
/// let mut buffer = Vec::new();
/// generated.write_to(&mut buffer)?;
/// assert_eq!(String::from_utf8_lossy(&buffer), "5\n2\n0 1\n1 2\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Generator {
    params: GraphParams,
    seed: Option<u64>,
}

impl Generator {
    pub(crate) const fn new(params: GraphParams, seed: Option<u64>) -> Self {
        Self { params, seed }
    }

    /// Returns the validated parameters.
    #[must_use]
    pub const fn params(&self) -> &GraphParams {
        &self.params
    }

    /// Returns the fixed seed, if one was configured.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Generates a graph using the configured seed, or a fresh one drawn from
    /// the thread-local entropy source when none was configured.
    ///
    /// # Errors
    /// Returns [`crate::GraphGenError::RetryBudgetExhausted`] when the sampler
    /// cannot place the requested edges.
    pub fn generate(&self) -> Result<GeneratedGraph> {
        let seed = self.seed.unwrap_or_else(rand::random);
        self.generate_seeded(seed)
    }

    /// Generates a graph reproducibly from `seed`.
    ///
    /// Sampling and shuffling draw from independent streams derived from the
    /// seed, so the internal edge set does not depend on whether labels are
    /// shuffled.
    ///
    /// # Errors
    /// Returns [`crate::GraphGenError::RetryBudgetExhausted`] when the sampler
    /// cannot place the requested edges.
    #[instrument(
        name = "generator.generate",
        err,
        skip(self),
        fields(
            vertices = self.params.vertex_count,
            min_depth = self.params.min_depth,
            additional_edges = self.params.additional_edges,
            policy = %self.params.policy,
            shuffle = self.params.shuffle_output,
            edges = field::Empty,
        ),
    )]
    pub fn generate_seeded(&self, seed: u64) -> Result<GeneratedGraph> {
        let mut sampler_rng = stream_rng(seed, Stream::Sampler);
        let mut shuffle_rng = stream_rng(seed, Stream::Shuffle);
        let (graph, labels, report) = self.generate_with_rngs(&mut sampler_rng, &mut shuffle_rng)?;
        Span::current().record("edges", graph.edge_count());
        info!(
            edges = graph.edge_count(),
            rejected = report.rejected,
            longest_streak = report.longest_streak,
            "graph generated"
        );
        Ok(GeneratedGraph {
            graph,
            labels,
            report,
            seed,
        })
    }

    /// Generates a graph from caller-supplied random sources.
    ///
    /// `sampler_rng` drives edge placement and `shuffle_rng` drives the label
    /// permutation; the latter is untouched when shuffling is disabled.
    ///
    /// # Errors
    /// Returns [`crate::GraphGenError::RetryBudgetExhausted`] when the sampler
    /// cannot place the requested edges.
    pub fn generate_with_rngs<S, L>(
        &self,
        sampler_rng: &mut S,
        shuffle_rng: &mut L,
    ) -> Result<(AdjacencyMatrix, LabelMapping, SamplerReport)>
    where
        S: Rng + ?Sized,
        L: Rng + ?Sized,
    {
        let params = &self.params;
        let mut graph = AdjacencyMatrix::new(params.vertex_count);
        build_backbone(&mut graph, params.min_depth);

        let report = EdgeSampler::new(params.policy, params.min_depth, params.additional_edges)
            .with_retry_budget(params.retry_budget)
            .sample(&mut graph, sampler_rng)?;

        let labels = if params.shuffle_output {
            LabelMapping::shuffled(params.vertex_count, shuffle_rng)
        } else {
            LabelMapping::identity(params.vertex_count)
        };
        Ok((graph, labels, report))
    }
}

/// A generated graph together with its output labels and provenance.
#[derive(Debug, Clone)]
pub struct GeneratedGraph {
    graph: AdjacencyMatrix,
    labels: LabelMapping,
    report: SamplerReport,
    seed: u64,
}

impl GeneratedGraph {
    /// Returns the graph under internal indices.
    #[must_use]
    pub const fn graph(&self) -> &AdjacencyMatrix {
        &self.graph
    }

    /// Returns the output label mapping.
    #[must_use]
    pub const fn labels(&self) -> &LabelMapping {
        &self.labels
    }

    /// Returns sampling statistics.
    #[must_use]
    pub const fn report(&self) -> SamplerReport {
        self.report
    }

    /// Returns the base seed that reproduces this graph.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Serializes the graph as an edge list through its label mapping.
    ///
    /// # Errors
    /// Returns [`io::Error`] if writing fails.
    pub fn write_to(&self, writer: impl Write) -> io::Result<()> {
        write_edge_list(&self.graph, &self.labels, writer)
    }
}
