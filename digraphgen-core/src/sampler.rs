//! Randomised placement of additional edges.
//!
//! [`EdgeSampler`] proposes candidate edges under one of two policies and
//! inserts those that pass its checks until the requested number has been
//! placed or the retry budget runs out.
//!
//! * [`CyclePolicy::Acyclic`] only proposes edges from a lower to a higher
//!   internal index, so the vertex numbering is a topological order of the
//!   result.
//! * [`CyclePolicy::Cyclic`] places a seed edge inside the backbone region
//!   first. The seed must point backwards along the backbone, which closes a
//!   cycle with it. Every later edge is drawn from the whole vertex range.
//!
//! Every rejected candidate counts against a consecutive-failure budget which
//! resets on each successful insertion. Exceeding the budget aborts
//! generation with [`GraphGenError::RetryBudgetExhausted`]. The budget is a
//! heuristic guard, not a feasibility proof: a feasible request can still
//! fail on a long run of bad draws.

use std::fmt;

use rand::Rng;
use tracing::{Span, debug, field, instrument, trace, warn};

use crate::{Result, error::GraphGenError, graph::AdjacencyMatrix};

/// Consecutive rejected candidates tolerated before giving up.
pub const DEFAULT_RETRY_BUDGET: u32 = 256;

/// Selects which edges the sampler may propose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CyclePolicy {
    /// Edges may point in either direction; at least one cycle is guaranteed.
    Cyclic,
    /// Edges always point from a lower to a higher internal index.
    Acyclic,
}

impl CyclePolicy {
    /// Maps the user-facing `has_cycles` flag onto a policy.
    ///
    /// # Examples
    /// ```
    /// use digraphgen_core::CyclePolicy;
    ///
    /// assert_eq!(CyclePolicy::from_allow_cycles(true), CyclePolicy::Cyclic);
    /// assert_eq!(CyclePolicy::from_allow_cycles(false), CyclePolicy::Acyclic);
    /// ```
    #[must_use]
    pub const fn from_allow_cycles(allow_cycles: bool) -> Self {
        if allow_cycles {
            Self::Cyclic
        } else {
            Self::Acyclic
        }
    }

    /// Stable lowercase name used in logs and error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cyclic => "cyclic",
            Self::Acyclic => "acyclic",
        }
    }
}

impl fmt::Display for CyclePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome statistics for a successful sampling run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SamplerReport {
    /// Additional edges inserted.
    pub placed: u32,
    /// Candidates rejected over the whole run.
    pub rejected: u64,
    /// Longest run of consecutive rejections observed.
    pub longest_streak: u32,
}

/// Places additional random edges into an [`AdjacencyMatrix`].
///
/// # Examples
/// ```
/// use digraphgen_core::{AdjacencyMatrix, CyclePolicy, EdgeSampler, build_backbone};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut graph = AdjacencyMatrix::new(6);
/// build_backbone(&mut graph, 4);
/// let sampler = EdgeSampler::new(CyclePolicy::Acyclic, 4, 3);
/// let mut rng = SmallRng::seed_from_u64(7);
/// let report = sampler.sample(&mut graph, &mut rng)?;
/// assert_eq!(report.placed, 3);
/// assert_eq!(graph.edge_count(), 6);
/// assert!(graph.edges().all(|(from, to)| from < to));
/// # Ok::<(), digraphgen_core::GraphGenError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeSampler {
    policy: CyclePolicy,
    min_depth: u32,
    requested: u32,
    retry_budget: u32,
}

impl EdgeSampler {
    /// Creates a sampler that will place `requested` edges under `policy`,
    /// using `min_depth` to bound the cyclic seed edge.
    #[must_use]
    pub const fn new(policy: CyclePolicy, min_depth: u32, requested: u32) -> Self {
        Self {
            policy,
            min_depth,
            requested,
            retry_budget: DEFAULT_RETRY_BUDGET,
        }
    }

    /// Overrides the consecutive-failure threshold.
    #[must_use]
    pub const fn with_retry_budget(mut self, retry_budget: u32) -> Self {
        self.retry_budget = retry_budget;
        self
    }

    /// Inserts the requested number of edges into `graph`.
    ///
    /// # Errors
    /// Returns [`GraphGenError::RetryBudgetExhausted`] when the run of
    /// consecutive rejected candidates grows past the retry budget. The graph
    /// then holds whatever was placed before the failure and should be
    /// discarded.
    #[instrument(
        name = "sampler.sample",
        skip(self, graph, rng),
        fields(
            policy = %self.policy,
            requested = self.requested,
            retry_budget = self.retry_budget,
            rejected = field::Empty,
        ),
    )]
    pub fn sample<R>(&self, graph: &mut AdjacencyMatrix, rng: &mut R) -> Result<SamplerReport>
    where
        R: Rng + ?Sized,
    {
        let mut tracker = RetryTracker::new(self.retry_budget);
        let mut placed = 0;

        if self.policy == CyclePolicy::Cyclic && self.requested > 0 {
            self.place_one(graph, &mut tracker, placed, |current| {
                self.propose_cycle_seed(current, rng)
            })?;
            placed += 1;
        }

        while placed < self.requested {
            self.place_one(graph, &mut tracker, placed, |current| match self.policy {
                CyclePolicy::Cyclic => propose_unrestricted(current, rng),
                CyclePolicy::Acyclic => propose_forward(current, rng),
            })?;
            placed += 1;
        }

        Span::current().record("rejected", tracker.total_rejected);
        Ok(SamplerReport {
            placed,
            rejected: tracker.total_rejected,
            longest_streak: tracker.longest_streak,
        })
    }

    fn place_one<F>(
        &self,
        graph: &mut AdjacencyMatrix,
        tracker: &mut RetryTracker,
        placed: u32,
        mut propose: F,
    ) -> Result<()>
    where
        F: FnMut(&AdjacencyMatrix) -> Candidate,
    {
        loop {
            match propose(graph) {
                Candidate::Accepted { from, to } => {
                    graph.add_edge(from, to);
                    tracker.record_success();
                    record_accepted();
                    debug!(from, to, placed = placed + 1, "edge placed");
                    return Ok(());
                }
                Candidate::Rejected(reason) => {
                    record_rejected();
                    trace!(reason = reason.as_str(), streak = tracker.consecutive, "candidate rejected");
                    if tracker.record_failure() {
                        warn!(
                            placed,
                            requested = self.requested,
                            budget = self.retry_budget,
                            "retry budget exhausted"
                        );
                        return Err(GraphGenError::RetryBudgetExhausted {
                            placed,
                            requested: self.requested,
                            budget: self.retry_budget,
                            policy: self.policy,
                        });
                    }
                }
            }
        }
    }

    /// Proposes the first cyclic edge, confined to the backbone region.
    ///
    /// The target is the shared uniform draw folded into `[0, min_depth)`.
    /// Only backward edges are accepted: the backbone already leads from the
    /// target to the source, so the new edge closes a cycle. Forward
    /// shortcuts such as `0 -> 2` are rejected here, so the first edge is
    /// drawn from the backward pairs of the backbone region only, and those
    /// rejections count against the retry budget.
    fn propose_cycle_seed<R>(&self, graph: &AdjacencyMatrix, rng: &mut R) -> Candidate
    where
        R: Rng + ?Sized,
    {
        let Some(to) = draw_below(rng, graph.vertex_count())
            .and_then(|raw| raw.checked_rem(self.min_depth))
        else {
            return Candidate::Rejected(Rejection::EmptyRange);
        };
        let Some(from) = draw_below(rng, self.min_depth) else {
            return Candidate::Rejected(Rejection::EmptyRange);
        };
        if from == to {
            return Candidate::Rejected(Rejection::SelfLoop);
        }
        if from < to {
            return Candidate::Rejected(Rejection::NoCycle);
        }
        accept_if_absent(graph, from, to)
    }
}

fn propose_unrestricted<R>(graph: &AdjacencyMatrix, rng: &mut R) -> Candidate
where
    R: Rng + ?Sized,
{
    let n = graph.vertex_count();
    let (Some(to), Some(from)) = (draw_below(rng, n), draw_below(rng, n)) else {
        return Candidate::Rejected(Rejection::EmptyRange);
    };
    if from == to {
        return Candidate::Rejected(Rejection::SelfLoop);
    }
    accept_if_absent(graph, from, to)
}

fn propose_forward<R>(graph: &AdjacencyMatrix, rng: &mut R) -> Candidate
where
    R: Rng + ?Sized,
{
    let Some(to) = draw_below(rng, graph.vertex_count()) else {
        return Candidate::Rejected(Rejection::EmptyRange);
    };
    // Nothing precedes vertex 0, so it can never be a forward target.
    let Some(from) = draw_below(rng, to) else {
        return Candidate::Rejected(Rejection::NoEarlierVertex);
    };
    accept_if_absent(graph, from, to)
}

fn accept_if_absent(graph: &AdjacencyMatrix, from: u32, to: u32) -> Candidate {
    if graph.has_edge(from, to) {
        Candidate::Rejected(Rejection::Duplicate)
    } else {
        Candidate::Accepted { from, to }
    }
}

fn draw_below<R>(rng: &mut R, bound: u32) -> Option<u32>
where
    R: Rng + ?Sized,
{
    (bound > 0).then(|| rng.gen_range(0..bound))
}

enum Candidate {
    Accepted { from: u32, to: u32 },
    Rejected(Rejection),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rejection {
    EmptyRange,
    SelfLoop,
    Duplicate,
    NoEarlierVertex,
    NoCycle,
}

impl Rejection {
    const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyRange => "empty_range",
            Self::SelfLoop => "self_loop",
            Self::Duplicate => "duplicate",
            Self::NoEarlierVertex => "no_earlier_vertex",
            Self::NoCycle => "no_cycle",
        }
    }
}

struct RetryTracker {
    budget: u32,
    consecutive: u32,
    longest_streak: u32,
    total_rejected: u64,
}

impl RetryTracker {
    const fn new(budget: u32) -> Self {
        Self {
            budget,
            consecutive: 0,
            longest_streak: 0,
            total_rejected: 0,
        }
    }

    const fn record_success(&mut self) {
        self.consecutive = 0;
    }

    /// Returns `true` once the streak exceeds the budget.
    fn record_failure(&mut self) -> bool {
        self.consecutive = self.consecutive.saturating_add(1);
        self.total_rejected = self.total_rejected.saturating_add(1);
        self.longest_streak = self.longest_streak.max(self.consecutive);
        self.consecutive > self.budget
    }
}

#[cfg(feature = "metrics")]
fn record_accepted() {
    metrics::counter!("sampler_edges_accepted").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_accepted() {}

#[cfg(feature = "metrics")]
fn record_rejected() {
    metrics::counter!("sampler_attempts_rejected").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_rejected() {}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    use crate::backbone::build_backbone;

    fn backbone_graph(vertices: u32, min_depth: u32) -> AdjacencyMatrix {
        let mut graph = AdjacencyMatrix::new(vertices);
        build_backbone(&mut graph, min_depth);
        graph
    }

    #[rstest]
    #[case(1)]
    #[case(42)]
    #[case(999)]
    fn acyclic_edges_point_forward(#[case] seed: u64) {
        let mut graph = backbone_graph(20, 5);
        let mut rng = SmallRng::seed_from_u64(seed);
        let report = EdgeSampler::new(CyclePolicy::Acyclic, 5, 30)
            .sample(&mut graph, &mut rng)
            .expect("sparse acyclic request must succeed");
        assert_eq!(report.placed, 30);
        assert_eq!(graph.edge_count(), 34);
        assert!(graph.edges().all(|(from, to)| from < to));
    }

    #[rstest]
    #[case(2)]
    #[case(3)]
    #[case(6)]
    fn cyclic_seed_edge_closes_backbone_cycle(#[case] min_depth: u32) {
        let mut graph = backbone_graph(10, min_depth);
        let mut rng = SmallRng::seed_from_u64(u64::from(min_depth));
        EdgeSampler::new(CyclePolicy::Cyclic, min_depth, 1)
            .sample(&mut graph, &mut rng)
            .expect("seed edge must be placeable");
        let backward: Vec<_> = graph.edges().filter(|(from, to)| from > to).collect();
        assert_eq!(backward.len(), 1);
        let (from, to) = backward[0];
        assert!(from < min_depth && to < min_depth);
    }

    #[test]
    fn cyclic_seed_edge_never_takes_a_forward_shortcut() {
        for seed in 0..64 {
            let mut graph = backbone_graph(5, 5);
            let mut rng = SmallRng::seed_from_u64(seed);
            EdgeSampler::new(CyclePolicy::Cyclic, 5, 1)
                .sample(&mut graph, &mut rng)
                .expect("backward pairs are available");
            let extra: Vec<_> = graph
                .edges()
                .filter(|&(from, to)| to != from + 1)
                .collect();
            assert_eq!(extra.len(), 1, "seed {seed}");
            let (from, to) = extra[0];
            assert!(from > to, "seed {seed} placed forward edge ({from}, {to})");
        }
    }

    #[test]
    fn two_vertex_cycle_uses_only_remaining_pair() {
        let mut graph = backbone_graph(2, 2);
        let mut rng = SmallRng::seed_from_u64(5);
        EdgeSampler::new(CyclePolicy::Cyclic, 2, 1)
            .sample(&mut graph, &mut rng)
            .expect("edge (1, 0) must be found");
        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn acyclic_fills_every_forward_pair() {
        let mut graph = backbone_graph(4, 4);
        let mut rng = SmallRng::seed_from_u64(11);
        EdgeSampler::new(CyclePolicy::Acyclic, 4, 3)
            .sample(&mut graph, &mut rng)
            .expect("three forward pairs remain free");
        assert_eq!(graph.edge_count(), 6);
        for from in 0..4 {
            for to in (from + 1)..4 {
                assert!(graph.has_edge(from, to), "missing ({from}, {to})");
            }
        }
    }

    #[test]
    fn infeasible_acyclic_request_exhausts_budget() {
        let mut graph = backbone_graph(3, 3);
        let mut rng = SmallRng::seed_from_u64(3);
        let err = EdgeSampler::new(CyclePolicy::Acyclic, 3, 2)
            .sample(&mut graph, &mut rng)
            .expect_err("only one forward pair is free");
        assert_eq!(
            err,
            GraphGenError::RetryBudgetExhausted {
                placed: 1,
                requested: 2,
                budget: DEFAULT_RETRY_BUDGET,
                policy: CyclePolicy::Acyclic,
            }
        );
        assert_eq!(graph.edge_count(), 3);
    }

    #[rstest]
    #[case::single_vertex_acyclic(1, 1, CyclePolicy::Acyclic)]
    #[case::single_vertex_cyclic(1, 1, CyclePolicy::Cyclic)]
    #[case::empty_graph(0, 0, CyclePolicy::Cyclic)]
    #[case::no_backbone_region(4, 0, CyclePolicy::Cyclic)]
    fn degenerate_ranges_fail_without_panicking(
        #[case] vertices: u32,
        #[case] min_depth: u32,
        #[case] policy: CyclePolicy,
    ) {
        let mut graph = backbone_graph(vertices, min_depth);
        let mut rng = SmallRng::seed_from_u64(0);
        let err = EdgeSampler::new(policy, min_depth, 1)
            .with_retry_budget(8)
            .sample(&mut graph, &mut rng)
            .expect_err("no valid candidate exists");
        assert!(matches!(
            err,
            GraphGenError::RetryBudgetExhausted { placed: 0, budget: 8, .. }
        ));
    }

    #[test]
    fn zero_requested_edges_is_a_no_op() {
        let mut graph = backbone_graph(3, 3);
        let mut rng = SmallRng::seed_from_u64(1);
        let report = EdgeSampler::new(CyclePolicy::Cyclic, 3, 0)
            .sample(&mut graph, &mut rng)
            .expect("nothing to place");
        assert_eq!(report, SamplerReport::default());
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn retry_tracker_resets_on_success() {
        let mut tracker = RetryTracker::new(2);
        assert!(!tracker.record_failure());
        assert!(!tracker.record_failure());
        tracker.record_success();
        assert!(!tracker.record_failure());
        assert!(!tracker.record_failure());
        assert!(tracker.record_failure());
        assert_eq!(tracker.total_rejected, 5);
        assert_eq!(tracker.longest_streak, 3);
    }

    #[test]
    fn sampling_is_deterministic_for_a_seed() {
        let run = |seed| {
            let mut graph = backbone_graph(12, 4);
            let mut rng = SmallRng::seed_from_u64(seed);
            EdgeSampler::new(CyclePolicy::Cyclic, 4, 15)
                .sample(&mut graph, &mut rng)
                .expect("sparse request must succeed");
            graph.edges().collect::<Vec<_>>()
        };
        assert_eq!(run(17), run(17));
    }
}
