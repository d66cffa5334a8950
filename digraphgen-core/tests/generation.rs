//! End-to-end generation properties checked through the serialized output.

use std::collections::BTreeSet;

use digraphgen_core::{GeneratedGraph, GeneratorBuilder, GraphGenError};
use digraphgen_test_support::edge_list::EdgeList;
use digraphgen_test_support::property_profile::ProptestRunProfile;
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use rstest::rstest;

fn proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

#[derive(Clone, Copy, Debug)]
struct Request {
    vertices: u32,
    min_depth: u32,
    additional: u32,
    cycles: bool,
    shuffle: bool,
}

impl Request {
    fn generate(self, seed: u64) -> Result<GeneratedGraph, GraphGenError> {
        GeneratorBuilder::new()
            .with_vertex_count(self.vertices)
            .with_min_depth(self.min_depth)
            .with_additional_edges(self.additional)
            .with_cycles(self.cycles)
            .with_shuffle(self.shuffle)
            .build()?
            .generate_seeded(seed)
    }
}

fn render(generated: &GeneratedGraph) -> EdgeList {
    let mut buffer = Vec::new();
    generated
        .write_to(&mut buffer)
        .expect("in-memory write must succeed");
    let text = String::from_utf8(buffer).expect("output must be UTF-8");
    EdgeList::parse(&text).expect("output must follow the edge list format")
}

/// Requests that use at most half of the free forward pairs, so the retry
/// budget is never the limiting factor.
fn sparse_request() -> impl Strategy<Value = Request> {
    (4_u32..40, any::<bool>(), any::<bool>())
        .prop_flat_map(|(vertices, cycles, shuffle)| {
            let depth_floor = if cycles { 2 } else { 0 };
            (Just(vertices), depth_floor..=vertices, Just(cycles), Just(shuffle))
        })
        .prop_flat_map(|(vertices, min_depth, cycles, shuffle)| {
            let forward_pairs = vertices * (vertices - 1) / 2;
            let ceiling = (forward_pairs - min_depth.saturating_sub(1)) / 2;
            (u32::from(cycles)..=ceiling).prop_map(move |additional| Request {
                vertices,
                min_depth,
                additional,
                cycles,
                shuffle,
            })
        })
}

#[test]
fn small_acyclic_backbone_matches_reference_output() {
    let request = Request {
        vertices: 5,
        min_depth: 3,
        additional: 0,
        cycles: false,
        shuffle: false,
    };
    let generated = request.generate(0).expect("generation must succeed");
    let mut buffer = Vec::new();
    generated.write_to(&mut buffer).expect("write must succeed");
    assert_eq!(String::from_utf8_lossy(&buffer), "5\n2\n0 1\n1 2\n");

    let listed = render(&generated);
    assert!(listed.contains(0, 1) && listed.contains(1, 2));
    assert!(!listed.contains(0, 2));
    assert_eq!(generated.report().placed, 0);
}

#[rstest]
// Four vertices on a full backbone leave three forward pairs and nine
// ordered pairs in total.
#[case::acyclic(false, 4)]
#[case::cyclic(true, 10)]
fn infeasible_request_exhausts_retry_budget(#[case] cycles: bool, #[case] additional: u32) {
    let request = Request {
        vertices: 4,
        min_depth: 4,
        additional,
        cycles,
        shuffle: false,
    };
    let err = request
        .generate(5)
        .expect_err("request exceeds the available pairs");
    assert!(matches!(err, GraphGenError::RetryBudgetExhausted { .. }));
}

#[test]
fn shuffle_changes_labels_only() {
    let plain = Request {
        vertices: 30,
        min_depth: 10,
        additional: 25,
        cycles: true,
        shuffle: false,
    };
    let shuffled = Request {
        shuffle: true,
        ..plain
    };
    let plain_graph = plain.generate(123).expect("generation must succeed");
    let shuffled_graph = shuffled.generate(123).expect("generation must succeed");

    assert_eq!(plain_graph.graph(), shuffled_graph.graph());
    let internal_edges: BTreeSet<(u32, u32)> = plain_graph.graph().edges().collect();
    assert_eq!(render(&plain_graph).edge_set(), internal_edges);
    assert!(!shuffled_graph.labels().is_identity());
    assert!(render(&shuffled_graph).is_relabelling_of(&render(&plain_graph)));
}

proptest! {
    #![proptest_config(proptest_config(128))]

    #[test]
    fn generated_graphs_satisfy_structural_invariants(
        request in sparse_request(),
        seed in any::<u64>(),
    ) {
        let generated = request.generate(seed).expect("sparse requests must succeed");
        let graph = generated.graph();
        let expected_edges = request.min_depth.saturating_sub(1) + request.additional;
        prop_assert_eq!(graph.edge_count(), expected_edges);
        prop_assert_eq!(generated.report().placed, request.additional);

        let internal: Vec<(u32, u32)> = graph.edges().collect();
        prop_assert_eq!(internal.len(), expected_edges as usize);
        prop_assert!(internal.iter().all(|(from, to)| from != to));

        for step in 1..request.min_depth {
            prop_assert!(graph.has_edge(step - 1, step), "backbone edge {} missing", step);
        }

        let unlabelled = EdgeList {
            vertex_count: request.vertices,
            edges: internal.clone(),
        };
        if request.cycles {
            prop_assert!(
                internal
                    .iter()
                    .any(|&(from, to)| to < from && from < request.min_depth),
                "no backward edge inside the backbone region"
            );
        } else {
            prop_assert!(unlabelled.is_forward_only());
        }

        let listed = render(&generated);
        prop_assert!(!listed.has_self_loops());
        prop_assert!(!listed.has_duplicates());
        prop_assert_eq!(listed.edges.len(), expected_edges as usize);
        if !request.shuffle {
            prop_assert_eq!(listed.edges, internal);
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_output(
        request in sparse_request(),
        seed in any::<u64>(),
    ) {
        let first = render(&request.generate(seed).expect("sparse requests must succeed"));
        let second = render(&request.generate(seed).expect("sparse requests must succeed"));
        prop_assert_eq!(first, second);
    }
}
