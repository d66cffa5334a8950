//! Stable error codes for the core error taxonomy.

use digraphgen_core::{CyclePolicy, GraphGenError, GraphGenErrorCode};
use rstest::rstest;

#[rstest]
#[case(
    GraphGenError::DepthExceedsVertices { min_depth: 4, vertex_count: 3 },
    GraphGenErrorCode::DepthExceedsVertices,
    "GRAPHGEN_DEPTH_EXCEEDS_VERTICES",
    true,
)]
#[case(
    GraphGenError::CyclesRequireAdditionalEdges,
    GraphGenErrorCode::CyclesRequireAdditionalEdges,
    "GRAPHGEN_CYCLES_REQUIRE_ADDITIONAL_EDGES",
    true,
)]
#[case(
    GraphGenError::InvalidRetryBudget { got: 0 },
    GraphGenErrorCode::InvalidRetryBudget,
    "GRAPHGEN_INVALID_RETRY_BUDGET",
    true,
)]
#[case(
    GraphGenError::RetryBudgetExhausted {
        placed: 1,
        requested: 3,
        budget: 256,
        policy: CyclePolicy::Acyclic,
    },
    GraphGenErrorCode::RetryBudgetExhausted,
    "GRAPHGEN_RETRY_BUDGET_EXHAUSTED",
    false,
)]
fn returns_expected_code(
    #[case] error: GraphGenError,
    #[case] expected: GraphGenErrorCode,
    #[case] rendered: &str,
    #[case] validation: bool,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), rendered);
    assert_eq!(error.code().to_string(), rendered);
    assert_eq!(error.is_validation(), validation);
}

#[test]
fn messages_name_the_offending_parameters() {
    let depth = GraphGenError::DepthExceedsVertices {
        min_depth: 9,
        vertex_count: 5,
    };
    assert_eq!(
        depth.to_string(),
        "min_graph_depth (9) must not exceed num_vertices (5)"
    );

    let exhausted = GraphGenError::RetryBudgetExhausted {
        placed: 2,
        requested: 10,
        budget: 256,
        policy: CyclePolicy::Cyclic,
    };
    let message = exhausted.to_string();
    assert!(message.contains("2 of 10 placed"));
    assert!(message.contains("more than 256 consecutive rejections"));
    assert!(message.contains("cyclic policy"));
}
