//! Error types for the digraphgen core library.
//!
//! Defines the error enum exposed by the public API, its stable error codes,
//! and a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::sampler::CyclePolicy;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced when configuring or running [`crate::Generator`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphGenError {
    /// The backbone cannot be longer than the graph has vertices.
    #[error("min_graph_depth ({min_depth}) must not exceed num_vertices ({vertex_count})")]
    DepthExceedsVertices {
        /// Requested backbone length in vertices.
        min_depth: u32,
        /// Number of vertices in the graph.
        vertex_count: u32,
    },
    /// A cyclic graph needs at least one sampled edge to close its cycle.
    #[error("has_cycles must be false when additional_edges is less than 1")]
    CyclesRequireAdditionalEdges,
    /// The consecutive-failure threshold must admit at least one retry.
    #[error("retry budget must be at least 1 (got {got})")]
    InvalidRetryBudget {
        /// The rejected budget.
        got: u32,
    },
    /// The sampler gave up after too many consecutive rejected candidates.
    #[error(
        "too many attempts trying to generate an edge ({placed} of {requested} placed, \
         more than {budget} consecutive rejections under the {policy} policy); \
         are you sure a graph with these parameters is possible?"
    )]
    RetryBudgetExhausted {
        /// Additional edges placed before giving up.
        placed: u32,
        /// Additional edges requested.
        requested: u32,
        /// Consecutive-failure threshold that was exceeded.
        budget: u32,
        /// Sampling policy in force.
        policy: CyclePolicy,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphGenError`] variants.
    enum GraphGenErrorCode for GraphGenError {
        /// The backbone cannot be longer than the graph has vertices.
        DepthExceedsVertices => DepthExceedsVertices { .. } => "GRAPHGEN_DEPTH_EXCEEDS_VERTICES",
        /// A cyclic graph needs at least one sampled edge.
        CyclesRequireAdditionalEdges => CyclesRequireAdditionalEdges => "GRAPHGEN_CYCLES_REQUIRE_ADDITIONAL_EDGES",
        /// The consecutive-failure threshold must admit at least one retry.
        InvalidRetryBudget => InvalidRetryBudget { .. } => "GRAPHGEN_INVALID_RETRY_BUDGET",
        /// The sampler gave up after too many consecutive rejected candidates.
        RetryBudgetExhausted => RetryBudgetExhausted { .. } => "GRAPHGEN_RETRY_BUDGET_EXHAUSTED",
    }
}

impl GraphGenError {
    /// Returns `true` when the error was raised while validating parameters,
    /// before any graph construction took place.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::DepthExceedsVertices { .. }
                | Self::CyclesRequireAdditionalEdges
                | Self::InvalidRetryBudget { .. }
        )
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, GraphGenError>;
