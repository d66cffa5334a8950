//! Synthetic directed graph generation.
//!
//! Builds a graph over a fixed vertex set in three steps: a deterministic
//! backbone path guaranteeing a minimum depth, a randomised sampler adding
//! extra edges under a cyclic or acyclic policy, and an optional label
//! shuffle applied when the graph is written out as an edge list.
//!
//! # Metrics
//!
//! When the `metrics` feature is enabled the sampler emits:
//!
//! - `sampler_edges_accepted` (counter)
//! - `sampler_attempts_rejected` (counter)
#![cfg_attr(docsrs, feature(doc_cfg))]

mod backbone;
mod builder;
mod error;
mod generator;
mod graph;
mod labels;
mod rng;
mod sampler;
mod serialize;

pub use crate::{
    backbone::build_backbone,
    builder::{GeneratorBuilder, GraphParams},
    error::{GraphGenError, GraphGenErrorCode, Result},
    generator::{GeneratedGraph, Generator},
    graph::AdjacencyMatrix,
    labels::LabelMapping,
    sampler::{CyclePolicy, DEFAULT_RETRY_BUDGET, EdgeSampler, SamplerReport},
    serialize::write_edge_list,
};
