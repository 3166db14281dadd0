//! # Model Module
//!
//! Hypothesis enumeration and segment clustering.
//!
//! ## Core Algorithms
//! - `MatchState`: lazy per-profile enumerator of ancestor assignments
//! - `Path`: collapsed link in an ancestry chain, shared through `Arc`
//! - `MatchNodes`: extension graph over emitted paths
//! - `TreeIterator`: odometer over every profile's enumerator
//! - `Grouper`: overlap-merge clustering of raw segments with hierarchical
//!   decomposition
//! - `Parameters`: depth ceiling and per-profile assignment budget
//!
//! ## Why an Odometer Instead of Materialized Trees
//!
//! The number of hypotheses grows combinatorially with depth and budget, and
//! the cross-product over profiles multiplies that again. Every enumerator
//! here is a small cursor that computes its current result on demand, so
//! memory stays bounded by `max_depth * maximum_paths` per profile no matter
//! how many hypotheses are walked.

pub mod grouper;
pub mod match_nodes;
pub mod match_state;
pub mod parameters;
pub mod path;
pub mod tree;
