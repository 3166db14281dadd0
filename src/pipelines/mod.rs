//! # Pipeline Module
//!
//! High-level orchestration of the enumerate, group and list workflows.
//! Coordinates I/O, telemetry and algorithm execution.

pub mod enumeration;
pub mod grouping;
pub mod listing;

pub use enumeration::EnumerationPipeline;
pub use grouping::GroupingPipeline;
pub use listing::Lister;
