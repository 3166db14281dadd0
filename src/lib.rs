//! # Dnaclad Library
//!
//! Hypothesizes shared-ancestry trees between a subject and the genetic
//! relatives that share chromosome segments with them.
//!
//! ## Modules
//! - `config`: CLI argument parsing and validation
//! - `data`: In-memory representations of match evidence
//! - `error`: Error types and result aliases
//! - `io`: CSV reading/writing (match exports, group labels, group report)
//! - `model`: Path enumeration engine and segment grouping
//! - `pipelines`: High-level workflow orchestration
//! - `utils`: Telemetry and thread pool helpers

pub mod config;
pub mod data;
pub mod error;
pub mod io;
pub mod model;
pub mod pipelines;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use data::profile::{MatchProfile, ProfileId};
pub use data::segment::ChromosomeMatch;
pub use error::{DnacladError, Result};
pub use io::groups::GroupsData;
pub use io::matches::MatchesData;
pub use model::grouper::Grouper;
pub use model::match_nodes::MatchNodes;
pub use model::match_state::{MatchState, PathSet};
pub use model::parameters::EnumerationParams;
pub use model::path::Path;
pub use model::tree::TreeIterator;

pub use pipelines::{EnumerationPipeline, GroupingPipeline, Lister};
