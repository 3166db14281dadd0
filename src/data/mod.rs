//! # Data Module
//!
//! In-memory representations of match evidence. This is the "Model" layer the
//! readers in `io` populate and the enumeration engine in `model` consumes.
//!
//! - **Shared immutable strings:** ids and chromosome names are `Arc<str>` so
//!   segments and profiles can be cloned into paths and groups cheaply.
//! - **Identity newtypes:** `ProfileId` keeps profile identity distinct from
//!   other string fields.

pub mod profile;
pub mod segment;

// Re-export commonly used types
pub use profile::{MatchProfile, ProfileId};
pub use segment::ChromosomeMatch;
