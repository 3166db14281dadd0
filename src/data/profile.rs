//! # Match Profiles
//!
//! A genetic relative whose position relative to the main profile is being
//! hypothesized. Profiles are created once from ingested segment data and are
//! immutable afterwards; identity is the unique match id alone.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::data::segment::ChromosomeMatch;

/// Zero-cost newtype for match profile identifiers
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProfileId(pub Arc<str>);

impl ProfileId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProfileId {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

/// A match profile together with the evidence backing it.
#[derive(Clone, Debug)]
pub struct MatchProfile {
    pub id: ProfileId,
    pub is_male: bool,
    /// Shallowest generation at which an assignment may be claimed
    pub minimum_match_depth: u32,
    pub matches: Vec<ChromosomeMatch>,
}

impl MatchProfile {
    pub fn new(
        id: impl Into<ProfileId>,
        is_male: bool,
        minimum_match_depth: u32,
        matches: Vec<ChromosomeMatch>,
    ) -> Self {
        Self {
            id: id.into(),
            is_male,
            minimum_match_depth,
            matches,
        }
    }

    /// Total shared centimorgans across all segments
    pub fn total_centimorgans(&self) -> f64 {
        self.matches.iter().map(|m| m.centimorgans).sum()
    }
}

impl PartialEq for MatchProfile {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MatchProfile {}

impl Hash for MatchProfile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for MatchProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
