//! # Enumeration Parameters
//!
//! ## Role
//! Pure data structure for the global enumeration hyperparameters shared by
//! every match profile's enumerator.
//!
//! ## Parameters
//! - `max_depth`: generation ceiling. Depth 1 is the profile's parents,
//!   2 its grandparents, and so on. At most `u32::MAX - 1`. Default: 10
//! - `maximum_paths`: hard cap on the number of assignments a single
//!   hypothesis for one match profile may contain. Must lie in `1..=4`
//!   so the recursive fan-out stays bounded. Default: 2

use crate::error::{DnacladError, Result};

/// Largest per-profile assignment budget the enumerator supports
pub const MAX_PATHS_LIMIT: usize = 4;

/// Deepest generation ceiling; the cursor must be able to step one past it
pub const MAX_DEPTH_LIMIT: u32 = u32::MAX - 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnumerationParams {
    /// Deepest generation considered
    pub max_depth: u32,
    /// Maximum number of paths in one emitted set
    pub maximum_paths: usize,
}

impl EnumerationParams {
    /// Create validated parameters
    pub fn new(max_depth: u32, maximum_paths: usize) -> Result<Self> {
        let params = Self {
            max_depth,
            maximum_paths,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_DEPTH_LIMIT).contains(&self.max_depth) {
            return Err(DnacladError::invalid_parameters(format!(
                "max depth must be between 1 and {}, got {}",
                MAX_DEPTH_LIMIT, self.max_depth
            )));
        }
        if !(1..=MAX_PATHS_LIMIT).contains(&self.maximum_paths) {
            return Err(DnacladError::invalid_parameters(format!(
                "maximum paths must be between 1 and {}, got {}",
                MAX_PATHS_LIMIT, self.maximum_paths
            )));
        }
        Ok(())
    }
}

impl Default for EnumerationParams {
    fn default() -> Self {
        Self {
            max_depth: 10,
            maximum_paths: 2,
        }
    }
}
