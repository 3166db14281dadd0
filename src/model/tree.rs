//! # Multi-Profile Driver
//!
//! ## Role
//! Owns one `MatchState` per match profile and walks the cross-product of
//! their sequences as an odometer: the first profile spins fastest, and each
//! exhaustion resets that profile and carries into the next.
//!
//! ## Scope
//! The driver only exposes the simultaneous per-profile path sets. Combining
//! them into one consistent tree is left to callers; `record_current` feeds
//! them into a `MatchNodes` graph for that purpose.

use std::sync::Arc;

use tracing::debug;

use crate::data::profile::MatchProfile;
use crate::error::{DnacladError, Result};
use crate::model::match_nodes::MatchNodes;
use crate::model::match_state::{MatchState, PathSet};
use crate::model::parameters::EnumerationParams;

/// One path set per profile, in profile order
pub type Combination = Vec<(Arc<MatchProfile>, PathSet)>;

#[derive(Debug)]
pub struct TreeIterator {
    states: Vec<MatchState>,
    params: EnumerationParams,
}

impl TreeIterator {
    pub fn new(profiles: Vec<Arc<MatchProfile>>, params: &EnumerationParams) -> Result<Self> {
        params.validate()?;
        let states = profiles
            .into_iter()
            .map(|profile| MatchState::for_profile(profile, params))
            .collect::<Result<Vec<_>>>()?;
        debug!(profiles = states.len(), "tree iterator initialized");
        Ok(Self {
            states,
            params: *params,
        })
    }

    pub fn params(&self) -> &EnumerationParams {
        &self.params
    }

    pub fn profile_count(&self) -> usize {
        self.states.len()
    }

    pub fn reset(&mut self) {
        for state in &mut self.states {
            state.reset();
        }
    }

    /// True with no profiles, or once any profile's sequence is exhausted
    pub fn at_end(&mut self) -> Result<bool> {
        if self.states.is_empty() {
            return Ok(true);
        }
        for state in &mut self.states {
            if state.at_end()? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn current_combination(&mut self) -> Result<Combination> {
        if self.at_end()? {
            return Err(DnacladError::exhausted("no current profile combination"));
        }
        self.states
            .iter_mut()
            .map(|state| -> Result<_> {
                Ok((Arc::clone(state.profile()), state.current_path_set()?))
            })
            .collect()
    }

    /// Odometer step across profiles
    pub fn advance(&mut self) -> Result<()> {
        if self.at_end()? {
            return Err(DnacladError::exhausted(
                "cannot advance past the last profile combination",
            ));
        }
        let last = self.states.len() - 1;
        for (i, state) in self.states.iter_mut().enumerate() {
            state.advance()?;
            if !state.at_end()? || i == last {
                return Ok(());
            }
            state.reset();
        }
        Ok(())
    }

    /// Feed every path of the current combination into `nodes`
    pub fn record_current(&mut self, nodes: &mut MatchNodes) -> Result<()> {
        for (_, set) in self.current_combination()? {
            nodes.add_paths(&set);
        }
        Ok(())
    }

    /// Reset and count combinations, stopping at `limit` when given
    pub fn count_combinations(&mut self, limit: Option<usize>) -> Result<usize> {
        self.reset();
        let mut count = 0;
        while !self.at_end()? {
            if limit.is_some_and(|limit| count >= limit) {
                break;
            }
            count += 1;
            self.advance()?;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, male: bool, depth: u32) -> Arc<MatchProfile> {
        Arc::new(MatchProfile::new(id, male, depth, Vec::new()))
    }

    fn params(max_depth: u32, maximum_paths: usize) -> EnumerationParams {
        EnumerationParams::new(max_depth, maximum_paths).unwrap()
    }

    #[test]
    fn test_empty_is_at_end() {
        let mut tree = TreeIterator::new(Vec::new(), &params(3, 2)).unwrap();
        assert!(tree.at_end().unwrap());
        assert_eq!(tree.count_combinations(None).unwrap(), 0);
        assert!(matches!(
            tree.current_combination(),
            Err(DnacladError::Exhausted { .. })
        ));
    }

    #[test]
    fn test_advance_after_exhaustion_fails() {
        let mut tree = TreeIterator::new(
            vec![profile("a", true, 5), profile("b", false, 5)],
            &params(9, 1),
        )
        .unwrap();
        for _ in 0..25 {
            tree.advance().unwrap();
        }
        assert!(tree.at_end().unwrap());
        assert!(matches!(tree.advance(), Err(DnacladError::Exhausted { .. })));

        let mut empty = TreeIterator::new(Vec::new(), &params(9, 1)).unwrap();
        assert!(matches!(empty.advance(), Err(DnacladError::Exhausted { .. })));
    }

    #[test]
    fn test_cross_product_size() {
        let p = params(9, 1);
        let mut single = TreeIterator::new(vec![profile("a", true, 5)], &p).unwrap();
        assert_eq!(single.count_combinations(None).unwrap(), 5);

        let mut pair = TreeIterator::new(
            vec![profile("a", true, 5), profile("b", false, 5)],
            &p,
        )
        .unwrap();
        assert_eq!(pair.count_combinations(None).unwrap(), 25);
    }

    #[test]
    fn test_first_profile_spins_fastest() {
        let p = params(9, 1);
        let mut tree = TreeIterator::new(
            vec![profile("a", true, 5), profile("b", true, 5)],
            &p,
        )
        .unwrap();
        let depths = |tree: &mut TreeIterator| -> (u32, u32) {
            let combo = tree.current_combination().unwrap();
            (combo[0].1[0].depth(), combo[1].1[0].depth())
        };
        assert_eq!(depths(&mut tree), (5, 5));
        tree.advance().unwrap();
        assert_eq!(depths(&mut tree), (6, 5));
        for _ in 0..4 {
            tree.advance().unwrap();
        }
        assert_eq!(depths(&mut tree), (5, 6));
    }

    #[test]
    fn test_limit_and_record() {
        let mut tree = TreeIterator::new(
            vec![profile("a", true, 2), profile("b", false, 2)],
            &params(4, 2),
        )
        .unwrap();
        assert_eq!(tree.count_combinations(Some(7)).unwrap(), 7);

        tree.reset();
        let mut nodes = MatchNodes::new();
        tree.record_current(&mut nodes).unwrap();
        assert!(!nodes.is_empty());
    }

    #[test]
    fn test_unreachable_profile_blocks_everything() {
        let mut tree = TreeIterator::new(
            vec![profile("a", true, 2), profile("b", true, 9)],
            &params(4, 2),
        )
        .unwrap();
        assert!(tree.at_end().unwrap());
    }
}
