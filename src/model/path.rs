//! # Ancestry Paths
//!
//! A `Path` is one collapsed segment of an ancestry chain: an assignment (or a
//! pass-through articulation node) at some depth, linked either to the match
//! profile's root or to the `Path` it extends.
//!
//! Key concepts:
//! - Unassigned generations between two links are collapsed into
//!   `intervening_generations` so the enumerator never walks them one by one
//! - Parents are shared through `Arc`, so every emitted set that extends the
//!   same node points at one allocation
//! - Equality and hashing are structural, recursively through `derived_from`;
//!   two independently built chains describing the same ancestry compare equal

use std::fmt;
use std::sync::Arc;

use crate::data::profile::MatchProfile;

/// One link in a match profile's ancestry chain.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Path {
    /// Owning match profile (identity by id)
    pub profile: Arc<MatchProfile>,
    /// Male parent at this node's depth is claimed as a shared ancestor
    pub includes_male: bool,
    /// Female parent at this node's depth is claimed as a shared ancestor
    pub includes_female: bool,
    /// Unassigned generations between this node and `derived_from` (or the root)
    pub intervening_generations: u32,
    /// Whether this node is reached through the male side of its parent link
    pub is_male_child: bool,
    /// The path this one extends; `None` when rooted at the profile itself
    pub derived_from: Option<Arc<Path>>,
}

impl Path {
    pub fn new(
        profile: Arc<MatchProfile>,
        includes_male: bool,
        includes_female: bool,
        intervening_generations: u32,
        is_male_child: bool,
        derived_from: Option<Arc<Path>>,
    ) -> Self {
        Self {
            profile,
            includes_male,
            includes_female,
            intervening_generations,
            is_male_child,
            derived_from,
        }
    }

    /// Both parent slots claimed: nothing is left to extend
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.includes_male && self.includes_female
    }

    /// Neither slot claimed: the node only exists to let both branches continue
    #[inline]
    pub fn is_pass_through(&self) -> bool {
        !self.includes_male && !self.includes_female
    }

    /// Generations above the profile root (1 = the profile's parents)
    pub fn depth(&self) -> u32 {
        self.chain().map(|p| p.intervening_generations + 1).sum()
    }

    /// Iterate from this path up through every `derived_from` link
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// Number of links in the chain, this one included
    pub fn chain_len(&self) -> usize {
        self.chain().count()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}{}{}{}",
            self.profile,
            if self.includes_male { "M" } else { "" },
            if self.includes_female { "F" } else { "" },
            self.intervening_generations,
            if self.is_male_child { "M" } else { "F" },
        )?;
        if let Some(parent) = &self.derived_from {
            write!(f, ":{}", parent)?;
        }
        Ok(())
    }
}

/// Iterator over a path and its ancestors, nearest first
pub struct Chain<'a> {
    next: Option<&'a Path>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Path;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.derived_from.as_deref();
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str) -> Arc<MatchProfile> {
        Arc::new(MatchProfile::new(id, true, 1, Vec::new()))
    }

    #[test]
    fn test_structural_equality() {
        let p = profile("carol");
        let a_root = Arc::new(Path::new(p.clone(), false, false, 1, true, None));
        let b_root = Arc::new(Path::new(p.clone(), false, false, 1, true, None));
        let a = Path::new(p.clone(), true, false, 0, false, Some(a_root));
        let b = Path::new(p.clone(), true, false, 0, false, Some(b_root));
        assert_eq!(a, b);

        let other_parent = Arc::new(Path::new(p.clone(), false, false, 2, true, None));
        let c = Path::new(p, true, false, 0, false, Some(other_parent));
        assert_ne!(a, c);
    }

    #[test]
    fn test_depth_and_terminal() {
        let p = profile("dave");
        let pass = Arc::new(Path::new(p.clone(), false, false, 0, true, None));
        assert!(pass.is_pass_through());
        assert_eq!(pass.depth(), 1);

        let both = Path::new(p, true, true, 2, false, Some(pass));
        assert!(both.is_terminal());
        assert_eq!(both.depth(), 4);
        assert_eq!(both.chain_len(), 2);
    }

    #[test]
    fn test_display() {
        let p = profile("erin");
        let root = Arc::new(Path::new(p.clone(), false, false, 0, true, None));
        let leaf = Path::new(p, true, true, 1, false, Some(root));
        assert_eq!(leaf.to_string(), "erin:MF1F:erin:0M");
    }
}
