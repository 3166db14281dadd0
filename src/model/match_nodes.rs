//! # Extension Graph
//!
//! `MatchNodes` aggregates emitted path sets into a DAG keyed by the path each
//! entry extends, so a later combiner can ask for every known continuation of
//! a sub-chain without re-running enumeration.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::model::path::Path;

#[derive(Debug, Default)]
pub struct MatchNodes {
    /// Paths with no `derived_from`
    roots: HashSet<Arc<Path>>,
    /// Parent path -> known extensions of it
    extensions: HashMap<Arc<Path>, HashSet<Arc<Path>>>,
}

impl MatchNodes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a path and, walking up its chain, every ancestor link.
    ///
    /// Stops early once a link is already known, since its ancestors were
    /// registered with it.
    pub fn add_path(&mut self, path: &Arc<Path>) {
        let mut current = Arc::clone(path);
        loop {
            let parent = match &current.derived_from {
                None => {
                    self.roots.insert(current);
                    return;
                }
                Some(parent) => Arc::clone(parent),
            };
            let newly_added = self
                .extensions
                .entry(Arc::clone(&parent))
                .or_default()
                .insert(current);
            if !newly_added {
                return;
            }
            current = parent;
        }
    }

    pub fn add_paths<'a, I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = &'a Arc<Path>>,
    {
        for path in paths {
            self.add_path(path);
        }
    }

    /// Known continuations of `path`, or the root set for `None`
    pub fn potential_assignments(&self, path: Option<&Path>) -> Option<&HashSet<Arc<Path>>> {
        match path {
            None => Some(&self.roots),
            Some(path) => self.extensions.get(path),
        }
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Distinct paths registered, roots included
    pub fn len(&self) -> usize {
        self.roots.len() + self.extensions.values().map(HashSet::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
