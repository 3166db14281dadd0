//! # Per-Profile Path Enumeration
//!
//! `MatchState` lazily enumerates every self-consistent way one match profile's
//! unknown ancestors could be assigned to ancestor slots between a starting
//! depth and `max_depth`, never exceeding `maximum_paths` assignments in a
//! single emitted set.
//!
//! Key concepts:
//! - The cursor is a nested odometer over three axes: child extensions,
//!   multiplicity (`PathOnly` / `IncludeExtension`) and sex state, with depth
//!   as the outermost carry
//! - Each open parent slot at the current depth is extended by an owned child
//!   `MatchState` one generation deeper with one unit less budget
//! - Normalization rewrites the raw cursor to the first legal state before any
//!   result is read; illegal states are skipped, never emitted
//!
//! ## Extension lifetime
//! The extension path and its children are built together once per cursor
//! position. Advancing steps the male-side child first; once it is exhausted
//! it is retired (not rebuilt for this position) and the female-side child is
//! stepped. A pass-through node whose children yield `m` and `f` sets
//! therefore emits `m + f - 1` sets.
//!
//! ## Usage
//! ```rust,ignore
//! let mut state = MatchState::for_profile(profile, &EnumerationParams::default())?;
//! while !state.at_end()? {
//!     let set = state.current_path_set()?;
//!     state.advance()?;
//! }
//! ```

use std::sync::Arc;

use crate::data::profile::MatchProfile;
use crate::error::{DnacladError, Result};
use crate::model::parameters::{EnumerationParams, MAX_DEPTH_LIMIT, MAX_PATHS_LIMIT};
use crate::model::path::Path;

/// One emitted hypothesis: the paths claimed for a single match profile
pub type PathSet = Vec<Arc<Path>>;

/// Which parent slot(s) at the current depth are claimed.
///
/// `Neither` is a pass-through articulation node: nothing is claimed here but
/// both parent branches are still explored deeper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SexState {
    Neither,
    FemaleOnly,
    MaleOnly,
    Both,
}

impl SexState {
    pub const FIRST: SexState = SexState::Neither;

    /// Next state on this axis, `None` once the axis is exhausted
    pub fn next(self) -> Option<SexState> {
        match self {
            SexState::Neither => Some(SexState::FemaleOnly),
            SexState::FemaleOnly => Some(SexState::MaleOnly),
            SexState::MaleOnly => Some(SexState::Both),
            SexState::Both => None,
        }
    }

    #[inline]
    pub fn includes_male(self) -> bool {
        matches!(self, SexState::MaleOnly | SexState::Both)
    }

    #[inline]
    pub fn includes_female(self) -> bool {
        matches!(self, SexState::FemaleOnly | SexState::Both)
    }
}

/// Whether the emitted set is the current path alone or also its extensions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Multiplicity {
    PathOnly,
    IncludeExtension,
}

impl Multiplicity {
    pub const FIRST: Multiplicity = Multiplicity::PathOnly;

    pub fn next(self) -> Option<Multiplicity> {
        match self {
            Multiplicity::PathOnly => Some(Multiplicity::IncludeExtension),
            Multiplicity::IncludeExtension => None,
        }
    }
}

/// Local cursor of one enumerator (children excluded)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub depth: u32,
    pub sex: SexState,
    pub multiplicity: Multiplicity,
}

impl Cursor {
    fn at(depth: u32, sex: SexState, multiplicity: Multiplicity) -> Self {
        Self {
            depth,
            sex,
            multiplicity,
        }
    }

    #[inline]
    fn extending(&self) -> bool {
        self.multiplicity == Multiplicity::IncludeExtension
    }
}

/// Path built for the current cursor plus the children extending its open slots
#[derive(Debug)]
struct Extension {
    path: Arc<Path>,
    male: Option<Box<MatchState>>,
    female: Option<Box<MatchState>>,
}

impl Extension {
    fn assemble(&mut self, sex: SexState, capacity: usize) -> Result<PathSet> {
        let mut set = PathSet::with_capacity(capacity);
        if sex != SexState::Neither {
            set.push(Arc::clone(&self.path));
        }
        if let Some(child) = self.male.as_mut() {
            set.extend(child.current_path_set()?);
        }
        if let Some(child) = self.female.as_mut() {
            set.extend(child.current_path_set()?);
        }
        Ok(set)
    }
}

/// Lazy, finite, restartable enumerator of path sets for one match profile.
#[derive(Debug)]
pub struct MatchState {
    // --- Fixed at construction ---
    profile: Arc<MatchProfile>,
    path_to_extend: Option<Arc<Path>>,
    start_depth: u32,
    lowest_level_match: u32,
    max_depth: u32,
    maximum_paths: usize,
    is_path_profile_male: bool,

    // --- Cursor ---
    cursor: Cursor,
    extension: Option<Extension>,
    result: Option<PathSet>,
}

impl MatchState {
    /// Create an enumerator extending `path_to_extend` (or the profile root).
    ///
    /// # Errors
    /// `InvalidParameters` if `maximum_paths` is outside `1..=4`, `depth < 1`,
    /// `depth > max_depth` or `max_depth == u32::MAX`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        profile: Arc<MatchProfile>,
        path_to_extend: Option<Arc<Path>>,
        depth: u32,
        lowest_level_match: u32,
        max_depth: u32,
        maximum_paths: usize,
        is_path_profile_male: bool,
    ) -> Result<Self> {
        if !(1..=MAX_PATHS_LIMIT).contains(&maximum_paths) {
            return Err(DnacladError::invalid_parameters(format!(
                "maximum paths must be between 1 and {}, got {}",
                MAX_PATHS_LIMIT, maximum_paths
            )));
        }
        if depth < 1 {
            return Err(DnacladError::invalid_parameters("start depth must be at least 1"));
        }
        if max_depth > MAX_DEPTH_LIMIT {
            return Err(DnacladError::invalid_parameters(format!(
                "max depth must be at most {}, got {}",
                MAX_DEPTH_LIMIT, max_depth
            )));
        }
        if depth > max_depth {
            return Err(DnacladError::invalid_parameters(format!(
                "start depth {} exceeds max depth {}",
                depth, max_depth
            )));
        }

        Ok(Self {
            profile,
            path_to_extend,
            start_depth: depth,
            lowest_level_match,
            max_depth,
            maximum_paths,
            is_path_profile_male,
            cursor: Cursor::at(depth, SexState::FIRST, Multiplicity::FIRST),
            extension: None,
            result: None,
        })
    }

    /// Root enumerator for a profile: starts at its parents (depth 1)
    pub fn for_profile(profile: Arc<MatchProfile>, params: &EnumerationParams) -> Result<Self> {
        let lowest_level_match = profile.minimum_match_depth;
        let is_male = profile.is_male;
        Self::new(
            profile,
            None,
            1,
            lowest_level_match,
            params.max_depth,
            params.maximum_paths,
            is_male,
        )
    }

    pub fn profile(&self) -> &Arc<MatchProfile> {
        &self.profile
    }

    pub fn maximum_paths(&self) -> usize {
        self.maximum_paths
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn lowest_level_match(&self) -> u32 {
        self.lowest_level_match
    }

    /// Raw cursor position (not normalized)
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Rewind to the first candidate state
    pub fn reset(&mut self) {
        self.move_to(Cursor::at(
            self.start_depth,
            SexState::FIRST,
            Multiplicity::FIRST,
        ));
    }

    /// Normalize and report whether the sequence is exhausted
    pub fn at_end(&mut self) -> Result<bool> {
        self.normalize()?;
        Ok(self.cursor.depth > self.max_depth || self.maximum_paths == 0)
    }

    /// Normalize and return the current path set.
    ///
    /// # Errors
    /// `Exhausted` if called after the sequence ended.
    pub fn current_path_set(&mut self) -> Result<PathSet> {
        if self.at_end()? {
            return Err(DnacladError::exhausted(format!(
                "no current path set for profile {} past depth {}",
                self.profile, self.max_depth
            )));
        }
        self.ensure_result()?;
        match &self.result {
            Some(set) => Ok(set.clone()),
            None => Err(DnacladError::invariant("result missing after computation")),
        }
    }

    /// Move to the next raw state; the following `at_end`/`current_path_set`
    /// call normalizes it.
    pub fn advance(&mut self) -> Result<()> {
        if self.at_end()? {
            return Err(DnacladError::exhausted(format!(
                "cannot advance enumerator for profile {} past its end",
                self.profile
            )));
        }
        self.step()
    }

    /// Reset and drain the sequence as an iterator
    pub fn path_sets(&mut self) -> PathSets<'_> {
        self.reset();
        PathSets {
            state: self,
            done: false,
        }
    }

    /// Reset and count every path set in the sequence
    pub fn count_path_sets(&mut self) -> Result<usize> {
        let mut count = 0;
        for set in self.path_sets() {
            set?;
            count += 1;
        }
        Ok(count)
    }

    // ========================================================================
    // Normalization
    // ========================================================================

    /// Rewrite the cursor until it reaches a legal, budget-respecting state
    /// or runs past `max_depth`.
    fn normalize(&mut self) -> Result<()> {
        if self.lowest_level_match > self.max_depth && self.cursor.depth <= self.max_depth {
            // No depth can carry an assignment
            self.move_to(Cursor::at(
                self.max_depth + 1,
                SexState::FIRST,
                Multiplicity::FIRST,
            ));
        }

        loop {
            if self.cursor.depth > self.max_depth {
                return Ok(());
            }
            if let Some(legal) = self.repair() {
                self.move_to(legal);
                continue;
            }
            if self.ensure_result()? > self.maximum_paths {
                self.step()?;
                continue;
            }
            return Ok(());
        }
    }

    /// First rule that rejects the current cursor, as the cursor to move to.
    /// Rules are checked in priority order; `None` means structurally legal.
    fn repair(&self) -> Option<Cursor> {
        use Multiplicity::{IncludeExtension, PathOnly};
        use SexState::{Both, FemaleOnly, Neither};

        let Cursor { depth, sex, .. } = self.cursor;
        let extending = self.cursor.extending();

        // A budget of one leaves nothing for an extension
        if self.maximum_paths == 1 && sex != Both && extending {
            return Some(Cursor::at(depth, Both, PathOnly));
        }
        // Too shallow to claim anything
        if depth < self.lowest_level_match && sex != Neither {
            return Some(Cursor::at(depth + 1, Neither, IncludeExtension));
        }
        if depth == self.max_depth && sex == Neither {
            return Some(Cursor::at(depth, FemaleOnly, PathOnly));
        }
        if depth == self.max_depth && extending && sex != Both {
            return Some(Cursor::at(depth, Both, PathOnly));
        }
        // A pass-through needs budget for both branches
        if self.maximum_paths < 2 && sex == Neither {
            return Some(Cursor::at(depth, FemaleOnly, PathOnly));
        }
        if !extending && sex == Neither {
            return Some(Cursor::at(depth, Neither, IncludeExtension));
        }
        // Both slots claimed: nothing to extend
        if extending && sex == Both {
            return Some(Cursor::at(depth + 1, Neither, IncludeExtension));
        }
        None
    }

    // ========================================================================
    // Result computation
    // ========================================================================

    /// Compute (if not cached) the current set; returns its size
    fn ensure_result(&mut self) -> Result<usize> {
        if let Some(set) = &self.result {
            return Ok(set.len());
        }

        let mut extension = match self.extension.take() {
            Some(extension) => extension,
            None => self.build_extension()?,
        };
        let assembled = extension.assemble(self.cursor.sex, self.maximum_paths);
        self.extension = Some(extension);

        let set = assembled?;
        let len = set.len();
        self.result = Some(set);
        Ok(len)
    }

    fn build_extension(&self) -> Result<Extension> {
        let Cursor { depth, sex, .. } = self.cursor;
        let path = Arc::new(Path::new(
            Arc::clone(&self.profile),
            sex.includes_male(),
            sex.includes_female(),
            depth - self.start_depth,
            self.is_path_profile_male,
            self.path_to_extend.clone(),
        ));

        let mut male = None;
        let mut female = None;
        if self.cursor.extending() && sex != SexState::Both {
            if !sex.includes_male() {
                male = Some(self.spawn_child(&path, true)?);
            }
            if !sex.includes_female() {
                female = Some(self.spawn_child(&path, false)?);
            }
        }

        Ok(Extension { path, male, female })
    }

    fn spawn_child(&self, extension: &Arc<Path>, male_side: bool) -> Result<Box<MatchState>> {
        let depth = self.cursor.depth + 1;
        let mut child = MatchState::new(
            Arc::clone(&self.profile),
            Some(Arc::clone(extension)),
            depth,
            self.lowest_level_match,
            self.max_depth,
            self.maximum_paths - 1,
            male_side,
        )
        .map_err(|e| {
            DnacladError::invariant(format!("child enumerator at depth {} rejected: {}", depth, e))
        })?;

        if child.at_end()? {
            return Err(DnacladError::invariant(format!(
                "child enumerator for {} at depth {} with budget {} is empty",
                self.profile,
                depth,
                self.maximum_paths - 1
            )));
        }

        tracing::trace!(
            profile = %self.profile,
            depth,
            male_side,
            budget = self.maximum_paths - 1,
            "spawned child enumerator"
        );
        Ok(Box::new(child))
    }

    // ========================================================================
    // Advancement
    // ========================================================================

    /// One raw odometer step: children first, then the local cursor.
    fn step(&mut self) -> Result<()> {
        self.result = None;

        if let Some(extension) = self.extension.as_mut() {
            if let Some(child) = extension.male.as_mut() {
                child.advance()?;
                if !child.at_end()? {
                    return Ok(());
                }
                extension.male = None;
            }
            if let Some(child) = extension.female.as_mut() {
                child.advance()?;
                if !child.at_end()? {
                    return Ok(());
                }
                extension.female = None;
            }
        }

        self.advance_cursor();
        Ok(())
    }

    /// Carry through multiplicity, then sex, then depth
    fn advance_cursor(&mut self) {
        let Cursor {
            depth,
            sex,
            multiplicity,
        } = self.cursor;

        let next = if let Some(multiplicity) = multiplicity.next() {
            Cursor::at(depth, sex, multiplicity)
        } else if let Some(sex) = sex.next() {
            Cursor::at(depth, sex, Multiplicity::FIRST)
        } else {
            Cursor::at(depth + 1, SexState::FIRST, Multiplicity::FIRST)
        };
        self.move_to(next);
    }

    /// Every cursor rewrite drops the cached extension, children and result
    fn move_to(&mut self, cursor: Cursor) {
        self.cursor = cursor;
        self.extension = None;
        self.result = None;
    }
}

/// Draining iterator returned by [`MatchState::path_sets`]
pub struct PathSets<'a> {
    state: &'a mut MatchState,
    done: bool,
}

impl PathSets<'_> {
    fn pull(&mut self) -> Result<Option<PathSet>> {
        if self.state.at_end()? {
            return Ok(None);
        }
        let set = self.state.current_path_set()?;
        self.state.advance()?;
        Ok(Some(set))
    }
}

impl Iterator for PathSets<'_> {
    type Item = Result<PathSet>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.pull() {
            Ok(Some(set)) => Some(Ok(set)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
