//! # Enumeration Pipeline
//!
//! Orchestrates hypothesis enumeration:
//! 1. Load chromosome match files into profiles
//! 2. Drain each profile's enumerator on the rayon pool, one owner per profile
//! 3. Optionally walk the cross-product of profiles and feed it into an
//!    extension graph
//! 4. Summarize per-profile counts

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{info, info_span, instrument};

use crate::config::EnumerateArgs;
use crate::data::profile::{MatchProfile, ProfileId};
use crate::error::Result;
use crate::io::matches::MatchesData;
use crate::model::match_nodes::MatchNodes;
use crate::model::match_state::MatchState;
use crate::model::parameters::EnumerationParams;
use crate::model::tree::TreeIterator;
use crate::utils::telemetry::{Stage, TelemetryBlackboard};

/// What draining one profile's enumerator found
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileSummary {
    pub profile: ProfileId,
    pub segments: usize,
    pub path_sets: usize,
    /// Largest emitted set
    pub widest_set: usize,
    /// Deepest assignment in any emitted set
    pub deepest_assignment: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnumerationReport {
    pub profiles: Vec<ProfileSummary>,
    /// Cross-profile combinations walked, when requested
    pub combinations: Option<usize>,
    /// Distinct paths recorded in the extension graph during the walk
    pub graph_paths: usize,
}

impl EnumerationReport {
    pub fn total_path_sets(&self) -> usize {
        self.profiles.iter().map(|p| p.path_sets).sum()
    }

    pub fn write_to<W: Write>(&self, mut out: W) -> Result<()> {
        writeln!(out, "profile\tsegments\tpath_sets\twidest_set\tdeepest")?;
        for summary in &self.profiles {
            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}",
                summary.profile,
                summary.segments,
                summary.path_sets,
                summary.widest_set,
                summary.deepest_assignment
            )?;
        }
        writeln!(out, "Total path sets = {}", self.total_path_sets())?;
        if let Some(combinations) = self.combinations {
            writeln!(
                out,
                "Combinations walked = {} ({} distinct paths)",
                combinations, self.graph_paths
            )?;
        }
        Ok(())
    }
}

pub struct EnumerationPipeline {
    params: EnumerationParams,
    profiles: Vec<Arc<MatchProfile>>,
    combination_limit: Option<usize>,
    telemetry: Option<Arc<TelemetryBlackboard>>,
}

impl EnumerationPipeline {
    pub fn new(
        params: EnumerationParams,
        profiles: Vec<Arc<MatchProfile>>,
        telemetry: Option<Arc<TelemetryBlackboard>>,
    ) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            profiles,
            combination_limit: None,
            telemetry,
        })
    }

    /// Load the match files named in `args` and build profiles from them
    pub fn from_args(args: &EnumerateArgs, telemetry: Option<Arc<TelemetryBlackboard>>) -> Result<Self> {
        if let Some(t) = &telemetry {
            t.set_stage(Stage::LoadingData);
        }
        let data = load_matches(&args.matches)?;
        if let Some(t) = &telemetry {
            t.add_segments(data.segment_count() as u64);
        }
        let profiles = data.profiles(!args.female, args.min_match_depth);
        let mut pipeline = Self::new(args.params(), profiles, telemetry)?;
        pipeline.combination_limit = args.combinations;
        Ok(pipeline)
    }

    pub fn with_combination_limit(mut self, limit: Option<usize>) -> Self {
        self.combination_limit = limit;
        self
    }

    pub fn run(&self) -> Result<EnumerationReport> {
        let _span = info_span!("enumerate", profiles = self.profiles.len()).entered();
        if let Some(t) = &self.telemetry {
            t.set_stage(Stage::Enumerating);
            t.set_total_profiles(self.profiles.len() as u64);
        }

        let profiles = self
            .profiles
            .par_iter()
            .map(|profile| -> Result<ProfileSummary> {
                let summary = summarize_profile(Arc::clone(profile), &self.params)?;
                if let Some(t) = &self.telemetry {
                    t.add_path_sets(summary.path_sets as u64);
                    t.profile_done();
                }
                Ok(summary)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut report = EnumerationReport {
            profiles,
            ..EnumerationReport::default()
        };

        if let Some(limit) = self.combination_limit {
            let (walked, graph_paths) = self.walk_combinations(limit)?;
            report.combinations = Some(walked);
            report.graph_paths = graph_paths;
        }

        info!(
            profiles = report.profiles.len(),
            path_sets = report.total_path_sets(),
            "enumeration complete"
        );
        Ok(report)
    }

    /// Walk up to `limit` cross-profile combinations, recording each into
    /// an extension graph
    #[instrument(skip(self))]
    fn walk_combinations(&self, limit: usize) -> Result<(usize, usize)> {
        let mut tree = TreeIterator::new(self.profiles.clone(), &self.params)?;
        let mut nodes = MatchNodes::new();
        let mut walked = 0;
        while walked < limit && !tree.at_end()? {
            tree.record_current(&mut nodes)?;
            tree.advance()?;
            walked += 1;
        }
        Ok((walked, nodes.len()))
    }
}

/// Drain one profile's enumerator and summarize what it produced
pub fn summarize_profile(profile: Arc<MatchProfile>, params: &EnumerationParams) -> Result<ProfileSummary> {
    let mut state = MatchState::for_profile(Arc::clone(&profile), params)?;
    let mut summary = ProfileSummary {
        profile: profile.id.clone(),
        segments: profile.matches.len(),
        path_sets: 0,
        widest_set: 0,
        deepest_assignment: 0,
    };

    for set in state.path_sets() {
        let set = set?;
        summary.path_sets += 1;
        summary.widest_set = summary.widest_set.max(set.len());
        if let Some(deepest) = set.iter().map(|p| p.depth()).max() {
            summary.deepest_assignment = summary.deepest_assignment.max(deepest);
        }
    }

    tracing::debug!(profile = %summary.profile, path_sets = summary.path_sets, "profile drained");
    Ok(summary)
}

pub(crate) fn load_matches(paths: &[PathBuf]) -> Result<MatchesData> {
    let data = MatchesData::from_files(paths)?;
    info!(
        files = paths.len(),
        matches = data.len(),
        segments = data.segment_count(),
        "loaded chromosome matches"
    );
    Ok(data)
}
