//! # Chromosome Match Reader
//!
//! Loads chromosome-browser CSV exports into a store keyed by match name.
//!
//! ## Format
//! One header row, then exactly seven columns per record:
//! `name, match name, chromosome, start, end, centimorgans, matching SNPs`.
//! Fields are trimmed. Several files can be read into one store; match names
//! keep the order in which they were first seen.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info_span};

use crate::data::profile::{MatchProfile, ProfileId};
use crate::data::segment::ChromosomeMatch;
use crate::error::{DnacladError, Result};

const MATCH_COLUMNS: usize = 7;

/// Positional layout of one match record
#[derive(Debug, Deserialize)]
struct MatchRecord(
    #[allow(dead_code)] String,
    String,
    String,
    u64,
    u64,
    f64,
    u32,
);

/// Segments grouped by match name, in first-seen order
#[derive(Debug, Default)]
pub struct MatchesData {
    order: Vec<Arc<str>>,
    by_match: HashMap<Arc<str>, Vec<ChromosomeMatch>>,
}

impl MatchesData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every file into a single store
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut data = Self::new();
        for path in paths {
            data.read_file(path.as_ref())?;
        }
        Ok(data)
    }

    /// Append the records of one file; returns the number of records read
    pub fn read_file(&mut self, path: &Path) -> Result<usize> {
        let _span = info_span!("read_matches", path = %path.display()).entered();
        if !path.exists() {
            return Err(DnacladError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path)?;
        self.read_from(file, path)
    }

    /// Append records from any reader; `source` names it in errors
    pub fn read_from<R: Read>(&mut self, reader: R, source: &Path) -> Result<usize> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut count = 0;
        for result in reader.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());
            if record.len() != MATCH_COLUMNS {
                return Err(DnacladError::parse(
                    source,
                    line,
                    format!("expected {} columns, found {}", MATCH_COLUMNS, record.len()),
                ));
            }
            let MatchRecord(_, match_id, chromosome, start, end, centimorgans, snps) = record
                .deserialize(None)
                .map_err(|e| DnacladError::parse(source, line, e.to_string()))?;
            if end < start {
                return Err(DnacladError::parse(
                    source,
                    line,
                    format!("segment end {} precedes start {}", end, start),
                ));
            }
            self.push(ChromosomeMatch::new(
                match_id,
                chromosome,
                start,
                end,
                centimorgans,
                snps,
            ));
            count += 1;
        }

        debug!(source = %source.display(), records = count, "loaded match records");
        Ok(count)
    }

    pub fn push(&mut self, segment: ChromosomeMatch) {
        let id = Arc::clone(&segment.match_id);
        self.by_match
            .entry(id)
            .or_insert_with_key(|id| {
                self.order.push(Arc::clone(id));
                Vec::new()
            })
            .push(segment);
    }

    /// Match names in first-seen order
    pub fn match_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|id| &**id)
    }

    pub fn matches(&self, match_id: &str) -> Option<&[ChromosomeMatch]> {
        self.by_match.get(match_id).map(Vec::as_slice)
    }

    /// Every segment, grouped by match in first-seen order
    pub fn segments(&self) -> impl Iterator<Item = &ChromosomeMatch> {
        self.order
            .iter()
            .filter_map(|id| self.by_match.get(id))
            .flatten()
    }

    /// Number of distinct matches
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.by_match.values().map(Vec::len).sum()
    }

    /// One profile per match, sharing a default sex and minimum match depth
    pub fn profiles(&self, is_male: bool, minimum_match_depth: u32) -> Vec<Arc<MatchProfile>> {
        self.order
            .iter()
            .filter_map(|id| {
                self.by_match.get(id).map(|segments| {
                    Arc::new(MatchProfile::new(
                        ProfileId(Arc::clone(id)),
                        is_male,
                        minimum_match_depth,
                        segments.clone(),
                    ))
                })
            })
            .collect()
    }
}
