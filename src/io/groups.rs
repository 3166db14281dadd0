//! # Group Description Reader
//!
//! Hand-edited labels for known segment groups. One header row, then exactly
//! five columns per record: `group id, description, chromosome, start, end`.
//! Entries are looked up by id, or by the exact region a regrouped segment
//! cluster spans.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info_span};

use crate::error::{DnacladError, Result};

const GROUP_COLUMNS: usize = 5;

#[derive(Debug, Deserialize)]
struct GroupRecord(String, String, String, u64, u64);

/// Region key: chromosome plus inclusive span
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    pub chromosome: Arc<str>,
    pub start: u64,
    pub end: u64,
}

impl Region {
    pub fn new(chromosome: impl Into<Arc<str>>, start: u64, end: u64) -> Self {
        Self {
            chromosome: chromosome.into(),
            start,
            end,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupDescription {
    pub id: String,
    pub description: String,
    pub region: Region,
}

#[derive(Debug, Default)]
pub struct GroupsData {
    descriptions: Vec<GroupDescription>,
    by_id: HashMap<String, usize>,
    by_region: HashMap<Region, usize>,
}

impl GroupsData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let _span = info_span!("read_groups", path = %path.display()).entered();
        if !path.exists() {
            return Err(DnacladError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let mut data = Self::new();
        data.read_from(File::open(path)?, path)?;
        Ok(data)
    }

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
            if record.len() != GROUP_COLUMNS {
                return Err(DnacladError::parse(
                    source,
                    line,
                    format!("expected {} columns, found {}", GROUP_COLUMNS, record.len()),
                ));
            }
            let GroupRecord(id, description, chromosome, start, end) = record
                .deserialize(None)
                .map_err(|e| DnacladError::parse(source, line, e.to_string()))?;
            self.insert(GroupDescription {
                id,
                description,
                region: Region::new(chromosome, start, end),
            })?;
            count += 1;
        }

        debug!(source = %source.display(), groups = count, "loaded group descriptions");
        Ok(count)
    }

    /// Add one description; ids and regions must both be unique
    pub fn insert(&mut self, group: GroupDescription) -> Result<()> {
        if let Some(&existing) = self.by_region.get(&group.region) {
            return Err(DnacladError::invalid_data(format!(
                "group information has two different descriptions; see group id '{}' and group id '{}'",
                group.id, self.descriptions[existing].id
            )));
        }
        if self.by_id.contains_key(&group.id) {
            return Err(DnacladError::invalid_data(format!(
                "group id '{}' is described twice",
                group.id
            )));
        }

        let index = self.descriptions.len();
        self.by_id.insert(group.id.clone(), index);
        self.by_region.insert(group.region.clone(), index);
        self.descriptions.push(group);
        Ok(())
    }

    pub fn by_id(&self, id: &str) -> Option<&GroupDescription> {
        self.by_id.get(id).map(|&i| &self.descriptions[i])
    }

    pub fn by_region(&self, region: &Region) -> Option<&GroupDescription> {
        self.by_region.get(region).map(|&i| &self.descriptions[i])
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }
}
