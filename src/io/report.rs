//! # Group Report Writer
//!
//! Writes the decomposed group hierarchy as CSV, one row per member segment:
//! `chromosome, group id, group start, group end, group description,
//! match start, match end, match name`. Id and description are filled from a
//! `GroupsData` entry whose region equals the group's span, else left empty.

use std::io::Write;

use serde::Serialize;

use crate::error::{DnacladError, Result};
use crate::io::groups::{GroupsData, Region};
use crate::model::grouper::SegmentGroup;

#[derive(Debug, Serialize, PartialEq)]
pub struct GroupRow<'a> {
    pub chromosome: &'a str,
    pub group_id: &'a str,
    pub group_start: u64,
    pub group_end: u64,
    pub group_description: &'a str,
    pub match_start: u64,
    pub match_end: u64,
    pub match_name: &'a str,
}

pub struct GroupReportWriter<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl<W: Write> GroupReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(out),
            rows: 0,
        }
    }

    /// Write every member of `group`, longest first
    pub fn write_group(&mut self, group: &SegmentGroup, labels: Option<&GroupsData>) -> Result<()> {
        let region = Region::new(group.chromosome.clone(), group.start, group.end);
        let label = labels.and_then(|labels| labels.by_region(&region));
        let (group_id, group_description) = label
            .map(|l| (l.id.as_str(), l.description.as_str()))
            .unwrap_or(("", ""));

        for member in group.members() {
            self.writer.serialize(GroupRow {
                chromosome: &group.chromosome,
                group_id,
                group_start: group.start,
                group_end: group.end,
                group_description,
                match_start: member.start,
                match_end: member.end,
                match_name: &member.match_id,
            })?;
            self.rows += 1;
        }
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Flush and hand back the underlying writer
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| DnacladError::Io(e.into_error()))
    }
}
