//! # Range Listing
//!
//! Lists the segments on one chromosome that overlap an inclusive range and
//! are at least a minimum length, longest first.

use std::io::Write;

use tracing::info_span;

use crate::config::ListArgs;
use crate::data::segment::ChromosomeMatch;
use crate::error::Result;
use crate::io::matches::MatchesData;

#[derive(Debug)]
pub struct Lister {
    chromosome: String,
    start: u64,
    end: u64,
    min_length: u64,
    selected: Vec<ChromosomeMatch>,
}

impl Lister {
    pub fn new(chromosome: impl Into<String>, start: u64, end: u64, min_length: u64) -> Self {
        Self {
            chromosome: chromosome.into(),
            start,
            end,
            min_length,
            selected: Vec::new(),
        }
    }

    /// Keep the segment if it passes the chromosome, length and range filters
    pub fn add_match(&mut self, segment: &ChromosomeMatch) -> bool {
        let keep = &*segment.chromosome == self.chromosome
            && segment.len() >= self.min_length
            && segment.overlaps_range(self.start, self.end);
        if keep {
            self.selected.push(segment.clone());
        }
        keep
    }

    /// Selected segments, longest first
    pub fn selected(&self) -> Vec<&ChromosomeMatch> {
        let mut ordered: Vec<&ChromosomeMatch> = self.selected.iter().collect();
        ordered.sort_by(|a, b| a.cmp_by_length(b));
        ordered
    }

    pub fn write_to<W: Write>(&self, mut out: W) -> Result<usize> {
        let selected = self.selected();
        for segment in &selected {
            writeln!(
                out,
                "{} ({} - {}) [{}]",
                segment.match_id,
                segment.start,
                segment.end,
                segment.len()
            )?;
        }
        writeln!(out)?;
        writeln!(out, "Total number of matches = {}", selected.len())?;
        Ok(selected.len())
    }
}

/// Load the file named in `args` and write the listing to `out`
pub fn run_listing<W: Write>(args: &ListArgs, out: W) -> Result<usize> {
    let _span = info_span!("list", chromosome = %args.chromosome).entered();
    let data = MatchesData::from_files(std::slice::from_ref(&args.matches))?;
    let mut lister = Lister::new(args.chromosome.clone(), args.start, args.end, args.min_length);
    for segment in data.segments() {
        lister.add_match(segment);
    }
    lister.write_to(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_and_orders() {
        let mut lister = Lister::new("7", 1000, 2000, 100);
        assert!(!lister.add_match(&ChromosomeMatch::new("short", "7", 1500, 1550, 1.0, 10)));
        assert!(!lister.add_match(&ChromosomeMatch::new("other_chr", "8", 1000, 2000, 1.0, 10)));
        assert!(!lister.add_match(&ChromosomeMatch::new("outside", "7", 2001, 5000, 1.0, 10)));
        assert!(lister.add_match(&ChromosomeMatch::new("amy", "7", 1900, 2100, 1.0, 10)));
        assert!(lister.add_match(&ChromosomeMatch::new("zed", "7", 0, 1000, 1.0, 10)));

        let mut out = Vec::new();
        assert_eq!(lister.write_to(&mut out).unwrap(), 2);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "zed (0 - 1000) [1000]\namy (1900 - 2100) [200]\n\nTotal number of matches = 2\n"
        );
    }
}
