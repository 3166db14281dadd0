//! # Chromosome Match Segments
//!
//! One shared DNA segment between the main profile and a match, as reported
//! by a chromosome browser export.

use std::cmp::Ordering;
use std::sync::Arc;

/// A single matching segment on one chromosome.
///
/// Positions are inclusive base-pair coordinates. The natural ordering puts
/// longer segments first so that sorted collections and heaps yield the most
/// informative segment before shorter ones.
#[derive(Clone, Debug, PartialEq)]
pub struct ChromosomeMatch {
    /// Name of the matching profile this segment belongs to
    pub match_id: Arc<str>,
    /// Chromosome identifier as written in the input ("1".."22", "X")
    pub chromosome: Arc<str>,
    /// First matching position (inclusive)
    pub start: u64,
    /// Last matching position (inclusive)
    pub end: u64,
    /// Genetic length in centimorgans
    pub centimorgans: f64,
    /// Number of matching SNPs
    pub snps: u32,
}

impl ChromosomeMatch {
    pub fn new(
        match_id: impl Into<Arc<str>>,
        chromosome: impl Into<Arc<str>>,
        start: u64,
        end: u64,
        centimorgans: f64,
        snps: u32,
    ) -> Self {
        Self {
            match_id: match_id.into(),
            chromosome: chromosome.into(),
            start,
            end,
            centimorgans,
            snps,
        }
    }

    /// Physical length (`end - start`)
    #[inline]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if `self` and `other` share at least one position on the same chromosome
    #[inline]
    pub fn overlaps(&self, other: &ChromosomeMatch) -> bool {
        self.chromosome == other.chromosome && self.overlaps_range(other.start, other.end)
    }

    /// True if the segment intersects the inclusive range `[start, end]`
    #[inline]
    pub fn overlaps_range(&self, start: u64, end: u64) -> bool {
        self.start <= end && self.end >= start
    }

    /// Ordering by length, longest first
    pub fn cmp_by_length(&self, other: &ChromosomeMatch) -> Ordering {
        other.len().cmp(&self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(chrom: &str, start: u64, end: u64) -> ChromosomeMatch {
        ChromosomeMatch::new("m", chrom, start, end, 1.0, 100)
    }

    #[test]
    fn test_overlap_inclusive_bounds() {
        let a = seg("1", 100, 200);
        assert!(a.overlaps(&seg("1", 200, 300)));
        assert!(a.overlaps(&seg("1", 0, 100)));
        assert!(!a.overlaps(&seg("1", 201, 300)));
        assert!(!a.overlaps(&seg("2", 150, 160)));
    }

    #[test]
    fn test_longest_first_ordering() {
        let mut segs = vec![seg("1", 0, 10), seg("1", 0, 500), seg("1", 0, 50)];
        segs.sort_by(ChromosomeMatch::cmp_by_length);
        let lens: Vec<u64> = segs.iter().map(ChromosomeMatch::len).collect();
        assert_eq!(lens, vec![500, 50, 10]);
    }
}
