//! # Segment Grouping
//!
//! ## Role
//! Clusters overlapping chromosome segments into groups and breaks each group
//! down into a hierarchy of sub-groups. Every segment is a hint that some
//! ancestor couple was shared; overlapping segments hint at the same couple,
//! and pieces that fall apart once a bridging segment is removed hint at
//! couples one or more generations further back.
//!
//! ## Algorithm
//! - **Regroup:** take the longest group and absorb every overlapping group on
//!   the same chromosome into it, widening its span; repeat full passes until
//!   a pass merges nothing
//! - **Decompose:** emit the group, then remove the "most joiny" segment (most
//!   overlaps with the remaining segments) until the rest regroups into two or
//!   more pieces, and decompose each piece
//!
//! Ties in length keep insertion order, so output is deterministic.

use std::sync::Arc;

use tracing::debug;

use crate::data::segment::ChromosomeMatch;

/// A set of segments on one chromosome whose spans chain together
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentGroup {
    pub chromosome: Arc<str>,
    pub start: u64,
    pub end: u64,
    members: Vec<ChromosomeMatch>,
}

impl SegmentGroup {
    pub fn new(seed: ChromosomeMatch) -> Self {
        Self {
            chromosome: Arc::clone(&seed.chromosome),
            start: seed.start,
            end: seed.end,
            members: vec![seed],
        }
    }

    /// Span length (`end - start`)
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Members ordered longest first
    pub fn members(&self) -> Vec<&ChromosomeMatch> {
        let mut ordered: Vec<&ChromosomeMatch> = self.members.iter().collect();
        ordered.sort_by(|a, b| a.cmp_by_length(b));
        ordered
    }

    /// Absorb `other` if it overlaps this group's span on the same chromosome.
    /// Hands `other` back untouched when it does not.
    pub fn merge_if_overlaps(&mut self, other: SegmentGroup) -> Option<SegmentGroup> {
        if other.chromosome != self.chromosome || other.end < self.start || other.start > self.end {
            return Some(other);
        }
        self.start = self.start.min(other.start);
        self.end = self.end.max(other.end);
        self.members.extend(other.members);
        None
    }

    /// This group followed by its hierarchical sub-groups
    pub fn decompose(&self) -> Vec<SegmentGroup> {
        let mut out = vec![self.clone()];
        if self.members.len() <= 1 {
            return out;
        }

        let mut scratch = self.members.clone();
        loop {
            remove_most_joiny(&mut scratch);
            if scratch.is_empty() {
                return out;
            }
            let pieces = regroup(scratch.iter().cloned().map(SegmentGroup::new).collect());
            if pieces.len() > 1 {
                for piece in &pieces {
                    out.extend(piece.decompose());
                }
                return out;
            }
        }
    }
}

/// Stable longest-first ordering
fn sort_longest_first(groups: &mut [SegmentGroup]) {
    groups.sort_by(|a, b| b.len().cmp(&a.len()));
}

/// Merge overlapping groups until a full pass changes nothing.
pub fn regroup(mut groups: Vec<SegmentGroup>) -> Vec<SegmentGroup> {
    loop {
        let mut merged_any = false;
        let mut settled = Vec::with_capacity(groups.len());
        sort_longest_first(&mut groups);

        let mut remaining = groups;
        while !remaining.is_empty() {
            let mut longest = remaining.remove(0);
            let mut unmerged = Vec::with_capacity(remaining.len());
            for candidate in remaining {
                match longest.merge_if_overlaps(candidate) {
                    Some(candidate) => unmerged.push(candidate),
                    None => merged_any = true,
                }
            }
            settled.push(longest);
            sort_longest_first(&mut unmerged);
            remaining = unmerged;
        }

        sort_longest_first(&mut settled);
        groups = settled;
        if !merged_any {
            return groups;
        }
    }
}

/// Remove and return the segment overlapping the most others (itself counted);
/// the earliest segment wins ties
fn remove_most_joiny(segments: &mut Vec<ChromosomeMatch>) -> Option<ChromosomeMatch> {
    let mut best: Option<(usize, usize)> = None;
    for (i, candidate) in segments.iter().enumerate() {
        let overlaps = segments
            .iter()
            .filter(|other| candidate.overlaps_range(other.start, other.end))
            .count();
        if best.map_or(true, |(_, count)| overlaps > count) {
            best = Some((i, overlaps));
        }
    }
    best.map(|(i, _)| segments.remove(i))
}

/// Accumulates segments and produces the decomposed group hierarchy
#[derive(Debug, Default)]
pub struct Grouper {
    groups: Vec<SegmentGroup>,
}

impl Grouper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_match(&mut self, segment: ChromosomeMatch) {
        self.groups.push(SegmentGroup::new(segment));
    }

    pub fn segment_count(&self) -> usize {
        self.groups.iter().map(SegmentGroup::member_count).sum()
    }

    /// Top-level groups, longest first
    pub fn top_level(&self) -> Vec<SegmentGroup> {
        regroup(self.groups.clone())
    }

    /// Every top-level group followed by its decomposition
    pub fn hierarchy(&self) -> Vec<SegmentGroup> {
        let top = self.top_level();
        debug!(
            segments = self.segment_count(),
            groups = top.len(),
            "regrouped segments"
        );
        top.iter().flat_map(SegmentGroup::decompose).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(id: &str, chrom: &str, start: u64, end: u64) -> ChromosomeMatch {
        ChromosomeMatch::new(id, chrom, start, end, 1.0, 100)
    }

    fn spans(groups: &[SegmentGroup]) -> Vec<(u64, u64)> {
        groups.iter().map(|g| (g.start, g.end)).collect()
    }

    #[test]
    fn test_disjoint_segments_stay_separate() {
        let mut grouper = Grouper::new();
        grouper.add_match(seg("a", "1", 0, 100));
        grouper.add_match(seg("b", "1", 200, 250));
        grouper.add_match(seg("c", "2", 0, 100));
        let top = grouper.top_level();
        assert_eq!(top.len(), 3);
        assert_eq!(top.iter().map(SegmentGroup::member_count).sum::<usize>(), 3);
    }

    #[test]
    fn test_chained_overlaps_merge() {
        let groups = regroup(vec![
            SegmentGroup::new(seg("a", "1", 0, 100)),
            SegmentGroup::new(seg("b", "1", 250, 400)),
            SegmentGroup::new(seg("c", "1", 90, 260)),
        ]);
        assert_eq!(spans(&groups), vec![(0, 400)]);
        assert_eq!(groups[0].member_count(), 3);
    }

    #[test]
    fn test_members_longest_first() {
        let groups = regroup(vec![
            SegmentGroup::new(seg("short", "1", 0, 10)),
            SegmentGroup::new(seg("long", "1", 0, 500)),
        ]);
        let ids: Vec<&str> = groups[0].members().iter().map(|m| &*m.match_id).collect();
        assert_eq!(ids, vec!["long", "short"]);
    }

    #[test]
    fn test_bridged_group_decomposes_into_pieces() {
        let mut grouper = Grouper::new();
        grouper.add_match(seg("bridge", "1", 0, 1000));
        grouper.add_match(seg("left", "1", 0, 300));
        grouper.add_match(seg("right", "1", 700, 1000));
        let hierarchy = grouper.hierarchy();
        assert_eq!(spans(&hierarchy), vec![(0, 1000), (0, 300), (700, 1000)]);
        assert_eq!(hierarchy[0].member_count(), 3);
    }

    #[test]
    fn test_unsplittable_group_emits_once() {
        let group = regroup(vec![
            SegmentGroup::new(seg("a", "1", 0, 100)),
            SegmentGroup::new(seg("b", "1", 50, 150)),
        ])
        .remove(0);
        assert_eq!(group.decompose().len(), 1);
    }

    #[test]
    fn test_most_joiny_prefers_earliest_on_tie() {
        let mut segs = vec![seg("a", "1", 0, 10), seg("b", "1", 100, 110)];
        let removed = remove_most_joiny(&mut segs).unwrap();
        assert_eq!(&*removed.match_id, "a");
        assert_eq!(segs.len(), 1);
    }
}
