use std::collections::HashSet;
use std::sync::Arc;

use dnaclad::error::DnacladError;
use dnaclad::model::match_nodes::MatchNodes;
use dnaclad::model::match_state::{MatchState, PathSet};
use dnaclad::{EnumerationParams, MatchProfile};

// --- Helpers ---

fn profile(lowest: u32, male: bool) -> Arc<MatchProfile> {
    Arc::new(MatchProfile::new("subject", male, lowest, Vec::new()))
}

fn root_state(lowest: u32, max_depth: u32, maximum_paths: usize, male: bool) -> MatchState {
    let params = EnumerationParams::new(max_depth, maximum_paths).expect("valid params");
    MatchState::for_profile(profile(lowest, male), &params).expect("valid enumerator")
}

fn drain(state: &mut MatchState) -> Vec<PathSet> {
    state
        .path_sets()
        .collect::<Result<Vec<_>, _>>()
        .expect("enumeration succeeds")
}

/// Every (lowest, max_depth, budget, sex) combination in a small grid
fn grid() -> impl Iterator<Item = (u32, u32, usize, bool)> {
    (1..=6).flat_map(|lowest| {
        (1..=7).flat_map(move |max_depth| {
            (1..=4).flat_map(move |budget| [true, false].map(|male| (lowest, max_depth, budget, male)))
        })
    })
}

// --- Reference counts ---

#[test]
fn drains_reference_counts() {
    let cases: [((u32, u32, usize), usize); 9] = [
        ((3, 10, 2), 188),
        ((5, 9, 1), 5),
        ((2, 2, 2), 5),
        ((1, 3, 1), 4),
        ((1, 4, 2), 44),
        ((3, 3, 2), 6),
        ((2, 4, 3), 92),
        ((1, 3, 4), 62),
        ((2, 5, 4), 422),
    ];
    for ((lowest, max_depth, budget), expected) in cases {
        let mut state = root_state(lowest, max_depth, budget, true);
        assert_eq!(
            state.count_path_sets().unwrap(),
            expected,
            "lowest={lowest} max_depth={max_depth} budget={budget}"
        );
    }
}

#[test]
fn shallower_minimum_depth_never_shrinks_the_space() {
    let counts: Vec<usize> = (1..=6)
        .map(|lowest| root_state(lowest, 6, 4, true).count_path_sets().unwrap())
        .collect();
    assert_eq!(counts, vec![1664, 1065, 674, 426, 256, 99]);
}

// --- Invariants over the grid ---

#[test]
fn emitted_sets_respect_budget_depth_and_pass_through() {
    for (lowest, max_depth, budget, male) in grid() {
        let mut state = root_state(lowest, max_depth, budget, male);
        for set in drain(&mut state) {
            assert!(!set.is_empty());
            assert!(set.len() <= budget, "budget exceeded at {lowest}/{max_depth}/{budget}");
            for path in &set {
                let depth = path.depth();
                assert!(
                    (lowest..=max_depth).contains(&depth),
                    "depth {depth} outside {lowest}..={max_depth}"
                );
                assert!(!path.is_pass_through(), "pass-through node emitted");
                assert_eq!(&*path.profile, &*state.profile().clone());
            }
        }
    }
}

#[test]
fn emitted_sets_are_distinct() {
    for (lowest, max_depth, budget, male) in grid() {
        let mut state = root_state(lowest, max_depth, budget, male);
        let sets = drain(&mut state);
        let unique: HashSet<Vec<Arc<dnaclad::Path>>> = sets.iter().cloned().collect();
        assert_eq!(unique.len(), sets.len(), "duplicate set at {lowest}/{max_depth}/{budget}");
    }
}

#[test]
fn reset_replays_identical_sequence() {
    for (lowest, max_depth, budget, male) in grid().step_by(7) {
        let mut state = root_state(lowest, max_depth, budget, male);
        let first = drain(&mut state);
        let second = drain(&mut state);
        assert_eq!(first, second);
    }
}

#[test]
fn exhaustion_is_sticky() {
    let mut state = root_state(3, 6, 2, false);
    drain(&mut state);
    for _ in 0..3 {
        assert!(state.at_end().unwrap());
    }
    assert!(matches!(
        state.current_path_set(),
        Err(DnacladError::Exhausted { .. })
    ));
    assert!(matches!(state.advance(), Err(DnacladError::Exhausted { .. })));
}

// --- Scenarios ---

#[test]
fn budget_of_one_claims_single_paths_only() {
    for max_depth in 1..=8 {
        for lowest in 1..=max_depth {
            let mut state = root_state(lowest, max_depth, 1, true);
            for set in drain(&mut state) {
                assert_eq!(set.len(), 1);
                assert!(set[0].derived_from.is_none());
            }
        }
    }
}

#[test]
fn lowest_equals_max_depth_yields_single_path_sets() {
    for depth in 1..=6 {
        for budget in 1..=4 {
            let profile = profile(depth, true);
            let mut state =
                MatchState::new(profile, None, depth, depth, depth, budget, true).unwrap();
            let sets = drain(&mut state);
            assert_eq!(sets.len(), 2);
            assert!(sets.iter().all(|s| s.len() == 1));
            assert!(!sets[0][0].includes_male && sets[0][0].includes_female);
            assert!(sets[1][0].is_terminal());
        }
    }
}

#[test]
fn lowest_equals_max_depth_from_root_only_assigns_at_ceiling() {
    let mut state = root_state(5, 5, 3, true);
    let sets = drain(&mut state);
    for set in &sets {
        assert!(set.iter().all(|p| p.depth() == 5));
    }
    // Pass-throughs above the ceiling let one hypothesis claim several ancestors
    assert!(sets.iter().any(|set| set.len() > 1));
}

#[test]
fn unreachable_minimum_depth_yields_nothing() {
    let mut state = root_state(8, 7, 3, true);
    assert!(state.at_end().unwrap());
    assert_eq!(state.count_path_sets().unwrap(), 0);
}

#[test]
fn extension_graph_backfills_emitted_chains() {
    let mut state = root_state(2, 4, 3, true);
    let mut nodes = MatchNodes::new();
    for set in drain(&mut state) {
        nodes.add_paths(&set);
    }

    // Every recorded chain is reachable link by link from the root set
    let roots = nodes.potential_assignments(None).unwrap().clone();
    assert!(!roots.is_empty());
    let mut frontier: Vec<_> = roots.into_iter().collect();
    let mut reached = 0;
    while let Some(path) = frontier.pop() {
        reached += 1;
        if let Some(children) = nodes.potential_assignments(Some(&*path)) {
            for child in children {
                assert_eq!(child.derived_from.as_deref(), Some(&*path));
                frontier.push(Arc::clone(child));
            }
        }
    }
    assert_eq!(reached, nodes.len());
}
