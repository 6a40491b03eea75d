use crossfill::arc_consistency::{ac3, enforce_node_consistency, revise};
use crossfill::backtracking_search::{assignment_complete, consistent, solve};
use crossfill::domain::Domains;
use crossfill::Puzzle;
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::HashSet;

/// Small rectangular grids with a random mix of open and blocked cells.
fn arb_structure() -> impl Strategy<Value = Vec<Vec<bool>>> {
    (1usize..5, 1usize..5).prop_flat_map(|(height, width)| {
        vec(vec(prop::bool::weighted(0.75), width), height)
    })
}

/// Small vocabularies over a tiny alphabet, so crossings agree often enough to be interesting.
fn arb_vocabulary() -> impl Strategy<Value = Vec<String>> {
    vec("[ABC]{2,4}", 1..24)
}

fn arb_puzzle() -> impl Strategy<Value = Puzzle> {
    (arb_structure(), arb_vocabulary())
        .prop_map(|(structure, vocabulary)| Puzzle::new(structure, vocabulary).unwrap())
}

fn domain_sizes(puzzle: &Puzzle, domains: &Domains) -> Vec<usize> {
    (0..puzzle.slot_count()).map(|slot_id| domains.len(slot_id)).collect()
}

proptest! {
    /// After node consistency every remaining word fits its slot.
    #[test]
    fn test_node_consistency(puzzle in arb_puzzle()) {
        let mut domains = Domains::new(&puzzle);
        enforce_node_consistency(&puzzle, &mut domains);

        for slot in puzzle.slots() {
            for word_id in domains.iter(slot.id) {
                prop_assert_eq!(puzzle.word(word_id).len(), slot.length);
            }
        }
    }

    /// A successful AC-3 pass leaves nothing for any further revision to remove, and domains
    /// never grow along the way.
    #[test]
    fn test_ac3_fixed_point_and_monotonicity(puzzle in arb_puzzle()) {
        let mut domains = Domains::new(&puzzle);
        let initial = domain_sizes(&puzzle, &domains);

        enforce_node_consistency(&puzzle, &mut domains);
        let after_node = domain_sizes(&puzzle, &domains);

        let success = ac3(&puzzle, &mut domains, None);
        let after_arc = domain_sizes(&puzzle, &domains);

        for slot_id in 0..puzzle.slot_count() {
            prop_assert!(after_node[slot_id] <= initial[slot_id]);
            prop_assert!(after_arc[slot_id] <= after_node[slot_id]);
        }

        if success {
            for (x, y) in puzzle.arcs() {
                prop_assert!(!revise(&puzzle, &mut domains, x, y));
            }
        }
    }

    /// Every returned fill is complete, consistent, and uses each word once; solving again gives
    /// the same answer.
    #[test]
    fn test_solutions_are_valid_and_deterministic(puzzle in arb_puzzle()) {
        let first = solve(&puzzle);
        let second = solve(&puzzle);

        prop_assert_eq!(&first, &second);

        if let Some(assignment) = first {
            prop_assert!(assignment_complete(&puzzle, &assignment));
            prop_assert!(consistent(&puzzle, &assignment));

            let words: HashSet<_> = assignment.iter().map(|(_, word_id)| word_id).collect();
            prop_assert_eq!(words.len(), puzzle.slot_count());

            for (slot, word) in assignment.entries(&puzzle) {
                prop_assert_eq!(word.chars().count(), slot.length);
                for (cell_idx, glyph) in word.chars().enumerate() {
                    let cell = slot.cell_coord(cell_idx);
                    prop_assert!(puzzle.is_open(cell));

                    for &neighbor in puzzle.neighbors(slot.id) {
                        let (here, there) = puzzle.overlap(slot.id, neighbor).unwrap();
                        if here == cell_idx {
                            let neighbor_word = puzzle.word(assignment.get(neighbor).unwrap());
                            prop_assert_eq!(neighbor_word.glyph(there), Some(glyph));
                        }
                    }
                }
            }
        }
    }
}
