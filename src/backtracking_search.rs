use instant::{Duration, Instant};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use crate::arc_consistency::{ac3, enforce_node_consistency, SlotArc};
use crate::domain::Domains;
use crate::puzzle::{Puzzle, Slot};
use crate::types::{SlotId, WordId};

/// A mapping from slot to chosen word, indexed by slot id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    words: Vec<Option<WordId>>,
    assigned_count: usize,
}

impl Assignment {
    /// An empty assignment for a puzzle with `slot_count` slots.
    pub fn new(slot_count: usize) -> Assignment {
        Assignment {
            words: vec![None; slot_count],
            assigned_count: 0,
        }
    }

    pub fn get(&self, slot_id: SlotId) -> Option<WordId> {
        self.words[slot_id]
    }

    pub fn contains(&self, slot_id: SlotId) -> bool {
        self.words[slot_id].is_some()
    }

    pub fn insert(&mut self, slot_id: SlotId, word_id: WordId) {
        if self.words[slot_id].replace(word_id).is_none() {
            self.assigned_count += 1;
        }
    }

    pub fn remove(&mut self, slot_id: SlotId) -> Option<WordId> {
        let removed = self.words[slot_id].take();
        if removed.is_some() {
            self.assigned_count -= 1;
        }
        removed
    }

    /// Number of slots with a word.
    pub fn len(&self) -> usize {
        self.assigned_count
    }

    pub fn is_empty(&self) -> bool {
        self.assigned_count == 0
    }

    /// Assigned `(slot, word)` pairs in slot id order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, WordId)> + '_ {
        self.words
            .iter()
            .enumerate()
            .filter_map(|(slot_id, word_id)| word_id.map(|word_id| (slot_id, word_id)))
    }

    /// Resolve the assignment against its puzzle into slots and word strings.
    pub fn entries<'a>(
        &'a self,
        puzzle: &'a Puzzle,
    ) -> impl Iterator<Item = (&'a Slot, &'a str)> + 'a {
        self.iter().map(move |(slot_id, word_id)| {
            (puzzle.slot(slot_id), puzzle.word(word_id).string.as_str())
        })
    }
}

/// Does every slot in the puzzle have a word?
pub fn assignment_complete(puzzle: &Puzzle, assignment: &Assignment) -> bool {
    (0..puzzle.slot_count()).all(|slot_id| assignment.contains(slot_id))
}

/// Check a (possibly partial) assignment: words are distinct, fit their slots, and agree with
/// each other wherever two assigned slots cross.
pub fn consistent(puzzle: &Puzzle, assignment: &Assignment) -> bool {
    let mut used_words: HashSet<WordId> = HashSet::with_capacity(assignment.len());

    for (slot_id, word_id) in assignment.iter() {
        if !used_words.insert(word_id) {
            return false;
        }

        let word = puzzle.word(word_id);
        if word.len() != puzzle.slot(slot_id).length {
            return false;
        }

        for &neighbor in puzzle.neighbors(slot_id) {
            let (Some(neighbor_word_id), Some((cell, neighbor_cell))) =
                (assignment.get(neighbor), puzzle.overlap(slot_id, neighbor))
            else {
                continue;
            };

            if word.glyph(cell) != puzzle.word(neighbor_word_id).glyph(neighbor_cell) {
                return false;
            }
        }
    }

    true
}

/// Return the options for a slot, ordered so that the words ruling out the fewest options from
/// unassigned crossing slots come first (least constraining value). Ties go to the
/// lexicographically smaller word.
pub fn order_domain_values(
    puzzle: &Puzzle,
    slot_id: SlotId,
    assignment: &Assignment,
    domains: &Domains,
) -> Vec<WordId> {
    // For each unassigned crossing: which cell of ours it crosses, how many options it has, and
    // how many of those place each glyph in the shared cell.
    let crossing_glyph_counts: Vec<(usize, usize, HashMap<char, usize>)> = puzzle
        .neighbors(slot_id)
        .iter()
        .filter(|&&neighbor| !assignment.contains(neighbor))
        .filter_map(|&neighbor| {
            let (cell, neighbor_cell) = puzzle.overlap(slot_id, neighbor)?;

            let mut glyph_counts: HashMap<char, usize> = HashMap::new();
            for neighbor_word_id in domains.iter(neighbor) {
                if let Some(glyph) = puzzle.word(neighbor_word_id).glyph(neighbor_cell) {
                    *glyph_counts.entry(glyph).or_insert(0) += 1;
                }
            }

            Some((cell, domains.len(neighbor), glyph_counts))
        })
        .collect();

    let mut options: Vec<WordId> = domains.iter(slot_id).collect();

    options.sort_by_cached_key(|&word_id| {
        let word = puzzle.word(word_id);

        let ruled_out: usize = crossing_glyph_counts
            .iter()
            .map(|(cell, option_count, glyph_counts)| {
                let compatible = word
                    .glyph(*cell)
                    .and_then(|glyph| glyph_counts.get(&glyph))
                    .copied()
                    .unwrap_or(0);
                option_count - compatible
            })
            .sum();

        (ruled_out, word_id)
    });

    options
}

/// Choose the unassigned slot with the fewest remaining options (minimum remaining values),
/// preferring slots with more neighbors and then lower ids on ties.
pub fn select_unassigned_variable(
    puzzle: &Puzzle,
    assignment: &Assignment,
    domains: &Domains,
) -> Option<SlotId> {
    (0..puzzle.slot_count())
        .filter(|&slot_id| !assignment.contains(slot_id))
        .min_by_key(|&slot_id| (domains.len(slot_id), Reverse(puzzle.degree(slot_id)), slot_id))
}

/// Settings for a solve.
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Give up if the search is still running after this long. A limit too large to represent as
    /// a deadline means no limit.
    pub time_limit: Option<Duration>,
}

/// A struct tracking statistics about the solving process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    /// Search states visited, i.e. slots chosen for assignment.
    pub states: u64,

    /// States from which every option failed.
    pub backtracks: u64,

    /// Was the search abandoned because `SolverConfig::time_limit` passed?
    pub deadline_exceeded: bool,

    /// Did node and arc consistency alone rule out every fill, before any search?
    pub unsatisfiable_by_propagation: bool,

    pub duration: Duration,
}

/// A struct representing the results of a successful solve.
#[derive(Debug)]
pub struct SolveSuccess {
    pub statistics: Statistics,
    pub assignment: Assignment,
}

/// No assignment was produced, either because none exists or because the time limit passed (see
/// `Statistics::deadline_exceeded`).
#[derive(Debug)]
pub struct SolveFailure {
    pub statistics: Statistics,
}

/// State shared across one backtracking search.
struct Search<'a> {
    puzzle: &'a Puzzle,
    deadline: Option<Instant>,
    statistics: Statistics,
}

impl<'a> Search<'a> {
    fn new(puzzle: &'a Puzzle, deadline: Option<Instant>) -> Search<'a> {
        Search {
            puzzle,
            deadline,
            statistics: Statistics::default(),
        }
    }

    /// Extend `assignment` to a complete, consistent one. On failure, `assignment` and `domains`
    /// are left exactly as they were passed in.
    fn backtrack(&mut self, assignment: &mut Assignment, domains: &mut Domains) -> bool {
        debug_assert!(
            consistent(self.puzzle, assignment),
            "search reached an inconsistent assignment"
        );

        if assignment_complete(self.puzzle, assignment) {
            return true;
        }

        if self.deadline.map_or(false, |deadline| Instant::now() >= deadline) {
            if !self.statistics.deadline_exceeded {
                log::debug!("Deadline exceeded after {} states", self.statistics.states);
            }
            self.statistics.deadline_exceeded = true;
            return false;
        }

        let Some(slot_id) = select_unassigned_variable(self.puzzle, assignment, domains) else {
            return true;
        };
        self.statistics.states += 1;

        log::trace!(
            "State {}: filling slot {} ({} options, {} assigned)",
            self.statistics.states,
            slot_id,
            domains.len(slot_id),
            assignment.len()
        );

        for word_id in order_domain_values(self.puzzle, slot_id, assignment, domains) {
            assignment.insert(slot_id, word_id);

            if !consistent(self.puzzle, assignment) {
                assignment.remove(slot_id);
                continue;
            }

            let checkpoint = domains.checkpoint();

            if self.infer(slot_id, word_id, assignment, domains)
                && self.backtrack(assignment, domains)
            {
                return true;
            }

            domains.rollback(checkpoint);
            assignment.remove(slot_id);

            if self.statistics.deadline_exceeded {
                return false;
            }
        }

        self.statistics.backtracks += 1;
        log::trace!("Backtracking from slot {}", slot_id);

        false
    }

    /// Fix the slot's domain to the chosen word and propagate that into its unassigned crossings.
    /// Returns false if some slot runs out of options.
    fn infer(
        &self,
        slot_id: SlotId,
        word_id: WordId,
        assignment: &Assignment,
        domains: &mut Domains,
    ) -> bool {
        domains.restrict(slot_id, word_id);

        let arcs: Vec<SlotArc> = self
            .puzzle
            .neighbors(slot_id)
            .iter()
            .filter(|&&neighbor| !assignment.contains(neighbor))
            .map(|&neighbor| (neighbor, slot_id))
            .collect();

        ac3(self.puzzle, domains, Some(arcs))
    }
}

/// Search for a complete assignment extending `assignment`, given the current domains. Any domain
/// changes made while searching are undone if no solution is found.
pub fn backtrack(
    puzzle: &Puzzle,
    mut assignment: Assignment,
    domains: &mut Domains,
) -> Option<Assignment> {
    let mut search = Search::new(puzzle, None);

    if search.backtrack(&mut assignment, domains) {
        Some(assignment)
    } else {
        None
    }
}

/// Enforce node and arc consistency, and then search for a fill, honoring the config's time
/// limit.
pub fn find_solution(puzzle: &Puzzle, config: &SolverConfig) -> Result<SolveSuccess, SolveFailure> {
    let start = Instant::now();

    log::info!(
        "Solving puzzle with {} slots and {} words",
        puzzle.slot_count(),
        puzzle.words().len()
    );

    let mut domains = Domains::new(puzzle);
    enforce_node_consistency(puzzle, &mut domains);

    if !ac3(puzzle, &mut domains, None) {
        log::info!("No solution: arc consistency left a slot without options");
        return Err(SolveFailure {
            statistics: Statistics {
                unsatisfiable_by_propagation: true,
                duration: start.elapsed(),
                ..Statistics::default()
            },
        });
    }

    // Initial pruning is permanent; only search-time inference needs to be undoable.
    domains.commit();

    log::debug!(
        "Options per slot after pruning: {:?}",
        (0..puzzle.slot_count()).map(|slot_id| domains.len(slot_id)).collect::<Vec<_>>()
    );

    let deadline = config.time_limit.and_then(|limit| start.checked_add(limit));
    let mut search = Search::new(puzzle, deadline);
    let mut assignment = Assignment::new(puzzle.slot_count());
    let solved = search.backtrack(&mut assignment, &mut domains);

    let mut statistics = search.statistics;
    statistics.duration = start.elapsed();

    log::info!(
        "{} after {} states and {} backtracks in {:?}",
        if solved { "Solved" } else { "No solution" },
        statistics.states,
        statistics.backtracks,
        statistics.duration
    );

    if solved {
        Ok(SolveSuccess { statistics, assignment })
    } else {
        Err(SolveFailure { statistics })
    }
}

/// Solve the puzzle with default settings, returning None if it has no fill.
pub fn solve(puzzle: &Puzzle) -> Option<Assignment> {
    find_solution(puzzle, &SolverConfig::default())
        .ok()
        .map(|success| success.assignment)
}
