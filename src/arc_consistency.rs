use std::collections::{HashSet, VecDeque};

use crate::domain::Domains;
use crate::puzzle::Puzzle;
use crate::types::{SlotId, WordId};

/// A directed constraint between two crossing slots: the first slot's options must each be
/// supported by some option of the second.
pub type SlotArc = (SlotId, SlotId);

/// Data structure used in `ac3` to track which arcs we still need to revise. An arc that is
/// already waiting in the queue is not added a second time.
#[derive(Debug)]
struct ConsistencyQueue {
    queue: VecDeque<SlotArc>,
    queued: HashSet<SlotArc>,
}

impl ConsistencyQueue {
    fn with_initial_queue<Items>(items: Items) -> ConsistencyQueue
    where
        Items: IntoIterator<Item = SlotArc>,
    {
        let mut queue = ConsistencyQueue {
            queue: VecDeque::new(),
            queued: HashSet::new(),
        };
        for arc in items {
            queue.enqueue(arc);
        }
        queue
    }

    fn pop_front(&mut self) -> Option<SlotArc> {
        let arc = self.queue.pop_front()?;
        self.queued.remove(&arc);
        Some(arc)
    }

    fn enqueue(&mut self, arc: SlotArc) {
        if self.queued.insert(arc) {
            self.queue.push_back(arc);
        }
    }
}

/// Remove every word whose length doesn't match its slot. This can't fail; a slot left with no
/// options is picked up by the next `ac3` call.
pub fn enforce_node_consistency(puzzle: &Puzzle, domains: &mut Domains) {
    for slot in puzzle.slots() {
        let wrong_length: Vec<WordId> = domains
            .iter(slot.id)
            .filter(|&word_id| puzzle.word(word_id).len() != slot.length)
            .collect();

        for word_id in wrong_length {
            domains.eliminate(slot.id, word_id);
        }
    }
}

/// Make slot `x` arc consistent with slot `y`, by removing every option for `x` that has no option
/// for `y` with the same letter in the shared cell. Returns whether anything was removed.
pub fn revise(puzzle: &Puzzle, domains: &mut Domains, x: SlotId, y: SlotId) -> bool {
    let Some((x_cell, y_cell)) = puzzle.overlap(x, y) else {
        return false;
    };

    // Which letters can `y` still place in the shared cell?
    let supported_glyphs: HashSet<char> = domains
        .iter(y)
        .filter_map(|word_id| puzzle.word(word_id).glyph(y_cell))
        .collect();

    let unsupported: Vec<WordId> = domains
        .iter(x)
        .filter(|&word_id| {
            puzzle
                .word(word_id)
                .glyph(x_cell)
                .map_or(true, |glyph| !supported_glyphs.contains(&glyph))
        })
        .collect();

    for &word_id in &unsupported {
        domains.eliminate(x, word_id);
    }

    !unsupported.is_empty()
}

/// Propagate crossing constraints until every arc is consistent (AC-3). If `arcs` is None, start
/// from every arc in the puzzle; otherwise start from the given arcs only. Returns false as soon as
/// any slot is left with no options.
pub fn ac3(puzzle: &Puzzle, domains: &mut Domains, arcs: Option<Vec<SlotArc>>) -> bool {
    if domains.any_empty() {
        log::debug!("ac3: a slot has no options before propagation");
        return false;
    }

    let mut queue = ConsistencyQueue::with_initial_queue(arcs.unwrap_or_else(|| puzzle.arcs()));

    while let Some((x, y)) = queue.pop_front() {
        if revise(puzzle, domains, x, y) {
            if domains.is_empty(x) {
                log::trace!("ac3: slot {} exhausted while revising against slot {}", x, y);
                return false;
            }

            // Shrinking `x` may leave words in its other neighbors without support.
            for &z in puzzle.neighbors(x) {
                if z != y {
                    queue.enqueue((z, x));
                }
            }
        }
    }

    true
}
