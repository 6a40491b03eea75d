use bit_set::BitSet;
use std::fmt::{Debug, Formatter};

use crate::puzzle::Puzzle;
use crate::types::{SlotId, WordId};

/// A single word removed from a single slot's domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elimination {
    pub slot_id: SlotId,
    pub word_id: WordId,
}

/// A position in the elimination trail. Rolling back to it restores every word removed since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// The live candidate sets for every slot. Words are only ever removed; each removal is recorded
/// on a trail, and rolling back to a checkpoint restores exactly the words taken since.
pub struct Domains {
    options: Vec<BitSet>,

    /// Cached cardinality of each slot's options, so that MRV selection doesn't have to count
    /// bits.
    remaining_option_counts: Vec<usize>,

    trail: Vec<Elimination>,
}

impl Debug for Domains {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Domains")
            .field("remaining_option_counts", &self.remaining_option_counts)
            .field("trail_len", &self.trail.len())
            .finish()
    }
}

impl Domains {
    /// Every slot starts out with the full vocabulary.
    pub fn new(puzzle: &Puzzle) -> Domains {
        let word_count = puzzle.words().len();
        let all_words: BitSet = (0..word_count).collect();

        Domains {
            options: (0..puzzle.slot_count()).map(|_| all_words.clone()).collect(),
            remaining_option_counts: vec![word_count; puzzle.slot_count()],
            trail: vec![],
        }
    }

    pub fn len(&self, slot_id: SlotId) -> usize {
        self.remaining_option_counts[slot_id]
    }

    pub fn is_empty(&self, slot_id: SlotId) -> bool {
        self.remaining_option_counts[slot_id] == 0
    }

    /// Is any slot's domain exhausted?
    pub fn any_empty(&self) -> bool {
        self.remaining_option_counts.iter().any(|&count| count == 0)
    }

    pub fn contains(&self, slot_id: SlotId, word_id: WordId) -> bool {
        self.options[slot_id].contains(word_id)
    }

    /// The remaining words for a slot, in ascending id (and therefore lexicographic) order.
    pub fn iter(&self, slot_id: SlotId) -> impl Iterator<Item = WordId> + '_ {
        self.options[slot_id].iter()
    }

    /// Remove a word from a slot's domain, returning whether it was present.
    pub fn eliminate(&mut self, slot_id: SlotId, word_id: WordId) -> bool {
        if !self.options[slot_id].remove(word_id) {
            return false;
        }

        self.remaining_option_counts[slot_id] -= 1;
        self.trail.push(Elimination { slot_id, word_id });
        true
    }

    /// Remove every word but `word_id` from a slot's domain.
    pub fn restrict(&mut self, slot_id: SlotId, word_id: WordId) {
        let others: Vec<WordId> = self.iter(slot_id).filter(|&other| other != word_id).collect();
        for other in others {
            self.eliminate(slot_id, other);
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.trail.len())
    }

    /// Restore every word eliminated since the checkpoint was taken.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        assert!(checkpoint.0 <= self.trail.len(), "checkpoint is newer than the trail");

        for Elimination { slot_id, word_id } in self.trail.drain(checkpoint.0..).rev() {
            self.options[slot_id].insert(word_id);
            self.remaining_option_counts[slot_id] += 1;
        }
    }

    /// Forget the trail, making all eliminations so far permanent.
    pub fn commit(&mut self) {
        self.trail.clear();
    }

    /// The eliminations recorded since the checkpoint, oldest first.
    pub fn eliminations_since(&self, checkpoint: Checkpoint) -> &[Elimination] {
        &self.trail[checkpoint.0..]
    }
}
