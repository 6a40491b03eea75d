use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};
use crate::types::{Direction, GridCoord, SlotId, WordId};
use crate::word_list::{Word, WordList};
use crate::MAX_SLOT_LENGTH;

/// A struct representing a crossing between one slot and another, referencing the other slot's id
/// and the location of the intersection within the other slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub other_slot_id: SlotId,
    pub other_slot_cell: usize,
}

/// A maximal run of open cells in one direction. The id is assigned by the owning `Puzzle`;
/// equality and hashing only look at the geometry.
#[derive(Debug, Clone)]
pub struct Slot {
    pub id: SlotId,
    pub start_cell: GridCoord,
    pub direction: Direction,
    pub length: usize,
}

impl Slot {
    /// Generate the coords for each cell of this slot, in letter order.
    pub fn cell_coords(&self) -> Vec<GridCoord> {
        (0..self.length).map(|cell_idx| self.cell_coord(cell_idx)).collect()
    }

    pub fn cell_coord(&self, cell_idx: usize) -> GridCoord {
        let (row, col) = self.start_cell;
        match self.direction {
            Direction::Across => (row, col + cell_idx),
            Direction::Down => (row + cell_idx, col),
        }
    }
}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        self.start_cell == other.start_cell
            && self.direction == other.direction
            && self.length == other.length
    }
}

impl Eq for Slot {}

impl Hash for Slot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start_cell.hash(state);
        self.direction.hash(state);
        self.length.hash(state);
    }
}

/// The static part of a crossword problem: grid geometry, slots, the vocabulary, and the crossing
/// relations between slots. Nothing here changes while solving.
pub struct Puzzle {
    height: usize,
    width: usize,
    structure: Vec<Vec<bool>>,
    slots: Vec<Slot>,
    words: WordList,
    crossings: Vec<SmallVec<[Option<Crossing>; MAX_SLOT_LENGTH]>>,
    neighbors: Vec<Vec<SlotId>>,
    overlaps: HashMap<(SlotId, SlotId), (usize, usize)>,
}

impl Debug for Puzzle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Puzzle")
            .field("height", &self.height)
            .field("width", &self.width)
            .field("slots", &self.slots)
            .field("words", &self.words)
            .finish()
    }
}

/// Find each maximal run of at least two open cells along the given lines of coords.
fn find_runs<L>(structure: &[Vec<bool>], lines: L) -> Vec<Vec<GridCoord>>
where
    L: IntoIterator<Item = Vec<GridCoord>>,
{
    let mut result: Vec<Vec<GridCoord>> = vec![];

    for line in lines {
        let mut current_run: Vec<GridCoord> = vec![];

        for (row, col) in line {
            if structure[row][col] {
                current_run.push((row, col));
            } else {
                if current_run.len() > 1 {
                    result.push(current_run);
                }
                current_run = vec![];
            }
        }

        if current_run.len() > 1 {
            result.push(current_run);
        }
    }

    result
}

impl Puzzle {
    /// Build a puzzle from a grid of open (`true`) and blocked (`false`) cells and a vocabulary.
    /// Every row must have the same width.
    pub fn new<I, S>(structure: Vec<Vec<bool>>, vocabulary: I) -> Result<Puzzle>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let height = structure.len();
        let width = structure.first().map(|row| row.len()).unwrap_or(0);

        if let Some((row, found)) = structure
            .iter()
            .map(|cells| cells.len())
            .enumerate()
            .find(|&(_, found)| found != width)
        {
            return Err(Error::MalformedGrid {
                row,
                expected: width,
                found,
            });
        }

        let across_runs = find_runs(
            &structure,
            (0..height).map(|row| (0..width).map(|col| (row, col)).collect()),
        );
        let mut down_runs = find_runs(
            &structure,
            (0..width).map(|col| (0..height).map(|row| (row, col)).collect()),
        );
        down_runs.sort_by_key(|run| run[0]);

        let slots: Vec<Slot> = across_runs
            .into_iter()
            .map(|run| (run, Direction::Across))
            .chain(down_runs.into_iter().map(|run| (run, Direction::Down)))
            .enumerate()
            .map(|(id, (run, direction))| Slot {
                id,
                start_cell: run[0],
                direction,
                length: run.len(),
            })
            .collect();

        // Build a map from cell location to (slot id, cell index within slot), which we can then
        // use to calculate crossings.
        let mut cell_by_loc: HashMap<GridCoord, SmallVec<[(SlotId, usize); 2]>> = HashMap::new();
        for slot in &slots {
            for (cell_idx, loc) in slot.cell_coords().into_iter().enumerate() {
                cell_by_loc.entry(loc).or_default().push((slot.id, cell_idx));
            }
        }

        let mut overlaps: HashMap<(SlotId, SlotId), (usize, usize)> = HashMap::new();
        let mut neighbors: Vec<Vec<SlotId>> = Vec::with_capacity(slots.len());

        let crossings: Vec<SmallVec<[Option<Crossing>; MAX_SLOT_LENGTH]>> = slots
            .iter()
            .map(|slot| {
                slot.cell_coords()
                    .iter()
                    .enumerate()
                    .map(|(cell_idx, loc)| {
                        cell_by_loc[loc]
                            .iter()
                            .find(|&&(other_slot_id, _)| other_slot_id != slot.id)
                            .map(|&(other_slot_id, other_slot_cell)| {
                                overlaps.insert(
                                    (slot.id, other_slot_id),
                                    (cell_idx, other_slot_cell),
                                );
                                Crossing {
                                    other_slot_id,
                                    other_slot_cell,
                                }
                            })
                    })
                    .collect()
            })
            .collect();

        for slot_crossings in &crossings {
            let mut slot_neighbors: Vec<SlotId> = slot_crossings
                .iter()
                .flatten()
                .map(|crossing| crossing.other_slot_id)
                .collect();
            slot_neighbors.sort_unstable();
            slot_neighbors.dedup();
            neighbors.push(slot_neighbors);
        }

        Ok(Puzzle {
            height,
            width,
            structure,
            slots,
            words: WordList::new(vocabulary),
            crossings,
            neighbors,
            overlaps,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_open(&self, (row, col): GridCoord) -> bool {
        self.structure
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .unwrap_or(false)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, slot_id: SlotId) -> &Slot {
        self.assert_slot(slot_id);
        &self.slots[slot_id]
    }

    /// Find the id of a slot by its geometry.
    pub fn find_slot(&self, start_cell: GridCoord, direction: Direction) -> Option<SlotId> {
        self.slots
            .iter()
            .find(|slot| slot.start_cell == start_cell && slot.direction == direction)
            .map(|slot| slot.id)
    }

    pub fn words(&self) -> &WordList {
        &self.words
    }

    pub fn word(&self, word_id: WordId) -> &Word {
        self.words.get(word_id)
    }

    /// All other slots sharing a cell with this one, ordered by id.
    pub fn neighbors(&self, slot_id: SlotId) -> &[SlotId] {
        self.assert_slot(slot_id);
        &self.neighbors[slot_id]
    }

    /// Number of neighbors, used as the degree tie-breaker when choosing a slot.
    pub fn degree(&self, slot_id: SlotId) -> usize {
        self.neighbors(slot_id).len()
    }

    /// For each cell of the slot, the slot crossing it there, if any.
    pub fn crossings(&self, slot_id: SlotId) -> &[Option<Crossing>] {
        self.assert_slot(slot_id);
        &self.crossings[slot_id]
    }

    /// The index within `a` and within `b` of the cell the two slots share, if they cross.
    pub fn overlap(&self, a: SlotId, b: SlotId) -> Option<(usize, usize)> {
        self.assert_slot(a);
        self.assert_slot(b);
        self.overlaps.get(&(a, b)).copied()
    }

    /// Every ordered pair of crossing slots; the starting worklist for a full AC-3 pass.
    pub fn arcs(&self) -> Vec<(SlotId, SlotId)> {
        self.neighbors
            .iter()
            .enumerate()
            .flat_map(|(slot_id, slot_neighbors)| {
                slot_neighbors.iter().map(move |&neighbor| (slot_id, neighbor))
            })
            .collect()
    }

    fn assert_slot(&self, slot_id: SlotId) {
        assert!(
            slot_id < self.slots.len(),
            "slot id {} is not part of this puzzle ({} slots)",
            slot_id,
            self.slots.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{Puzzle, Slot};
    use crate::error::Error;
    use crate::parse::parse_structure;
    use crate::types::Direction::{Across, Down};
    use test_log::test;

    fn structure0() -> Vec<Vec<bool>> {
        parse_structure(
            "
            #___#
            #_##_
            #_##_
            #_##_
            #____
            ",
        )
    }

    #[test]
    fn test_slots_are_extracted_from_structure() {
        let puzzle = Puzzle::new(structure0(), ["SIX"]).unwrap();

        let slots: Vec<_> = puzzle
            .slots()
            .iter()
            .map(|slot| (slot.start_cell, slot.direction, slot.length))
            .collect();

        assert_eq!(
            slots,
            vec![
                ((0, 1), Across, 3),
                ((4, 1), Across, 4),
                ((0, 1), Down, 5),
                ((1, 4), Down, 4),
            ]
        );
    }

    #[test]
    fn test_single_cell_runs_are_not_slots() {
        let puzzle = Puzzle::new(parse_structure("_#_\n#_#"), ["A"]).unwrap();
        assert_eq!(puzzle.slot_count(), 0);
    }

    #[test]
    fn test_overlaps_are_symmetric() {
        let puzzle = Puzzle::new(structure0(), ["SIX"]).unwrap();
        let top = puzzle.find_slot((0, 1), Across).unwrap();
        let left = puzzle.find_slot((0, 1), Down).unwrap();
        let bottom = puzzle.find_slot((4, 1), Across).unwrap();
        let right = puzzle.find_slot((1, 4), Down).unwrap();

        assert_eq!(puzzle.overlap(top, left), Some((0, 0)));
        assert_eq!(puzzle.overlap(left, bottom), Some((4, 0)));
        assert_eq!(puzzle.overlap(bottom, left), Some((0, 4)));
        assert_eq!(puzzle.overlap(right, bottom), Some((3, 3)));
        assert_eq!(puzzle.overlap(top, right), None);
        assert_eq!(puzzle.overlap(top, top), None);

        for (a, b) in puzzle.arcs() {
            let (i, j) = puzzle.overlap(a, b).unwrap();
            assert_eq!(puzzle.overlap(b, a), Some((j, i)));
            assert_eq!(puzzle.slot(a).cell_coord(i), puzzle.slot(b).cell_coord(j));
        }
    }

    #[test]
    fn test_neighbors_exclude_self() {
        let puzzle = Puzzle::new(structure0(), ["SIX"]).unwrap();
        let left = puzzle.find_slot((0, 1), Down).unwrap();
        let top = puzzle.find_slot((0, 1), Across).unwrap();
        let bottom = puzzle.find_slot((4, 1), Across).unwrap();

        assert_eq!(puzzle.neighbors(left), &[top, bottom]);
        assert_eq!(puzzle.degree(left), 2);
        assert_eq!(puzzle.degree(top), 1);
    }

    #[test]
    fn test_crossings_per_cell() {
        let puzzle = Puzzle::new(structure0(), ["SIX"]).unwrap();
        let bottom = puzzle.find_slot((4, 1), Across).unwrap();
        let left = puzzle.find_slot((0, 1), Down).unwrap();
        let right = puzzle.find_slot((1, 4), Down).unwrap();

        let crossings: Vec<_> = puzzle
            .crossings(bottom)
            .iter()
            .map(|crossing| crossing.map(|c| (c.other_slot_id, c.other_slot_cell)))
            .collect();

        assert_eq!(crossings, vec![Some((left, 4)), None, None, Some((right, 3))]);
    }

    #[test]
    fn test_jagged_rows_are_rejected() {
        let result = Puzzle::new(vec![vec![true, true, true], vec![true, true]], ["SIX"]);

        match result {
            Err(Error::MalformedGrid { row, expected, found }) => {
                assert_eq!((row, expected, found), (1, 3, 2));
            }
            other => panic!("expected a malformed grid error, got {:?}", other),
        }
    }

    #[test]
    fn test_slot_equality_ignores_id() {
        let a = Slot {
            id: 0,
            start_cell: (1, 2),
            direction: Across,
            length: 3,
        };
        let b = Slot {
            id: 7,
            start_cell: (1, 2),
            direction: Across,
            length: 3,
        };
        let c = Slot {
            id: 0,
            start_cell: (1, 2),
            direction: Down,
            length: 3,
        };

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(c.cell_coords(), vec![(1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    #[should_panic(expected = "is not part of this puzzle")]
    fn test_unknown_slot_panics() {
        let puzzle = Puzzle::new(structure0(), ["SIX"]).unwrap();
        puzzle.overlap(0, 99);
    }
}
