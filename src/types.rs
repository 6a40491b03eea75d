/// An identifier for a given slot, based on its index in the Puzzle's `slots` field, which also
/// corresponds to an index in the solver's domain and assignment tables.
pub type SlotId = usize;

/// An identifier for a given word, based on its index in the Puzzle's (sorted, deduplicated)
/// vocabulary. Comparing two ids compares the words lexicographically.
pub type WordId = usize;

/// Zero-indexed (row, col) coords for a cell in the grid, where row = 0 is the top row.
pub type GridCoord = (usize, usize);

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Across,
    Down,
}
