use crate::backtracking_search::Assignment;
use crate::puzzle::Puzzle;

/// The glyph drawn for blocked cells.
pub const BLOCK: char = '█';

/// Return a grid of the letters placed by the assignment, with None for blocked cells and open
/// cells that no assigned word covers.
pub fn letter_grid(puzzle: &Puzzle, assignment: &Assignment) -> Vec<Vec<Option<char>>> {
    let mut letters: Vec<Vec<Option<char>>> = vec![vec![None; puzzle.width()]; puzzle.height()];

    for (slot, word) in assignment.entries(puzzle) {
        for (cell_idx, glyph) in word.chars().enumerate() {
            let (row, col) = slot.cell_coord(cell_idx);
            letters[row][col] = Some(glyph);
        }
    }

    letters
}

/// Turn the given puzzle and assignment into a rendered string, one line per row.
pub fn render_grid(puzzle: &Puzzle, assignment: &Assignment) -> String {
    letter_grid(puzzle, assignment)
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(|(col, letter)| {
                    if puzzle.is_open((row, col)) {
                        letter.unwrap_or(' ')
                    } else {
                        BLOCK
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
