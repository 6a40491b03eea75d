//! Fill crossword grids from a word list by treating each slot as a constraint-satisfaction
//! variable: node consistency and AC-3 prune the candidate words, then a backtracking search
//! (minimum remaining values, least constraining value) finds an assignment where every crossing
//! agrees.

pub mod arc_consistency;
pub mod backtracking_search;
pub mod domain;
pub mod error;
pub mod parse;
pub mod puzzle;
pub mod render;
pub mod types;
pub mod word_list;

/// The expected maximum length for a single slot.
pub const MAX_SLOT_LENGTH: usize = 21;

pub use backtracking_search::{find_solution, solve, Assignment, SolverConfig, Statistics};
pub use error::{Error, Result};
pub use parse::load_puzzle;
pub use puzzle::{Puzzle, Slot};
pub use render::render_grid;
pub use types::{Direction, GridCoord, SlotId, WordId};
