use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building a puzzle. Failing to find a fill is not an error; see
/// `backtracking_search::SolveFailure`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed grid: row {row} has {found} cells, expected {expected}")]
    MalformedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
