use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::puzzle::Puzzle;

/// Parse a structure template, with `_` or `.` representing open cells and anything else (`#`,
/// `█`, ...) representing blocks. Lines are trimmed and blank lines are ignored, so templates can
/// be indented inline.
pub fn parse_structure(template: &str) -> Vec<Vec<bool>> {
    template
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                None
            } else {
                Some(line.chars().map(|c| c == '_' || c == '.').collect())
            }
        })
        .collect()
}

/// Parse a word list with one entry per line. Entries are upper-cased so that the vocabulary and
/// any prefilled letters agree on case.
pub fn parse_word_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_uppercase())
        .collect()
}

/// Generate a puzzle from a structure template and word list given as strings.
pub fn puzzle_from_strings(template: &str, word_list: &str) -> Result<Puzzle> {
    Puzzle::new(parse_structure(template), parse_word_list(word_list))
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a puzzle from a structure file and a word list file.
pub fn load_puzzle<P, Q>(structure_path: P, words_path: Q) -> Result<Puzzle>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let template = read_file(structure_path.as_ref())?;
    let word_list = read_file(words_path.as_ref())?;

    let puzzle = puzzle_from_strings(&template, &word_list)?;
    log::debug!(
        "Loaded {}x{} puzzle with {} slots and {} words",
        puzzle.height(),
        puzzle.width(),
        puzzle.slot_count(),
        puzzle.words().len()
    );

    Ok(puzzle)
}

#[cfg(test)]
mod tests {
    use super::{load_puzzle, parse_structure, parse_word_list, puzzle_from_strings};
    use crate::error::Error;
    use test_log::test;

    #[test]
    fn test_parse_structure() {
        let structure = parse_structure(
            "
            #_.
            █__
            ",
        );

        assert_eq!(structure, vec![vec![false, true, true], vec![false, true, true]]);
    }

    #[test]
    fn test_parse_word_list() {
        assert_eq!(parse_word_list("one\n\n  Two \r\nthree\n"), vec!["ONE", "TWO", "THREE"]);
    }

    #[test]
    fn test_jagged_template_is_malformed() {
        let result = puzzle_from_strings("___\n__\n", "ONE");
        assert!(matches!(result, Err(Error::MalformedGrid { row: 1, .. })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_puzzle("/nonexistent/structure.txt", "/nonexistent/words.txt");
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
