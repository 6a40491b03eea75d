use smallvec::SmallVec;
use std::collections::BTreeSet;
use std::fmt::{Debug, Formatter};

use crate::types::WordId;
use crate::MAX_SLOT_LENGTH;

/// A struct representing a word that can be chosen for a given slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub string: String,
    pub glyphs: SmallVec<[char; MAX_SLOT_LENGTH]>,
}

impl Word {
    fn new(string: String) -> Word {
        let glyphs = string.chars().collect();
        Word { string, glyphs }
    }

    /// Length in characters, which is what gets compared against a slot's length.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// The letter at the given cell index, or None if the word is too short to reach it.
    pub fn glyph(&self, cell_idx: usize) -> Option<char> {
        self.glyphs.get(cell_idx).copied()
    }
}

/// The vocabulary available to every slot. Words are deduplicated and sorted, so `WordId`s
/// follow lexicographic order and can double as a deterministic tie-breaker.
#[derive(Clone, Default)]
pub struct WordList {
    words: Vec<Word>,
}

impl WordList {
    pub fn new<I, S>(words: I) -> WordList
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<String> = words
            .into_iter()
            .map(|word| word.as_ref().to_string())
            .filter(|word| !word.is_empty())
            .collect();

        WordList {
            words: unique.into_iter().map(Word::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, word_id: WordId) -> &Word {
        &self.words[word_id]
    }

    pub fn iter(&self) -> impl Iterator<Item = (WordId, &Word)> {
        self.words.iter().enumerate()
    }

    /// Look up the id of a word by its exact string.
    pub fn find(&self, string: &str) -> Option<WordId> {
        self.words
            .binary_search_by(|word| word.string.as_str().cmp(string))
            .ok()
    }
}

impl Debug for WordList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordList")
            .field("words", &(["(", &self.words.len().to_string(), " entries)"].join("")))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::WordList;
    use test_log::test;

    #[test]
    fn test_duplicates_collapse_and_order_is_lexicographic() {
        let word_list = WordList::new(["TEN", "SIX", "TEN", "", "ONE"]);

        let strings: Vec<_> = word_list.iter().map(|(_, word)| word.string.as_str()).collect();
        assert_eq!(strings, vec!["ONE", "SIX", "TEN"]);
        assert_eq!(word_list.find("SIX"), Some(1));
        assert_eq!(word_list.find("TWO"), None);
    }

    #[test]
    fn test_glyph_lookup() {
        let word_list = WordList::new(["CAB"]);
        let word = word_list.get(0);

        assert_eq!(word.len(), 3);
        assert_eq!(word.glyph(1), Some('A'));
        assert_eq!(word.glyph(3), None);
    }
}
