//! Perfect hash automaton over a fixed vocabulary.
//!
//! A [`HashAutomaton`] is a bijection between the words of a vocabulary and
//! dense integer codes `0..len`. The on-disk representation is the
//! vocabulary itself, one word per line in strictly increasing byte order
//! (the output of `sort -u`); a word's code is its rank in that order.
//! Anything else is rejected at construction, which is the only place this
//! can fail.

use crate::errors::{MineError, Result};
use crate::types::{TokenCode, UNKNOWN_CODE};
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A word ↔ code bijection for a fixed vocabulary.
///
/// Encoding an out-of-vocabulary word yields [`UNKNOWN_CODE`]; decoding an
/// out-of-range code yields `None`. Neither is an error.
#[derive(Debug, Clone, Default)]
pub struct HashAutomaton {
    words: Vec<String>,
    codes: FxHashMap<String, TokenCode>,
}

impl HashAutomaton {
    /// Load an automaton from a sorted vocabulary file.
    ///
    /// Fails if the file cannot be read, is empty, or is not strictly
    /// sorted (duplicates included) — such a file does not describe a
    /// perfect hash.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let file = File::open(path)
            .map_err(|err| MineError::invalid_automaton(&display, err.to_string()))?;

        let mut words = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            words.push(line);
        }

        if words.is_empty() {
            return Err(MineError::invalid_automaton(&display, "empty vocabulary"));
        }

        for pair in words.windows(2) {
            if pair[0] >= pair[1] {
                return Err(MineError::invalid_automaton(
                    &display,
                    format!(
                        "vocabulary is not strictly sorted: {:?} precedes {:?}",
                        pair[0], pair[1]
                    ),
                ));
            }
        }

        Ok(Self::build(words))
    }

    /// Build an automaton from an unsorted word collection.
    ///
    /// Words are sorted and deduplicated, matching the codes a vocabulary
    /// file produced from the same words would assign. Fails on an empty
    /// vocabulary.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut words: Vec<String> = words.into_iter().map(Into::into).collect();
        words.sort_unstable();
        words.dedup();

        if words.is_empty() {
            return Err(MineError::invalid_automaton(
                "<memory>",
                "empty vocabulary",
            ));
        }

        Ok(Self::build(words))
    }

    fn build(words: Vec<String>) -> Self {
        let mut codes = FxHashMap::default();
        codes.reserve(words.len());
        for (code, word) in words.iter().enumerate() {
            codes.insert(word.clone(), code as TokenCode);
        }

        Self { words, codes }
    }

    /// Get the code for a word, or [`UNKNOWN_CODE`] for an unknown word.
    pub fn encode(&self, word: &str) -> TokenCode {
        self.codes.get(word).copied().unwrap_or(UNKNOWN_CODE)
    }

    /// Get the word for a code.
    pub fn decode(&self, code: TokenCode) -> Option<&str> {
        if code < 0 {
            return None;
        }
        self.words.get(code as usize).map(String::as_str)
    }

    /// Encode a whole token sequence.
    pub fn encode_all(&self, tokens: &[String]) -> Vec<TokenCode> {
        tokens.iter().map(|token| self.encode(token)).collect()
    }

    /// Number of words in the vocabulary.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_roundtrip() {
        let automaton = HashAutomaton::from_words(["cherry", "apple", "banana"]).unwrap();

        assert_eq!(automaton.len(), 3);
        assert_eq!(automaton.encode("apple"), 0);
        assert_eq!(automaton.encode("banana"), 1);
        assert_eq!(automaton.encode("cherry"), 2);
        assert_eq!(automaton.decode(1), Some("banana"));
        assert_eq!(automaton.decode(3), None);
        assert_eq!(automaton.decode(UNKNOWN_CODE), None);
    }

    #[test]
    fn test_unknown_word_sentinel() {
        let automaton = HashAutomaton::from_words(["a"]).unwrap();
        assert_eq!(automaton.encode("zebra"), UNKNOWN_CODE);
    }

    #[test]
    fn test_duplicate_words_collapse() {
        let automaton = HashAutomaton::from_words(["b", "a", "b"]).unwrap();
        assert_eq!(automaton.len(), 2);
    }

    #[test]
    fn test_empty_vocabulary_rejected() {
        let words: Vec<String> = Vec::new();
        assert!(HashAutomaton::from_words(words).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "apple\nbanana\ncherry").unwrap();

        let automaton = HashAutomaton::from_file(file.path()).unwrap();
        assert_eq!(automaton.encode("cherry"), 2);
    }

    #[test]
    fn test_from_file_rejects_unsorted() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "banana\napple").unwrap();

        let err = HashAutomaton::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("not strictly sorted"));
    }

    #[test]
    fn test_from_file_rejects_duplicates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "apple\napple").unwrap();

        assert!(HashAutomaton::from_file(file.path()).is_err());
    }

    #[test]
    fn test_from_file_rejects_missing() {
        assert!(HashAutomaton::from_file("/nonexistent/words.vocab").is_err());
    }
}
