//! Fixed-range expansion
//!
//! Emits every contiguous span of length `n..=m` at a start position, with
//! no adaptive logic. Useful as a baseline when the analysis should see
//! all n-grams of the configured lengths.

use crate::expand::{Expander, Expansion, NgramFreqs};
use crate::types::TokenCode;

/// Expander that emits every span of length `n..=m` starting at the
/// requested position, bounded by the sentence length.
pub struct SimpleExpander {
    n: usize,
    m: usize,
    freqs: NgramFreqs,
}

impl SimpleExpander {
    /// Create an expander producing spans of length `n..=m`.
    pub fn new(n: usize, m: usize, freqs: NgramFreqs) -> Self {
        Self { n, m, freqs }
    }
}

impl Expander for SimpleExpander {
    fn expand(&mut self, tokens: &[TokenCode], start: usize) -> Vec<Expansion> {
        let mut expansions = Vec::new();

        let mut len = self.n;
        while len <= self.m && start + len <= tokens.len() {
            let (parsable_freq, unparsable_freq) =
                self.freqs.ngram_freqs(&tokens[start..start + len]);
            expansions.push(Expansion {
                start,
                end: start + len,
                parsable_freq,
                unparsable_freq,
            });
            len += 1;
        }

        expansions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::test_util::{encode, freqs_from_sentences};

    #[test]
    fn test_emits_all_lengths() {
        let freqs = freqs_from_sentences(&[&["a"]], &[&["a", "b", "c"]]);
        let mut expander = SimpleExpander::new(1, 2, freqs);

        let tokens = encode(&expander.freqs, &["a", "b", "c"]);
        let expansions = expander.expand(&tokens, 0);

        assert_eq!(expansions.len(), 2);
        assert_eq!((expansions[0].start, expansions[0].end), (0, 1));
        assert_eq!((expansions[1].start, expansions[1].end), (0, 2));
        assert_eq!(expansions[0].parsable_freq, 1);
        assert_eq!(expansions[0].unparsable_freq, 1);
        assert_eq!(expansions[1].parsable_freq, 0);
    }

    #[test]
    fn test_bounded_by_sentence_end() {
        let freqs = freqs_from_sentences(&[&["a"]], &[&["a", "b", "c"]]);
        let mut expander = SimpleExpander::new(1, 3, freqs);

        let tokens = encode(&expander.freqs, &["a", "b", "c"]);
        let expansions = expander.expand(&tokens, 2);

        assert_eq!(expansions.len(), 1);
        assert_eq!((expansions[0].start, expansions[0].end), (2, 3));
    }

    #[test]
    fn test_no_room_for_minimal_ngram() {
        let freqs = freqs_from_sentences(&[&["a"]], &[&["a", "b"]]);
        let mut expander = SimpleExpander::new(2, 2, freqs);

        let tokens = encode(&expander.freqs, &["a", "b"]);
        assert!(expander.expand(&tokens, 1).is_empty());
    }
}
