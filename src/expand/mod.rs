//! N-gram expansion strategies.
//!
//! An expander looks at one start position of a tokenized sentence and
//! proposes candidate n-gram spans together with their occurrence
//! frequencies in the parsable and unparsable corpora. Two strategies are
//! provided: [`SimpleExpander`] emits every span in a fixed length range,
//! [`BestRatioExpander`] grows a span adaptively while doing so makes it
//! look more strongly associated with parse failure.

use crate::automaton::HashAutomaton;
use crate::suffix::SuffixArray;
use crate::types::{TokenCode, UNKNOWN_CODE};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

pub mod best_ratio;
pub mod simple;

pub use best_ratio::BestRatioExpander;
pub use simple::SimpleExpander;

// ============================================================================
// Expansion
// ============================================================================

/// A candidate n-gram span within a sentence, with its corpus frequencies.
///
/// The span is the half-open token index range `[start, end)` into the
/// sentence the expander was asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expansion {
    /// First token index of the span (inclusive)
    pub start: usize,
    /// One past the last token index of the span (exclusive)
    pub end: usize,
    /// Occurrences of the span in the parsable corpus
    pub parsable_freq: usize,
    /// Occurrences of the span in the unparsable corpus
    pub unparsable_freq: usize,
}

impl Expansion {
    /// Span length in tokens.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check whether the span is empty. Expanders never produce empty
    /// spans.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Proposes candidate n-gram spans starting at a position in a sentence.
///
/// An implementation may return no expansions for positions too close to
/// the sentence end to fit its minimal n-gram.
pub trait Expander {
    /// Propose expansions for the span starting at `start` in `tokens`
    /// (codes in the unparsable automaton's space).
    fn expand(&mut self, tokens: &[TokenCode], start: usize) -> Vec<Expansion>;
}

// ============================================================================
// Frequency lookup
// ============================================================================

/// The fraction of an n-gram's occurrences that fall in the unparsable
/// corpus. An n-gram absent from both corpora gets ratio 0.
pub fn unparsable_ratio(parsable_freq: usize, unparsable_freq: usize) -> f64 {
    let total = parsable_freq + unparsable_freq;
    if total == 0 {
        return 0.0;
    }
    unparsable_freq as f64 / total as f64
}

/// Frequency lookup against both corpora, shared by the expanders.
///
/// The two corpora are hashed with independent automata, so before a
/// parsable-corpus lookup an n-gram's codes are translated by decoding
/// through the unparsable automaton and re-encoding with the parsable one.
/// Lookup results for unigrams are memoized in a bounded LRU cache; a
/// miss is always safely recomputable.
pub struct NgramFreqs {
    parsable_automaton: Arc<HashAutomaton>,
    unparsable_automaton: Arc<HashAutomaton>,
    good_suffix_array: Arc<SuffixArray<TokenCode>>,
    bad_suffix_array: Arc<SuffixArray<TokenCode>>,
    cache: LruCache<Vec<TokenCode>, (usize, usize)>,
}

impl NgramFreqs {
    /// Create a frequency lookup with the given cache capacity (in cached
    /// n-grams).
    pub fn new(
        parsable_automaton: Arc<HashAutomaton>,
        unparsable_automaton: Arc<HashAutomaton>,
        good_suffix_array: Arc<SuffixArray<TokenCode>>,
        bad_suffix_array: Arc<SuffixArray<TokenCode>>,
        cache_capacity: usize,
    ) -> Self {
        let capacity = NonZeroUsize::new(cache_capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            parsable_automaton,
            unparsable_automaton,
            good_suffix_array,
            bad_suffix_array,
            cache: LruCache::new(capacity),
        }
    }

    /// The parsable and unparsable corpus frequencies of an n-gram given
    /// in unparsable codes.
    pub fn ngram_freqs(&mut self, ngram: &[TokenCode]) -> (usize, usize) {
        if let Some(&freqs) = self.cache.get(ngram) {
            return freqs;
        }

        let parsable_ngram = self.to_parsable_codes(ngram);
        let good_freq = self.good_suffix_array.find(&parsable_ngram);
        let bad_freq = self.bad_suffix_array.find(ngram);

        // Unigrams are looked up again for every sentence that contains
        // them; longer spans are rarely revisited.
        if ngram.len() == 1 {
            self.cache.put(ngram.to_vec(), (good_freq, bad_freq));
        }

        (good_freq, bad_freq)
    }

    /// Translate an n-gram from unparsable codes to parsable codes by
    /// round-tripping through the token strings. Tokens outside the
    /// parsable vocabulary become [`UNKNOWN_CODE`], which matches nothing
    /// in the parsable corpus.
    pub fn to_parsable_codes(&self, ngram: &[TokenCode]) -> Vec<TokenCode> {
        ngram
            .iter()
            .map(|&code| match self.unparsable_automaton.decode(code) {
                Some(word) => self.parsable_automaton.encode(word),
                None => UNKNOWN_CODE,
            })
            .collect()
    }
}
