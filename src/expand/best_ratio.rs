//! Greedy best-ratio expansion
//!
//! The adaptive strategy from de Kok, Ma & van Noord (2009): start from
//! the minimal n-gram at a position and extend it one token at a time as
//! long as the longer span has a strictly better unparsable ratio than
//! both the best span so far and the span obtained by dropping the first
//! token. Expansion stops at the first comparison that fails.
//!
//! Each comparison is scaled by an expansion factor
//! `1 + exp(-alpha * unparsableFreq)` that discounts extensions with
//! little supporting evidence; `alpha = 0` disables the factor.

use crate::expand::{unparsable_ratio, Expander, Expansion, NgramFreqs};
use crate::types::TokenCode;

/// Expander that adaptively grows an n-gram while its unparsable ratio
/// keeps improving.
pub struct BestRatioExpander {
    n: usize,
    alpha: f64,
    freqs: NgramFreqs,
}

impl BestRatioExpander {
    /// Create an expander starting from n-grams of length `n`.
    pub fn new(n: usize, alpha: f64, freqs: NgramFreqs) -> Self {
        Self { n, alpha, freqs }
    }

    /// The expansion factor for a span with the given unparsable-corpus
    /// frequency.
    fn expansion_factor(&self, unparsable_freq: usize) -> f64 {
        1.0 + (-self.alpha * unparsable_freq as f64).exp()
    }
}

impl Expander for BestRatioExpander {
    fn expand(&mut self, tokens: &[TokenCode], start: usize) -> Vec<Expansion> {
        if start + self.n > tokens.len() {
            return Vec::new();
        }

        let mut best_end = start + self.n;
        let (mut best_parsable, mut best_unparsable) =
            self.freqs.ngram_freqs(&tokens[start..best_end]);
        let mut best_ratio = unparsable_ratio(best_parsable, best_unparsable);

        for end in best_end + 1..=tokens.len() {
            let (parsable, unparsable) = self.freqs.ngram_freqs(&tokens[start..end]);
            let ratio = unparsable_ratio(parsable, unparsable);

            let factor = if self.alpha == 0.0 {
                1.0
            } else {
                self.expansion_factor(unparsable)
            };

            // The longer span has to beat the best span seen so far...
            if ratio <= factor * best_ratio {
                break;
            }

            // ...and the span without its first token, which would
            // otherwise be the better explanation for the bad ratio.
            let (tail_parsable, tail_unparsable) =
                self.freqs.ngram_freqs(&tokens[start + 1..end]);
            if ratio <= factor * unparsable_ratio(tail_parsable, tail_unparsable) {
                break;
            }

            best_end = end;
            best_ratio = ratio;
            best_parsable = parsable;
            best_unparsable = unparsable;
        }

        vec![Expansion {
            start,
            end: best_end,
            parsable_freq: best_parsable,
            unparsable_freq: best_unparsable,
        }]
    }
}
