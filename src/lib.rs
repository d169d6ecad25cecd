//! # errormine
//!
//! Parse-error mining: given a corpus of sentences a parser accepted and a
//! corpus it rejected, find the token n-grams ("forms") that are
//! disproportionately associated with the rejected sentences. The method
//! follows van Noord (2004) and its n-gram generalization by de Kok, Ma &
//! van Noord (2009).
//!
//! ## How it works
//!
//! - Both corpora are hashed into dense integer codes by perfect hash
//!   automata and indexed as [suffix arrays](suffix::SuffixArray) for fast
//!   substring frequency counting.
//! - For every position of every unparsable sentence, an
//!   [expander](expand::Expander) proposes candidate n-gram spans, either a
//!   fixed length range or an adaptive best-ratio expansion.
//! - The [`Miner`](miner::Miner) deduplicates the spans into
//!   [forms](types::Form) and iteratively redistributes each sentence's
//!   error over its forms until no suspicion moves by more than a
//!   threshold.
//!
//! ## Example
//!
//! ```no_run
//! use errormine::{HashAutomaton, HashedCorpus, Miner, MinerConfig, SuffixArray};
//! use std::sync::Arc;
//!
//! # fn main() -> errormine::Result<()> {
//! let parsable = Arc::new(HashAutomaton::from_file("parsable.vocab")?);
//! let unparsable = Arc::new(HashAutomaton::from_file("unparsable.vocab")?);
//!
//! let config = MinerConfig::default();
//! let mut corpus = HashedCorpus::new(parsable.clone(), unparsable.clone());
//! // ...feed sentences through a reader...
//! let (good, bad) = corpus.into_parts();
//!
//! let good_sa = Arc::new(SuffixArray::with_algorithm(good, config.sort_algorithm));
//! let bad_sa = Arc::new(SuffixArray::with_algorithm(bad, config.sort_algorithm));
//!
//! let mut miner = Miner::new(parsable, unparsable, good_sa, bad_sa, config)?;
//! // ...feed the sentences again...
//! miner.mine(0.001, 0.001);
//!
//! for form in miner.report(2, 0) {
//!     println!("{} {}", form.tokens.join(" "), form.suspicion);
//! }
//! # Ok(())
//! # }
//! ```

pub mod automaton;
pub mod corpus;
pub mod errors;
pub mod expand;
pub mod miner;
pub mod scoring;
pub mod suffix;
pub mod types;

// Re-export commonly used types
pub use automaton::HashAutomaton;
pub use corpus::{CharacterReader, HashedCorpus, SentenceHandler, TokenizedSentenceReader};
pub use errors::{MineError, Result};
pub use expand::{BestRatioExpander, Expander, Expansion, NgramFreqs, SimpleExpander};
pub use miner::{MineProgress, MinedForm, Miner};
pub use scoring::{rank_forms, ScoredForm, ScoringMethod};
pub use suffix::SuffixArray;
pub use types::{
    Form, FormId, FormStore, MinerConfig, Sentence, SortAlgorithm, TokenCode, UNKNOWN_CODE,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
