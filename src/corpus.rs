//! Corpus ingestion: sentence handlers and line readers.
//!
//! Sentences arrive as `(tokens, error)` pairs, error 0.0 for parsable and
//! 1.0 for unparsable sentences. Handlers implement [`SentenceHandler`];
//! the readers feed every registered handler, unparsable corpus first.

use crate::automaton::HashAutomaton;
use crate::errors::Result;
use crate::types::TokenCode;
use std::io::BufRead;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

/// Receives one sentence at a time during corpus ingestion.
pub trait SentenceHandler {
    /// Handle a sentence with the given error rate.
    fn handle_sentence(&mut self, tokens: &[String], error: f64);
}

// ============================================================================
// HashedCorpus
// ============================================================================

/// A sentence handler that accumulates both corpora as flat sequences of
/// token codes, parsable sentences hashed with the parsable automaton and
/// unparsable sentences with the unparsable one.
///
/// Sentences are concatenated without boundary markers; the flat sequences
/// are what the suffix arrays index.
#[derive(Debug)]
pub struct HashedCorpus {
    parsable_automaton: Arc<HashAutomaton>,
    unparsable_automaton: Arc<HashAutomaton>,
    good: Vec<TokenCode>,
    bad: Vec<TokenCode>,
}

impl HashedCorpus {
    /// Create an empty hashed corpus.
    pub fn new(
        parsable_automaton: Arc<HashAutomaton>,
        unparsable_automaton: Arc<HashAutomaton>,
    ) -> Self {
        Self {
            parsable_automaton,
            unparsable_automaton,
            good: Vec::new(),
            bad: Vec::new(),
        }
    }

    /// The hashed corpus of parsable sentences.
    pub fn good(&self) -> &[TokenCode] {
        &self.good
    }

    /// The hashed corpus of unparsable sentences.
    pub fn bad(&self) -> &[TokenCode] {
        &self.bad
    }

    /// Consume the corpus, yielding `(good, bad)` code sequences.
    pub fn into_parts(self) -> (Vec<TokenCode>, Vec<TokenCode>) {
        (self.good, self.bad)
    }
}

impl SentenceHandler for HashedCorpus {
    fn handle_sentence(&mut self, tokens: &[String], error: f64) {
        let (corpus, automaton) = if error == 0.0 {
            (&mut self.good, &self.parsable_automaton)
        } else {
            (&mut self.bad, &self.unparsable_automaton)
        };

        corpus.extend(tokens.iter().map(|token| automaton.encode(token)));
    }
}

// ============================================================================
// Readers
// ============================================================================

fn feed_handlers(
    handlers: &mut [&mut dyn SentenceHandler],
    input: impl BufRead,
    error: f64,
    split: impl Fn(&str) -> Vec<String>,
) -> Result<()> {
    for line in input.lines() {
        let tokens = split(&line?);
        for handler in handlers.iter_mut() {
            handler.handle_sentence(&tokens, error);
        }
    }

    Ok(())
}

/// Reads corpora with one sentence per line and whitespace-separated
/// tokens.
#[derive(Default)]
pub struct TokenizedSentenceReader<'a> {
    handlers: Vec<&'a mut dyn SentenceHandler>,
}

impl<'a> TokenizedSentenceReader<'a> {
    /// Create a reader with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler to receive every sentence.
    pub fn add_handler(&mut self, handler: &'a mut dyn SentenceHandler) {
        self.handlers.push(handler);
    }

    /// Read both corpora, unparsable sentences (error 1.0) first, then
    /// parsable sentences (error 0.0).
    pub fn read(&mut self, parsable: impl BufRead, unparsable: impl BufRead) -> Result<()> {
        let split =
            |line: &str| -> Vec<String> { line.split_whitespace().map(str::to_string).collect() };
        feed_handlers(&mut self.handlers, unparsable, 1.0, split)?;
        feed_handlers(&mut self.handlers, parsable, 0.0, split)
    }
}

/// Reads corpora at character granularity: every grapheme cluster of a
/// line becomes one token. Used for mining scripts without whitespace
/// tokenization.
#[derive(Default)]
pub struct CharacterReader<'a> {
    handlers: Vec<&'a mut dyn SentenceHandler>,
}

impl<'a> CharacterReader<'a> {
    /// Create a reader with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler to receive every sentence.
    pub fn add_handler(&mut self, handler: &'a mut dyn SentenceHandler) {
        self.handlers.push(handler);
    }

    /// Read both corpora, unparsable sentences (error 1.0) first, then
    /// parsable sentences (error 0.0).
    pub fn read(&mut self, parsable: impl BufRead, unparsable: impl BufRead) -> Result<()> {
        let split =
            |line: &str| -> Vec<String> { line.graphemes(true).map(str::to_string).collect() };
        feed_handlers(&mut self.handlers, unparsable, 1.0, split)?;
        feed_handlers(&mut self.handlers, parsable, 0.0, split)
    }
}
