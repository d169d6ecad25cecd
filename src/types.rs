//! Core types for errormine
//!
//! This module defines the fundamental data structures used throughout the
//! library: token codes, forms and their owning store, sentences, and the
//! miner configuration.

use crate::errors::{MineError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// Token codes
// ============================================================================

/// A dense integer code assigned to a token by a perfect hash automaton.
pub type TokenCode = i32;

/// Sentinel code for tokens outside an automaton's vocabulary.
///
/// Unknown codes never occur in a hashed corpus, so an n-gram containing
/// one has frequency zero by construction.
pub const UNKNOWN_CODE: TokenCode = -1;

// ============================================================================
// Form
// ============================================================================

/// A distinct n-gram tracked with aggregate observation statistics and a
/// suspicion score.
///
/// Identity is the ordered sequence of token codes; the [`FormStore`] holds
/// exactly one live instance per distinct n-gram.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    ngram: Vec<TokenCode>,
    suspicion: f64,
    unsusp_observations: usize,
    susp_observations: usize,
    uniq_sents: usize,
}

impl Form {
    pub(crate) fn new(ngram: Vec<TokenCode>, unsusp_observations: usize) -> Self {
        Self {
            ngram,
            suspicion: 0.0,
            unsusp_observations,
            susp_observations: 0,
            uniq_sents: 0,
        }
    }

    /// The n-gram this form represents, as token codes.
    pub fn ngram(&self) -> &[TokenCode] {
        &self.ngram
    }

    /// The current suspicion of this form.
    pub fn suspicion(&self) -> f64 {
        self.suspicion
    }

    pub(crate) fn set_suspicion(&mut self, suspicion: f64) {
        self.suspicion = suspicion;
    }

    /// Total number of observations (suspicious and unsuspicious).
    pub fn observations(&self) -> usize {
        self.unsusp_observations + self.susp_observations
    }

    /// Number of observations within unparsable sentences.
    pub fn susp_observations(&self) -> usize {
        self.susp_observations
    }

    /// Number of observations within parsable sentences, derived once at
    /// creation from the parsable-corpus frequency.
    pub fn unsusp_observations(&self) -> usize {
        self.unsusp_observations
    }

    /// Number of distinct unparsable sentences this form was observed in.
    pub fn uniq_sents(&self) -> usize {
        self.uniq_sents
    }

    pub(crate) fn new_susp_observation(&mut self) {
        self.susp_observations += 1;
    }

    pub(crate) fn new_uniq_sent(&mut self) {
        self.uniq_sents += 1;
    }
}

// ============================================================================
// FormStore
// ============================================================================

/// A stable handle to a form held by a [`FormStore`].
///
/// Handles stay valid until the form is pruned; lookups on a pruned handle
/// return `None` rather than aliasing a different form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormId(u32);

/// An owning arena of deduplicated forms, keyed by n-gram value.
///
/// Sentences reference forms through [`FormId`] handles, so updating a form
/// in place is visible through every sentence that observed it.
#[derive(Debug, Default)]
pub struct FormStore {
    slots: Vec<Option<Form>>,
    by_ngram: FxHashMap<Vec<TokenCode>, FormId>,
    live: usize,
}

impl FormStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live forms.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Check whether the store holds no live forms.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Look up the handle of an n-gram, if a form for it is live.
    pub fn lookup(&self, ngram: &[TokenCode]) -> Option<FormId> {
        self.by_ngram.get(ngram).copied()
    }

    /// Get a form by handle. Returns `None` for pruned handles.
    pub fn get(&self, id: FormId) -> Option<&Form> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Get a form mutably by handle. Returns `None` for pruned handles.
    pub fn get_mut(&mut self, id: FormId) -> Option<&mut Form> {
        self.slots.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    /// Return the handle for `ngram`, creating the form if it is new.
    ///
    /// `unsusp_observations` seeds a newly created form and is ignored for
    /// an existing one: the parsable-corpus frequency is fixed at creation.
    pub fn intern(&mut self, ngram: &[TokenCode], unsusp_observations: usize) -> FormId {
        if let Some(&id) = self.by_ngram.get(ngram) {
            return id;
        }

        let id = FormId(self.slots.len() as u32);
        self.slots
            .push(Some(Form::new(ngram.to_vec(), unsusp_observations)));
        self.by_ngram.insert(ngram.to_vec(), id);
        self.live += 1;
        id
    }

    /// Remove a form, invalidating its handle.
    pub fn remove(&mut self, id: FormId) -> Option<Form> {
        let form = self.slots.get_mut(id.0 as usize).and_then(Option::take)?;
        self.by_ngram.remove(form.ngram());
        self.live -= 1;
        Some(form)
    }

    /// Iterate over live forms.
    pub fn iter(&self) -> impl Iterator<Item = (FormId, &Form)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|form| (FormId(i as u32), form)))
    }

    /// Iterate over live forms mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (FormId, &mut Form)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|form| (FormId(i as u32), form)))
    }
}

// ============================================================================
// Sentence
// ============================================================================

/// A sentence as a weighted, ordered collection of observed forms.
///
/// Duplicates are allowed: the same form can be observed more than once in
/// a sentence.
#[derive(Debug, Clone, Default)]
pub struct Sentence {
    error: f64,
    observed: Vec<FormId>,
}

impl Sentence {
    /// Create a sentence with the given error rate, typically 0.0
    /// (parsable) or 1.0 (unparsable).
    pub fn new(error: f64) -> Self {
        Self {
            error,
            observed: Vec::new(),
        }
    }

    /// The sentence error rate.
    pub fn error(&self) -> f64 {
        self.error
    }

    /// Record an observation of a form in this sentence.
    pub fn add_observed_form(&mut self, id: FormId) {
        self.observed.push(id);
    }

    /// The forms observed in this sentence, in observation order.
    pub fn observed_forms(&self) -> &[FormId] {
        &self.observed
    }

    pub(crate) fn retain_observed(&mut self, keep: impl FnMut(&FormId) -> bool) {
        self.observed.retain(keep);
    }
}

// ============================================================================
// Suffix-sort selection
// ============================================================================

/// Which construction algorithm a suffix array uses.
///
/// Both produce identical arrays; the choice only affects construction
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortAlgorithm {
    /// Generic comparison sort over whole suffixes.
    Comparison,
    /// Prefix-doubling suffix sort. Intended for dense token codes, where
    /// it is considerably faster on large corpora.
    #[default]
    PrefixDoubling,
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the mining engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinerConfig {
    /// Length of the initial n-grams to analyze
    pub n: usize,
    /// Largest n-gram length emitted without adaptive expansion
    pub max_n: usize,
    /// Use adaptive best-ratio expansion instead of the fixed n..=max_n range
    pub ngram_expansion: bool,
    /// Alpha for the expansion factor `1 + exp(-alpha * unparsableFreq)`
    /// (0.0 disables the factor)
    pub expansion_alpha: f64,
    /// Apply shrinkage toward the population-average suspicion
    pub smoothing: bool,
    /// Beta for the smoothing weight `1 - exp(-beta * suspObservations)`
    pub smoothing_beta: f64,
    /// Capacity of the expander frequency cache, in cached n-grams
    pub freq_cache_capacity: usize,
    /// Suffix-sort algorithm for corpus indexing
    pub sort_algorithm: SortAlgorithm,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            n: 1,
            max_n: 1,
            ngram_expansion: true,
            expansion_alpha: 1.0,
            smoothing: false,
            smoothing_beta: 0.1,
            freq_cache_capacity: 1_000_000,
            sort_algorithm: SortAlgorithm::default(),
        }
    }
}

impl MinerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.n == 0 {
            return Err(MineError::invalid_config("n must be >= 1"));
        }

        if self.max_n < self.n {
            return Err(MineError::invalid_config(format!(
                "max_n must be >= n, got n={} max_n={}",
                self.n, self.max_n
            )));
        }

        if self.expansion_alpha < 0.0 {
            return Err(MineError::invalid_config("expansion_alpha must be >= 0"));
        }

        if self.smoothing_beta < 0.0 {
            return Err(MineError::invalid_config("smoothing_beta must be >= 0"));
        }

        if self.freq_cache_capacity == 0 {
            return Err(MineError::invalid_config(
                "freq_cache_capacity must be >= 1",
            ));
        }

        Ok(())
    }

    /// Builder method: set the n-gram length
    pub fn with_n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    /// Builder method: set the maximum n-gram length
    pub fn with_max_n(mut self, max_n: usize) -> Self {
        self.max_n = max_n;
        self
    }

    /// Builder method: enable or disable adaptive n-gram expansion
    pub fn with_ngram_expansion(mut self, ngram_expansion: bool) -> Self {
        self.ngram_expansion = ngram_expansion;
        self
    }

    /// Builder method: set the expansion factor alpha
    pub fn with_expansion_alpha(mut self, alpha: f64) -> Self {
        self.expansion_alpha = alpha;
        self
    }

    /// Builder method: enable or disable smoothing
    pub fn with_smoothing(mut self, smoothing: bool) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Builder method: set the smoothing beta
    pub fn with_smoothing_beta(mut self, beta: f64) -> Self {
        self.smoothing_beta = beta;
        self
    }

    /// Builder method: set the frequency cache capacity
    pub fn with_freq_cache_capacity(mut self, capacity: usize) -> Self {
        self.freq_cache_capacity = capacity;
        self
    }

    /// Builder method: set the suffix-sort algorithm
    pub fn with_sort_algorithm(mut self, algorithm: SortAlgorithm) -> Self {
        self.sort_algorithm = algorithm;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_store_dedup() {
        let mut store = FormStore::new();

        let a = store.intern(&[1, 2], 3);
        let b = store.intern(&[1, 2], 7);
        let c = store.intern(&[2, 1], 0);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(store.len(), 2);
        // The parsable frequency is fixed at creation.
        assert_eq!(store.get(a).unwrap().unsusp_observations(), 3);
    }

    #[test]
    fn test_form_store_remove_invalidates_handle() {
        let mut store = FormStore::new();

        let id = store.intern(&[4], 0);
        assert!(store.get(id).is_some());

        let removed = store.remove(id).unwrap();
        assert_eq!(removed.ngram(), &[4]);
        assert!(store.get(id).is_none());
        assert!(store.lookup(&[4]).is_none());
        assert_eq!(store.len(), 0);

        // Removing twice is a no-op.
        assert!(store.remove(id).is_none());
    }

    #[test]
    fn test_form_store_reintern_after_remove() {
        let mut store = FormStore::new();

        let old = store.intern(&[9], 1);
        store.remove(old);

        let new = store.intern(&[9], 2);
        assert_ne!(old, new);
        assert!(store.get(old).is_none());
        assert_eq!(store.get(new).unwrap().unsusp_observations(), 2);
    }

    #[test]
    fn test_form_observations() {
        let mut form = Form::new(vec![1], 2);
        form.new_susp_observation();
        form.new_susp_observation();
        form.new_susp_observation();

        assert_eq!(form.susp_observations(), 3);
        assert_eq!(form.unsusp_observations(), 2);
        assert_eq!(form.observations(), 5);
    }

    #[test]
    fn test_config_validation() {
        assert!(MinerConfig::default().validate().is_ok());

        assert!(MinerConfig::default().with_n(0).validate().is_err());
        assert!(MinerConfig::default()
            .with_n(3)
            .with_max_n(2)
            .validate()
            .is_err());
        assert!(MinerConfig::default()
            .with_expansion_alpha(-1.0)
            .validate()
            .is_err());
        assert!(MinerConfig::default()
            .with_smoothing_beta(-0.1)
            .validate()
            .is_err());
        assert!(MinerConfig::default()
            .with_freq_cache_capacity(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_sentence_duplicate_observations() {
        let mut store = FormStore::new();
        let id = store.intern(&[5], 0);

        let mut sentence = Sentence::new(1.0);
        sentence.add_observed_form(id);
        sentence.add_observed_form(id);

        assert_eq!(sentence.observed_forms(), &[id, id]);
        assert_eq!(sentence.error(), 1.0);
    }
}
