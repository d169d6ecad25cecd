//! The mining engine.
//!
//! A [`Miner`] holds a set of deduplicated forms and the unparsable
//! sentences composed of them, and uses this data to find the forms most
//! suspicious of causing parse failures.
//!
//! Mining runs in two phases. The initial pass divides each sentence's
//! error uniformly over its observed forms. Every later pass redistributes
//! the error proportionally to each form's current relative suspicion
//! within its sentence, and repeats until no form's suspicion moves by
//! more than the caller's threshold (van Noord 2004; de Kok, Ma &
//! van Noord 2009).

use crate::automaton::HashAutomaton;
use crate::corpus::SentenceHandler;
use crate::errors::Result;
use crate::expand::{BestRatioExpander, Expander, NgramFreqs, SimpleExpander};
use crate::suffix::SuffixArray;
use crate::types::{Form, FormId, FormStore, MinerConfig, Sentence, TokenCode};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Arc;

// ============================================================================
// Results
// ============================================================================

/// One completed mining cycle, reported to the progress callback.
///
/// Purely advisory: callers use it for progress display, never for control
/// flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MineProgress {
    /// 1-based index of the completed cycle
    pub cycle: usize,
    /// Largest suspicion change of any form in this cycle
    pub max_delta: f64,
    /// Forms still alive after this cycle
    pub live_forms: usize,
}

/// A mined form decoded back to token strings, ready for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinedForm {
    /// The n-gram as token strings
    pub tokens: Vec<String>,
    /// Final suspicion
    pub suspicion: f64,
    /// Total observations (suspicious and unsuspicious)
    pub observations: usize,
    /// Observations within unparsable sentences
    pub susp_observations: usize,
    /// Distinct unparsable sentences the form occurred in
    pub uniq_sents: usize,
}

// ============================================================================
// Miner
// ============================================================================

/// Orchestrates n-gram expansion, form deduplication and the iterative
/// suspicion computation.
pub struct Miner {
    config: MinerConfig,
    unparsable_automaton: Arc<HashAutomaton>,
    expander: Box<dyn Expander>,
    forms: FormStore,
    sentences: Vec<Sentence>,
}

impl Miner {
    /// Construct a miner over pre-built automata and corpus suffix
    /// arrays.
    ///
    /// The expansion strategy is chosen from the configuration:
    /// best-ratio expansion when `ngram_expansion` is set, otherwise the
    /// fixed `n..=max_n` range.
    pub fn new(
        parsable_automaton: Arc<HashAutomaton>,
        unparsable_automaton: Arc<HashAutomaton>,
        parsable_suffix_array: Arc<SuffixArray<TokenCode>>,
        unparsable_suffix_array: Arc<SuffixArray<TokenCode>>,
        config: MinerConfig,
    ) -> Result<Self> {
        config.validate()?;

        let freqs = NgramFreqs::new(
            parsable_automaton,
            unparsable_automaton.clone(),
            parsable_suffix_array,
            unparsable_suffix_array,
            config.freq_cache_capacity,
        );

        let expander: Box<dyn Expander> = if config.ngram_expansion {
            Box::new(BestRatioExpander::new(
                config.n,
                config.expansion_alpha,
                freqs,
            ))
        } else {
            Box::new(SimpleExpander::new(config.n, config.max_n, freqs))
        };

        Ok(Self {
            config,
            unparsable_automaton,
            expander,
            forms: FormStore::new(),
            sentences: Vec::new(),
        })
    }

    /// Ingest one sentence: extract forms and, for an unparsable
    /// sentence, keep its representation for mining.
    ///
    /// Parsable sentences are discarded here; they already contributed
    /// their frequency statistics through the suffix arrays.
    pub fn handle_sentence(&mut self, tokens: &[String], error: f64) {
        if error == 0.0 {
            return;
        }

        let codes = self.unparsable_automaton.encode_all(tokens);

        let mut sentence = Sentence::new(error);
        let mut seen: FxHashSet<FormId> = FxHashSet::default();

        for start in 0..codes.len() {
            for expansion in self.expander.expand(&codes, start) {
                let id = self
                    .forms
                    .intern(&codes[expansion.start..expansion.end], expansion.parsable_freq);
                if let Some(form) = self.forms.get_mut(id) {
                    form.new_susp_observation();
                    if seen.insert(id) {
                        form.new_uniq_sent();
                    }
                }
                sentence.add_observed_form(id);
            }
        }

        // A sentence too short to produce a single expansion carries no
        // information and would divide by zero later.
        if sentence.observed_forms().is_empty() {
            return;
        }

        self.sentences.push(sentence);
    }

    /// Mine the ingested sentences to a fixed point.
    ///
    /// `threshold` stops the iteration once no form's suspicion changes by
    /// more than it in one cycle. A `susp_threshold` greater than zero
    /// prunes forms (and their observations) whose suspicion drops below
    /// it, shrinking the working set between cycles.
    pub fn mine(&mut self, threshold: f64, susp_threshold: f64) {
        self.mine_with_progress(threshold, susp_threshold, |_| {});
    }

    /// Like [`mine`](Self::mine), with a callback invoked once per
    /// completed cycle.
    pub fn mine_with_progress(
        &mut self,
        threshold: f64,
        susp_threshold: f64,
        mut progress: impl FnMut(MineProgress),
    ) {
        log::info!(
            "mining {} sentences, {} forms",
            self.sentences.len(),
            self.forms.len()
        );

        self.calculate_initial_form_suspicions(susp_threshold);

        let mut cycle = 0;
        loop {
            let max_delta = self.calculate_form_suspicions(susp_threshold);
            cycle += 1;
            log::debug!(
                "cycle {cycle}: max delta {max_delta:.6}, {} forms",
                self.forms.len()
            );
            progress(MineProgress {
                cycle,
                max_delta,
                live_forms: self.forms.len(),
            });
            if max_delta <= threshold {
                break;
            }
        }

        log::info!("mining converged after {cycle} cycles");
    }

    // Initial pass: a sentence's error is divided uniformly over its
    // observed forms; a form's suspicion is the average over all its
    // observations. Observations in parsable sentences add nothing to the
    // sum, only to the observation count.
    fn calculate_initial_form_suspicions(&mut self, susp_threshold: f64) {
        let mut susp_sums: FxHashMap<FormId, f64> = FxHashMap::default();

        for sentence in &self.sentences {
            let share = sentence.error() / sentence.observed_forms().len() as f64;
            for &id in sentence.observed_forms() {
                *susp_sums.entry(id).or_insert(0.0) += share;
            }
        }

        for (&id, &sum) in &susp_sums {
            if let Some(form) = self.forms.get_mut(id) {
                form.set_suspicion(sum / form.observations() as f64);
            }
        }

        if self.config.smoothing {
            self.smooth_suspicions();
        }

        if susp_threshold > 0.0 {
            self.remove_low_susp_forms(susp_threshold);
        }
    }

    // Refinement pass: a sentence's error is distributed proportionally
    // to each observed form's current suspicion within the sentence.
    // Returns the largest suspicion change of any form.
    fn calculate_form_suspicions(&mut self, susp_threshold: f64) -> f64 {
        let mut susp_sums: FxHashMap<FormId, f64> = FxHashMap::default();

        for sentence in &self.sentences {
            let sentence_susp_sum: f64 = sentence
                .observed_forms()
                .iter()
                .filter_map(|&id| self.forms.get(id))
                .map(Form::suspicion)
                .sum();
            if sentence_susp_sum <= 0.0 {
                continue;
            }

            for &id in sentence.observed_forms() {
                if let Some(form) = self.forms.get(id) {
                    let observation = sentence.error() * (form.suspicion() / sentence_susp_sum);
                    *susp_sums.entry(id).or_insert(0.0) += observation;
                }
            }
        }

        let mut old_susps: FxHashMap<FormId, f64> = FxHashMap::default();
        for (&id, &sum) in &susp_sums {
            if let Some(form) = self.forms.get_mut(id) {
                old_susps.insert(id, form.suspicion());
                form.set_suspicion(sum / form.observations() as f64);
            }
        }

        if self.config.smoothing {
            self.smooth_suspicions();
        }

        let mut max_delta = 0.0f64;
        for (&id, &old) in &old_susps {
            if let Some(form) = self.forms.get(id) {
                let delta = (old - form.suspicion()).abs();
                if delta > max_delta {
                    max_delta = delta;
                }
            }
        }

        if susp_threshold > 0.0 {
            self.remove_low_susp_forms(susp_threshold);
        }

        max_delta
    }

    // Shrink every form's suspicion toward the population average, with a
    // weight that grows with the number of suspicious observations.
    fn smooth_suspicions(&mut self) {
        if self.forms.is_empty() {
            return;
        }

        let sum: f64 = self.forms.iter().map(|(_, form)| form.suspicion()).sum();
        let avg_suspicion = sum / self.forms.len() as f64;

        let beta = self.config.smoothing_beta;
        for (_, form) in self.forms.iter_mut() {
            let lambda = 1.0 - (-beta * form.susp_observations() as f64).exp();
            form.set_suspicion(lambda * form.suspicion() + (1.0 - lambda) * avg_suspicion);
        }
    }

    // Drop forms below the suspicion threshold, and every sentence
    // observation of them.
    fn remove_low_susp_forms(&mut self, susp_threshold: f64) {
        let doomed: FxHashSet<FormId> = self
            .forms
            .iter()
            .filter(|(_, form)| form.suspicion() < susp_threshold)
            .map(|(id, _)| id)
            .collect();
        if doomed.is_empty() {
            return;
        }

        for sentence in &mut self.sentences {
            sentence.retain_observed(|id| !doomed.contains(id));
        }

        for &id in &doomed {
            self.forms.remove(id);
        }
    }

    /// All live forms, ordered by descending suspicion, ties broken by
    /// the lexicographic order of the n-gram codes.
    pub fn forms(&self) -> Vec<&Form> {
        let mut forms: Vec<&Form> = self.forms.iter().map(|(_, form)| form).collect();
        forms.sort_by(|a, b| {
            b.suspicion()
                .total_cmp(&a.suspicion())
                .then_with(|| a.ngram().cmp(b.ngram()))
        });
        forms
    }

    /// Ranked forms decoded back to token strings, filtered by minimum
    /// total observations and minimum suspicious observations.
    pub fn report(&self, min_observations: usize, min_susp_observations: usize) -> Vec<MinedForm> {
        self.forms()
            .into_iter()
            .filter(|form| {
                form.observations() >= min_observations
                    && form.susp_observations() >= min_susp_observations
            })
            .map(|form| MinedForm {
                tokens: form
                    .ngram()
                    .iter()
                    .map(|&code| {
                        self.unparsable_automaton
                            .decode(code)
                            .unwrap_or("<unknown>")
                            .to_string()
                    })
                    .collect(),
                suspicion: form.suspicion(),
                observations: form.observations(),
                susp_observations: form.susp_observations(),
                uniq_sents: form.uniq_sents(),
            })
            .collect()
    }

    /// Write ranked forms as `<tokens> <suspicion> <observations>
    /// <suspObservations>` lines.
    pub fn write_report(
        &self,
        writer: &mut impl Write,
        min_observations: usize,
        min_susp_observations: usize,
    ) -> Result<()> {
        for form in self.report(min_observations, min_susp_observations) {
            writeln!(
                writer,
                "{} {} {} {}",
                form.tokens.join(" "),
                form.suspicion,
                form.observations,
                form.susp_observations
            )?;
        }

        Ok(())
    }

    /// Number of retained (unparsable) sentences.
    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Number of live forms.
    pub fn form_count(&self) -> usize {
        self.forms.len()
    }
}

impl SentenceHandler for Miner {
    fn handle_sentence(&mut self, tokens: &[String], error: f64) {
        Miner::handle_sentence(self, tokens, error);
    }
}
