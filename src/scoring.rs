//! Scoring methods for ranking mined forms.
//!
//! The suspicion of a form says how strongly it is associated with parse
//! failure, but not how much evidence backs that up. The scoring methods
//! here combine suspicion with an observation count so that frequently
//! observed forms can be ranked above rare ones with the same suspicion.

use crate::errors::MineError;
use crate::miner::MinedForm;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How to turn a mined form's statistics into a ranking score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMethod {
    /// The suspicion itself
    #[default]
    Suspicion,
    /// Suspicion weighted by the number of suspicious observations
    SuspicionObs,
    /// Suspicion weighted by the number of distinct unparsable sentences
    SuspicionUniqSents,
    /// Suspicion weighted by ln(suspicious observations)
    SuspicionLnObs,
    /// Suspicion weighted by ln(distinct unparsable sentences)
    SuspicionLnUniqSents,
}

impl ScoringMethod {
    /// Score a form from its suspicion and observation counts.
    pub fn score(&self, suspicion: f64, susp_freq: usize, uniq_sents_freq: usize) -> f64 {
        match self {
            ScoringMethod::Suspicion => suspicion,
            ScoringMethod::SuspicionObs => suspicion * susp_freq as f64,
            ScoringMethod::SuspicionUniqSents => suspicion * uniq_sents_freq as f64,
            ScoringMethod::SuspicionLnObs => suspicion * (susp_freq as f64).ln(),
            ScoringMethod::SuspicionLnUniqSents => suspicion * (uniq_sents_freq as f64).ln(),
        }
    }
}

impl FromStr for ScoringMethod {
    type Err = MineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "suspicion" => Ok(ScoringMethod::Suspicion),
            "suspicion_obs" => Ok(ScoringMethod::SuspicionObs),
            "suspicion_uniq_sents" => Ok(ScoringMethod::SuspicionUniqSents),
            "suspicion_ln_obs" => Ok(ScoringMethod::SuspicionLnObs),
            "suspicion_ln_uniq_sents" => Ok(ScoringMethod::SuspicionLnUniqSents),
            _ => Err(MineError::invalid_config(format!(
                "unknown scoring method: '{value}'"
            ))),
        }
    }
}

/// A mined form with its ranking score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredForm {
    /// The score assigned by the selected method
    pub score: f64,
    /// The underlying form
    pub form: MinedForm,
}

/// Rank forms by score, ties broken by descending suspicious-observation
/// count and then by the token sequence, so the ordering is total.
pub fn rank_forms(forms: Vec<MinedForm>, method: ScoringMethod) -> Vec<ScoredForm> {
    let mut scored: Vec<ScoredForm> = forms
        .into_iter()
        .map(|form| ScoredForm {
            score: method.score(form.suspicion, form.susp_observations, form.uniq_sents),
            form,
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.form.susp_observations.cmp(&a.form.susp_observations))
            .then_with(|| a.form.tokens.cmp(&b.form.tokens))
    });

    scored
}
