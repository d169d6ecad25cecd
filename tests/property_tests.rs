//! Property-based tests using proptest

use errormine::*;
use proptest::prelude::*;
use std::sync::Arc;

fn naive_count(data: &[TokenCode], pattern: &[TokenCode]) -> usize {
    if pattern.len() > data.len() {
        return 0;
    }
    data.windows(pattern.len()).filter(|w| *w == pattern).count()
}

/// Build a miner over word sentences, unigram forms, no smoothing.
fn unigram_miner(good: &[Vec<String>], bad: &[Vec<String>]) -> Miner {
    let parsable =
        Arc::new(HashAutomaton::from_words(good.iter().flatten().cloned()).unwrap());
    let unparsable =
        Arc::new(HashAutomaton::from_words(bad.iter().flatten().cloned()).unwrap());

    let mut corpus = HashedCorpus::new(parsable.clone(), unparsable.clone());
    for sentence in bad {
        corpus.handle_sentence(sentence, 1.0);
    }
    for sentence in good {
        corpus.handle_sentence(sentence, 0.0);
    }
    let (good_codes, bad_codes) = corpus.into_parts();

    let config = MinerConfig::default()
        .with_n(1)
        .with_max_n(1)
        .with_ngram_expansion(false)
        .with_smoothing(false);
    let mut miner = Miner::new(
        parsable,
        unparsable,
        Arc::new(SuffixArray::with_algorithm(good_codes, config.sort_algorithm)),
        Arc::new(SuffixArray::with_algorithm(bad_codes, config.sort_algorithm)),
        config,
    )
    .unwrap();

    for sentence in bad {
        miner.handle_sentence(sentence, 1.0);
    }
    for sentence in good {
        miner.handle_sentence(sentence, 0.0);
    }

    miner
}

fn word_sentences() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(
        prop::collection::vec("[a-e]", 1..6),
        1..6,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn test_suffix_array_counts_every_contained_pattern(
        data in prop::collection::vec(0i32..6, 1..40),
        start in any::<prop::sample::Index>(),
        len in 1usize..4,
    ) {
        let sa = SuffixArray::new(data.clone());

        let start = start.index(data.len());
        let end = (start + len).min(data.len());
        prop_assume!(start < end);

        let pattern = data[start..end].to_vec();
        prop_assert_eq!(sa.find(&pattern), naive_count(&data, &pattern));
    }

    #[test]
    fn test_suffix_array_absent_pattern_is_zero(
        data in prop::collection::vec(0i32..6, 0..40),
        pattern in prop::collection::vec(10i32..16, 1..4),
    ) {
        // Pattern values are disjoint from data values.
        let sa = SuffixArray::new(data);
        prop_assert_eq!(sa.find(&pattern), 0);
    }

    #[test]
    fn test_sort_algorithms_build_identical_arrays(
        data in prop::collection::vec(0i32..5, 0..80),
    ) {
        let generic = SuffixArray::with_algorithm(data.clone(), SortAlgorithm::Comparison);
        let doubling = SuffixArray::with_algorithm(data, SortAlgorithm::PrefixDoubling);

        prop_assert_eq!(generic.order(), doubling.order());
    }

    #[test]
    fn test_suffix_array_order_is_permutation(
        data in prop::collection::vec(0i32..5, 0..60),
    ) {
        let sa = SuffixArray::with_algorithm(data, SortAlgorithm::PrefixDoubling);

        let mut order = sa.order().to_vec();
        order.sort_unstable();
        let expected: Vec<usize> = (0..sa.len()).collect();
        prop_assert_eq!(order, expected);
    }

    #[test]
    fn test_form_observations_match_occurrences(sentences in word_sentences()) {
        let good = vec![vec!["p".to_string()]];
        let miner = unigram_miner(&good, &sentences);

        // Every token occurrence of the unparsable corpus is exactly one
        // suspicious observation of its deduplicated form.
        let mut counts: std::collections::BTreeMap<String, usize> = Default::default();
        for sentence in &sentences {
            for token in sentence {
                *counts.entry(token.clone()).or_insert(0) += 1;
            }
        }

        let report = miner.report(0, 0);
        prop_assert_eq!(report.len(), counts.len());
        for form in &report {
            prop_assert_eq!(form.tokens.len(), 1);
            prop_assert_eq!(form.susp_observations, counts[&form.tokens[0]]);
        }
    }

    #[test]
    fn test_mining_is_deterministic(sentences in word_sentences()) {
        let good = vec![vec!["a".to_string(), "b".to_string()]];

        let mut first = unigram_miner(&good, &sentences);
        first.mine(0.001, 0.0);
        let mut second = unigram_miner(&good, &sentences);
        second.mine(0.001, 0.0);

        prop_assert_eq!(first.report(0, 0), second.report(0, 0));
    }

    #[test]
    fn test_suspicions_stay_in_unit_interval(sentences in word_sentences()) {
        let good = vec![vec!["a".to_string(), "c".to_string()]];

        let mut miner = unigram_miner(&good, &sentences);
        miner.mine(0.001, 0.0);

        for form in miner.report(0, 0) {
            prop_assert!(form.suspicion >= 0.0);
            prop_assert!(form.suspicion <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn test_pruned_forms_never_reappear(sentences in word_sentences()) {
        let good = vec![vec!["a".to_string()]];

        let mut miner = unigram_miner(&good, &sentences);
        miner.mine(0.001, 0.05);
        let report = miner.report(0, 0);

        for form in &report {
            prop_assert!(form.suspicion >= 0.05);
        }
    }
}
