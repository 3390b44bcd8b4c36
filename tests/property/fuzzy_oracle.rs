//! Differential tests: the bounded edit distance against the strsim oracle,
//! and the n-gram pre-filter against a full vocabulary scan.

use crate::common::{body_config, body_doc};
use proptest::prelude::*;
use staticseek::fuzzy::{levenshtein_bounded, levenshtein_within, lookup};
use staticseek::create_index;

fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,10}").unwrap()
}

fn unicode_word_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "café".to_string(),
        "naïve".to_string(),
        "résumé".to_string(),
        "über".to_string(),
        "東京".to_string(),
        "タワー".to_string(),
        "москва".to_string(),
    ])
}

proptest! {
    #[test]
    fn bounded_distance_matches_strsim(a in word_strategy(), b in word_strategy()) {
        let oracle = strsim::levenshtein(&a, &b);
        for max in 0..=3usize {
            match levenshtein_bounded(&a, &b, max) {
                Some(d) => {
                    prop_assert_eq!(d, oracle, "distance mismatch for {:?} / {:?}", &a, &b);
                    prop_assert!(d <= max);
                }
                None => prop_assert!(oracle > max, "rejected {:?} / {:?} at distance {} <= {}", &a, &b, oracle, max),
            }
        }
    }

    #[test]
    fn bounded_distance_matches_strsim_unicode(a in unicode_word_strategy(), b in unicode_word_strategy()) {
        let oracle = strsim::levenshtein(&a, &b);
        for max in 0..=3usize {
            match levenshtein_bounded(&a, &b, max) {
                Some(d) => prop_assert_eq!(d, oracle),
                None => prop_assert!(oracle > max),
            }
        }
    }

    #[test]
    fn within_is_consistent_with_bounded(a in word_strategy(), b in word_strategy(), max in 0..3usize) {
        prop_assert_eq!(
            levenshtein_within(&a, &b, max),
            levenshtein_bounded(&a, &b, max).is_some()
        );
    }

    /// The pre-filter is an optimization, not a filter on correctness: for
    /// every query the pre-filtered lookup must find exactly the vocabulary
    /// terms a brute-force scan finds.
    #[test]
    fn prefilter_never_drops_a_match(
        texts in prop::collection::vec(
            prop::collection::vec(prop::string::string_regex("[a-z]{2,7}").unwrap(), 1..8)
                .prop_map(|ws| ws.join(" ")),
            1..4,
        ),
        query in prop::string::string_regex("[a-z]{2,7}").unwrap(),
        tolerance in 1..=2u8,
    ) {
        let docs: Vec<staticseek::Document> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| body_doc(&format!("/doc/{}", i), t))
            .collect();
        let index = create_index(&docs, body_config()).unwrap();

        let found = lookup(&index, &query, tolerance);

        // Brute force over the whole vocabulary via the executor's distance fn.
        for (idx, term) in index_vocabulary(&index).iter().enumerate() {
            let expected = strsim::levenshtein(&query, term) <= tolerance as usize;
            let got = found.iter().any(|m| m.term_idx == idx as u32);
            prop_assert_eq!(
                expected, got,
                "term {:?} (query {:?}, tolerance {}) prefilter disagreement",
                term, &query, tolerance
            );
        }
    }
}

/// Vocabulary access for the oracle scan (kept out of the public surface).
fn index_vocabulary(index: &staticseek::Index) -> Vec<String> {
    // The portable form exposes the sorted vocabulary as `terms`.
    staticseek::index_to_object(index).terms
}
