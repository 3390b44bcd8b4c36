//! The documented search scenarios, end to end through the public API.

use crate::common::{body_index, search_keys, search_keys_sorted, titled_index};
use staticseek::{
    create_index_from_object, index_to_object, search, ConfigError, SearchError, SearchOptions,
};

/// The canonical two-document scenario: doc A "The quick brown fox",
/// doc B "A lazy dog sleeps".
fn scenario_index() -> staticseek::Index {
    body_index(&["The quick brown fox", "A lazy dog sleeps"])
}

#[test]
fn scenario_exact_query_returns_a() {
    let index = scenario_index();
    assert_eq!(search_keys(&index, "quick"), vec!["/doc/0"]);
}

#[test]
fn scenario_typo_with_tolerance_returns_a() {
    let index = scenario_index();
    assert_eq!(search_keys(&index, "qick~"), vec!["/doc/0"]);
    assert_eq!(search_keys(&index, "qick~2"), vec!["/doc/0"]);
}

#[test]
fn scenario_fox_and_dog_is_empty() {
    let index = scenario_index();
    assert!(search_keys(&index, "fox AND dog").is_empty());
}

#[test]
fn scenario_fox_or_dog_is_both() {
    let index = scenario_index();
    assert_eq!(search_keys_sorted(&index, "fox OR dog"), vec!["/doc/0", "/doc/1"]);
}

#[test]
fn scenario_results_identical_after_round_trip() {
    let index = scenario_index();
    let restored = create_index_from_object(index_to_object(&index)).unwrap();
    for query in ["quick", "qick~", "fox AND dog", "fox OR dog"] {
        assert_eq!(
            search_keys(&index, query),
            search_keys(&restored, query),
            "query {:?} diverged after round-trip",
            query
        );
    }
}

#[test]
fn terms_match_case_insensitively() {
    let index = scenario_index();
    assert_eq!(search_keys(&index, "QUICK"), vec!["/doc/0"]);
    assert_eq!(search_keys(&index, "Fox"), vec!["/doc/0"]);
}

#[test]
fn diacritics_fold_both_ways() {
    let index = body_index(&["crème brûlée recipe", "plain pancake recipe"]);
    assert_eq!(search_keys(&index, "creme"), vec!["/doc/0"]);
    assert_eq!(search_keys(&index, "brûlée"), vec!["/doc/0"]);
}

#[test]
fn indexed_term_is_always_found_exactly() {
    // Query/index symmetry: a term present verbatim in a document is found
    // by a zero-tolerance query.
    let texts = ["alpha beta gamma", "delta epsilon zeta", "eta theta iota"];
    let index = body_index(&texts);
    for (i, text) in texts.iter().enumerate() {
        for word in text.split(' ') {
            let keys = search_keys(&index, word);
            assert!(
                keys.contains(&format!("/doc/{}", i)),
                "term {:?} did not find its document",
                word
            );
        }
    }
}

#[test]
fn phrase_queries_respect_adjacency_and_order() {
    let index = body_index(&[
        "the quick brown fox",
        "the brown quick fox",
        "quick red brown fox",
    ]);
    assert_eq!(search_keys(&index, "\"quick brown\""), vec!["/doc/0"]);
}

#[test]
fn not_and_minus_are_equivalent() {
    let index = scenario_index();
    assert_eq!(
        search_keys(&index, "NOT fox"),
        search_keys(&index, "-fox"),
    );
    assert_eq!(search_keys(&index, "-fox"), vec!["/doc/1"]);
}

#[test]
fn grouping_changes_meaning() {
    let index = body_index(&["fox and hound", "fox and dog", "just a dog"]);
    // (fox OR dog) vs fox OR dog: with AND context they differ.
    let grouped = search_keys_sorted(&index, "dog (fox OR hound)");
    assert_eq!(grouped, vec!["/doc/1"]);
}

#[test]
fn field_restriction_searches_one_field_only() {
    let index = titled_index(&[
        ("Rust Guide", "all about ferrets"),
        ("Ferret Guide", "all about rust"),
    ]);
    assert_eq!(search_keys(&index, "title:rust"), vec!["/doc/0"]);
    assert_eq!(search_keys(&index, "body:rust"), vec!["/doc/1"]);
}

#[test]
fn unknown_field_fails_with_config_error() {
    let index = scenario_index();
    let err = search(&index, "missing:fox", SearchOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        SearchError::Config(ConfigError::UnknownField { .. })
    ));
}

#[test]
fn japanese_text_is_searchable() {
    let index = body_index(&[
        "東京タワーは観光名所です",
        "大阪には美味しい食べ物があります",
    ]);
    assert_eq!(search_keys(&index, "東京タワー"), vec!["/doc/0"]);
    assert_eq!(search_keys(&index, "大阪"), vec!["/doc/1"]);
}

#[test]
fn mixed_japanese_english_document() {
    let index = body_index(&["Rustで全文検索エンジンを作る", "Python scripting guide"]);
    assert_eq!(search_keys(&index, "rust"), vec!["/doc/0"]);
    assert_eq!(search_keys(&index, "全文検索"), vec!["/doc/0"]);
}

#[test]
fn empty_and_no_match_queries_return_empty_ok() {
    let index = scenario_index();
    assert!(search_keys(&index, "").is_empty());
    assert!(search_keys(&index, "   ").is_empty());
    assert!(search_keys(&index, "zeppelin").is_empty());
    // All stop words.
    assert!(search_keys(&index, "the and of").is_empty());
}

#[test]
fn queries_do_not_mutate_the_index() {
    let index = scenario_index();
    let before = serde_json::to_string(&index_to_object(&index)).unwrap();
    for query in ["quick", "qick~2", "\"brown fox\"", "NOT fox", "fox OR dog"] {
        let _ = search(&index, query, SearchOptions::default()).unwrap();
    }
    let after = serde_json::to_string(&index_to_object(&index)).unwrap();
    assert_eq!(before, after);
}
