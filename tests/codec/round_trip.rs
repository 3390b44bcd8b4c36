//! Round-trip equivalence through the portable object and through JSON text.

use crate::common::{body_index, search_keys, titled_doc};
use serde_json::json;
use staticseek::{
    create_index, create_index_from_object, index_to_object, IndexConfig, PortableIndex,
    SearchOptions,
};

#[test]
fn round_trip_through_json_text() {
    let index = body_index(&[
        "the quick brown fox",
        "a lazy dog sleeps",
        "東京タワーに行く",
    ]);

    // What a site build actually does: object → JSON string → asset → parse.
    let blob = serde_json::to_string(&index_to_object(&index)).unwrap();
    let portable: PortableIndex = serde_json::from_str(&blob).unwrap();
    let restored = create_index_from_object(portable).unwrap();

    for query in [
        "quick",
        "qick~",
        "fox OR dog",
        "fox AND dog",
        "\"brown fox\"",
        "NOT dog",
        "東京",
    ] {
        assert_eq!(
            search_keys(&index, query),
            search_keys(&restored, query),
            "query {:?} diverged",
            query
        );
    }
}

#[test]
fn scores_survive_round_trip_exactly() {
    let index = body_index(&["alpha beta gamma", "alpha alpha delta", "epsilon zeta"]);
    let restored = create_index_from_object(index_to_object(&index)).unwrap();

    for query in ["alpha", "alpha OR zeta", "beta~2"] {
        let before = staticseek::search(&index, query, SearchOptions::default()).unwrap();
        let after = staticseek::search(&restored, query, SearchOptions::default()).unwrap();
        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(&after) {
            assert_eq!(b.key, a.key);
            assert_eq!(b.score, a.score, "score drifted for {:?}", query);
        }
    }
}

#[test]
fn metadata_round_trips_verbatim() {
    let mut docs = vec![titled_doc("/page", "Hello", "world")];
    docs[0].metadata = json!({"url": "/page", "anchors": ["intro", "usage"], "weight": 3});
    let index = create_index(&docs, IndexConfig::default()).unwrap();
    let restored = create_index_from_object(index_to_object(&index)).unwrap();

    let results = staticseek::search(&restored, "hello", SearchOptions::default()).unwrap();
    assert_eq!(results[0].metadata, docs[0].metadata);
}

#[test]
fn double_round_trip_is_stable() {
    let index = body_index(&["stability check one", "stability check two"]);
    let first = index_to_object(&index);
    let second = index_to_object(&create_index_from_object(first.clone()).unwrap());
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap(),
    );
}

#[test]
fn highlights_work_on_a_restored_index() {
    let index = body_index(&["one fox two fox"]);
    let restored = create_index_from_object(index_to_object(&index)).unwrap();
    let options = SearchOptions {
        highlight: true,
        ..SearchOptions::default()
    };
    let results = staticseek::search(&restored, "fox", options).unwrap();
    assert_eq!(results[0].highlights.len(), 1);
    assert_eq!(results[0].highlights[0].positions, vec![1, 3]);
}
