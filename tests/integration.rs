use concordance::{Corpus, CqlConfig, IndexedCorpus, TextField};
use serde_json::json;

fn build(doc_sentences: serde_json::Value) -> IndexedCorpus {
    let corpus = Corpus { documents: vec![doc_sentences], text_field: TextField::Bare };
    IndexedCorpus::build(corpus, CqlConfig::default()).expect("corpus should index")
}

#[test]
fn literal_single_token() {
    let corpus = build(json!([[{"word": "a"}, {"word": "b"}, {"word": "c"}]]));
    let results: Vec<_> = corpus.search("\"b\"", 2, 2).expect("valid query").collect();

    assert_eq!(results.len(), 1);
    let kwic = &results[0];
    assert_eq!(kwic.keyword.len(), 1);
    assert_eq!(kwic.keyword[0].get("word"), Some("b"));
    assert_eq!(kwic.left.len(), 1);
    assert_eq!(kwic.left[0].get("word"), Some("a"));
    assert_eq!(kwic.right.len(), 1);
    assert_eq!(kwic.right[0].get("word"), Some("c"));
    assert_eq!((kwic.position.doc_idx, kwic.position.sent_idx, kwic.position.tk_idx), (0, 0, 1));
}

#[test]
fn conjunction_and_negation() {
    let corpus = build(json!([[
        {"word": "run", "pos": "V"},
        {"word": "run", "pos": "N"}
    ]]));
    let results: Vec<_> = corpus.search("[word=\"run\" & pos!=\"N\"]", 2, 2).expect("valid query").collect();

    assert_eq!(results.len(), 1);
    assert_eq!(
        (results[0].position.doc_idx, results[0].position.sent_idx, results[0].position.tk_idx),
        (0, 0, 0)
    );
}

#[test]
fn regex_value() {
    let corpus = build(json!([[{"word": "a"}, {"word": "b"}, {"word": "c"}, {"word": "bb"}]]));
    let results: Vec<_> = corpus.search("\"b.*\"", 2, 2).expect("valid query").collect();

    let positions: Vec<_> = results
        .iter()
        .map(|r| (r.position.doc_idx, r.position.sent_idx, r.position.tk_idx))
        .collect();
    assert_eq!(positions.len(), 2);
    assert!(positions.contains(&(0, 0, 1)));
    assert!(positions.contains(&(0, 0, 3)));
}

#[test]
fn quantifier_expansion() {
    let corpus = build(json!([[{"word": "a"}, {"word": "b"}, {"word": "b"}, {"word": "c"}]]));
    let results: Vec<_> = corpus.search("\"a\" \"b\"{1,2} \"c\"", 2, 2).expect("valid query").collect();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].keyword.len(), 4);
}

#[test]
fn labels_populate_capture_groups() {
    let corpus = build(json!([[
        {"word": "the"},
        {"word": "dog", "pos": "N"},
        {"word": "runs", "pos": "V"}
    ]]));
    let results: Vec<_> = corpus
        .search("[] n:[pos=\"N\"] v:[pos=\"V\"]", 2, 2)
        .expect("valid query")
        .collect();

    assert_eq!(results.len(), 1);
    let kwic = &results[0];
    assert_eq!(kwic.capture_groups["n"].len(), 1);
    assert_eq!(kwic.capture_groups["n"][0].get("word"), Some("dog"));
    assert_eq!(kwic.capture_groups["v"][0].get("word"), Some("runs"));
}

#[test]
fn empty_token_wildcard_with_quantifier() {
    let corpus = build(json!([[{"word": "x"}, {"word": "y"}]]));
    let results: Vec<_> = corpus.search("[]{2}", 2, 2).expect("valid query").collect();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].keyword.len(), 2);
    assert_eq!(
        (results[0].position.doc_idx, results[0].position.sent_idx, results[0].position.tk_idx),
        (0, 0, 0)
    );
}

#[test]
fn query_with_no_matches_yields_empty_result() {
    let corpus = build(json!([[{"word": "a"}, {"word": "b"}]]));
    let results: Vec<_> = corpus.search("\"zzz\"", 2, 2).expect("valid query").collect();
    assert!(results.is_empty());
}

#[test]
fn out_of_range_lookups_are_errors() {
    let corpus = build(json!([[{"word": "a"}]]));
    assert!(corpus.document(1).is_err());
    assert!(corpus.token(0, 0, 5).is_err());
}

#[test]
fn malformed_query_is_a_typed_error_not_a_panic() {
    let corpus = build(json!([[{"word": "a"}]]));
    assert!(corpus.search("[word=\"a\"", 2, 2).is_err());
}

#[test]
fn named_text_field_is_supported() {
    let documents = vec![json!({
        "id": "doc-1",
        "text": [[{"word": "a"}, {"word": "b"}]]
    })];
    let corpus = Corpus { documents, text_field: TextField::Named("text".to_string()) };
    let indexed = IndexedCorpus::build(corpus, CqlConfig::default()).unwrap();
    let results: Vec<_> = indexed.search("\"a\"", 1, 1).unwrap().collect();
    assert_eq!(results.len(), 1);
}
