//! Query grammar edge cases through the public `parse` entry point.

use staticseek::{parse, QueryNode, QuerySyntaxError, TokenizerConfig};

fn p(query: &str) -> QueryNode {
    parse(query, &TokenizerConfig::default()).unwrap()
}

fn err(query: &str) -> QuerySyntaxError {
    parse(query, &TokenizerConfig::default()).unwrap_err()
}

#[test]
fn precedence_not_then_and_then_or() {
    // "a b OR NOT c d" parses as (a AND b) OR ((NOT c) AND d)
    let node = p("alpha beta OR NOT gamma delta");
    let QueryNode::Or(children) = node else {
        panic!("expected OR at the root");
    };
    assert_eq!(children.len(), 2);
    assert!(matches!(&children[0], QueryNode::And(c) if c.len() == 2));
    let QueryNode::And(right) = &children[1] else {
        panic!("expected AND on the right");
    };
    assert!(matches!(&right[0], QueryNode::Not(_)));
}

#[test]
fn nested_parens() {
    let node = p("(alpha OR (beta gamma)) delta");
    let QueryNode::And(children) = node else {
        panic!("expected AND at the root");
    };
    assert!(matches!(&children[0], QueryNode::Or(_)));
}

#[test]
fn error_positions_point_at_the_offender() {
    assert_eq!(err("fox \"broken").position(), 4);
    assert_eq!(err("fox (dog").position(), 4);
    assert_eq!(err("fox)").position(), 3);
    assert_eq!(err("fox~x").position(), 3);
}

#[test]
fn doubled_operators_are_errors() {
    assert!(matches!(err("fox OR OR dog"), QuerySyntaxError::EmptyClause { .. }));
    assert!(matches!(err("fox AND AND dog"), QuerySyntaxError::EmptyClause { .. }));
}

#[test]
fn operator_only_queries_are_errors() {
    for query in ["OR", "AND", "NOT", "-", "fox OR"] {
        assert!(
            parse(query, &TokenizerConfig::default()).is_err(),
            "query {:?} should be rejected",
            query
        );
    }
}

#[test]
fn negating_an_empty_group_is_dropped() {
    // "()" has no clause tokens; negating nothing negates away.
    assert!(p("NOT ()").is_empty());
}

#[test]
fn escaped_quote_inside_phrase() {
    let node = p(r#""say \"hello\" loudly""#);
    let QueryNode::Phrase { terms, .. } = node else {
        panic!("expected phrase");
    };
    assert_eq!(terms, vec!["say", "hello", "loudly"]);
}

#[test]
fn empty_quotes_are_dropped_not_errors() {
    assert!(p("\"\"").is_empty());
    assert_eq!(p("fox \"\""), p("fox"));
}

#[test]
fn tolerance_zero_is_exact() {
    assert_eq!(
        p("fox~0"),
        QueryNode::Term {
            term: "fox".into(),
            tolerance: 0,
            field: None,
        }
    );
}

#[test]
fn whitespace_variants_parse_identically() {
    assert_eq!(p("fox dog"), p("  fox   dog  "));
    assert_eq!(p("fox OR dog"), p("fox  OR  dog"));
    assert_eq!(p("(fox)"), p("( fox )"));
}

#[test]
fn lowercase_or_is_a_stop_word_not_an_operator() {
    // "or" (lowercase) is in the default stop-word set: dropped, leaving
    // implicit AND of fox and dog.
    assert_eq!(p("fox or dog"), p("fox dog"));
}

#[test]
fn phrase_containing_stop_words_keeps_content_terms() {
    let QueryNode::Phrase { terms, .. } = p("\"quick of the fox\"") else {
        panic!("expected phrase");
    };
    // Stop words vanish without leaving position gaps, matching index-side
    // tokenization of the same text.
    assert_eq!(terms, vec!["quick", "fox"]);
}

#[test]
fn unicode_queries_normalize() {
    assert_eq!(
        p("Café"),
        QueryNode::Term {
            term: "cafe".into(),
            tolerance: 0,
            field: None,
        }
    );
}

#[test]
fn cjk_single_gram_is_a_term() {
    assert_eq!(
        p("猫"),
        QueryNode::Term {
            term: "猫".into(),
            tolerance: 0,
            field: None,
        }
    );
}
