//! End-to-end behavior of the rule compiler on realistic rule requests.

use rule_query_compiler::{Attributes, BoolClause, RuleCompiler, RuleError, RuleRequest};
use serde_json::{json, Value};

fn attributes(value: Value) -> Attributes {
    value.as_object().cloned().unwrap()
}

fn compile(request: &RuleRequest) -> Value {
    RuleCompiler::new().build(request).unwrap().to_value()
}

#[test]
fn test_overwrite_keeps_last_value() {
    let request = RuleRequest::new().must("age", 10).must("age", 20);

    assert_eq!(compile(&request), json!({"must": [{"match": {"age": 20}}]}));
}

#[test]
fn test_range_pairs_under_requested_clause() {
    let request = RuleRequest::new().range(
        "price",
        vec![json!("gte"), json!(10), json!("lte"), json!(50)],
        BoolClause::Filter,
    );

    assert_eq!(
        compile(&request),
        json!({"filter": [{"range": {"price": {"gte": 10, "lte": 50}}}]})
    );
}

#[test]
fn test_odd_range_fails_whole_build() {
    let request = RuleRequest::new()
        .filter("status", "active")
        .range("price", vec![json!("gte"), json!(10), json!("lte")], BoolClause::Filter)
        .should("tags", "rust");

    let err = RuleCompiler::new().build(&request).unwrap_err();
    assert_eq!(err, RuleError::validation("range values must be in pairs"));
    assert_eq!(err.to_string(), "Validation error: range values must be in pairs");
}

#[test]
fn test_multi_match_takes_must_slot() {
    let request = RuleRequest::new()
        .must("title", "x")
        .multi_match(["title", "body"], "x");

    assert_eq!(
        compile(&request),
        json!({"must": [{"multi_match": {"query": "x", "fields": ["title", "body"]}}]})
    );
}

#[test]
fn test_multi_matches_coexist_in_order() {
    let request = RuleRequest::new()
        .multi_match(["title"], "first")
        .multi_match_with(["body"], "second", attributes(json!({"type": "phrase"})));

    assert_eq!(
        compile(&request),
        json!({
            "must": [
                {"multi_match": {"query": "first", "fields": ["title"]}},
                {"multi_match": {"query": "second", "fields": ["body"], "type": "phrase"}}
            ]
        })
    );
}

#[test]
fn test_empty_request_yields_empty_document() {
    assert_eq!(compile(&RuleRequest::new()), json!({}));
}

#[test]
fn test_match_attributes_merge_with_query() {
    let request = RuleRequest::new().must_with("name", "bob", attributes(json!({"boost": 2})));

    assert_eq!(
        compile(&request),
        json!({"must": [{"match": {"name": {"query": "bob", "boost": 2}}}]})
    );
}

#[test]
fn test_null_entries_never_reach_the_document() {
    for kind in ["filter", "must", "must_not", "should", "multi_match", "range"] {
        let request = RuleRequest::new().rule(kind, Value::Null).absent(kind);
        assert_eq!(compile(&request), json!({}), "kind {} leaked", kind);
    }
}

#[test]
fn test_unknown_kinds_are_ignored() {
    let request = RuleRequest::new()
        .rule("sort", json!(["created_at", "desc"]))
        .rule("mustNot", json!(["status", "deleted"]))
        .must_not("status", "deleted");

    assert_eq!(
        compile(&request),
        json!({"must_not": [{"match": {"status": "deleted"}}]})
    );
}

#[test]
fn test_full_document_shape_and_key_order() {
    let request = RuleRequest::new()
        .range("age", vec![json!("lt"), json!(18)], BoolClause::MustNot)
        .should("tags", "rust")
        .must_not("status", "deleted")
        .must("title", "compiler")
        .filter("lang", "en")
        .range("stars", vec![json!("gt"), json!(100)], BoolClause::Should);

    let document = RuleCompiler::new().build(&request).unwrap();
    let keys: Vec<BoolClause> = document.clauses().map(|(clause, _)| clause).collect();
    assert_eq!(
        keys,
        vec![BoolClause::Filter, BoolClause::Must, BoolClause::MustNot, BoolClause::Should]
    );

    assert_eq!(
        document.into_search_body(),
        json!({
            "query": {
                "bool": {
                    "filter": [{"term": {"lang": "en"}}],
                    "must": [{"match": {"title": "compiler"}}],
                    "must_not": [
                        {"match": {"status": "deleted"}},
                        {"range": {"age": {"lt": 18}}}
                    ],
                    "should": [
                        {"match": {"tags": "rust"}},
                        {"range": {"stars": {"gt": 100}}}
                    ]
                }
            }
        })
    );
}

#[test]
fn test_range_creates_slot_not_otherwise_populated() {
    let request = RuleRequest::new()
        .filter("lang", "en")
        .range("score", vec![json!("gte"), json!(0.5)], BoolClause::Should);

    let document = RuleCompiler::new().build(&request).unwrap();
    assert_eq!(
        document.get(BoolClause::Should).unwrap(),
        &[json!({"range": {"score": {"gte": 0.5}}})]
    );
    assert!(!document.contains(BoolClause::Must));
}

#[test]
fn test_range_for_same_field_is_replaced() {
    let request = RuleRequest::new()
        .range("price", vec![json!("gte"), json!(10)], BoolClause::Filter)
        .range("price", vec![json!("lte"), json!(99)], BoolClause::Must);

    assert_eq!(
        compile(&request),
        json!({"must": [{"range": {"price": {"lte": 99}}}]})
    );
}

#[test]
fn test_request_from_json_object() {
    let request: RuleRequest = serde_json::from_value(json!({
        "filter": ["status", "published"],
        "must": {"field": "title", "value": "rust", "attributes": {"operator": "and"}},
        "should": null,
        "range": ["year", ["gte", 2020], "filter"],
        "page": 2
    }))
    .unwrap();

    assert_eq!(
        compile(&request),
        json!({
            "filter": [
                {"term": {"status": "published"}},
                {"range": {"year": {"gte": 2020}}}
            ],
            "must": [{"match": {"title": {"query": "rust", "operator": "and"}}}]
        })
    );
}

#[test]
fn test_malformed_arguments_abort_build() {
    let request = RuleRequest::new()
        .must("title", "rust")
        .rule("multi_match", json!({"fields": "title", "value": "rust"}));

    let err = RuleCompiler::new().build(&request).unwrap_err();
    assert!(matches!(err, RuleError::InvalidArguments { ref rule, .. } if rule == "multi_match"));
}
