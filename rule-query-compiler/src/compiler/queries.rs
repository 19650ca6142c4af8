//! Query DSL fragment builders.
//!
//! This module renders accumulated rules into `bool` query leaf clauses and
//! assembles them into a [`QueryDocument`]. The key names and nesting are
//! part of the Elasticsearch/OpenSearch wire format.

use serde_json::{json, Map, Value};

use crate::compiler::accumulators::{Accumulators, ClauseEntry, MultiMatchEntry, RangeEntry};
use crate::config::CompilerConfig;
use rule_query_shared::{BoolClause, QueryDocument};

/// Assemble the document from every non-empty accumulator.
///
/// - `filter` from filter clauses (`term` leaves)
/// - `must` from must clauses (`match` leaves), replaced by the multi-field
///   matches whenever there are any
/// - `must_not` and `should` from their clauses (`match` leaves)
/// - each range appended under its own clause type
pub(crate) fn build_document(acc: &Accumulators, config: &CompilerConfig) -> QueryDocument {
    let mut document = QueryDocument::new();

    let filters = acc.clauses(BoolClause::Filter);
    if !filters.is_empty() {
        let fragments = filters
            .iter()
            .map(|(field, entry)| build_term_clause(field, entry, config.merge_filter_attributes))
            .collect();
        document.set(BoolClause::Filter, fragments);
    }

    for clause in [BoolClause::Must, BoolClause::MustNot, BoolClause::Should] {
        let entries = acc.clauses(clause);
        if !entries.is_empty() {
            let fragments = entries
                .iter()
                .map(|(field, entry)| build_match_clause(field, entry))
                .collect();
            document.set(clause, fragments);
        }

        // Multi-field matches take over the must slot.
        if clause == BoolClause::Must && !acc.multi_matches().is_empty() {
            let fragments = acc.multi_matches().iter().map(build_multi_match_clause).collect();
            document.set(BoolClause::Must, fragments);
        }
    }

    for (field, range) in acc.ranges() {
        document.push(range.clause, build_range_clause(field, range));
    }

    document
}

/// Build a `term` leaf: `{"term": {field: value}}`.
///
/// Attributes are ignored unless `merge_attributes` is set, in which case the
/// leaf becomes `{"term": {field: {"value": value, ...attributes}}}`.
/// Older rule builders dropped a `filter` with attributes entirely; here the
/// clause is kept.
fn build_term_clause(field: &str, entry: &ClauseEntry, merge_attributes: bool) -> Value {
    if merge_attributes && !entry.attributes.is_empty() {
        let body = merge_leaf_body("value", &entry.value, &entry.attributes);
        return json!({ "term": { field: body } });
    }

    json!({ "term": { field: entry.value } })
}

/// Build a `match` leaf: `{"match": {field: value}}`, or
/// `{"match": {field: {"query": value, ...attributes}}}` when attributes are set.
fn build_match_clause(field: &str, entry: &ClauseEntry) -> Value {
    if entry.attributes.is_empty() {
        return json!({ "match": { field: entry.value } });
    }

    let body = merge_leaf_body("query", &entry.value, &entry.attributes);
    json!({ "match": { field: body } })
}

/// Build a `multi_match` leaf. Attributes are merged last and win on collision
/// with `query` or `fields`.
fn build_multi_match_clause(entry: &MultiMatchEntry) -> Value {
    let mut body = Map::new();
    body.insert("query".to_string(), entry.value.clone());
    body.insert("fields".to_string(), json!(entry.fields));
    body.extend(entry.attributes.clone());

    json!({ "multi_match": body })
}

/// Build a `range` leaf by folding operator/operand pairs in order:
/// `{"range": {field: {"gte": 10, "lte": 50}}}`.
fn build_range_clause(field: &str, range: &RangeEntry) -> Value {
    let bounds: Map<String, Value> = range
        .bounds
        .iter()
        .map(|(operator, operand)| (operator.clone(), operand.clone()))
        .collect();

    json!({ "range": { field: bounds } })
}

/// `{key: value}` followed by the attributes. The rule's value wins over an
/// attribute of the same name.
fn merge_leaf_body(
    key: &str,
    value: &Value,
    attributes: &Map<String, Value>,
) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert(key.to_string(), value.clone());
    body.extend(
        attributes
            .iter()
            .filter(|(name, _)| name.as_str() != key)
            .map(|(name, attribute)| (name.clone(), attribute.clone())),
    );
    body
}
