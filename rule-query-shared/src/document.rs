//! The compiled `bool` query document.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::clause::BoolClause;

/// The body of a `bool` query: clause category to list of leaf fragments.
///
/// Categories keep the order in which they were first populated. Serializes
/// to exactly the object placed under `"bool"` in a search request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryDocument {
    clauses: IndexMap<BoolClause, Vec<Value>>,
}

impl QueryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the fragments under `clause`.
    pub fn set(&mut self, clause: BoolClause, fragments: Vec<Value>) {
        self.clauses.insert(clause, fragments);
    }

    /// Append one fragment under `clause`, creating the category if needed.
    pub fn push(&mut self, clause: BoolClause, fragment: Value) {
        self.clauses.entry(clause).or_default().push(fragment);
    }

    /// Fragments under `clause`, if the category is present.
    pub fn get(&self, clause: BoolClause) -> Option<&[Value]> {
        self.clauses.get(&clause).map(Vec::as_slice)
    }

    /// Check if `clause` is present.
    pub fn contains(&self, clause: BoolClause) -> bool {
        self.clauses.contains_key(&clause)
    }

    /// Iterate categories and their fragments in document order.
    pub fn clauses(&self) -> impl Iterator<Item = (BoolClause, &[Value])> {
        self.clauses
            .iter()
            .map(|(clause, fragments)| (*clause, fragments.as_slice()))
    }

    /// Number of populated categories.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Check if no category is populated.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Total number of leaf fragments across all categories.
    pub fn fragment_count(&self) -> usize {
        self.clauses.values().map(Vec::len).sum()
    }

    /// The document as a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.clauses
                .iter()
                .map(|(clause, fragments)| {
                    (clause.as_str().to_string(), Value::from(fragments.clone()))
                })
                .collect(),
        )
    }

    /// Wrap as a `bool` query: `{"bool": {...}}`.
    pub fn into_bool_query(self) -> Value {
        json!({ "bool": self.to_value() })
    }

    /// Wrap as a search request body: `{"query": {"bool": {...}}}`.
    pub fn into_search_body(self) -> Value {
        json!({ "query": self.into_bool_query() })
    }
}
