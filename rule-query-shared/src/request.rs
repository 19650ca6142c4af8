//! The rule request: an ordered list of named rule invocations.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::clause::{Attributes, BoolClause};

/// Identifiers of the built-in rule kinds.
pub mod rule_kind {
    pub const FILTER: &str = "filter";
    pub const MUST: &str = "must";
    pub const MUST_NOT: &str = "must_not";
    pub const SHOULD: &str = "should";
    pub const MULTI_MATCH: &str = "multi_match";
    pub const RANGE: &str = "range";
}

/// A single rule invocation: a rule kind and its arguments.
///
/// Arguments are loosely typed. Each rule kind reads them either positionally
/// (`["age", 10, {"boost": 2}]`) or by name
/// (`{"field": "age", "value": 10, "attributes": {"boost": 2}}`).
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    /// The rule kind, e.g. `must` or `range`.
    pub kind: String,
    /// The rule arguments. `None` and JSON `null` both mean "absent".
    pub args: Option<Value>,
}

impl RuleEntry {
    /// Create a new entry.
    pub fn new(kind: impl Into<String>, args: Option<Value>) -> Self {
        Self {
            kind: kind.into(),
            args,
        }
    }

    /// The arguments, unless they are absent or `null`.
    pub fn args(&self) -> Option<&Value> {
        self.args.as_ref().filter(|args| !args.is_null())
    }

    /// Check whether this entry carries no arguments and will be skipped.
    pub fn is_absent(&self) -> bool {
        self.args().is_none()
    }
}

/// An ordered collection of rule invocations to compile into a query.
///
/// Order matters only where the same rule kind targets the same field more
/// than once: the later invocation wins. The same kind may appear any number
/// of times.
///
/// # Example
///
/// ```
/// use rule_query_shared::{BoolClause, RuleRequest};
/// use serde_json::json;
///
/// let request = RuleRequest::new()
///     .filter("status", "published")
///     .must("title", "rust")
///     .range("price", vec![json!("gte"), json!(10)], BoolClause::Filter);
/// assert_eq!(request.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleRequest {
    entries: Vec<RuleEntry>,
}

impl RuleRequest {
    /// Create an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, entry: RuleEntry) {
        self.entries.push(entry);
    }

    /// Append a rule with raw arguments.
    pub fn rule(mut self, kind: impl Into<String>, args: impl Into<Value>) -> Self {
        self.push(RuleEntry::new(kind, Some(args.into())));
        self
    }

    /// Append a rule with no arguments. It will be skipped when compiled.
    pub fn absent(mut self, kind: impl Into<String>) -> Self {
        self.push(RuleEntry::new(kind, None));
        self
    }

    /// Require an exact, non-scoring match on `field`.
    pub fn filter(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clause(rule_kind::FILTER, field, value, None)
    }

    /// Like [`filter`](Self::filter), with extra leaf attributes.
    pub fn filter_with(
        self,
        field: impl Into<String>,
        value: impl Into<Value>,
        attributes: Attributes,
    ) -> Self {
        self.clause(rule_kind::FILTER, field, value, Some(attributes))
    }

    /// Require a full-text match on `field`.
    pub fn must(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clause(rule_kind::MUST, field, value, None)
    }

    /// Like [`must`](Self::must), with extra leaf attributes.
    pub fn must_with(
        self,
        field: impl Into<String>,
        value: impl Into<Value>,
        attributes: Attributes,
    ) -> Self {
        self.clause(rule_kind::MUST, field, value, Some(attributes))
    }

    /// Forbid a full-text match on `field`.
    pub fn must_not(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clause(rule_kind::MUST_NOT, field, value, None)
    }

    /// Like [`must_not`](Self::must_not), with extra leaf attributes.
    pub fn must_not_with(
        self,
        field: impl Into<String>,
        value: impl Into<Value>,
        attributes: Attributes,
    ) -> Self {
        self.clause(rule_kind::MUST_NOT, field, value, Some(attributes))
    }

    /// Prefer documents with a full-text match on `field`.
    pub fn should(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clause(rule_kind::SHOULD, field, value, None)
    }

    /// Like [`should`](Self::should), with extra leaf attributes.
    pub fn should_with(
        self,
        field: impl Into<String>,
        value: impl Into<Value>,
        attributes: Attributes,
    ) -> Self {
        self.clause(rule_kind::SHOULD, field, value, Some(attributes))
    }

    /// Require a full-text match across several fields.
    pub fn multi_match<I, S>(self, fields: I, value: impl Into<Value>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.multi_match_with(fields, value, Attributes::new())
    }

    /// Like [`multi_match`](Self::multi_match), with extra leaf attributes.
    pub fn multi_match_with<I, S>(
        self,
        fields: I,
        value: impl Into<Value>,
        attributes: Attributes,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        let mut args = json!({ "fields": fields, "value": value.into() });
        if !attributes.is_empty() {
            args["attributes"] = Value::Object(attributes);
        }
        self.rule(rule_kind::MULTI_MATCH, args)
    }

    /// Bound `field` by alternating operator/operand `values`
    /// (e.g. `["gte", 10, "lte", 50]`), placed under `clause`.
    pub fn range(self, field: impl Into<String>, values: Vec<Value>, clause: BoolClause) -> Self {
        self.rule(
            rule_kind::RANGE,
            json!({ "field": field.into(), "values": values, "type": clause }),
        )
    }

    fn clause(
        self,
        kind: &str,
        field: impl Into<String>,
        value: impl Into<Value>,
        attributes: Option<Attributes>,
    ) -> Self {
        let mut args = json!({ "field": field.into(), "value": value.into() });
        if let Some(attributes) = attributes {
            args["attributes"] = Value::Object(attributes);
        }
        self.rule(kind, args)
    }

    /// Number of entries, including absent ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the request has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, RuleEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a RuleRequest {
    type Item = &'a RuleEntry;
    type IntoIter = std::slice::Iter<'a, RuleEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for RuleRequest {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(kind, args)| RuleEntry::new(kind, Some(args)))
                .collect(),
        }
    }
}

impl From<Map<String, Value>> for RuleRequest {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

/// Serializes as a list of `[kind, args]` pairs so repeated kinds survive.
impl Serialize for RuleRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter().map(|entry| (&entry.kind, &entry.args)))
    }
}

/// Accepted wire forms: an object keyed by kind, or a list of `[kind, args]` pairs.
#[derive(Deserialize)]
#[serde(untagged)]
enum RuleRequestRepr {
    Object(Map<String, Value>),
    Pairs(Vec<(String, Value)>),
}

impl<'de> Deserialize<'de> for RuleRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RuleRequestRepr::deserialize(deserializer)? {
            RuleRequestRepr::Object(map) => Self::from(map),
            RuleRequestRepr::Pairs(pairs) => pairs.into_iter().collect(),
        })
    }
}
