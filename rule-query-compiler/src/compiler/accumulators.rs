//! Per-compilation rule accumulators.
//!
//! Rule handlers append into these; rendering reads them. A fresh set is
//! created for every compilation so no state leaks between calls.

use indexmap::IndexMap;
use serde_json::Value;

use crate::errors::RuleError;
use rule_query_shared::{rule_kind, Attributes, BoolClause};

/// A single-field clause accumulated for the filter, must, must-not or
/// should category.
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseEntry {
    pub value: Value,
    pub attributes: Attributes,
}

/// A multi-field match accumulated for the must category.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiMatchEntry {
    pub fields: Vec<String>,
    pub value: Value,
    pub attributes: Attributes,
}

/// A range accumulated for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeEntry {
    /// Operator/operand pairs in the order given, e.g. `[("gte", 10), ("lte", 50)]`.
    pub bounds: Vec<(String, Value)>,
    /// The bool category the rendered range is placed under.
    pub clause: BoolClause,
}

/// Accumulated rules awaiting rendering.
///
/// Single-field categories and ranges are keyed by field: applying the same
/// category to a field again replaces the earlier entry in place. Multi-field
/// matches are an append-only list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accumulators {
    filters: IndexMap<String, ClauseEntry>,
    musts: IndexMap<String, ClauseEntry>,
    must_nots: IndexMap<String, ClauseEntry>,
    shoulds: IndexMap<String, ClauseEntry>,
    multi_matches: Vec<MultiMatchEntry>,
    ranges: IndexMap<String, RangeEntry>,
}

impl Accumulators {
    /// Create an empty set of accumulators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the filter clause for `field`.
    pub fn filter(&mut self, field: impl Into<String>, value: Value, attributes: Attributes) {
        self.insert_clause(BoolClause::Filter, field.into(), value, attributes);
    }

    /// Add or replace the must clause for `field`.
    pub fn must(&mut self, field: impl Into<String>, value: Value, attributes: Attributes) {
        self.insert_clause(BoolClause::Must, field.into(), value, attributes);
    }

    /// Add or replace the must-not clause for `field`.
    pub fn must_not(&mut self, field: impl Into<String>, value: Value, attributes: Attributes) {
        self.insert_clause(BoolClause::MustNot, field.into(), value, attributes);
    }

    /// Add or replace the should clause for `field`.
    pub fn should(&mut self, field: impl Into<String>, value: Value, attributes: Attributes) {
        self.insert_clause(BoolClause::Should, field.into(), value, attributes);
    }

    /// Append a multi-field match.
    pub fn multi_match(&mut self, fields: Vec<String>, value: Value, attributes: Attributes) {
        self.multi_matches.push(MultiMatchEntry {
            fields,
            value,
            attributes,
        });
    }

    /// Add or replace the range for `field`.
    ///
    /// `values` alternates operator and operand (`["gte", 10, "lte", 50]`).
    /// Fails without touching the accumulators if the values do not pair up
    /// or an operator is not a string.
    pub fn range(
        &mut self,
        field: impl Into<String>,
        values: Vec<Value>,
        clause: BoolClause,
    ) -> Result<(), RuleError> {
        if values.len() % 2 != 0 {
            return Err(RuleError::validation("range values must be in pairs"));
        }

        let mut bounds = Vec::with_capacity(values.len() / 2);
        let mut values = values.into_iter().enumerate();
        while let (Some((position, operator)), Some((_, operand))) =
            (values.next(), values.next())
        {
            let Value::String(operator) = operator else {
                return Err(RuleError::invalid_arguments(
                    rule_kind::RANGE,
                    format!("range operator at position {} must be a string", position),
                ));
            };
            bounds.push((operator, operand));
        }

        self.ranges.insert(field.into(), RangeEntry { bounds, clause });
        Ok(())
    }

    fn insert_clause(
        &mut self,
        clause: BoolClause,
        field: String,
        value: Value,
        attributes: Attributes,
    ) {
        self.clauses_mut(clause)
            .insert(field, ClauseEntry { value, attributes });
    }

    fn clauses_mut(&mut self, clause: BoolClause) -> &mut IndexMap<String, ClauseEntry> {
        match clause {
            BoolClause::Filter => &mut self.filters,
            BoolClause::Must => &mut self.musts,
            BoolClause::MustNot => &mut self.must_nots,
            BoolClause::Should => &mut self.shoulds,
        }
    }

    /// Single-field clauses accumulated for `clause`, keyed by field.
    pub fn clauses(&self, clause: BoolClause) -> &IndexMap<String, ClauseEntry> {
        match clause {
            BoolClause::Filter => &self.filters,
            BoolClause::Must => &self.musts,
            BoolClause::MustNot => &self.must_nots,
            BoolClause::Should => &self.shoulds,
        }
    }

    pub fn multi_matches(&self) -> &[MultiMatchEntry] {
        &self.multi_matches
    }

    pub fn ranges(&self) -> &IndexMap<String, RangeEntry> {
        &self.ranges
    }

    /// Check if nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        BoolClause::ALL
            .into_iter()
            .all(|clause| self.clauses(clause).is_empty())
            && self.multi_matches.is_empty()
            && self.ranges.is_empty()
    }
}
