//! Built-in rule handlers and their dispatch table.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::compiler::Accumulators;
use crate::errors::RuleError;
use rule_query_shared::{rule_kind, Attributes, BoolClause};

/// A rule handler: reads the rule's arguments and records them in the
/// accumulators.
pub type RuleHandler = fn(&mut Accumulators, &Value) -> Result<(), RuleError>;

/// Built-in rule kinds and their handlers.
static BUILTIN_HANDLERS: &[(&str, RuleHandler)] = &[
    (rule_kind::FILTER, apply_filter),
    (rule_kind::MUST, apply_must),
    (rule_kind::MUST_NOT, apply_must_not),
    (rule_kind::SHOULD, apply_should),
    (rule_kind::MULTI_MATCH, apply_multi_match),
    (rule_kind::RANGE, apply_range),
];

/// Look up the built-in handler for `kind`.
pub(crate) fn builtin_handler(kind: &str) -> Option<RuleHandler> {
    BUILTIN_HANDLERS
        .iter()
        .find(|(name, _)| *name == kind)
        .map(|(_, handler)| *handler)
}

/// `[field, value, attributes?]` or `{"field", "value", "attributes"?}`.
#[derive(Debug, Deserialize)]
struct ClauseArgs {
    field: String,
    value: Value,
    #[serde(default)]
    attributes: Option<Attributes>,
}

/// `[fields, value, attributes?]` or `{"fields", "value", "attributes"?}`.
#[derive(Debug, Deserialize)]
struct MultiMatchArgs {
    fields: Vec<String>,
    value: Value,
    #[serde(default)]
    attributes: Option<Attributes>,
}

/// `[field, values, type]` or `{"field", "values", "type"}`.
#[derive(Debug, Deserialize)]
struct RangeArgs {
    field: String,
    values: Vec<Value>,
    #[serde(rename = "type", alias = "clause_type")]
    clause: BoolClause,
}

fn parse_args<T: DeserializeOwned>(kind: &str, args: &Value) -> Result<T, RuleError> {
    T::deserialize(args).map_err(|e| RuleError::invalid_arguments(kind, e.to_string()))
}

fn apply_clause(
    acc: &mut Accumulators,
    args: &Value,
    kind: &str,
    clause: BoolClause,
) -> Result<(), RuleError> {
    let ClauseArgs {
        field,
        value,
        attributes,
    } = parse_args(kind, args)?;
    let attributes = attributes.unwrap_or_default();

    match clause {
        BoolClause::Filter => acc.filter(field, value, attributes),
        BoolClause::Must => acc.must(field, value, attributes),
        BoolClause::MustNot => acc.must_not(field, value, attributes),
        BoolClause::Should => acc.should(field, value, attributes),
    }
    Ok(())
}

fn apply_filter(acc: &mut Accumulators, args: &Value) -> Result<(), RuleError> {
    apply_clause(acc, args, rule_kind::FILTER, BoolClause::Filter)
}

fn apply_must(acc: &mut Accumulators, args: &Value) -> Result<(), RuleError> {
    apply_clause(acc, args, rule_kind::MUST, BoolClause::Must)
}

fn apply_must_not(acc: &mut Accumulators, args: &Value) -> Result<(), RuleError> {
    apply_clause(acc, args, rule_kind::MUST_NOT, BoolClause::MustNot)
}

fn apply_should(acc: &mut Accumulators, args: &Value) -> Result<(), RuleError> {
    apply_clause(acc, args, rule_kind::SHOULD, BoolClause::Should)
}

fn apply_multi_match(acc: &mut Accumulators, args: &Value) -> Result<(), RuleError> {
    let MultiMatchArgs {
        fields,
        value,
        attributes,
    } = parse_args(rule_kind::MULTI_MATCH, args)?;
    acc.multi_match(fields, value, attributes.unwrap_or_default());
    Ok(())
}

fn apply_range(acc: &mut Accumulators, args: &Value) -> Result<(), RuleError> {
    let RangeArgs {
        field,
        values,
        clause,
    } = parse_args(rule_kind::RANGE, args)?;
    acc.range(field, values, clause)
}
