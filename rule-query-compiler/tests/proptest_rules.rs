//! Property-based tests for rule compilation.
//!
//! Generates random rule requests and checks the compiler is deterministic,
//! honors last-write-wins per field, and never lets absent rules through.

use proptest::prelude::*;
use rule_query_compiler::{BoolClause, RuleCompiler, RuleRequest};
use serde_json::{json, Value};

const KINDS: [&str; 4] = ["filter", "must", "must_not", "should"];

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z]{1,8}".prop_map(Value::String),
    ]
}

/// A single clause rule, or an absent entry, or an unknown kind.
fn entry_strategy() -> impl Strategy<Value = (String, Value)> {
    prop_oneof![
        6 => (0..KINDS.len(), "[a-c]", scalar_strategy())
            .prop_map(|(k, field, value)| (KINDS[k].to_string(), json!([field, value]))),
        2 => (0..KINDS.len(), "[a-c]", prop::collection::vec((0..4usize, -100i64..100), 0..3))
            .prop_map(|(k, field, bounds)| {
                let ops = ["gt", "gte", "lt", "lte"];
                let values: Vec<Value> = bounds
                    .into_iter()
                    .flat_map(|(op, v)| [json!(ops[op]), json!(v)])
                    .collect();
                ("range".to_string(), json!([field, values, KINDS[k]]))
            }),
        1 => (0..KINDS.len()).prop_map(|k| (KINDS[k].to_string(), Value::Null)),
        1 => ("[x-z]{3}", scalar_strategy()).prop_map(|(kind, value)| (kind, json!(["a", value]))),
    ]
}

fn request_strategy() -> impl Strategy<Value = Vec<(String, Value)>> {
    prop::collection::vec(entry_strategy(), 0..24)
}

proptest! {
    #[test]
    fn build_is_deterministic(entries in request_strategy()) {
        let request: RuleRequest = entries.into_iter().collect();
        let compiler = RuleCompiler::new();

        let first = compiler.build(&request).unwrap();
        let second = compiler.build(&request).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn one_fragment_per_field_and_category(entries in request_strategy()) {
        let request: RuleRequest = entries.into_iter().collect();
        let document = RuleCompiler::new().build(&request).unwrap();

        for (_, fragments) in document.clauses() {
            let mut seen = std::collections::HashSet::new();
            for fragment in fragments {
                let (leaf, body) = fragment.as_object().unwrap().iter().next().unwrap();
                let field = body.as_object().unwrap().keys().next().unwrap();
                prop_assert!(seen.insert((leaf.clone(), field.clone())));
            }
        }
    }

    #[test]
    fn last_write_wins(field in "[a-c]", values in prop::collection::vec(scalar_strategy(), 1..6)) {
        let mut request = RuleRequest::new();
        for value in &values {
            request = request.should(field.clone(), value.clone());
        }

        let document = RuleCompiler::new().build(&request).unwrap();
        let last = values.last().unwrap();
        prop_assert_eq!(
            document.get(BoolClause::Should).unwrap(),
            &[json!({"match": {field.as_str(): last}})][..]
        );
    }

    #[test]
    fn absent_entries_are_invisible(
        entries in request_strategy(),
        nulls in prop::collection::vec(0..KINDS.len(), 0..6)
    ) {
        let with_nulls: RuleRequest = entries
            .iter()
            .cloned()
            .chain(nulls.into_iter().map(|k| (KINDS[k].to_string(), Value::Null)))
            .collect();
        let without: RuleRequest = entries.into_iter().collect();
        let compiler = RuleCompiler::new();

        prop_assert_eq!(compiler.build(&with_nulls).unwrap(), compiler.build(&without).unwrap());
    }
}
