//! Error types for the rule query compiler.

mod rule_error;

pub use rule_error::RuleError;
