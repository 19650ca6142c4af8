//! # Rule Query Compiler
//!
//! This crate compiles a flat, declarative list of search rules (filters,
//! required/forbidden/optional text matches, multi-field matches, ranges)
//! into the body of an Elasticsearch/OpenSearch `bool` query. Executing the
//! query is left to the caller's search client.

pub mod compiler;
pub mod config;
pub mod errors;

pub use compiler::{
    Accumulators, ClauseEntry, MultiMatchEntry, RangeEntry, RuleCompiler, RuleHandler,
};
pub use config::CompilerConfig;
pub use errors::RuleError;
pub use rule_query_shared::{
    rule_kind, Attributes, BoolClause, QueryDocument, RuleEntry, RuleRequest,
};
