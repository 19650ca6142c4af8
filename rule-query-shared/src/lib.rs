//! # Rule Query Shared
//!
//! Types exchanged between callers and the rule query compiler: the rule
//! request going in, the boolean clause categories, and the compiled query
//! document coming out.

mod clause;
mod document;
mod request;

pub use clause::{Attributes, BoolClause, ParseBoolClauseError};
pub use document::QueryDocument;
pub use request::{rule_kind, RuleEntry, RuleRequest};
