//! Boolean clause categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Loosely-typed attribute bag merged into a rendered leaf clause
/// (e.g. `boost`, `fuzziness`, `operator`).
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// A category of the `bool` query.
///
/// The serialized names are part of the query DSL and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolClause {
    /// Non-scoring, must match.
    Filter,
    /// Scoring, must match.
    Must,
    /// Must not match.
    MustNot,
    /// Optional, contributes to score.
    Should,
}

impl BoolClause {
    /// All categories in document order.
    pub const ALL: [BoolClause; 4] = [
        BoolClause::Filter,
        BoolClause::Must,
        BoolClause::MustNot,
        BoolClause::Should,
    ];

    /// The DSL key for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            BoolClause::Filter => "filter",
            BoolClause::Must => "must",
            BoolClause::MustNot => "must_not",
            BoolClause::Should => "should",
        }
    }
}

impl fmt::Display for BoolClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a `bool` clause category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown bool clause type: {0}")]
pub struct ParseBoolClauseError(pub String);

impl FromStr for BoolClause {
    type Err = ParseBoolClauseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BoolClause::ALL
            .into_iter()
            .find(|clause| clause.as_str() == s)
            .ok_or_else(|| ParseBoolClauseError(s.to_string()))
    }
}
