//! Rule compilation error types.
//!
//! This module defines the errors that can abort a compilation.

use thiserror::Error;

/// Errors that can occur while compiling a rule request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The rule arguments are well-formed but violate an invariant
    /// (e.g. an odd number of range operator/operand values).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The rule arguments could not be read in the shape the rule expects.
    #[error("Invalid arguments for rule '{rule}': {reason}")]
    InvalidArguments { rule: String, reason: String },

    /// The request carries more entries than the configured maximum.
    #[error("Rule count {provided} exceeds maximum {max}")]
    RuleLimitExceeded { provided: usize, max: usize },

    /// A configuration value could not be parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl RuleError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create an invalid arguments error for `rule`.
    pub fn invalid_arguments(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    /// Create a rule limit exceeded error.
    pub fn rule_limit_exceeded(provided: usize, max: usize) -> Self {
        Self::RuleLimitExceeded { provided, max }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
