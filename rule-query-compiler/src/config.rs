//! Configuration types for the RuleCompiler.

use std::env;

use crate::errors::RuleError;

/// Environment variable overriding [`CompilerConfig::max_rules`].
/// Accepts a positive integer, or `none` to disable the limit.
pub const MAX_RULES_ENV: &str = "RULE_COMPILER_MAX_RULES";

/// Environment variable overriding [`CompilerConfig::merge_filter_attributes`].
pub const MERGE_FILTER_ATTRIBUTES_ENV: &str = "RULE_COMPILER_MERGE_FILTER_ATTRIBUTES";

/// Configuration for the RuleCompiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Maximum number of entries allowed in a single rule request.
    /// None (the default) disables the limit.
    pub max_rules: Option<usize>,
    /// Merge `filter` attributes into the `term` leaf as
    /// `{"term": {field: {"value": v, ...attributes}}}`.
    /// When false, `filter` attributes are accepted and ignored.
    pub merge_filter_attributes: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_rules: None,
            merge_filter_attributes: false,
        }
    }
}

impl CompilerConfig {
    /// Create a config with no request size limit.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Set a custom request size limit.
    pub fn with_max_rules(mut self, max_rules: usize) -> Self {
        self.max_rules = Some(max_rules);
        self
    }

    /// Enable or disable merging of `filter` attributes into `term` leaves.
    pub fn with_filter_attributes(mut self, merge: bool) -> Self {
        self.merge_filter_attributes = merge;
        self
    }

    /// Load the config from environment variables, falling back to defaults
    /// for anything unset.
    ///
    /// # Environment Variables
    ///
    /// - `RULE_COMPILER_MAX_RULES`: request size limit, or `none` (default: none)
    /// - `RULE_COMPILER_MERGE_FILTER_ATTRIBUTES`: `true`/`false` (default: false)
    pub fn from_env() -> Result<Self, RuleError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RuleError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(MAX_RULES_ENV) {
            config.max_rules = parse_max_rules(raw.trim())?;
        }

        if let Some(raw) = lookup(MERGE_FILTER_ATTRIBUTES_ENV) {
            config.merge_filter_attributes = match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                other => {
                    return Err(RuleError::config(format!(
                        "{} must be true or false, got '{}'",
                        MERGE_FILTER_ATTRIBUTES_ENV, other
                    )))
                }
            };
        }

        Ok(config)
    }
}

fn parse_max_rules(raw: &str) -> Result<Option<usize>, RuleError> {
    if raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }

    match raw.parse::<usize>() {
        Ok(0) => Err(RuleError::config(format!("{} must be positive", MAX_RULES_ENV))),
        Ok(max) => Ok(Some(max)),
        Err(e) => Err(RuleError::config(format!(
            "Invalid {} '{}': {}",
            MAX_RULES_ENV, raw, e
        ))),
    }
}
