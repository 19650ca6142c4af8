//! Rule-to-query compilation.
//!
//! [`RuleCompiler`] dispatches each entry of a [`RuleRequest`] to its rule
//! handler, which records the rule in a fresh set of [`Accumulators`]. The
//! accumulators are then rendered into a [`QueryDocument`].

mod accumulators;
mod handlers;
mod queries;

pub use accumulators::{Accumulators, ClauseEntry, MultiMatchEntry, RangeEntry};
pub use handlers::RuleHandler;

use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, instrument, warn};

use crate::config::CompilerConfig;
use crate::errors::RuleError;
use rule_query_shared::{QueryDocument, RuleRequest};

/// Compiles rule requests into `bool` query documents.
///
/// The compiler holds no per-call state: every [`build`](Self::build) works
/// on its own accumulators, so one instance can be shared across threads and
/// stays usable after a failed call.
///
/// # Example
///
/// ```
/// use rule_query_compiler::{BoolClause, RuleCompiler, RuleRequest};
/// use serde_json::json;
///
/// let request = RuleRequest::new()
///     .filter("status", "published")
///     .must("title", "rust")
///     .range("price", vec![json!("gte"), json!(10), json!("lte"), json!(50)], BoolClause::Filter);
///
/// let document = RuleCompiler::new().build(&request)?;
/// assert_eq!(
///     document.into_bool_query(),
///     json!({
///         "bool": {
///             "filter": [
///                 {"term": {"status": "published"}},
///                 {"range": {"price": {"gte": 10, "lte": 50}}}
///             ],
///             "must": [{"match": {"title": "rust"}}]
///         }
///     })
/// );
/// # Ok::<(), rule_query_compiler::RuleError>(())
/// ```
#[derive(Clone, Default)]
pub struct RuleCompiler {
    config: CompilerConfig,
    custom_handlers: IndexMap<String, RuleHandler>,
}

impl fmt::Debug for RuleCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleCompiler")
            .field("config", &self.config)
            .field("custom_handlers", &self.custom_handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl RuleCompiler {
    /// Create a compiler with the default configuration and the built-in
    /// rule kinds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compiler with a custom configuration.
    pub fn with_config(config: CompilerConfig) -> Self {
        Self {
            config,
            custom_handlers: IndexMap::new(),
        }
    }

    /// Register a handler for an additional rule kind.
    ///
    /// Registering under a built-in name replaces the built-in for this
    /// compiler.
    ///
    /// ```
    /// use rule_query_compiler::{Accumulators, BoolClause, RuleCompiler, RuleError, RuleRequest};
    /// use serde_json::{json, Value};
    ///
    /// fn adults_only(acc: &mut Accumulators, _args: &Value) -> Result<(), RuleError> {
    ///     acc.range("age", vec![json!("gte"), json!(18)], BoolClause::Filter)
    /// }
    ///
    /// let compiler = RuleCompiler::new().with_handler("adults_only", adults_only);
    /// let document = compiler.build(&RuleRequest::new().rule("adults_only", true))?;
    /// assert_eq!(
    ///     document.get(BoolClause::Filter).unwrap(),
    ///     &[json!({"range": {"age": {"gte": 18}}})]
    /// );
    /// # Ok::<(), RuleError>(())
    /// ```
    pub fn with_handler(mut self, kind: impl Into<String>, handler: RuleHandler) -> Self {
        self.custom_handlers.insert(kind.into(), handler);
        self
    }

    /// Check whether `kind` is handled by this compiler.
    pub fn supports(&self, kind: &str) -> bool {
        self.handler(kind).is_some()
    }

    fn handler(&self, kind: &str) -> Option<RuleHandler> {
        self.custom_handlers
            .get(kind)
            .copied()
            .or_else(|| handlers::builtin_handler(kind))
    }

    /// Check if the request size is within the configured limit.
    fn validate_rule_count(&self, count: usize) -> Result<(), RuleError> {
        if let Some(max) = self.config.max_rules {
            if count > max {
                return Err(RuleError::rule_limit_exceeded(count, max));
            }
        }
        Ok(())
    }

    /// Compile a rule request into a `bool` query document.
    ///
    /// Entries are applied in order. Entries without arguments and entries
    /// whose kind has no handler are skipped. Applying the same rule kind to
    /// the same field twice keeps the later one.
    ///
    /// # Returns
    ///
    /// * `Ok(QueryDocument)` - The compiled document, empty for an empty request
    /// * `Err(RuleError)` - If any rule is invalid; nothing is returned for the
    ///   rules that preceded it
    #[instrument(skip_all, fields(entries = request.len()))]
    pub fn build(&self, request: &RuleRequest) -> Result<QueryDocument, RuleError> {
        self.validate_rule_count(request.len())?;

        let mut accumulators = Accumulators::new();

        for entry in request {
            let Some(args) = entry.args() else {
                debug!(rule = %entry.kind, "Skipping rule without arguments");
                continue;
            };

            let Some(handler) = self.handler(&entry.kind) else {
                debug!(rule = %entry.kind, "Ignoring unrecognized rule kind");
                continue;
            };

            if let Err(e) = handler(&mut accumulators, args) {
                warn!(rule = %entry.kind, error = %e, "Rule rejected");
                return Err(e);
            }
        }

        if accumulators.is_empty() {
            debug!("No rules to compile");
            return Ok(QueryDocument::new());
        }

        let document = self.render(&accumulators);

        debug!(
            clauses = document.len(),
            fragments = document.fragment_count(),
            "Compiled rule request"
        );

        Ok(document)
    }

    /// Render already-accumulated rules into a document.
    pub fn render(&self, accumulators: &Accumulators) -> QueryDocument {
        queries::build_document(accumulators, &self.config)
    }
}
