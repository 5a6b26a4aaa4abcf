//! Key-pattern filter

use bucketsweep_core::Result;
use bucketsweep_policy::Policy;
use tracing::debug;

use crate::compiler::{compile_key_patterns, key_patterns};
use crate::filter::{CompiledFilter, Filter};

/// Selects objects whose key matches any selector's `matchExpression`.
///
/// Patterns are unanchored regular expressions: `my-file` matches
/// `/storage/my-file`, `^tmp` only matches keys starting with `tmp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectKeyFilter;

impl ObjectKeyFilter {
    /// Create a new key-pattern filter
    pub fn new() -> Self {
        Self
    }
}

impl Filter for ObjectKeyFilter {
    fn name(&self) -> &str {
        "Filter by object key"
    }

    fn compile(&self, policy: &Policy) -> Result<CompiledFilter> {
        let patterns = key_patterns(policy);
        debug!(
            selectors = policy.selectors.len(),
            patterns = patterns.len(),
            "Compiling key patterns"
        );

        let compiled = compile_key_patterns(patterns.as_slice())?;
        Ok(CompiledFilter::from_predicates(self.name(), compiled))
    }
}
