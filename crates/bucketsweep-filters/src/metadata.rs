//! Object metadata filter

use bucketsweep_core::Result;
use bucketsweep_policy::Policy;

use crate::compiler::compile_metadata_sets;
use crate::filter::{CompiledFilter, Filter};

/// Selects objects carrying every metadata entry of at least one
/// selector's `objMetadata`. Keys are matched without regard to case.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataFilter;

impl MetadataFilter {
    /// Create a new metadata filter
    pub fn new() -> Self {
        Self
    }
}

impl Filter for MetadataFilter {
    fn name(&self) -> &str {
        "Filter by object metadata"
    }

    fn compile(&self, policy: &Policy) -> Result<CompiledFilter> {
        Ok(CompiledFilter::from_predicates(
            self.name(),
            compile_metadata_sets(policy)?,
        ))
    }
}
