//! Last-access window filter

use bucketsweep_core::Result;
use bucketsweep_policy::Policy;
use chrono::{DateTime, Utc};

use crate::filter::{CompiledFilter, Filter};
use crate::window::compile_time_windows;

/// Selects objects whose last access falls inside at least one selector's
/// `lastAccess` window.
///
/// The backend's `lastModified` stands in for the access time. Relative
/// bounds such as `-30d` are resolved when the filter runs, unless a fixed
/// reference time was set with [`LastAccessFilter::at`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LastAccessFilter {
    reference: Option<DateTime<Utc>>,
}

impl LastAccessFilter {
    /// Create a filter resolving relative bounds against the current time
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative bounds against a fixed time
    pub fn at(reference: DateTime<Utc>) -> Self {
        Self {
            reference: Some(reference),
        }
    }
}

impl Filter for LastAccessFilter {
    fn name(&self) -> &str {
        "Filter by last access window"
    }

    fn compile(&self, policy: &Policy) -> Result<CompiledFilter> {
        let now = self.reference.unwrap_or_else(Utc::now);
        Ok(CompiledFilter::from_predicates(
            self.name(),
            compile_time_windows(policy, now)?,
        ))
    }
}
