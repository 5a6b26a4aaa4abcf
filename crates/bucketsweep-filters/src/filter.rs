//! Filter trait and compiled predicate sets

use bucketsweep_core::{Result, StorageObject};
use bucketsweep_policy::Policy;
use std::fmt;
use tracing::debug;

/// A single executable matcher derived from one selector field
pub trait Predicate: fmt::Debug + Send + Sync {
    /// Whether the object satisfies this predicate
    fn matches(&self, object: &StorageObject) -> bool;
}

/// Trait for all filters.
///
/// A filter evaluates an object collection against the selectors of one
/// criterion and returns the objects matched by at least one of them.
/// A policy that never mentions the criterion selects nothing, and any
/// malformed selector field fails the whole invocation.
pub trait Filter: Send + Sync {
    /// Human-readable filter name
    fn name(&self) -> &str;

    /// Compile this filter's predicates from the policy without
    /// evaluating any object
    fn compile(&self, policy: &Policy) -> Result<CompiledFilter>;

    /// Return the objects matched by at least one selector, in input order
    fn filter<'a>(
        &self,
        objects: &[&'a StorageObject],
        policy: &Policy,
    ) -> Result<Vec<&'a StorageObject>> {
        Ok(self.compile(policy)?.select(objects))
    }

    /// Same as [`Filter::filter`] over an owned collection
    fn filter_all<'a>(
        &self,
        objects: &'a [StorageObject],
        policy: &Policy,
    ) -> Result<Vec<&'a StorageObject>> {
        let refs: Vec<&StorageObject> = objects.iter().collect();
        self.filter(&refs, policy)
    }

    /// Check that every selector field this filter reads is well formed
    fn validate(&self, policy: &Policy) -> Result<()> {
        self.compile(policy).map(|_| ())
    }
}

/// Predicates compiled for one filter invocation
#[derive(Debug)]
pub struct CompiledFilter {
    name: String,
    predicates: Vec<Box<dyn Predicate>>,
}

impl CompiledFilter {
    /// Create a compiled filter from its predicates
    pub fn new(name: impl Into<String>, predicates: Vec<Box<dyn Predicate>>) -> Self {
        Self {
            name: name.into(),
            predicates,
        }
    }

    /// Wrap concrete predicates
    pub fn from_predicates<P: Predicate + 'static>(
        name: impl Into<String>,
        predicates: Vec<P>,
    ) -> Self {
        Self::new(
            name,
            predicates
                .into_iter()
                .map(|p| Box::new(p) as Box<dyn Predicate>)
                .collect(),
        )
    }

    /// Name of the filter these predicates belong to
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of compiled predicates
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// True when the policy had no selector for this criterion
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Whether any predicate matches the object (first match wins)
    pub fn matches(&self, object: &StorageObject) -> bool {
        self.predicates.iter().any(|p| p.matches(object))
    }

    /// Keep the objects matched by at least one predicate, preserving order
    pub fn select<'a>(&self, objects: &[&'a StorageObject]) -> Vec<&'a StorageObject> {
        if self.predicates.is_empty() {
            debug!(filter = %self.name, "No selectors for this criterion, selecting nothing");
            return Vec::new();
        }

        let selected: Vec<&'a StorageObject> = objects
            .iter()
            .copied()
            .filter(|obj| self.matches(obj))
            .collect();

        record_evaluation(&self.name, objects.len(), selected.len());
        selected
    }
}

/// Record how many objects a filter looked at and kept
pub(crate) fn record_evaluation(filter: &str, evaluated: usize, selected: usize) {
    metrics::counter!("bucketsweep_objects_evaluated_total", "filter" => filter.to_string())
        .increment(evaluated as u64);
    metrics::counter!("bucketsweep_objects_selected_total", "filter" => filter.to_string())
        .increment(selected as u64);

    debug!(filter = %filter, evaluated, selected, "Filter evaluated");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct KeyPrefix(&'static str);

    impl Predicate for KeyPrefix {
        fn matches(&self, object: &StorageObject) -> bool {
            object.key.starts_with(self.0)
        }
    }

    fn objects() -> Vec<StorageObject> {
        vec![
            StorageObject::new("a/1"),
            StorageObject::new("b/1"),
            StorageObject::new("a/2"),
            StorageObject::new("c/1"),
        ]
    }

    #[test]
    fn test_empty_compiled_filter_selects_nothing() {
        let compiled = CompiledFilter::new("empty", Vec::new());
        let objs = objects();
        let refs: Vec<_> = objs.iter().collect();

        assert!(compiled.is_empty());
        assert!(compiled.select(&refs).is_empty());
    }

    #[test]
    fn test_select_is_or_and_stable() {
        let compiled = CompiledFilter::from_predicates("prefix", vec![KeyPrefix("c/"), KeyPrefix("a/")]);
        let objs = objects();
        let refs: Vec<_> = objs.iter().collect();

        let keys: Vec<_> = compiled.select(&refs).iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["a/1", "a/2", "c/1"]);
        assert_eq!(compiled.len(), 2);
        assert_eq!(compiled.name(), "prefix");
    }

    #[test]
    fn test_select_returns_references_into_input() {
        let compiled = CompiledFilter::from_predicates("prefix", vec![KeyPrefix("b/")]);
        let objs = objects();
        let refs: Vec<_> = objs.iter().collect();

        let selected = compiled.select(&refs);
        assert_eq!(selected.len(), 1);
        assert!(std::ptr::eq(selected[0], &objs[1]));
    }
}
