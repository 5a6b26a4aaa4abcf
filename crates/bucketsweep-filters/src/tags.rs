//! Tag filters: required tags and absent tag keys

use bucketsweep_core::Result;
use bucketsweep_policy::Policy;

use crate::compiler::{compile_tag_absences, compile_tag_sets};
use crate::filter::{CompiledFilter, Filter};

/// Selects objects carrying every tag pair of at least one selector's `tags`
#[derive(Debug, Clone, Copy, Default)]
pub struct TagFilter;

impl TagFilter {
    /// Create a new tag filter
    pub fn new() -> Self {
        Self
    }
}

impl Filter for TagFilter {
    fn name(&self) -> &str {
        "Filter by object tags"
    }

    fn compile(&self, policy: &Policy) -> Result<CompiledFilter> {
        Ok(CompiledFilter::from_predicates(
            self.name(),
            compile_tag_sets(policy)?,
        ))
    }
}

/// Selects objects lacking every key of at least one selector's
/// `withoutTagKeys`
#[derive(Debug, Clone, Copy, Default)]
pub struct WithoutTagKeysFilter;

impl WithoutTagKeysFilter {
    /// Create a new tag-absence filter
    pub fn new() -> Self {
        Self
    }
}

impl Filter for WithoutTagKeysFilter {
    fn name(&self) -> &str {
        "Filter by absent tag keys"
    }

    fn compile(&self, policy: &Policy) -> Result<CompiledFilter> {
        Ok(CompiledFilter::from_predicates(
            self.name(),
            compile_tag_absences(policy)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucketsweep_core::StorageObject;
    use bucketsweep_policy::Selector;

    fn objects() -> Vec<StorageObject> {
        vec![
            StorageObject::new("build/1.tar").with_tag("env", "ci"),
            StorageObject::new("build/2.tar")
                .with_tag("env", "ci")
                .with_tag("retain", "true"),
            StorageObject::new("data/a.parquet").with_tag("env", "prod"),
            StorageObject::new("scratch/x"),
        ]
    }

    fn keys<'a>(objects: &[&'a StorageObject]) -> Vec<&'a str> {
        objects.iter().map(|o| o.key.as_str()).collect()
    }

    #[test]
    fn test_tag_filter_ors_selectors() {
        let objects = objects();
        let policy = Policy::new(vec![
            Selector::tags([("env", "prod")]),
            Selector::tags([("env", "ci"), ("retain", "true")]),
        ]);

        let output = TagFilter::new().filter_all(&objects, &policy).unwrap();
        assert_eq!(keys(&output), vec!["build/2.tar", "data/a.parquet"]);
    }

    #[test]
    fn test_tag_filter_without_tag_selectors() {
        let objects = objects();
        let policy = Policy::new(vec![Selector::match_expression(".*")]);

        assert!(TagFilter::new().filter_all(&objects, &policy).unwrap().is_empty());
    }

    #[test]
    fn test_without_tag_keys() {
        let objects = objects();
        let policy = Policy::new(vec![Selector::without_tag_keys(["retain"])]);

        let output = WithoutTagKeysFilter::new().filter_all(&objects, &policy).unwrap();
        assert_eq!(
            keys(&output),
            vec!["build/1.tar", "data/a.parquet", "scratch/x"]
        );
    }

    #[test]
    fn test_without_tag_keys_needs_every_key_absent() {
        let objects = objects();
        let policy = Policy::new(vec![Selector::without_tag_keys(["retain", "env"])]);

        let output = WithoutTagKeysFilter::new().filter_all(&objects, &policy).unwrap();
        assert_eq!(keys(&output), vec!["scratch/x"]);
    }

    #[test]
    fn test_without_tag_keys_empty_policy() {
        let objects = objects();
        let output = WithoutTagKeysFilter::new()
            .filter_all(&objects, &Policy::default())
            .unwrap();

        assert!(output.is_empty());
    }
}
