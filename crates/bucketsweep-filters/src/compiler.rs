//! Predicate compiler
//!
//! Turns selector fields into executable predicates. Compilation is
//! fail-fast: the first malformed field aborts with an error and nothing
//! is returned, so a policy is either applied whole or not at all.
//!
//! Key patterns use the `regex` crate dialect (RE2 style). It guarantees
//! linear-time matching and therefore rejects look-around (`(?!...)`,
//! `(?=...)`) and back-references.

use bucketsweep_core::{Error, Result, StorageObject};
use bucketsweep_policy::Policy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

use crate::filter::Predicate;

/// A compiled `matchExpression`
#[derive(Debug, Clone)]
pub struct KeyPattern {
    regex: Regex,
}

impl KeyPattern {
    /// Compile a single pattern
    pub fn new(pattern: &str) -> Result<Self> {
        let regex =
            Regex::new(pattern).map_err(|e| Error::invalid_pattern(pattern, e.to_string()))?;
        Ok(Self { regex })
    }

    /// The source pattern
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether the pattern matches anywhere in `key`
    pub fn is_match(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}

impl Predicate for KeyPattern {
    fn matches(&self, object: &StorageObject) -> bool {
        self.is_match(&object.key)
    }
}

/// Every non-empty `matchExpression` in selector order, duplicates kept
pub fn key_patterns(policy: &Policy) -> Vec<&str> {
    policy
        .selectors
        .iter()
        .filter_map(|s| s.key_pattern())
        .collect()
}

/// Compile key patterns in order, stopping at the first invalid one
pub fn compile_key_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<KeyPattern>> {
    let compiled = patterns
        .iter()
        .map(|p| KeyPattern::new(p.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    debug!(count = compiled.len(), "Compiled key patterns");
    Ok(compiled)
}

/// All listed tags must be present with equal values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSet {
    required: BTreeMap<String, String>,
}

impl Predicate for TagSet {
    fn matches(&self, object: &StorageObject) -> bool {
        self.required
            .iter()
            .all(|(k, v)| object.tags.get(k).is_some_and(|actual| actual == v))
    }
}

/// Compile the `tags` field of every selector that sets one
pub fn compile_tag_sets(policy: &Policy) -> Result<Vec<TagSet>> {
    let mut sets = Vec::new();
    for (index, selector) in policy.selectors.iter().enumerate() {
        let Some(tags) = selector.required_tags() else {
            continue;
        };
        reject_empty_keys(index, "tags", tags.keys())?;
        sets.push(TagSet {
            required: tags.clone(),
        });
    }
    Ok(sets)
}

/// All listed metadata entries must be present; keys ignore case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataSet {
    required: BTreeMap<String, String>,
}

impl Predicate for MetadataSet {
    fn matches(&self, object: &StorageObject) -> bool {
        self.required
            .iter()
            .all(|(k, v)| object.metadata_value(k) == Some(v.as_str()))
    }
}

/// Compile the `objMetadata` field of every selector that sets one
pub fn compile_metadata_sets(policy: &Policy) -> Result<Vec<MetadataSet>> {
    let mut sets = Vec::new();
    for (index, selector) in policy.selectors.iter().enumerate() {
        let Some(metadata) = selector.required_metadata() else {
            continue;
        };
        reject_empty_keys(index, "objMetadata", metadata.keys())?;
        sets.push(MetadataSet {
            required: metadata.clone(),
        });
    }
    Ok(sets)
}

/// None of the listed tag keys may be present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAbsence {
    keys: Vec<String>,
}

impl Predicate for TagAbsence {
    fn matches(&self, object: &StorageObject) -> bool {
        !self.keys.iter().any(|k| object.tags.contains_key(k))
    }
}

/// Compile the `withoutTagKeys` field of every selector that sets one
pub fn compile_tag_absences(policy: &Policy) -> Result<Vec<TagAbsence>> {
    let mut absences = Vec::new();
    for (index, selector) in policy.selectors.iter().enumerate() {
        let Some(keys) = selector.absent_tag_keys() else {
            continue;
        };
        reject_empty_keys(index, "withoutTagKeys", keys.iter())?;
        absences.push(TagAbsence {
            keys: keys.to_vec(),
        });
    }
    Ok(absences)
}

/// Field path used in selector errors, e.g. `selectors[2].tags`
pub(crate) fn field_path(index: usize, field: &str) -> String {
    format!("selectors[{}].{}", index, field)
}

fn reject_empty_keys<'k>(
    index: usize,
    field: &str,
    keys: impl IntoIterator<Item = &'k String>,
) -> Result<()> {
    if keys.into_iter().any(|k| k.trim().is_empty()) {
        return Err(Error::invalid_selector(
            field_path(index, field),
            "keys must not be empty",
        ));
    }
    Ok(())
}
