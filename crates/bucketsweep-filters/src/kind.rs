//! Filter kinds and construction by name

use bucketsweep_core::Error;
use bucketsweep_policy::{Policy, Selector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{
    Filter, LastAccessFilter, MetadataFilter, ObjectKeyFilter, TagFilter, WithoutTagKeysFilter,
};

/// The criteria a selector can address, one filter each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    /// `matchExpression`
    ObjectKey,
    /// `tags`
    Tags,
    /// `lastAccess`
    LastAccess,
    /// `objMetadata`
    Metadata,
    /// `withoutTagKeys`
    WithoutTagKeys,
}

impl FilterKind {
    /// Every kind, in evaluation order
    pub const ALL: [FilterKind; 5] = [
        FilterKind::ObjectKey,
        FilterKind::Tags,
        FilterKind::LastAccess,
        FilterKind::Metadata,
        FilterKind::WithoutTagKeys,
    ];

    /// Short name used in configuration and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ObjectKey => "object-key",
            Self::Tags => "tags",
            Self::LastAccess => "last-access",
            Self::Metadata => "metadata",
            Self::WithoutTagKeys => "without-tag-keys",
        }
    }

    /// Build the filter for this kind
    pub fn build(&self) -> Box<dyn Filter> {
        match self {
            Self::ObjectKey => Box::new(ObjectKeyFilter::new()),
            Self::Tags => Box::new(TagFilter::new()),
            Self::LastAccess => Box::new(LastAccessFilter::new()),
            Self::Metadata => Box::new(MetadataFilter::new()),
            Self::WithoutTagKeys => Box::new(WithoutTagKeysFilter::new()),
        }
    }

    /// Whether the selector sets this kind's field
    pub fn is_used_by(&self, selector: &Selector) -> bool {
        match self {
            Self::ObjectKey => selector.key_pattern().is_some(),
            Self::Tags => selector.required_tags().is_some(),
            Self::LastAccess => selector.last_access.is_some(),
            Self::Metadata => selector.required_metadata().is_some(),
            Self::WithoutTagKeys => selector.absent_tag_keys().is_some(),
        }
    }

    /// Kinds addressed by at least one selector of the policy, in
    /// evaluation order
    pub fn referenced_by(policy: &Policy) -> Vec<FilterKind> {
        Self::ALL
            .into_iter()
            .filter(|kind| policy.selectors.iter().any(|s| kind.is_used_by(s)))
            .collect()
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|k| k.as_str()).collect();
                Error::config(format!(
                    "unknown filter '{}', expected one of: {}",
                    s,
                    known.join(", ")
                ))
            })
    }
}
