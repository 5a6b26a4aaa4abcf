//! Core types for bucketsweep

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Tags of a stored object, keyed by tag key
pub type Tags = BTreeMap<String, String>;

/// A single tag as returned by object-storage tagging APIs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag key
    #[serde(alias = "Key")]
    pub key: String,

    /// Tag value
    #[serde(alias = "Value")]
    pub value: String,
}

impl Tag {
    /// Create a new tag
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Convert a list of backend tags into a [`Tags`] map.
///
/// A key that appears twice keeps its last value.
pub fn tags_from_pairs(pairs: impl IntoIterator<Item = Tag>) -> Tags {
    pairs.into_iter().map(|tag| (tag.key, tag.value)).collect()
}

/// An object in a storage bucket, together with its tags and metadata.
///
/// Identity is the key alone: two objects with the same key compare equal
/// regardless of tags, size or timestamps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageObject {
    /// Object key
    pub key: String,

    /// Object size in bytes
    #[serde(default)]
    pub size: u64,

    /// Last modification time reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,

    /// Entity tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,

    /// Storage class (STANDARD, GLACIER, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,

    /// Object tags
    #[serde(
        default,
        deserialize_with = "deserialize_tags",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub tags: Tags,

    /// User-defined object metadata
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl StorageObject {
    /// Create a new object with only a key
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Add a tag
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Replace all tags from a backend tag list
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags = tags_from_pairs(tags);
        self
    }

    /// Add a user metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Set the last modification time
    pub fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    /// Set the object size
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Look up a metadata value, ignoring key case
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

impl PartialEq for StorageObject {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for StorageObject {}

impl Hash for StorageObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for StorageObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key: {}, tags: {:?}, lastModified: ", self.key, self.tags)?;
        match self.last_modified {
            Some(ts) => write!(f, "{}", ts.to_rfc3339()),
            None => write!(f, "unknown"),
        }
    }
}

/// Accepts tags either as a map or as a list of `{Key, Value}` pairs
fn deserialize_tags<'de, D>(deserializer: D) -> std::result::Result<Tags, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TagsRepr {
        Map(Tags),
        List(Vec<Tag>),
    }

    Ok(match Option::<TagsRepr>::deserialize(deserializer)? {
        Some(TagsRepr::Map(map)) => map,
        Some(TagsRepr::List(list)) => tags_from_pairs(list),
        None => Tags::new(),
    })
}
