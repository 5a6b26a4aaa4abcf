//! Selector definitions

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One matching rule within a policy.
///
/// A selector is sparse: every field is optional and each filter only reads
/// the fields of its own criterion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    /// Regular expression matched anywhere in the object key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_expression: Option<String>,

    /// Tag pairs that must all be present on the object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,

    /// Window the object's last access must fall into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_access: Option<LastAccess>,

    /// Metadata pairs that must all be present on the object
    #[serde(
        default,
        deserialize_with = "deserialize_metadata",
        skip_serializing_if = "Option::is_none"
    )]
    pub obj_metadata: Option<BTreeMap<String, String>>,

    /// Tag keys that must not be present on the object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub without_tag_keys: Option<Vec<String>>,
}

impl Selector {
    /// Create a selector matching object keys against `pattern`
    pub fn match_expression(pattern: impl Into<String>) -> Self {
        Self {
            match_expression: Some(pattern.into()),
            ..Self::default()
        }
    }

    /// Create a selector requiring the given tag pairs
    pub fn tags<K, V>(tags: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            tags: Some(tags.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
            ..Self::default()
        }
    }

    /// Create a selector with a last-access window
    pub fn last_access(window: LastAccess) -> Self {
        Self {
            last_access: Some(window),
            ..Self::default()
        }
    }

    /// Create a selector requiring the given metadata pairs
    pub fn obj_metadata<K, V>(metadata: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            obj_metadata: Some(
                metadata
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    /// Create a selector requiring the given tag keys to be absent
    pub fn without_tag_keys<K: Into<String>>(keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            without_tag_keys: Some(keys.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// The key pattern, if set and non-empty
    pub fn key_pattern(&self) -> Option<&str> {
        self.match_expression.as_deref().filter(|p| !p.is_empty())
    }

    /// The required tags, if set and non-empty
    pub fn required_tags(&self) -> Option<&BTreeMap<String, String>> {
        self.tags.as_ref().filter(|t| !t.is_empty())
    }

    /// The required metadata, if set and non-empty
    pub fn required_metadata(&self) -> Option<&BTreeMap<String, String>> {
        self.obj_metadata.as_ref().filter(|m| !m.is_empty())
    }

    /// The tag keys that must be absent, if set and non-empty
    pub fn absent_tag_keys(&self) -> Option<&[String]> {
        self.without_tag_keys.as_deref().filter(|k| !k.is_empty())
    }
}

/// Date window constraint on an object's last access.
///
/// `from` and `to` are kept as written in the policy document; they are
/// parsed when the last-access filter compiles its predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastAccess {
    /// `UTC`, `Z` or a fixed offset such as `+02:00`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Inclusive lower bound
    #[serde(default, alias = "fromDate", skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    /// Exclusive upper bound (a bare date covers that whole day)
    #[serde(default, alias = "toDate", skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl LastAccess {
    /// Create a window between two dates
    pub fn between(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            timezone: None,
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }

    /// Set the timezone the dates are written in
    pub fn in_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }
}

/// Metadata values keep the text written in the policy (`1.0` stays
/// `1.0`); a key with no value is rejected by name
fn deserialize_metadata<'de, D>(
    deserializer: D,
) -> Result<Option<BTreeMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<BTreeMap<String, Option<String>>>::deserialize(deserializer)? else {
        return Ok(None);
    };

    raw.into_iter()
        .map(|(key, value)| match value {
            Some(value) => Ok((key, value)),
            None => Err(D::Error::custom(format!(
                "objMetadata key '{}' has no value",
                key
            ))),
        })
        .collect::<Result<BTreeMap<_, _>, _>>()
        .map(Some)
}
