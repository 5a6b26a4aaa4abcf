//! Deletion policy definitions and loading

use bucketsweep_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::Selector;

/// Document kind expected in `kind`
pub const POLICY_KIND: &str = "DeleteConfig";

/// A deletion policy: an ordered list of selectors plus schema metadata.
///
/// Selectors are combined with OR by every filter. A policy with no
/// selectors selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Schema version, e.g. `v1alpha1`
    #[serde(default)]
    pub api_version: String,

    /// Document kind, normally `DeleteConfig`
    #[serde(default)]
    pub kind: String,

    /// Selectors in declaration order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub selectors: Vec<Selector>,
}

impl Policy {
    /// Create a policy from selectors with the current schema header
    pub fn new(selectors: Vec<Selector>) -> Self {
        Self {
            api_version: "v1alpha1".to_string(),
            kind: POLICY_KIND.to_string(),
            selectors,
        }
    }

    /// Load a policy from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let policy: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::policy(format!("failed to parse YAML policy: {}", e)))?;
        policy.check_header();
        Ok(policy)
    }

    /// Load a policy from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: Self = serde_json::from_str(json)
            .map_err(|e| Error::policy(format!("failed to parse JSON policy: {}", e)))?;
        policy.check_header();
        Ok(policy)
    }

    /// Load a policy from a file; `.json` files are read as JSON, anything
    /// else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::policy(format!("failed to read policy {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "Loading policy");

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Whether the policy has no selectors at all
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Header problems are reported but never rejected
    fn check_header(&self) {
        if self.api_version.is_empty() {
            warn!("Policy has no apiVersion");
        }
        if self.kind != POLICY_KIND {
            warn!(kind = %self.kind, expected = POLICY_KIND, "Unexpected policy kind");
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Selector>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Selector>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MOCK_POLICY: &str = r#"
apiVersion: v1alpha1
kind: DeleteConfig
selectors:
  - matchExpression: "\\.pdf$"
  - matchExpression: "^tmp"
    tags:
      env: dev
  - lastAccess:
      timezone: UTC
      from: "2024-01-01"
      to: "2024-06-30"
    objMetadata:
      owner: ops
    withoutTagKeys:
      - retain
"#;

    #[test]
    fn test_policy_deserialization() {
        let policy = Policy::from_yaml(MOCK_POLICY).unwrap();

        assert_eq!(policy.api_version, "v1alpha1");
        assert_eq!(policy.kind, POLICY_KIND);
        assert_eq!(policy.selectors.len(), 3);
        assert_eq!(policy.selectors[0].key_pattern(), Some("\\.pdf$"));
        assert_eq!(policy.selectors[1].required_tags().unwrap()["env"], "dev");
        assert_eq!(
            policy.selectors[2].absent_tag_keys(),
            Some(&["retain".to_string()][..])
        );
    }

    #[test]
    fn test_selector_order_preserved() {
        let policy = Policy::from_yaml(MOCK_POLICY).unwrap();
        let patterns: Vec<_> = policy
            .selectors
            .iter()
            .filter_map(|s| s.key_pattern())
            .collect();

        assert_eq!(patterns, vec!["\\.pdf$", "^tmp"]);
    }

    #[test]
    fn test_missing_or_null_selectors() {
        let policy = Policy::from_yaml("apiVersion: v1alpha1\nkind: DeleteConfig\n").unwrap();
        assert!(policy.is_empty());

        let policy = Policy::from_yaml("kind: DeleteConfig\nselectors: null\n").unwrap();
        assert!(policy.is_empty());
    }

    #[test]
    fn test_invalid_yaml_is_policy_error() {
        let err = Policy::from_yaml("selectors: [unclosed").unwrap_err();
        assert!(matches!(err, Error::Policy(_)));
    }

    #[test]
    fn test_metadata_without_value_is_policy_error() {
        let yaml = "kind: DeleteConfig\nselectors:\n  - objMetadata:\n      owner:\n";
        let err = Policy::from_yaml(yaml).unwrap_err();

        assert!(matches!(err, Error::Policy(_)));
        assert!(err.to_string().contains("'owner'"), "unexpected error: {err}");
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"apiVersion": "v1alpha1", "kind": "DeleteConfig", "selectors": [{"matchExpression": "^logs/"}]}"#;
        let policy = Policy::from_json(json).unwrap();

        assert_eq!(policy, Policy::new(vec![Selector::match_expression("^logs/")]));
    }

    #[test]
    fn test_from_file_by_extension() {
        let mut yaml_file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        yaml_file.write_all(MOCK_POLICY.as_bytes()).unwrap();
        let policy = Policy::from_file(yaml_file.path()).unwrap();
        assert_eq!(policy.selectors.len(), 3);

        let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        json_file
            .write_all(br#"{"kind": "DeleteConfig", "selectors": []}"#)
            .unwrap();
        let policy = Policy::from_file(json_file.path()).unwrap();
        assert!(policy.is_empty());
    }

    #[test]
    fn test_from_missing_file() {
        let err = Policy::from_file("/nonexistent/policy.yaml").unwrap_err();
        assert!(err.to_string().contains("failed to read policy"));
    }
}
