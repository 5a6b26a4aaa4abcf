//! Driver configuration

use bucketsweep_filters::{Composition, FilterKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Defaults for the `bucketsweep` command, read from `bucketsweep.yaml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// How filters are combined when several run
    #[serde(default)]
    pub mode: Composition,

    /// Filters to run; empty means "whatever the policy references"
    #[serde(default)]
    pub filters: Vec<FilterKind>,

    /// Output format for candidate lists
    #[serde(default)]
    pub format: OutputFormat,
}

impl CliConfig {
    /// Load configuration from file, falling back to defaults when the file
    /// does not exist
    pub fn load(config_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = config_path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(&content).map_err(|e| {
                anyhow::anyhow!("invalid config file {}: {}", path.display(), e)
            })?
        };

        debug!(path = %path.display(), ?config, "Configuration loaded");
        Ok(config)
    }

    /// Apply command-line overrides on top of file values
    pub fn with_overrides(
        mut self,
        filters: &[FilterKind],
        mode: Option<Composition>,
        format: Option<OutputFormat>,
    ) -> Self {
        if !filters.is_empty() {
            self.filters = filters.to_vec();
        }
        if let Some(mode) = mode {
            self.mode = mode;
        }
        if let Some(format) = format {
            self.format = format;
        }
        self
    }
}

/// Candidate list output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One key per line
    #[default]
    Text,
    /// A JSON document with candidates and stage reports
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{}', expected text or json", other)),
        }
    }
}

/// Parse a composition mode name
pub fn parse_mode(s: &str) -> Result<Composition, String> {
    match s.to_ascii_lowercase().as_str() {
        "all" | "and" | "intersect" => Ok(Composition::All),
        "any" | "or" | "union" => Ok(Composition::Any),
        other => Err(format!("unknown mode '{}', expected all or any", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = CliConfig::load("/nonexistent/bucketsweep.yaml").unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.mode, Composition::All);
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mode: any\nfilters: [object-key, without-tag-keys]\nformat: json").unwrap();

        let config = CliConfig::load(file.path()).unwrap();
        assert_eq!(config.mode, Composition::Any);
        assert_eq!(
            config.filters,
            vec![FilterKind::ObjectKey, FilterKind::WithoutTagKeys]
        );
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "filters: [size]").unwrap();

        assert!(CliConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = CliConfig {
            mode: Composition::Any,
            filters: vec![FilterKind::Tags],
            format: OutputFormat::Json,
        };

        let unchanged = config.clone().with_overrides(&[], None, None);
        assert_eq!(unchanged, config);

        let changed = config.with_overrides(&[FilterKind::ObjectKey], Some(Composition::All), Some(OutputFormat::Text));
        assert_eq!(changed.filters, vec![FilterKind::ObjectKey]);
        assert_eq!(changed.mode, Composition::All);
        assert_eq!(changed.format, OutputFormat::Text);
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("ALL").unwrap(), Composition::All);
        assert_eq!(parse_mode("union").unwrap(), Composition::Any);
        assert!(parse_mode("xor").is_err());
    }
}
