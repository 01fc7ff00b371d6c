use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChangelogError, Result};
use crate::types::ChangeType;

/// Configuration options for changelog formatting and behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Host serving pull requests and user profiles, e.g. `github.com`
    pub repository_host: String,
    /// `org/repo`; when unset, references are written without links
    pub repository: Option<String>,
    /// Change-type headings created by a cut-off, in order
    pub cut_off_change_types: Vec<String>,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            repository_host: "github.com".to_string(),
            repository: None,
            cut_off_change_types: ChangeType::DEFAULT_SECTIONS
                .iter()
                .map(|change_type| change_type.heading().to_string())
                .collect(),
        }
    }
}

impl ChangelogConfig {
    /// Loads configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ChangelogError::Io(e).with_context(format!("Failed to read {}", path.display()))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            ChangelogError::ConfigParse(e)
                .with_context(format!("Invalid TOML in {}", path.display()))
        })?;
        Ok(config)
    }

    /// Loads `path` when it exists, defaults otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    #[must_use]
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }
}
