use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ChangelogError;

/// Heading depth of version sections (`## 1.0.0`).
pub const VERSION_HEADING_DEPTH: u8 = 2;

/// Heading depth of change-type sections (`### 🐛 Bug fixes`).
pub const CHANGE_TYPE_HEADING_DEPTH: u8 = 3;

/// Canonical heading text of the section collecting unreleased changes.
pub const UNPUBLISHED_VERSION_NAME: &str = "master";

/// Heading texts read as the unpublished section.
pub const UNPUBLISHED_VERSION_ALIASES: [&str; 2] = [UNPUBLISHED_VERSION_NAME, "unpublished"];

/// Placeholder written into a cut-off version that has no entries.
pub const VERSION_EMPTY_PARAGRAPH_TEXT: &str =
    "_This version does not introduce any user-facing changes._";

/// Maps the unpublished aliases (in any case) to the canonical key, other
/// versions to themselves.
#[must_use]
pub fn canonical_version_key(version: &str) -> &str {
    if UNPUBLISHED_VERSION_ALIASES
        .iter()
        .any(|alias| alias.eq_ignore_ascii_case(version.trim()))
    {
        UNPUBLISHED_VERSION_NAME
    } else {
        version
    }
}

/// Standard change-type sections of a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    LibraryUpgrades,
    BreakingChanges,
    NewFeatures,
    BugFixes,
    Notices,
    Others,
}

impl ChangeType {
    /// Sections created for a fresh unpublished version.
    pub const DEFAULT_SECTIONS: [ChangeType; 3] =
        [Self::BreakingChanges, Self::NewFeatures, Self::BugFixes];

    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::LibraryUpgrades => "📚 3rd party library updates",
            Self::BreakingChanges => "🛠 Breaking changes",
            Self::NewFeatures => "🎉 New features",
            Self::BugFixes => "🐛 Bug fixes",
            Self::Notices => "⚠️ Notices",
            Self::Others => "💡 Others",
        }
    }
}

impl AsRef<str> for ChangeType {
    fn as_ref(&self) -> &str {
        self.heading()
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

impl FromStr for ChangeType {
    type Err = ChangelogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "library" | "library-upgrades" | "libraries" => Ok(Self::LibraryUpgrades),
            "breaking" | "breaking-changes" => Ok(Self::BreakingChanges),
            "feature" | "features" | "new-features" => Ok(Self::NewFeatures),
            "fix" | "fixes" | "bug-fixes" => Ok(Self::BugFixes),
            "notice" | "notices" => Ok(Self::Notices),
            "other" | "others" => Ok(Self::Others),
            _ => [
                Self::LibraryUpgrades,
                Self::BreakingChanges,
                Self::NewFeatures,
                Self::BugFixes,
                Self::Notices,
                Self::Others,
            ]
            .into_iter()
            .find(|change_type| change_type.heading() == value.trim())
            .ok_or_else(|| ChangelogError::UnknownChangeType(value.to_string())),
        }
    }
}

/// A single changelog line: message plus optional pull request and author references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pull_requests: Vec<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
}

impl ChangelogEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_pull_requests(mut self, pull_requests: impl IntoIterator<Item = u64>) -> Self {
        self.pull_requests.extend(pull_requests);
        self
    }

    #[must_use]
    pub fn with_authors<S: Into<String>>(mut self, authors: impl IntoIterator<Item = S>) -> Self {
        self.authors.extend(authors.into_iter().map(Into::into));
        self
    }
}

/// Entry together with where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub entry: ChangelogEntry,
    pub change_type: String,
    /// Target version; the unpublished section when `None`.
    pub version: Option<String>,
    pub group: Option<String>,
}

impl Change {
    pub fn new(change_type: impl AsRef<str>, entry: ChangelogEntry) -> Self {
        Self {
            entry,
            change_type: change_type.as_ref().to_string(),
            version: None,
            group: None,
        }
    }

    #[must_use]
    pub fn in_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// Entries per version, then per change-type heading, in document order
pub type ChangelogSections = IndexMap<String, IndexMap<String, Vec<String>>>;

/// Result of [`crate::Changelog::changes`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangelogChanges {
    pub total_count: usize,
    pub versions: ChangelogSections,
}

/// What an insertion did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Number of list items appended.
    Inserted(usize),
    /// The scan reached the next version before the requested change type;
    /// nothing was inserted.
    SectionMissingInVersion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_version_key() {
        assert_eq!(canonical_version_key("master"), "master");
        assert_eq!(canonical_version_key("unpublished"), "master");
        assert_eq!(canonical_version_key("Unpublished"), "master");
        assert_eq!(canonical_version_key("1.0.0"), "1.0.0");
    }

    #[test]
    fn test_change_type_from_str() {
        assert_eq!("fix".parse::<ChangeType>().unwrap(), ChangeType::BugFixes);
        assert_eq!(
            "Breaking".parse::<ChangeType>().unwrap(),
            ChangeType::BreakingChanges
        );
        assert_eq!(
            "🎉 New features".parse::<ChangeType>().unwrap(),
            ChangeType::NewFeatures
        );
        assert!(matches!(
            "chore".parse::<ChangeType>(),
            Err(ChangelogError::UnknownChangeType(name)) if name == "chore"
        ));
    }

    #[test]
    fn test_default_sections_order() {
        let headings: Vec<&str> = ChangeType::DEFAULT_SECTIONS
            .iter()
            .map(|change_type| change_type.heading())
            .collect();

        assert_eq!(
            headings,
            vec!["🛠 Breaking changes", "🎉 New features", "🐛 Bug fixes"]
        );
    }
}
