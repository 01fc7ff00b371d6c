//! Fixtures shared by the integration tests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A package changelog with unpublished entries and two releases.
pub const PACKAGE_CHANGELOG: &str = "# Changelog

## Unpublished

### 🛠 Breaking changes

### 🎉 New features

- Added `useThing` hook ([#21](https://github.com/expo/expo/pull/21) by [@alice](https://github.com/alice))

### 🐛 Bug fixes

- Fixed crash on launch (#20)

## 1.1.0 - 2023-05-01

### 🐛 Bug fixes

- Fixed layout.

## 1.0.0

### 🎉 New features

- Initial release.
";

/// A changelog whose unpublished section has no entries.
pub const EMPTY_UNPUBLISHED_CHANGELOG: &str = "# Changelog

## master

### 🛠 Breaking changes

### 🎉 New features

### 🐛 Bug fixes

## 2.0.0

### 🎉 New features

- Added feature.
";

/// Writes `content` as `CHANGELOG.md` inside `dir`, creating it when needed.
pub fn write_changelog(dir: &Path, content: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join("CHANGELOG.md");
    fs::write(&path, content)?;
    Ok(path)
}

/// Unpublished-only changelog of a package with the given bug fixes.
#[must_use]
pub fn package_with_fixes(fixes: &[&str]) -> String {
    let entries: String = fixes.iter().map(|fix| format!("- {fix}\n")).collect();
    format!("# Changelog\n\n## master\n\n### 🐛 Bug fixes\n\n{entries}\n## 0.1.0\n\n- Initial.\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_changelog_creates_directories() {
        let temp_dir = TempDir::new().unwrap();

        let path = write_changelog(&temp_dir.path().join("packages/expo-foo"), "## master\n").unwrap();

        assert!(path.ends_with("packages/expo-foo/CHANGELOG.md"));
        assert_eq!(fs::read_to_string(path).unwrap(), "## master\n");
    }

    #[test]
    fn test_package_with_fixes() {
        assert_eq!(
            package_with_fixes(&["Fixed A", "Fixed B"]),
            "# Changelog\n\n## master\n\n### 🐛 Bug fixes\n\n- Fixed A\n- Fixed B\n\n## 0.1.0\n\n- Initial.\n"
        );
    }
}
