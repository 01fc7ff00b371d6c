//! Merges the unpublished changes of several package changelogs into one.

use std::thread;

use tracing::{debug, info};

use crate::core::Changelog;
use crate::error::{ChangelogError, Result};
use crate::store::ChangelogStore;
use crate::types::{
    canonical_version_key, ChangelogChanges, InsertOutcome,
    UNPUBLISHED_VERSION_NAME,
};

/// A package changelog and the group name its entries are merged under.
#[derive(Debug)]
pub struct PackageChangelog<S: ChangelogStore> {
    pub name: String,
    pub changelog: Changelog<S>,
}

impl<S: ChangelogStore> PackageChangelog<S> {
    pub fn new(name: impl Into<String>, changelog: Changelog<S>) -> Self {
        Self {
            name: name.into(),
            changelog,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Packages that contributed at least one entry, in merge order.
    pub merged_packages: Vec<String>,
    pub inserted_entries: usize,
    /// Change-type sections the target's unpublished version does not have.
    pub skipped_sections: usize,
}

/// Inserts the unpublished entries of every package into the unpublished
/// section of `target`, each package under its own group, and saves `target`
/// once at the end.
///
/// Packages are processed in name order; packages without entries are skipped.
/// Entry texts are copied verbatim, links and references included.
///
/// # Errors
///
/// Returns an error when `target` has no unpublished section, when it ends
/// before a needed change-type section, or when saving fails.
pub fn merge_changelogs<T, P>(
    target: &mut Changelog<T>,
    packages: &mut [PackageChangelog<P>],
) -> Result<MergeSummary>
where
    T: ChangelogStore,
    P: ChangelogStore + Send,
{
    let mut loaded = load_package_changes(packages)?;
    loaded.retain(|(name, changes)| {
        if changes.total_count == 0 {
            debug!(package = %name, "no unpublished changes, skipping");
        }
        changes.total_count > 0
    });
    loaded.sort_by(|(a, _), (b, _)| a.cmp(b));

    let unpublished = target
        .versions()
        .into_iter()
        .find(|version| canonical_version_key(version) == UNPUBLISHED_VERSION_NAME)
        .unwrap_or_else(|| UNPUBLISHED_VERSION_NAME.to_string());

    let mut summary = MergeSummary::default();
    for (name, changes) in loaded {
        for sections in changes.versions.values() {
            for (change_type, labels) in sections {
                let group = Some(name.as_str());
                let outcome = target
                    .insert_labels(&unpublished, change_type, group, labels.as_slice())
                    .map_err(|e| e.with_context(format!("Failed to merge changes of {name}")))?;
                match outcome {
                    InsertOutcome::Inserted(count) => summary.inserted_entries += count,
                    InsertOutcome::SectionMissingInVersion => summary.skipped_sections += 1,
                }
            }
        }
        summary.merged_packages.push(name);
    }

    target.save()?;
    info!(
        packages = summary.merged_packages.len(),
        entries = summary.inserted_entries,
        skipped = summary.skipped_sections,
        "merged changelogs"
    );
    Ok(summary)
}

fn load_package_changes<P>(
    packages: &mut [PackageChangelog<P>],
) -> Result<Vec<(String, ChangelogChanges)>>
where
    P: ChangelogStore + Send,
{
    thread::scope(|scope| {
        let handles: Vec<_> = packages
            .iter_mut()
            .map(|package| {
                scope.spawn(move || {
                    let changes = package.changelog.changes(None, None);
                    (package.name.clone(), changes)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle.join().map_err(|_| {
                    ChangelogError::Other("Loading a package changelog panicked".to_string())
                })
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChangelogConfig;
    use crate::store::MemoryStore;
    use std::path::Path;

    const TARGET: &str = "# Changelog

## unpublished

### 🛠 Breaking changes

### 🎉 New features

### 🐛 Bug fixes

## 50.0.0

### 🐛 Bug fixes

- Fixed Z
";

    fn package(store: &MemoryStore, name: &str, content: &str) -> PackageChangelog<MemoryStore> {
        let path = format!("packages/{name}/CHANGELOG.md");
        let store = store.clone().with_file(&path, content);
        PackageChangelog::new(
            name,
            Changelog::with_store(path, ChangelogConfig::default(), store),
        )
    }

    #[test]
    fn test_merge_groups_by_package_in_name_order() {
        let store = MemoryStore::new().with_file("CHANGELOG.md", TARGET);
        let mut target =
            Changelog::with_store("CHANGELOG.md", ChangelogConfig::default(), store.clone());
        let mut packages = vec![
            package(
                &store,
                "expo-foo",
                "## master\n\n### 🐛 Bug fixes\n\n- Fixed Y (#2 by @bob)\n\n## 1.0.0\n\n### 🐛 Bug fixes\n\n- Old\n",
            ),
            package(&store, "expo-empty", "## master\n\n### 🐛 Bug fixes\n"),
            package(
                &store,
                "expo-bar",
                "## master\n\n### 🎉 New features\n\n- Added X\n\n### 🐛 Bug fixes\n\n- Fixed W\n",
            ),
        ];

        let summary = merge_changelogs(&mut target, &mut packages).unwrap();

        assert_eq!(summary.merged_packages, vec!["expo-bar", "expo-foo"]);
        assert_eq!(summary.inserted_entries, 3);
        assert_eq!(summary.skipped_sections, 0);
        assert_eq!(
            store.contents(Path::new("CHANGELOG.md")).unwrap(),
            "# Changelog

## unpublished

### 🛠 Breaking changes

### 🎉 New features

- **`expo-bar`**
  - Added X

### 🐛 Bug fixes

- **`expo-bar`**
  - Fixed W
- **`expo-foo`**
  - Fixed Y (#2 by @bob)

## 50.0.0

### 🐛 Bug fixes

- Fixed Z
"
        );
    }

    #[test]
    fn test_merge_counts_missing_sections() {
        let store = MemoryStore::new()
            .with_file("CHANGELOG.md", "## master\n\n### 🐛 Bug fixes\n\n## 1.0.0\n\n### 💡 Others\n");
        let mut target =
            Changelog::with_store("CHANGELOG.md", ChangelogConfig::default(), store.clone());
        let mut packages = vec![package(
            &store,
            "expo-foo",
            "## master\n\n### 💡 Others\n\n- Cleaned up\n",
        )];

        let summary = merge_changelogs(&mut target, &mut packages).unwrap();

        assert_eq!(summary.inserted_entries, 0);
        assert_eq!(summary.skipped_sections, 1);
        assert!(!store.contents(Path::new("CHANGELOG.md")).unwrap().contains("Cleaned up"));
    }

    #[test]
    fn test_merge_copies_entries_verbatim() {
        let store = MemoryStore::new().with_file("CHANGELOG.md", "## master\n\n### 🐛 Bug fixes\n");
        let mut target =
            Changelog::with_store("CHANGELOG.md", ChangelogConfig::default(), store.clone());
        let entries = [
            "Fixed typings (@types/node)",
            "Fixed X ([#12](https://github.com/expo/expo/pull/12) by [@alice](https://github.com/alice))",
            "Bumped RN (#123 follow-up)",
        ];
        let content = format!(
            "## master\n\n### 🐛 Bug fixes\n\n{}",
            entries.map(|entry| format!("- {entry}\n")).concat()
        );
        let mut packages = vec![package(&store, "expo-foo", &content)];

        let summary = merge_changelogs(&mut target, &mut packages).unwrap();

        assert_eq!(summary.inserted_entries, 3);
        let merged = store.contents(Path::new("CHANGELOG.md")).unwrap();
        let merged_entries: Vec<&str> = merged
            .lines()
            .filter_map(|line| line.strip_prefix("  - "))
            .collect();
        assert_eq!(merged_entries, entries);
    }

    #[test]
    fn test_merge_keeps_plain_references_for_linked_target() {
        let store = MemoryStore::new().with_file("CHANGELOG.md", "## master\n\n### 🐛 Bug fixes\n");
        let config = ChangelogConfig::default().with_repository("expo/expo");
        let mut target = Changelog::with_store("CHANGELOG.md", config, store.clone());
        let mut packages = vec![package(
            &store,
            "expo-foo",
            "## master\n\n### 🐛 Bug fixes\n\n- Fixed Y (#2)\n",
        )];

        merge_changelogs(&mut target, &mut packages).unwrap();

        assert!(store
            .contents(Path::new("CHANGELOG.md"))
            .unwrap()
            .contains("- **`expo-foo`**\n  - Fixed Y (#2)\n"));
    }

    #[test]
    fn test_merge_without_unpublished_section_fails() {
        let store = MemoryStore::new().with_file("CHANGELOG.md", "## 1.0.0\n\n### 🐛 Bug fixes\n");
        let mut target =
            Changelog::with_store("CHANGELOG.md", ChangelogConfig::default(), store.clone());
        let mut packages = vec![package(&store, "expo-foo", "## master\n\n### 🐛 Bug fixes\n\n- Fixed\n")];

        let err = merge_changelogs(&mut target, &mut packages).unwrap_err();

        assert!(err.user_message().contains("expo-foo"));
        assert!(err.user_message().contains("'master'"));
    }
}
