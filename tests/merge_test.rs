#[cfg(test)]
mod tests {
    use changelog::{merge_changelogs, Changelog, ChangelogConfig, PackageChangelog};
    use changelog_tests::{package_with_fixes, write_changelog, EMPTY_UNPUBLISHED_CHANGELOG};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn package(root: &Path, name: &str, content: &str) -> PackageChangelog<changelog::FsStore> {
        let path = write_changelog(&root.join("packages").join(name), content).unwrap();
        PackageChangelog::new(name, Changelog::new(path))
    }

    #[test]
    fn test_merge_package_changelogs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let target_path = write_changelog(root, EMPTY_UNPUBLISHED_CHANGELOG).unwrap();
        let mut target = Changelog::new(&target_path);
        let mut packages = vec![
            package(root, "expo-image", &package_with_fixes(&["Fixed caching (#5)"])),
            package(root, "expo-camera", &package_with_fixes(&["Fixed zoom", "Fixed flash"])),
            package(root, "expo-idle", &package_with_fixes(&[])),
        ];

        let summary = merge_changelogs(&mut target, &mut packages).unwrap();

        assert_eq!(summary.merged_packages, vec!["expo-camera", "expo-image"]);
        assert_eq!(summary.inserted_entries, 3);
        assert!(fs::read_to_string(&target_path).unwrap().contains(
            "### 🐛 Bug fixes

- **`expo-camera`**
  - Fixed zoom
  - Fixed flash
- **`expo-image`**
  - Fixed caching (#5)

## 2.0.0"
        ));
    }

    #[test]
    fn test_merge_does_not_touch_package_changelogs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let target_path = write_changelog(root, EMPTY_UNPUBLISHED_CHANGELOG).unwrap();
        let package_content = package_with_fixes(&["Fixed zoom"]);
        let mut target = Changelog::new(&target_path);
        let mut packages = vec![package(root, "expo-camera", &package_content)];

        merge_changelogs(&mut target, &mut packages).unwrap();

        assert_eq!(
            fs::read_to_string(root.join("packages/expo-camera/CHANGELOG.md")).unwrap(),
            package_content
        );
    }

    #[test]
    fn test_merge_twice_appends_to_existing_groups() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let target_path = write_changelog(root, EMPTY_UNPUBLISHED_CHANGELOG).unwrap();
        let mut target = Changelog::with_config(&target_path, ChangelogConfig::default());

        let mut first = vec![package(root, "expo-camera", &package_with_fixes(&["Fixed zoom"]))];
        merge_changelogs(&mut target, &mut first).unwrap();
        let mut second = vec![package(root, "expo-camera", &package_with_fixes(&["Fixed flash"]))];
        merge_changelogs(&mut target, &mut second).unwrap();

        let content = fs::read_to_string(&target_path).unwrap();
        assert_eq!(content.matches("**`expo-camera`**").count(), 1);
        assert!(content.contains("  - Fixed zoom\n  - Fixed flash\n"));
    }

    #[test]
    fn test_merge_keeps_entry_text_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let target_path = write_changelog(root, EMPTY_UNPUBLISHED_CHANGELOG).unwrap();
        let mut target = Changelog::new(&target_path);
        let fixes = [
            "Fixed `Image` placeholder ([#31](https://github.com/expo/expo/pull/31) by [@bob](https://github.com/bob))",
            "Updated typings (@types/react)",
            "Fixed blur on Android (#32, see [docs](https://docs.expo.dev))",
        ];
        let mut packages = vec![package(root, "expo-image", &package_with_fixes(&fixes))];

        merge_changelogs(&mut target, &mut packages).unwrap();

        let content = fs::read_to_string(&target_path).unwrap();
        let merged: Vec<&str> = content
            .lines()
            .filter_map(|line| line.strip_prefix("  - "))
            .collect();
        assert_eq!(merged, fixes);
    }
}
